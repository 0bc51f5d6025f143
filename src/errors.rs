//! Error type for the fallible edges of the converter.
//!
//! Translation itself never fails: constructs that cannot be converted are
//! reported as warnings on the writer's diagnostic sink. Only configuration,
//! rule compilation, tree loading, directory walking and file I/O produce a
//! [`ConvertError`].

use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    #[error("I/O error on `{}`", path.display())]
    #[diagnostic(code(dj2jinja::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk template directory `{}`", path.display())]
    #[diagnostic(code(dj2jinja::walk))]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid configuration in `{}`: {message}", path.display())]
    #[diagnostic(
        code(dj2jinja::config),
        help("configuration files are read as YAML (.yaml/.yml) or JSON (anything else)")
    )]
    Config { path: PathBuf, message: String },

    #[error("invalid identifier rule pattern `{pattern}`")]
    #[diagnostic(code(dj2jinja::rule))]
    Rule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("could not load template `{name}`: {message}")]
    #[diagnostic(code(dj2jinja::load))]
    Load { name: String, message: String },
}

impl ConvertError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        ConvertError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn load(name: &str, message: impl ToString) -> Self {
        ConvertError::Load {
            name: name.to_owned(),
            message: message.to_string(),
        }
    }
}
