//! Writer configuration.
//!
//! Everything here has a default matching a stock Jinja2 environment, so an
//! empty file (or no file) is a valid configuration.
//!
//! ```yaml
//! initial_autoescape: true
//! use_jinja_autoescape: false
//! delimiters:
//!   variable_start: "[["
//!   variable_end: "]]"
//! identifier_rules:
//!   - pattern: 'loop\.counter'
//!     replace: loop.index
//!   - pattern: '\.url$'
//!     replace: '.url()'
//!     unless: '(form|calendar)\.url'
//! runtime:
//!   builtins: true
//!   globals: [url, static, csrf_token]
//! tag_libraries:
//!   - name: shop_tags
//!     tags:
//!       cart_total: { module: shop.templatetags.shop_tags, name: total }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::errors::{ConvertError, Result};
use crate::resolver::{RuntimeNames, TagLibrary};
use crate::writer::IdentifierRule;

/// The six delimiter strings of the target dialect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    pub block_start: String,
    pub block_end: String,
    pub variable_start: String,
    pub variable_end: String,
    pub comment_start: String,
    pub comment_end: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            block_start: "{%".into(),
            block_end: "%}".into(),
            variable_start: "{{".into(),
            variable_end: "}}".into(),
            comment_start: "{#".into(),
            comment_end: "#}".into(),
        }
    }
}

/// Names the target environment provides, for existence warnings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSpec {
    /// Start from Jinja2's default filters and globals.
    #[serde(default)]
    pub builtins: bool,
    #[serde(flatten)]
    pub names: RuntimeNames,
}

impl RuntimeSpec {
    pub fn into_names(self) -> RuntimeNames {
        let mut names = if self.builtins {
            RuntimeNames::jinja_builtins()
        } else {
            RuntimeNames::default()
        };
        names.extend(self.names);
        names
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub delimiters: Delimiters,
    /// Whether printed expressions start out escaped.
    pub initial_autoescape: bool,
    /// The Jinja environment autoescapes on its own; never emit `|e`.
    pub use_jinja_autoescape: bool,
    pub identifier_rules: Vec<IdentifierRule>,
    pub runtime: Option<RuntimeSpec>,
    pub tag_libraries: Vec<TagLibrary>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            initial_autoescape: true,
            use_jinja_autoescape: false,
            identifier_rules: Vec::new(),
            runtime: None,
            tag_libraries: Vec::new(),
        }
    }
}

impl WriterConfig {
    /// Reads a configuration file: YAML for `.yaml`/`.yml`, JSON otherwise.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );
        let parsed = if is_yaml {
            Self::from_yaml(&text)
        } else {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ConvertError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }
}
