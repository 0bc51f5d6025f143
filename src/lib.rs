//! dj2jinja converts parsed Django template trees into Jinja2 template source.
//!
//! ## Module Structure
//!
//! - **`ast`**: the node model a host hands over (`Node`, expressions, conditions)
//! - **`writer`**: emission state, delimiter helpers and node dispatch
//! - **`handlers`**: one handler per node kind, plus the dispatch table
//! - **`condition`**: re-linearization of `{% if %}` condition trees
//! - **`resolver`**: filter and custom-tag name lookup, target runtime checks
//! - **`config`**: writer configuration loaded from YAML or JSON
//! - **`batch`**: directory-level conversion driver
//! - **`cli`**: the `dj2jinja` command-line front end
//!
//! ```rust
//! use dj2jinja::ast::{FilterExpression, Node};
//! use dj2jinja::Writer;
//!
//! let tree = vec![Node::for_loop(
//!     &["item"],
//!     FilterExpression::var("items"),
//!     vec![Node::print(FilterExpression::var("item.name"))],
//! )];
//! let jinja = Writer::default().render(&tree);
//! assert_eq!(jinja, "{% for item in items %}{{ item.name|e }}{% endfor %}");
//! ```

pub mod ast;
pub mod batch;
pub mod cli;
pub mod condition;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod resolver;
pub mod sink;
pub mod writer;

pub use crate::config::WriterConfig;
pub use crate::errors::{ConvertError, Result};
pub use crate::writer::Writer;
