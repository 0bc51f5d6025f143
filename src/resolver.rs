//! Filter and custom-tag name resolution.
//!
//! Filters carry the name the host registered them under. Simple and
//! inclusion tags only carry the Python function behind them, so their
//! names come from a reverse index over every loaded tag library. The index
//! is built once, on first use, behind a [`OnceCell`]; one resolver can be
//! shared between writers on different threads.
//!
//! [`TargetRuntime`] is the optional view of the Jinja environment used to
//! warn about names that will not exist at render time.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::debug;

use crate::ast::{FilterCall, TagFunction};

// ============================================================================
// TAG LIBRARIES
// ============================================================================

/// A loaded `{% load %}`-able library: tag name to implementing function.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagLibrary {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, TagFunction>,
}

impl TagLibrary {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, tag: &str, func: TagFunction) -> Self {
        self.tags.insert(tag.to_owned(), func);
        self
    }
}

#[derive(Debug, Default)]
pub struct NameResolver {
    libraries: Vec<TagLibrary>,
    tag_index: OnceCell<HashMap<String, String>>,
}

impl NameResolver {
    pub fn new(libraries: Vec<TagLibrary>) -> Self {
        Self {
            libraries,
            tag_index: OnceCell::new(),
        }
    }

    /// The registered name of a filter, if the host recorded one.
    pub fn filter_name<'a>(&self, filter: &'a FilterCall) -> Option<&'a str> {
        filter.name.as_deref()
    }

    /// The tag name a simple/inclusion tag function was registered under.
    pub fn tag_name(&self, func: &TagFunction) -> Option<&str> {
        self.index()
            .get(&func.qualified_name())
            .map(String::as_str)
    }

    fn index(&self) -> &HashMap<String, String> {
        self.tag_index.get_or_init(|| {
            let index: HashMap<String, String> = self
                .libraries
                .iter()
                .flat_map(|library| library.tags.iter())
                .map(|(tag, func)| (func.qualified_name(), tag.clone()))
                .collect();
            debug!(
                libraries = self.libraries.len(),
                tags = index.len(),
                "built reverse tag index"
            );
            index
        })
    }
}

// ============================================================================
// TARGET RUNTIME
// ============================================================================

/// Read-only view of the names a Jinja environment provides.
pub trait TargetRuntime: Send + Sync {
    fn has_filter(&self, name: &str) -> bool;
    fn has_global(&self, name: &str) -> bool;

    fn has_callable(&self, name: &str) -> bool {
        self.has_global(name) || self.has_filter(name)
    }
}

const JINJA_FILTERS: &[&str] = &[
    "abs", "attr", "batch", "capitalize", "center", "count", "d", "default", "dictsort", "e",
    "escape", "filesizeformat", "first", "float", "forceescape", "format", "groupby", "indent",
    "int", "items", "join", "last", "length", "list", "lower", "map", "max", "min", "pprint",
    "random", "reject", "rejectattr", "replace", "reverse", "round", "safe", "select",
    "selectattr", "slice", "sort", "string", "striptags", "sum", "title", "tojson", "trim",
    "truncate", "unique", "upper", "urlencode", "urlize", "wordcount", "wordwrap", "xmlattr",
];

const JINJA_GLOBALS: &[&str] = &["range", "dict", "lipsum", "cycler", "joiner", "namespace"];

/// A plain set of filter and global names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeNames {
    #[serde(default)]
    pub filters: BTreeSet<String>,
    #[serde(default)]
    pub globals: BTreeSet<String>,
}

impl RuntimeNames {
    /// Jinja2's default filters and globals.
    pub fn jinja_builtins() -> Self {
        Self {
            filters: JINJA_FILTERS.iter().map(|s| (*s).to_owned()).collect(),
            globals: JINJA_GLOBALS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    pub fn extend(&mut self, other: RuntimeNames) {
        self.filters.extend(other.filters);
        self.globals.extend(other.globals);
    }
}

impl TargetRuntime for RuntimeNames {
    fn has_filter(&self, name: &str) -> bool {
        self.filters.contains(name)
    }

    fn has_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }
}
