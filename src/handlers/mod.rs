//! Node handlers and the table that dispatches to them.
//!
//! ## Module Structure
//!
//! - **`basic`**: text, printed variables and the small standalone tags
//! - **`control`**: `for`, `if`, `ifequal`, `cycle`, `with`, `regroup`
//! - **`inheritance`**: `block`, `extends`, `include`
//! - **`scoped`**: regions that change writer state (`filter`, `autoescape`, `spaceless`)
//! - **`i18n`**: translation and language tags
//! - **`tags`**: tags that call out to runtime helpers (`url`, `widthratio`, simple and inclusion tags)
//!
//! Lookup is by [`NodeKind`] first, then by the node's host type name. The
//! name fallback is how late-bound node classes (custom tags, and the simple
//! and inclusion tag nodes the host generates per registration) are matched.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::{Node, NodeKind};
use crate::writer::Writer;

mod basic;
mod control;
mod i18n;
mod inheritance;
mod scoped;
mod tags;

/// Emits target syntax for one node, writing to the writer's sinks.
pub type NodeHandler = fn(&mut Writer, &Node);

/// Unwraps the payload a handler expects. A mismatch means a handler was
/// registered under the wrong key; warn and skip the node.
macro_rules! expect_node {
    ($writer:expr, $node:expr, $variant:ident) => {
        match &$node.value {
            $crate::ast::NodeValue::$variant(inner) => inner,
            _ => {
                $writer.warn_at(
                    $node,
                    format!(
                        "Handler for {} received {}",
                        stringify!($variant),
                        $node.type_name()
                    ),
                );
                return;
            }
        }
    };
}
pub(crate) use expect_node;

#[derive(Clone, Default)]
pub struct HandlerTable {
    by_kind: HashMap<NodeKind, NodeHandler>,
    by_name: HashMap<String, NodeHandler>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: NodeKind, handler: NodeHandler) {
        self.by_kind.insert(kind, handler);
    }

    pub fn insert_named(&mut self, type_name: &str, handler: NodeHandler) {
        self.by_name.insert(type_name.to_owned(), handler);
    }

    /// Copies every entry of `overrides` into this table, replacing clashes.
    pub fn merge(&mut self, overrides: HandlerTable) {
        self.by_kind.extend(overrides.by_kind);
        self.by_name.extend(overrides.by_name);
    }

    pub fn lookup(&self, node: &Node) -> Option<NodeHandler> {
        self.by_kind
            .get(&node.kind())
            .or_else(|| self.by_name.get(node.type_name()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.by_kind.len() + self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The built-in handlers for Django's standard tag library.
pub fn default_handlers() -> HandlerTable {
    let mut table = HandlerTable::new();

    table.insert(NodeKind::Text, basic::text);
    table.insert(NodeKind::Variable, basic::variable);
    table.insert(NodeKind::Comment, basic::ignore);
    table.insert(NodeKind::Load, basic::ignore);
    table.insert(NodeKind::Debug, basic::debug);
    table.insert(NodeKind::TemplateTag, basic::template_tag);
    table.insert(NodeKind::Static, basic::static_tag);
    table.insert(NodeKind::CsrfToken, basic::csrf_token);
    table.insert(NodeKind::Verbatim, basic::verbatim);
    table.insert(NodeKind::Lorem, basic::lorem);

    table.insert(NodeKind::For, control::for_loop);
    table.insert(NodeKind::If, control::if_condition);
    table.insert(NodeKind::IfEqual, control::if_equal);
    table.insert(NodeKind::Cycle, control::cycle);
    table.insert(NodeKind::With, control::with_block);
    table.insert(NodeKind::Regroup, control::regroup);

    table.insert(NodeKind::Block, inheritance::block);
    table.insert(NodeKind::Extends, inheritance::extends);
    table.insert(NodeKind::Include, inheritance::include);

    table.insert(NodeKind::Filter, scoped::filter);
    table.insert(NodeKind::Autoescape, scoped::autoescape);
    table.insert(NodeKind::Spaceless, scoped::spaceless);

    table.insert(NodeKind::GetAvailableLanguages, i18n::get_available_languages);
    table.insert(NodeKind::GetCurrentLanguage, i18n::get_current_language);
    table.insert(NodeKind::GetCurrentLanguageBidi, i18n::get_current_language_bidi);
    table.insert(NodeKind::Translate, i18n::translate);
    table.insert(NodeKind::BlockTranslate, i18n::block_translate);

    table.insert(NodeKind::Url, tags::url);
    table.insert(NodeKind::WidthRatio, tags::width_ratio);
    // Generated per registration on the host side, so matched by name.
    table.insert_named(NodeKind::SimpleTag.type_name(), tags::simple_tag);
    table.insert_named(NodeKind::InclusionTag.type_name(), tags::inclusion_tag);

    table
}

pub static DEFAULT_HANDLERS: Lazy<HandlerTable> = Lazy::new(default_handlers);
