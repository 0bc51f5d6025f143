//! The writer: emission state plus node dispatch.
//!
//! A [`Writer`] owns everything that changes while one template is being
//! converted: the output and diagnostic sinks, the autoescape and spaceless
//! flags, and the loop depth. Handlers receive `&mut Writer` and call back
//! into [`Writer::node`] / [`Writer::body`] for child nodes, so the whole
//! conversion is a single depth-first pass in document order.
//!
//! Writers are not shared. To convert several templates concurrently, give
//! each thread its own writer; only the [`NameResolver`] may be shared.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::ast::{Node, NodeKind};
use crate::config::{Delimiters, WriterConfig};
use crate::handlers::{HandlerTable, NodeHandler, DEFAULT_HANDLERS};
use crate::resolver::{NameResolver, TargetRuntime};
use crate::sink::{OutputBuffer, SharedOutput, StderrSink, StdoutSink};

mod emit;
mod identifiers;

pub use emit::python_repr;
pub use identifiers::{translate_identifier, IdentifierRule, RuleSpec};

// ============================================================================
// WRITER
// ============================================================================

pub struct Writer {
    pub stream: SharedOutput,
    pub error_stream: SharedOutput,
    pub delimiters: Delimiters,
    pub autoescape: bool,
    pub spaceless: bool,
    pub use_jinja_autoescape: bool,
    handlers: HandlerTable,
    loop_depth: usize,
    identifier_rules: Vec<IdentifierRule>,
    resolver: Arc<NameResolver>,
    runtime: Option<Arc<dyn TargetRuntime>>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new(WriterConfig::default())
    }
}

impl Writer {
    /// Builds a writer printing to stdout, with warnings on stderr.
    pub fn new(config: WriterConfig) -> Self {
        let runtime = config
            .runtime
            .map(|spec| Arc::new(spec.into_names()) as Arc<dyn TargetRuntime>);
        Self {
            stream: SharedOutput::new(StdoutSink),
            error_stream: SharedOutput::new(StderrSink),
            delimiters: config.delimiters,
            autoescape: config.initial_autoescape,
            spaceless: false,
            use_jinja_autoescape: config.use_jinja_autoescape,
            handlers: DEFAULT_HANDLERS.clone(),
            loop_depth: 0,
            identifier_rules: config.identifier_rules,
            resolver: Arc::new(NameResolver::new(config.tag_libraries)),
            runtime,
        }
    }

    pub fn with_stream(mut self, stream: SharedOutput) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_error_stream(mut self, error_stream: SharedOutput) -> Self {
        self.error_stream = error_stream;
        self
    }

    /// Merges caller handlers over the defaults; the caller's entry wins.
    pub fn with_handlers(mut self, overrides: HandlerTable) -> Self {
        self.handlers.merge(overrides);
        self
    }

    pub fn with_handler(mut self, kind: NodeKind, handler: NodeHandler) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Registers a handler for nodes matched by host type name.
    pub fn with_named_handler(mut self, type_name: &str, handler: NodeHandler) -> Self {
        self.handlers.insert_named(type_name, handler);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<NameResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_runtime(mut self, runtime: Arc<dyn TargetRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_identifier_rules(mut self, rules: Vec<IdentifierRule>) -> Self {
        self.identifier_rules = rules;
        self
    }

    /// Swaps the output sink, returning the previous one.
    pub fn replace_stream(&mut self, stream: SharedOutput) -> SharedOutput {
        std::mem::replace(&mut self.stream, stream)
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    // ========================================================================
    // LOOP DEPTH
    // ========================================================================

    pub fn enter_loop(&mut self) {
        self.loop_depth += 1;
        trace!(depth = self.loop_depth, "enter loop");
    }

    pub fn leave_loop(&mut self) {
        self.loop_depth = self.loop_depth.saturating_sub(1);
        trace!(depth = self.loop_depth, "leave loop");
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }

    pub fn loop_depth(&self) -> usize {
        self.loop_depth
    }

    // ========================================================================
    // SCOPED STATE
    // ========================================================================

    /// Runs `f` with autoescape set to `setting`, then restores the old value.
    pub fn with_autoescape(&mut self, setting: bool, f: impl FnOnce(&mut Self)) {
        let original = std::mem::replace(&mut self.autoescape, setting);
        f(self);
        self.autoescape = original;
    }

    /// Runs `f` in spaceless mode, then restores the old value.
    pub fn with_spaceless(&mut self, f: impl FnOnce(&mut Self)) {
        let original = std::mem::replace(&mut self.spaceless, true);
        f(self);
        self.spaceless = original;
    }

    /// Runs `f` inside one more loop level.
    pub fn with_loop(&mut self, f: impl FnOnce(&mut Self)) {
        self.enter_loop();
        f(self);
        self.leave_loop();
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    /// Prints a warning line to the diagnostic sink.
    pub fn warn(&self, message: impl AsRef<str>) {
        self.error_stream.emit(&format!("{}\n", message.as_ref()));
    }

    /// Prints a warning prefixed with the node's `[name:line]`, if it has an
    /// origin.
    pub fn warn_at(&self, node: &Node, message: impl AsRef<str>) {
        match &node.origin {
            Some(origin) => {
                let (name, lineno) = origin.location();
                self.warn(format!("[{name}:{lineno}] {}", message.as_ref()));
            }
            None => self.warn(message),
        }
    }

    /// Warns when a runtime is configured and lacks `name` as a filter.
    pub fn check_filter_exists(&self, name: &str) {
        if let Some(runtime) = &self.runtime {
            if !runtime.has_filter(name) {
                self.warn(format!("Filter {name} probably doesn't exist in Jinja"));
            }
        }
    }

    /// Warns when a runtime is configured and lacks `name` as a global or filter.
    pub fn check_tag_exists(&self, name: &str) {
        if let Some(runtime) = &self.runtime {
            if !runtime.has_callable(name) {
                self.warn(format!("Tag {name} probably doesn't exist in Jinja"));
            }
        }
    }

    // ========================================================================
    // IDENTIFIERS
    // ========================================================================

    pub fn translate_variable_name(&self, name: &str) -> String {
        translate_identifier(name, self.in_loop(), &self.identifier_rules)
    }

    // ========================================================================
    // DISPATCH
    // ========================================================================

    /// Invokes the handler registered for `node`, or warns that it is
    /// untranslatable and emits nothing.
    pub fn node(&mut self, node: &Node) {
        match self.handlers.lookup(node) {
            Some(handler) => {
                trace!(node = node.type_name(), "dispatch");
                handler(self, node);
            }
            None => {
                debug!(node = node.type_name(), "no handler registered");
                self.warn_at(
                    node,
                    format!("Untranslatable node {}.{} found", node.module(), node.type_name()),
                );
            }
        }
    }

    /// Calls [`Writer::node`] for every node, in order.
    pub fn body(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.node(node);
        }
    }

    /// Converts a whole document into a string. Warnings still go to the
    /// diagnostic sink.
    pub fn render(&mut self, nodes: &[Node]) -> String {
        let buffer = OutputBuffer::new();
        let previous = self.replace_stream(buffer.shared());
        self.body(nodes);
        self.replace_stream(previous);
        buffer.contents()
    }
}

// ============================================================================
// TESTS
// ============================================================================
