//! Low-level emission helpers: delimiters, literals, variables and filter
//! chains.

use super::Writer;
use crate::ast::{ExprVar, FilterArg, FilterCall, FilterExpression, Literal, VarTarget, Variable};

/// Quotes a string the way Python's `repr` does, which Jinja also parses.
///
/// ```rust
/// use dj2jinja::writer::python_repr;
/// assert_eq!(python_repr("it's"), "\"it's\"");
/// assert_eq!(python_repr("a\nb"), "'a\\nb'");
/// ```
pub fn python_repr(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

impl Writer {
    // ========================================================================
    // RAW OUTPUT
    // ========================================================================

    pub fn write(&mut self, text: &str) {
        self.stream.emit(text);
    }

    /// Opens a variable tag, writes `expr` verbatim and closes it.
    pub fn print_expr(&mut self, expr: &str) {
        self.start_variable();
        self.write(expr);
        self.end_variable(false);
    }

    /// Emits a complete block tag, `{% name %}`.
    pub fn tag(&mut self, name: &str) {
        self.start_block();
        self.write(name);
        self.end_block();
    }

    // ========================================================================
    // DELIMITERS
    // ========================================================================

    fn post_open(&mut self) {
        if self.spaceless {
            self.write("- ");
        } else {
            self.write(" ");
        }
    }

    fn pre_close(&mut self) {
        if self.spaceless {
            self.write(" -");
        } else {
            self.write(" ");
        }
    }

    pub fn start_variable(&mut self) {
        let open = self.delimiters.variable_start.clone();
        self.write(&open);
        self.post_open();
    }

    /// Closes a variable tag. Django escapes every printed value implicitly,
    /// so `|e` is appended unless autoescape is off, Jinja escapes on its own,
    /// or the caller knows the value is safe.
    pub fn end_variable(&mut self, always_safe: bool) {
        if !always_safe && self.autoescape && !self.use_jinja_autoescape {
            self.write("|e");
        }
        self.pre_close();
        let close = self.delimiters.variable_end.clone();
        self.write(&close);
    }

    pub fn start_block(&mut self) {
        let open = self.delimiters.block_start.clone();
        self.write(&open);
        self.post_open();
    }

    pub fn end_block(&mut self) {
        self.pre_close();
        let close = self.delimiters.block_end.clone();
        self.write(&close);
    }

    // ========================================================================
    // VALUES
    // ========================================================================

    /// Writes a lookup path after identifier translation.
    pub fn write_identifier(&mut self, name: &str) {
        let translated = self.translate_variable_name(name);
        self.write(&translated);
    }

    pub fn write_str_literal(&mut self, value: &str) {
        self.write(&python_repr(value));
    }

    pub fn write_literal(&mut self, value: &Literal) {
        match value {
            Literal::Str(s) => self.write_str_literal(s),
            Literal::Int(i) => self.write(&i.to_string()),
            Literal::Float(f) => self.write(&format!("{f:?}")),
        }
    }

    pub fn write_variable(&mut self, var: &Variable) {
        if var.translate {
            self.warn("i18n system used, make sure to install translations");
            self.write("_(");
        }
        match &var.target {
            VarTarget::Lookup(path) => self.write_identifier(path),
            VarTarget::Literal(value) => self.write_literal(value),
        }
        if var.translate {
            self.write(")");
        }
    }

    pub fn write_expression(&mut self, expr: &FilterExpression) {
        match &expr.var {
            ExprVar::Constant(value) => self.write_str_literal(value),
            ExprVar::Variable(var) => self.write_variable(var),
        }
        self.write_filters(&expr.filters, false);
    }

    /// Writes a filter chain. In block position (`{% filter %}`) the first
    /// filter is not preceded by a pipe.
    pub fn write_filters(&mut self, filters: &[FilterCall], is_block: bool) {
        let mut want_pipe = !is_block;
        for call in filters {
            let Some(name) = self.resolver.filter_name(call) else {
                self.warn(format!("Could not find filter {}", call.func));
                continue;
            };
            self.check_filter_exists(name);
            if want_pipe {
                self.write("|");
            } else {
                want_pipe = true;
            }
            self.write(name);
            if !call.args.is_empty() {
                self.write("(");
                for (idx, arg) in call.args.iter().enumerate() {
                    if idx > 0 {
                        self.write(", ");
                    }
                    match arg {
                        FilterArg::Variable(var) => self.write_variable(var),
                        FilterArg::Literal(value) => self.write_literal(value),
                    }
                }
                self.write(")");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{Delimiters, WriterConfig};
    use crate::resolver::RuntimeNames;
    use crate::sink::OutputBuffer;

    fn writer() -> (Writer, OutputBuffer, OutputBuffer) {
        let out = OutputBuffer::new();
        let err = OutputBuffer::new();
        let writer = Writer::default()
            .with_stream(out.shared())
            .with_error_stream(err.shared());
        (writer, out, err)
    }

    #[test]
    fn repr_prefers_single_quotes() {
        assert_eq!(python_repr("abc"), "'abc'");
        assert_eq!(python_repr("a'b\"c"), "'a\\'b\"c'");
        assert_eq!(python_repr("back\\slash"), "'back\\\\slash'");
    }

    #[test]
    fn print_expr_escapes_by_default() {
        let (mut writer, out, _) = writer();
        writer.print_expr("x");
        assert_eq!(out.contents(), "{{ x|e }}");
    }

    #[test]
    fn escape_filter_is_dropped_when_jinja_autoescapes() {
        let (writer, out, _) = writer();
        let mut writer = Writer {
            use_jinja_autoescape: true,
            ..writer
        };
        writer.print_expr("x");
        assert_eq!(out.contents(), "{{ x }}");
    }

    #[test]
    fn spaceless_uses_trim_markers() {
        let (mut writer, out, _) = writer();
        writer.with_spaceless(|w| {
            w.tag("endif");
            w.print_expr("y");
        });
        assert_eq!(out.contents(), "{%- endif -%}{{- y|e -}}");
    }

    #[test]
    fn custom_delimiters_are_honoured() {
        let out = OutputBuffer::new();
        let config = WriterConfig {
            delimiters: Delimiters {
                variable_start: "[[".into(),
                variable_end: "]]".into(),
                block_start: "<%".into(),
                block_end: "%>".into(),
                ..Delimiters::default()
            },
            ..WriterConfig::default()
        };
        let mut writer = Writer::new(config).with_stream(out.shared());
        writer.tag("raw");
        writer.print_expr("a");
        assert_eq!(out.contents(), "<% raw %>[[ a|e ]]");
    }

    #[test]
    fn literals_render_like_python() {
        let (mut writer, out, _) = writer();
        writer.write_literal(&Literal::Int(3));
        writer.write(" ");
        writer.write_literal(&Literal::Float(1.0));
        writer.write(" ");
        writer.write_literal(&Literal::Str("hi".into()));
        assert_eq!(out.contents(), "3 1.0 'hi'");
    }

    #[test]
    fn translated_variables_wrap_in_gettext() {
        let (mut writer, out, err) = writer();
        writer.write_variable(&Variable::string("Hello").translated());
        assert_eq!(out.contents(), "_('Hello')");
        assert_eq!(err.lines().len(), 1);
    }

    #[test]
    fn filter_chains_with_arguments() {
        let (mut writer, out, _) = writer();
        let expr = FilterExpression::var("value")
            .with_filter(FilterCall::named("default").with_arg(FilterArg::Literal(Literal::Str(
                "n/a".into(),
            ))))
            .with_filter(FilterCall::named("truncatewords").with_arg(FilterArg::Variable(
                Variable::lookup("limit"),
            )));
        writer.write_expression(&expr);
        assert_eq!(out.contents(), "value|default('n/a')|truncatewords(limit)");
    }

    #[test]
    fn unnamed_filters_are_skipped_with_a_warning() {
        let (mut writer, out, err) = writer();
        let expr = FilterExpression::var("v")
            .with_filter(FilterCall {
                func: "app.filters.mystery".into(),
                name: None,
                args: vec![],
            })
            .with_filter(FilterCall::named("upper"));
        writer.write_expression(&expr);
        assert_eq!(out.contents(), "v|upper");
        assert_eq!(err.lines(), vec!["Could not find filter app.filters.mystery"]);
    }

    #[test]
    fn block_filters_skip_the_leading_pipe() {
        let (mut writer, out, _) = writer();
        writer.write_filters(&[FilterCall::named("lower"), FilterCall::named("title")], true);
        assert_eq!(out.contents(), "lower|title");
    }

    #[test]
    fn missing_filters_warn_when_runtime_is_known() {
        let (writer, out, err) = writer();
        let mut writer = writer.with_runtime(Arc::new(RuntimeNames::jinja_builtins()));
        writer.write_filters(&[FilterCall::named("upper"), FilterCall::named("slugify")], false);
        assert_eq!(out.contents(), "|upper|slugify");
        assert_eq!(err.lines(), vec!["Filter slugify probably doesn't exist in Jinja"]);
    }

    #[test]
    fn constants_print_as_literals() {
        let (mut writer, out, _) = writer();
        writer.write_expression(&FilterExpression::constant("base.html"));
        assert_eq!(out.contents(), "'base.html'");
    }
}
