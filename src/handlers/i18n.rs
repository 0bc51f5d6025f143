//! Translation and language tags. All of them need a gettext-style runtime
//! on the Jinja side, so each one warns.

use std::collections::HashSet;

use super::expect_node;
use crate::ast::{Node, Token, TokenKind};
use crate::writer::Writer;

const I18N_WARNING: &str = "i18n system used, make sure to install translations";

fn language_query(writer: &mut Writer, node: &Node, function: &str, variable: &str) {
    writer.warn_at(node, format!("make sure to provide a {function} function"));
    let variable = writer.translate_variable_name(variable);
    writer.tag(&format!("set {variable} = {function}()"));
}

pub(super) fn get_available_languages(writer: &mut Writer, node: &Node) {
    let query = expect_node!(writer, node, GetAvailableLanguages);
    language_query(writer, node, "get_available_languages", &query.variable);
}

pub(super) fn get_current_language(writer: &mut Writer, node: &Node) {
    let query = expect_node!(writer, node, GetCurrentLanguage);
    language_query(writer, node, "get_current_language", &query.variable);
}

pub(super) fn get_current_language_bidi(writer: &mut Writer, node: &Node) {
    let query = expect_node!(writer, node, GetCurrentLanguageBidi);
    language_query(writer, node, "get_current_language_bidi", &query.variable);
}

/// `{% trans %}`. `noop` marks the string for extraction only, so the value
/// is printed untranslated.
pub(super) fn translate(writer: &mut Writer, node: &Node) {
    let trans = expect_node!(writer, node, Translate);
    if !trans.noop {
        writer.warn_at(node, I18N_WARNING);
    }
    match &trans.as_var {
        Some(var) => {
            writer.start_block();
            writer.write(&format!("set {var} = "));
        }
        None => writer.start_variable(),
    }
    if !trans.noop {
        writer.write("_(");
    }
    writer.write_expression(&trans.value);
    if !trans.noop {
        writer.write(")");
    }
    if trans.as_var.is_some() {
        writer.end_block();
    } else {
        writer.end_variable(false);
    }
}

/// Variable names seen by a `{% blocktrans %}`, in first-seen order.
#[derive(Default)]
struct TransVars<'a> {
    first: Option<&'a str>,
    seen: HashSet<&'a str>,
}

impl<'a> TransVars<'a> {
    fn touch(&mut self, name: &'a str) {
        self.seen.insert(name);
        self.first.get_or_insert(name);
    }

    fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }
}

/// Writes the message tokens. Placeholders inside `{% trans %}` may not carry
/// filters in Jinja, so they are never escaped.
fn dump_tokens<'a>(writer: &mut Writer, tokens: &'a [Token], vars: &mut TransVars<'a>) {
    for token in tokens {
        match token.kind {
            TokenKind::Text => writer.write(&token.contents),
            TokenKind::Var => {
                writer.start_variable();
                writer.write(&token.contents);
                writer.end_variable(true);
                vars.touch(&token.contents);
            }
        }
    }
}

pub(super) fn block_translate(writer: &mut Writer, node: &Node) {
    let trans = expect_node!(writer, node, BlockTranslate);
    let mut vars = TransVars::default();

    writer.warn_at(node, I18N_WARNING);
    writer.start_block();
    writer.write("trans");
    for (idx, (key, value)) in trans.extra_context.iter().enumerate() {
        if idx > 0 {
            writer.write(",");
        }
        writer.write(&format!(" {key}="));
        vars.touch(key);
        writer.write_expression(value);
    }

    let plural = trans.plural_clause();
    if let Some((countervar, counter)) = plural {
        if !vars.contains(countervar) {
            if !trans.extra_context.is_empty() {
                writer.write(",");
            }
            vars.touch(countervar);
            writer.write(&format!(" {countervar}="));
            writer.write_expression(counter);
        }
    }
    writer.end_block();

    dump_tokens(writer, &trans.singular, &mut vars);
    if let Some((countervar, _)) = plural {
        writer.start_block();
        writer.write("pluralize");
        if vars.first != Some(countervar) {
            writer.write(&format!(" {countervar}"));
        }
        writer.end_block();
        dump_tokens(writer, &trans.plural, &mut vars);
    }
    writer.tag("endtrans");
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::sink::OutputBuffer;
    use crate::writer::Writer;

    fn convert(nodes: &[Node]) -> (String, Vec<String>) {
        let out = OutputBuffer::new();
        let err = OutputBuffer::new();
        let mut writer = Writer::default()
            .with_stream(out.shared())
            .with_error_stream(err.shared());
        writer.body(nodes);
        (out.contents(), err.lines())
    }

    fn text(contents: &str) -> Token {
        Token {
            kind: TokenKind::Text,
            contents: contents.into(),
        }
    }

    fn var(contents: &str) -> Token {
        Token {
            kind: TokenKind::Var,
            contents: contents.into(),
        }
    }

    #[test]
    fn language_queries_assign_runtime_calls() {
        let (out, err) = convert(&[
            Node::new(NodeValue::GetCurrentLanguage(LanguageQueryNode {
                variable: "LANGUAGE_CODE".into(),
            })),
            Node::new(NodeValue::GetAvailableLanguages(LanguageQueryNode {
                variable: "LANGUAGES".into(),
            })),
        ]);
        assert_eq!(
            out,
            "{% set LANGUAGE_CODE = get_current_language() %}\
             {% set LANGUAGES = get_available_languages() %}"
        );
        assert_eq!(
            err,
            vec![
                "make sure to provide a get_current_language function",
                "make sure to provide a get_available_languages function",
            ]
        );
    }

    #[test]
    fn trans_variants() {
        let trans = |noop, as_var: Option<&str>| {
            Node::new(NodeValue::Translate(TranslateNode {
                value: FilterExpression::constant("Welcome"),
                noop,
                as_var: as_var.map(str::to_owned),
            }))
        };
        let (out, err) = convert(&[
            trans(false, None),
            trans(true, None),
            trans(false, Some("greeting")),
        ]);
        assert_eq!(
            out,
            "{{ _('Welcome')|e }}{{ 'Welcome'|e }}{% set greeting = _('Welcome') %}"
        );
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn blocktrans_with_context() {
        let node = Node::new(NodeValue::BlockTranslate(BlockTranslateNode {
            extra_context: vec![("name".into(), FilterExpression::var("user.name"))],
            singular: vec![text("Hello "), var("name"), text("!")],
            plural: vec![],
            countervar: None,
            counter: None,
        }));
        let (out, err) = convert(&[node]);
        assert_eq!(
            out,
            "{% trans name=user.name %}Hello {{ name }}!{% endtrans %}"
        );
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn blocktrans_plural_threads_counter() {
        let node = Node::new(NodeValue::BlockTranslate(BlockTranslateNode {
            extra_context: vec![("owner".into(), FilterExpression::var("shop.owner"))],
            singular: vec![var("owner"), text(" has one item")],
            plural: vec![var("owner"), text(" has "), var("count"), text(" items")],
            countervar: Some("count".into()),
            counter: Some(FilterExpression::var("items").with_filter(FilterCall::named("length"))),
        }));
        let (out, _) = convert(&[node]);
        assert_eq!(
            out,
            "{% trans owner=shop.owner, count=items|length %}{{ owner }} has one item\
             {% pluralize count %}{{ owner }} has {{ count }} items{% endtrans %}"
        );
    }

    #[test]
    fn blocktrans_plural_omits_counter_when_it_is_the_first_var() {
        let node = Node::new(NodeValue::BlockTranslate(BlockTranslateNode {
            extra_context: vec![],
            singular: vec![text("One apple")],
            plural: vec![var("n"), text(" apples")],
            countervar: Some("n".into()),
            counter: Some(FilterExpression::var("apples").with_filter(FilterCall::named("length"))),
        }));
        let (out, _) = convert(&[node]);
        assert_eq!(
            out,
            "{% trans n=apples|length %}One apple{% pluralize %}{{ n }} apples{% endtrans %}"
        );
    }
}
