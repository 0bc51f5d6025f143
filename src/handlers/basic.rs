//! Text, printed variables and the standalone tags that need no state.

use super::expect_node;
use crate::ast::{ExprVar, FilterExpression, LoremMethod, Node};
use crate::writer::Writer;

pub(super) fn text(writer: &mut Writer, node: &Node) {
    let text = expect_node!(writer, node, Text);
    writer.write(&text.text);
}

fn is_block_super(expr: &FilterExpression) -> bool {
    expr.filters.is_empty()
        && matches!(&expr.var, ExprVar::Variable(var) if var.as_lookup() == Some("block.super"))
}

pub(super) fn variable(writer: &mut Writer, node: &Node) {
    let print = expect_node!(writer, node, Variable);
    writer.start_variable();
    if is_block_super(&print.expr) {
        writer.write("super()");
    } else {
        writer.write_expression(&print.expr);
    }
    writer.end_variable(false);
}

/// `{% comment %}` and `{% load %}` have no output.
pub(super) fn ignore(_writer: &mut Writer, _node: &Node) {}

pub(super) fn debug(writer: &mut Writer, node: &Node) {
    writer.warn_at(
        node,
        "Debug tag detected.  Make sure to add a global function called debug to the namespace.",
    );
    writer.print_expr("debug()");
}

pub(super) fn template_tag(writer: &mut Writer, node: &Node) {
    let tag = expect_node!(writer, node, TemplateTag);
    let delimiters = &writer.delimiters;
    let literal = match tag.tag_type.as_str() {
        "openblock" => delimiters.block_start.clone(),
        "closeblock" => delimiters.block_end.clone(),
        "openvariable" => delimiters.variable_start.clone(),
        "closevariable" => delimiters.variable_end.clone(),
        "opencomment" => delimiters.comment_start.clone(),
        "closecomment" => delimiters.comment_end.clone(),
        "openbrace" => "{".to_owned(),
        "closebrace" => "}".to_owned(),
        _ => return,
    };
    writer.start_variable();
    writer.write_str_literal(&literal);
    writer.end_variable(false);
}

pub(super) fn static_tag(writer: &mut Writer, node: &Node) {
    let tag = expect_node!(writer, node, Static);
    match &tag.varname {
        Some(var) => {
            writer.start_block();
            writer.write(&format!("set {var}=static("));
        }
        None => {
            writer.start_variable();
            writer.write("static(");
        }
    }
    writer.write_expression(&tag.path);
    writer.write(")");
    if tag.varname.is_some() {
        writer.end_block();
    } else {
        writer.end_variable(false);
    }
}

pub(super) fn csrf_token(writer: &mut Writer, _node: &Node) {
    writer.print_expr("csrf_token()");
}

pub(super) fn verbatim(writer: &mut Writer, node: &Node) {
    let verbatim = expect_node!(writer, node, Verbatim);
    writer.tag("raw");
    writer.write(&verbatim.content);
    writer.tag("endraw");
}

/// `lipsum()` counts paragraphs; word mode asks for one paragraph of exactly
/// `count` words.
pub(super) fn lorem(writer: &mut Writer, node: &Node) {
    let lorem = expect_node!(writer, node, Lorem);
    let html = if lorem.method == LoremMethod::Paragraphs {
        "True"
    } else {
        "False"
    };
    writer.start_variable();
    if lorem.method == LoremMethod::Words {
        writer.write(&format!("lipsum(n=1, html={html}, min="));
        writer.write_expression(&lorem.count);
        writer.write(", max=");
        writer.write_expression(&lorem.count);
    } else {
        writer.write("lipsum(n=");
        writer.write_expression(&lorem.count);
        writer.write(&format!(", html={html}"));
    }
    writer.write(")");
    writer.end_variable(false);
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

    #[test]
    fn text_passes_through() {
        assert_eq!(convert(&[Node::text("<p>hi</p>\n")]).0, "<p>hi</p>\n");
    }

    #[test]
    fn printed_variables_are_escaped() {
        let (out, err) = convert(&[Node::print(FilterExpression::var("user.name"))]);
        assert_eq!(out, "{{ user.name|e }}");
        assert!(err.is_empty());
    }

    #[test]
    fn block_super_becomes_super_call() {
        let (out, _) = convert(&[Node::print(FilterExpression::var("block.super"))]);
        assert_eq!(out, "{{ super()|e }}");
        let (out, _) = convert(&[Node::print(
            FilterExpression::var("block.super").with_filter(FilterCall::named("upper")),
        )]);
        assert_eq!(out, "{{ block.super|upper|e }}");
    }

    #[test]
    fn comments_and_loads_vanish() {
        let (out, err) = convert(&[
            Node::new(NodeValue::Comment),
            Node::new(NodeValue::Load),
        ]);
        assert_eq!(out, "");
        assert!(err.is_empty());
    }

    #[test]
    fn debug_prints_a_call_and_warns() {
        let (out, err) = convert(&[Node::new(NodeValue::Debug)]);
        assert_eq!(out, "{{ debug()|e }}");
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn templatetag_prints_delimiter_literals() {
        let nodes: Vec<Node> = ["openblock", "closevariable", "openbrace", "bogus"]
            .iter()
            .map(|t| {
                Node::new(NodeValue::TemplateTag(TemplateTagNode {
                    tag_type: (*t).to_owned(),
                }))
            })
            .collect();
        let (out, _) = convert(&nodes);
        assert_eq!(out, "{{ '{%'|e }}{{ '}}'|e }}{{ '{'|e }}");
    }

    #[test]
    fn static_inline_and_assigned() {
        let inline = Node::new(NodeValue::Static(StaticNode {
            path: FilterExpression::constant("css/site.css"),
            varname: None,
        }));
        let assigned = Node::new(NodeValue::Static(StaticNode {
            path: FilterExpression::var("logo"),
            varname: Some("logo_url".into()),
        }));
        let (out, _) = convert(&[inline, assigned]);
        assert_eq!(
            out,
            "{{ static('css/site.css')|e }}{% set logo_url=static(logo) %}"
        );
    }

    #[test]
    fn csrf_and_verbatim() {
        let (out, _) = convert(&[
            Node::new(NodeValue::CsrfToken),
            Node::new(NodeValue::Verbatim(VerbatimNode {
                content: "{{ not_parsed }}".into(),
            })),
        ]);
        assert_eq!(
            out,
            "{{ csrf_token()|e }}{% raw %}{{ not_parsed }}{% endraw %}"
        );
    }

    #[test]
    fn lorem_modes() {
        let lorem = |method| {
            Node::new(NodeValue::Lorem(LoremNode {
                count: FilterExpression::from(Variable::literal(Literal::Int(3))),
                method,
            }))
        };
        let (out, _) = convert(&[lorem(LoremMethod::Paragraphs)]);
        assert_eq!(out, "{{ lipsum(n=3, html=True)|e }}");
        let (out, _) = convert(&[lorem(LoremMethod::Blocks)]);
        assert_eq!(out, "{{ lipsum(n=3, html=False)|e }}");
        let (out, _) = convert(&[lorem(LoremMethod::Words)]);
        assert_eq!(out, "{{ lipsum(n=1, html=False, min=3, max=3)|e }}");
    }
}
