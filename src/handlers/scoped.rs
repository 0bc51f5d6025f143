//! Regions that change writer state for their children.

use super::expect_node;
use crate::ast::{Node, NodeValue, TextNode};
use crate::writer::Writer;

pub(super) fn filter(writer: &mut Writer, node: &Node) {
    let filter = expect_node!(writer, node, Filter);
    writer.start_block();
    writer.write("filter ");
    writer.write_filters(&filter.filters, true);
    writer.end_block();
    writer.body(&filter.body);
    writer.tag("endfilter");
}

pub(super) fn autoescape(writer: &mut Writer, node: &Node) {
    let autoescape = expect_node!(writer, node, Autoescape);
    writer.with_autoescape(autoescape.setting, |w| w.body(&autoescape.body));
}

fn trimmed(node: &Node, trim: fn(&str) -> &str) -> Option<Node> {
    match &node.value {
        NodeValue::Text(text) => Some(Node {
            value: NodeValue::Text(TextNode {
                text: trim(&text.text).to_owned(),
            }),
            origin: node.origin.clone(),
        }),
        _ => None,
    }
}

/// Trim markers only strip whitespace next to tags, while Django strips
/// whitespace between HTML tags after rendering. The outer edges of the
/// region are trimmed here so leading and trailing text matches.
pub(super) fn spaceless(writer: &mut Writer, node: &Node) {
    let spaceless = expect_node!(writer, node, Spaceless);
    writer.warn_at(node, "entering spaceless mode with different semantics");

    let mut body = spaceless.body.clone();
    if let Some(first) = body.first_mut() {
        if let Some(replacement) = trimmed(first, str::trim_start) {
            *first = replacement;
        }
    }
    if let Some(last) = body.last_mut() {
        if let Some(replacement) = trimmed(last, str::trim_end) {
            *last = replacement;
        }
    }
    writer.with_spaceless(|w| w.body(&body));
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
    fn filter_block() {
        let node = Node::new(NodeValue::Filter(FilterNode {
            filters: vec![FilterCall::named("force_escape"), FilterCall::named("lower")],
            body: vec![Node::text("Hello")],
        }));
        let (out, _) = convert(&[node]);
        assert_eq!(out, "{% filter force_escape|lower %}Hello{% endfilter %}");
    }

    #[test]
    fn autoescape_off_drops_escape_filter_inside_only() {
        let (out, _) = convert(&[
            Node::autoescape(false, vec![Node::print(FilterExpression::var("html"))]),
            Node::print(FilterExpression::var("html")),
        ]);
        assert_eq!(out, "{{ html }}{{ html|e }}");
    }

    #[test]
    fn spaceless_trims_edges_and_restores_mode() {
        let (out, err) = convert(&[
            Node::spaceless(vec![
                Node::text("\n  <p>"),
                Node::print(FilterExpression::var("x")),
                Node::text("</p>  \n"),
            ]),
            Node::print(FilterExpression::var("y")),
        ]);
        assert_eq!(out, "<p>{{- x|e -}}</p>{{ y|e }}");
        assert_eq!(err, vec!["entering spaceless mode with different semantics"]);
    }

    #[test]
    fn spaceless_leaves_non_text_edges_alone() {
        let (out, _) = convert(&[Node::spaceless(vec![Node::print(FilterExpression::var("x"))])]);
        assert_eq!(out, "{{- x|e -}}");
    }
}
