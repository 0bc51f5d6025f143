//! Template inheritance: `block`, `extends`, `include`.

use super::expect_node;
use crate::ast::Node;
use crate::writer::Writer;

/// Jinja block names must be identifiers.
fn block_name(name: &str) -> String {
    name.replace('-', "_").trim_end_matches('_').to_owned()
}

/// Emits the body of the outermost override. Inheritance was resolved by the
/// host, so only the final content is written.
pub(super) fn block(writer: &mut Writer, node: &Node) {
    let block = expect_node!(writer, node, Block);
    writer.tag(&format!("block {}", block_name(&block.name)));
    writer.body(&block.root().body);
    writer.tag("endblock");
}

pub(super) fn extends(writer: &mut Writer, node: &Node) {
    let extends = expect_node!(writer, node, Extends);
    writer.start_block();
    writer.write("extends ");
    writer.write_expression(&extends.parent_name);
    writer.end_block();
    writer.body(&extends.body);
}

pub(super) fn include(writer: &mut Writer, node: &Node) {
    let include = expect_node!(writer, node, Include);
    writer.start_block();
    writer.write("include ");
    writer.write_expression(&include.template);
    writer.end_block();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::sink::OutputBuffer;

    fn convert(nodes: &[Node]) -> String {
        let out = OutputBuffer::new();
        let mut writer = Writer::default().with_stream(out.shared());
        writer.body(nodes);
        out.contents()
    }

    #[test]
    fn block_names_are_sanitised() {
        assert_eq!(block_name("side-bar"), "side_bar");
        assert_eq!(block_name("extra-"), "extra");
        assert_eq!(block_name("content"), "content");
    }

    #[test]
    fn overridden_block_emits_root_body() {
        let node = Node::new(NodeValue::Block(BlockNode {
            name: "main-content".into(),
            body: vec![Node::text("base")],
            parent: Some(Box::new(BlockNode {
                name: "main-content".into(),
                body: vec![Node::text("child")],
                parent: None,
            })),
        }));
        assert_eq!(
            convert(&[node]),
            "{% block main_content %}child{% endblock %}"
        );
    }

    #[test]
    fn extends_then_body() {
        let node = Node::new(NodeValue::Extends(ExtendsNode {
            parent_name: FilterExpression::constant("base.html"),
            body: vec![Node::block("title", vec![Node::text("Home")])],
        }));
        assert_eq!(
            convert(&[node]),
            "{% extends 'base.html' %}{% block title %}Home{% endblock %}"
        );
    }

    #[test]
    fn include_by_variable() {
        let node = Node::new(NodeValue::Include(IncludeNode {
            template: FilterExpression::var("widget.template"),
        }));
        assert_eq!(convert(&[node]), "{% include widget.template %}");
    }
}
