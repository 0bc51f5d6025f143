//! Tags that become calls to helpers the Jinja environment must provide.

use super::expect_node;
use crate::ast::{FilterExpression, LibraryTagNode, Node};
use crate::writer::Writer;

/// Writes `, `-separated positional then keyword arguments.
fn write_call_args(
    writer: &mut Writer,
    args: &[FilterExpression],
    kwargs: &[(String, FilterExpression)],
) {
    let mut first = true;
    for arg in args {
        if !first {
            writer.write(", ");
        }
        first = false;
        writer.write_expression(arg);
    }
    for (key, value) in kwargs {
        if !first {
            writer.write(", ");
        }
        first = false;
        writer.write(&format!("{key}="));
        writer.write_expression(value);
    }
}

pub(super) fn url(writer: &mut Writer, node: &Node) {
    let url = expect_node!(writer, node, Url);
    writer.warn_at(node, "url tag used, make sure to provide a url() function");
    match &url.as_var {
        Some(var) => {
            writer.start_block();
            writer.write(&format!("set {var} = "));
        }
        None => writer.start_variable(),
    }
    writer.write("url(");
    writer.write_expression(&url.view_name);
    for arg in &url.args {
        writer.write(", ");
        writer.write_expression(arg);
    }
    for (key, value) in &url.kwargs {
        writer.write(&format!(", {key}="));
        writer.write_expression(value);
    }
    writer.write(")");
    if url.as_var.is_some() {
        writer.end_block();
    } else {
        writer.end_variable(false);
    }
}

/// The result is an integer, so it is printed without the escape filter.
pub(super) fn width_ratio(writer: &mut Writer, node: &Node) {
    let ratio = expect_node!(writer, node, WidthRatio);
    writer.warn_at(
        node,
        "widthratio expanded into formula.  You may want to provide a helper function for this calculation",
    );
    writer.start_variable();
    writer.write("(");
    writer.write_expression(&ratio.value);
    writer.write(" / ");
    writer.write_expression(&ratio.max_value);
    writer.write(&format!(" * {})|round|int", ratio.max_width));
    writer.end_variable(true);
}

/// Looks up the registered tag name, falling back to the Python function name.
fn resolve_tag_name(writer: &Writer, node: &Node, tag: &LibraryTagNode) -> String {
    let name = match writer.resolver().tag_name(&tag.func) {
        Some(name) => name.to_owned(),
        None => {
            writer.warn_at(
                node,
                format!("Could not find tag {}", tag.func.qualified_name()),
            );
            tag.func.name.clone()
        }
    };
    writer.check_tag_exists(&name);
    name
}

pub(super) fn simple_tag(writer: &mut Writer, node: &Node) {
    let tag = expect_node!(writer, node, SimpleTag);
    let name = resolve_tag_name(writer, node, tag);
    match &tag.target_var {
        Some(var) => {
            writer.start_block();
            writer.write(&format!("set {var}={name}"));
        }
        None => {
            writer.start_variable();
            writer.write(&name);
        }
    }
    writer.write("(");
    write_call_args(writer, &tag.args, &tag.kwargs);
    writer.write(")");
    if tag.target_var.is_some() {
        writer.end_block();
    } else {
        writer.end_variable(false);
    }
}

pub(super) fn inclusion_tag(writer: &mut Writer, node: &Node) {
    let tag = expect_node!(writer, node, InclusionTag);
    let name = resolve_tag_name(writer, node, tag);
    writer.start_variable();
    writer.write(&name);
    writer.write("(");
    write_call_args(writer, &tag.args, &tag.kwargs);
    writer.write(")");
    writer.end_variable(false);
}
