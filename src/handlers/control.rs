//! Control flow: loops, conditionals, cycles and context tags.

use super::expect_node;
use crate::ast::{Condition, Node, Operator};
use crate::condition::{linearize, ConditionBit};
use crate::writer::Writer;

pub(super) fn for_loop(writer: &mut Writer, node: &Node) {
    let for_node = expect_node!(writer, node, For);
    writer.start_block();
    writer.write("for ");
    for (idx, var) in for_node.loop_vars.iter().enumerate() {
        if idx > 0 {
            writer.write(", ");
        }
        writer.write_identifier(var);
    }
    writer.write(" in ");
    if for_node.reversed {
        writer.write("(");
    }
    writer.write_expression(&for_node.sequence);
    if for_node.reversed {
        writer.write(")|reverse");
    }
    writer.end_block();
    writer.with_loop(|w| w.body(&for_node.body));
    if !for_node.empty.is_empty() {
        writer.tag("else");
        writer.body(&for_node.empty);
    }
    writer.tag("endfor");
}

fn write_condition(writer: &mut Writer, condition: &Condition) {
    for bit in linearize(condition) {
        writer.write(" ");
        match bit {
            ConditionBit::Value(value) => writer.write_expression(value),
            ConditionBit::Operator(op) => writer.write(op.symbol()),
        }
    }
}

pub(super) fn if_condition(writer: &mut Writer, node: &Node) {
    let if_node = expect_node!(writer, node, If);
    for (idx, branch) in if_node.branches.iter().enumerate() {
        writer.start_block();
        match (idx, &branch.condition) {
            (0, _) => writer.write("if"),
            (_, None) => writer.write("else"),
            (_, Some(_)) => writer.write("elif"),
        }
        if let Some(condition) = &branch.condition {
            if condition.any_operator(Operator::is_identity) {
                writer.warn_at(
                    node,
                    "identity operator in condition; Jinja reads the right-hand side of `is` as a test",
                );
            }
            write_condition(writer, condition);
        }
        writer.end_block();
        writer.body(&branch.body);
    }
    writer.tag("endif");
}

pub(super) fn if_equal(writer: &mut Writer, node: &Node) {
    let if_equal = expect_node!(writer, node, IfEqual);
    writer.start_block();
    writer.write("if ");
    writer.write_expression(&if_equal.left);
    writer.write(if if_equal.negate { " != " } else { " == " });
    writer.write_expression(&if_equal.right);
    writer.end_block();
    writer.body(&if_equal.body_true);
    if !if_equal.body_false.is_empty() {
        writer.tag("else");
        writer.body(&if_equal.body_false);
    }
    writer.tag("endif");
}

/// `loop.cycle()` only exists inside a Jinja loop, so a cycle at depth zero
/// is dropped with a warning.
pub(super) fn cycle(writer: &mut Writer, node: &Node) {
    let cycle = expect_node!(writer, node, Cycle);
    if !writer.in_loop() {
        writer.warn_at(node, "Untranslatable free cycle (cycle outside loop)");
        return;
    }
    match &cycle.variable_name {
        Some(name) => {
            writer.start_block();
            writer.write(&format!("set {name} = "));
        }
        None => writer.start_variable(),
    }
    writer.write("loop.cycle(");
    for (idx, value) in cycle.raw_values.iter().enumerate() {
        if idx > 0 {
            writer.write(", ");
        }
        writer.write_variable(value);
    }
    writer.write(")");
    match &cycle.variable_name {
        Some(name) => {
            writer.end_block();
            // Without `silent`, Django also prints the value it just stored.
            if !cycle.silent {
                let name = writer.translate_variable_name(name);
                writer.print_expr(&name);
            }
        }
        None => writer.end_variable(false),
    }
}

pub(super) fn with_block(writer: &mut Writer, node: &Node) {
    let with = expect_node!(writer, node, With);
    writer.start_block();
    writer.write("with ");
    for (idx, (key, value)) in with.extra_context.iter().enumerate() {
        if idx > 0 {
            writer.write(", ");
        }
        writer.write(key);
        writer.write("=");
        writer.write_expression(value);
    }
    writer.end_block();
    writer.body(&with.body);
    writer.tag("endwith");
}

pub(super) fn regroup(writer: &mut Writer, node: &Node) {
    let regroup = expect_node!(writer, node, Regroup);
    let Some(attribute) = regroup.expression.lookup_path() else {
        writer.warn_at(
            node,
            "literal in groupby filter used.   Behavior in that situation is undefined and translation is skipped.",
        );
        return;
    };
    if !regroup.expression.filters.is_empty() {
        writer.warn_at(
            node,
            "filters in groupby filter used.   Behavior in that situation is undefined which is most likely a bug in your code.  Filters were ignored.",
        );
    }
    writer.start_block();
    writer.write(&format!("set {} = ", regroup.var_name));
    writer.write_expression(&regroup.target);
    writer.write("|groupby(");
    writer.write_str_literal(attribute);
    writer.write(")");
    writer.end_block();
}
