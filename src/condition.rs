//! Re-linearization of `{% if %}` condition trees.
//!
//! Django parses a condition with a Pratt parser whose nodes point `first`
//! toward the left of the source expression and `second` at a complete
//! right-hand subtree. Walking that tree collects bits back to front: each
//! node contributes its `second` operand, then either `first` followed by the
//! operator (prefix operators) or the operator followed by `first`. One
//! reversal at the end gives the left-to-right token stream Jinja expects.
//!
//! No parentheses are inserted. The output is only correct because Jinja
//! ranks `or < and < not < comparisons` the same way Django does; see
//! [`Operator::jinja_precedence`] for where the two differ.

use crate::ast::{Condition, FilterExpression, Operator};

/// One token of a linearized condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionBit<'a> {
    Value(&'a FilterExpression),
    Operator(Operator),
}

/// Flattens `condition` into left-to-right reading order.
pub fn linearize(condition: &Condition) -> Vec<ConditionBit<'_>> {
    let mut bits = Vec::new();
    collect_backwards(condition, &mut bits);
    bits.reverse();
    bits
}

fn collect_backwards<'a>(condition: &'a Condition, bits: &mut Vec<ConditionBit<'a>>) {
    match condition {
        Condition::Literal(value) => bits.push(ConditionBit::Value(value)),
        Condition::Operator { op, first, second } => {
            if let Some(second) = second {
                collect_backwards(second, bits);
            }
            if op.is_prefix() {
                collect_backwards(first, bits);
                bits.push(ConditionBit::Operator(*op));
            } else {
                bits.push(ConditionBit::Operator(*op));
                collect_backwards(first, bits);
            }
        }
    }
}
