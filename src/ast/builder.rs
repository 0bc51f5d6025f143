//! Shorthand constructors for building node trees by hand.
//!
//! Hosts that construct trees programmatically (and the test suite) use these
//! instead of spelling out every payload struct.
//!
//! ```rust
//! use dj2jinja::ast::{Node, FilterExpression};
//! let nodes = vec![
//!     Node::text("Hello "),
//!     Node::print(FilterExpression::var("user.name")),
//! ];
//! assert_eq!(nodes.len(), 2);
//! ```

use super::*;

impl Node {
    pub fn text(text: &str) -> Node {
        NodeValue::Text(TextNode {
            text: text.to_owned(),
        })
        .into()
    }

    /// `{{ expr }}`
    pub fn print(expr: FilterExpression) -> Node {
        NodeValue::Variable(VariableNode { expr }).into()
    }

    pub fn for_loop(loop_vars: &[&str], sequence: FilterExpression, body: Vec<Node>) -> Node {
        NodeValue::For(ForNode {
            loop_vars: loop_vars.iter().map(|v| (*v).to_owned()).collect(),
            sequence,
            reversed: false,
            body,
            empty: Vec::new(),
        })
        .into()
    }

    pub fn if_chain(branches: Vec<(Option<Condition>, Vec<Node>)>) -> Node {
        NodeValue::If(IfNode {
            branches: branches
                .into_iter()
                .map(|(condition, body)| IfBranch { condition, body })
                .collect(),
        })
        .into()
    }

    pub fn cycle(values: Vec<Variable>, variable_name: Option<&str>) -> Node {
        NodeValue::Cycle(CycleNode {
            raw_values: values,
            variable_name: variable_name.map(str::to_owned),
            silent: false,
        })
        .into()
    }

    pub fn block(name: &str, body: Vec<Node>) -> Node {
        NodeValue::Block(BlockNode {
            name: name.to_owned(),
            body,
            parent: None,
        })
        .into()
    }

    pub fn autoescape(setting: bool, body: Vec<Node>) -> Node {
        NodeValue::Autoescape(AutoescapeNode { setting, body }).into()
    }

    pub fn spaceless(body: Vec<Node>) -> Node {
        NodeValue::Spaceless(SpacelessNode { body }).into()
    }

    pub fn custom(module: &str, type_name: &str) -> Node {
        NodeValue::Custom(CustomNode {
            type_name: type_name.to_owned(),
            module: module.to_owned(),
            args: Vec::new(),
            kwargs: Vec::new(),
            body: Vec::new(),
            attrs: Default::default(),
        })
        .into()
    }
}
