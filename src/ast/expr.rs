//! Expression-level pieces of the node model: variables, filter chains and
//! `if` conditions.

use serde::{Deserialize, Serialize};

// ============================================================================
// VARIABLES AND LITERALS
// ============================================================================

/// A literal value as it appeared in the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
}

/// What a [`Variable`] refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarTarget {
    /// A dotted lookup path such as `user.profile.name`.
    Lookup(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(flatten)]
    pub target: VarTarget,
    /// Written as `_("...")` in the template.
    #[serde(default)]
    pub translate: bool,
}

impl Variable {
    pub fn lookup(path: &str) -> Self {
        Self {
            target: VarTarget::Lookup(path.to_owned()),
            translate: false,
        }
    }

    pub fn literal(value: Literal) -> Self {
        Self {
            target: VarTarget::Literal(value),
            translate: false,
        }
    }

    pub fn string(value: &str) -> Self {
        Self::literal(Literal::Str(value.to_owned()))
    }

    pub fn translated(mut self) -> Self {
        self.translate = true;
        self
    }

    pub fn as_lookup(&self) -> Option<&str> {
        match &self.target {
            VarTarget::Lookup(path) => Some(path),
            VarTarget::Literal(_) => None,
        }
    }
}

// ============================================================================
// FILTER EXPRESSIONS
// ============================================================================

/// The head of a filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExprVar {
    /// A quoted constant, already marked safe by the host.
    Constant(String),
    Variable(Variable),
}

/// `var|filter:arg|filter`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    pub var: ExprVar,
    #[serde(default)]
    pub filters: Vec<FilterCall>,
}

impl FilterExpression {
    pub fn var(path: &str) -> Self {
        Self::from(Variable::lookup(path))
    }

    pub fn constant(value: &str) -> Self {
        Self {
            var: ExprVar::Constant(value.to_owned()),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: FilterCall) -> Self {
        self.filters.push(filter);
        self
    }

    /// True when the head is a constant rather than a lookup.
    pub fn is_literal(&self) -> bool {
        match &self.var {
            ExprVar::Constant(_) => true,
            ExprVar::Variable(var) => matches!(var.target, VarTarget::Literal(_)),
        }
    }

    pub fn lookup_path(&self) -> Option<&str> {
        match &self.var {
            ExprVar::Variable(var) => var.as_lookup(),
            ExprVar::Constant(_) => None,
        }
    }
}

impl From<Variable> for FilterExpression {
    fn from(var: Variable) -> Self {
        Self {
            var: ExprVar::Variable(var),
            filters: Vec::new(),
        }
    }
}

/// One filter application in a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCall {
    /// Qualified name of the host filter function, for diagnostics.
    pub func: String,
    /// The name the host registered the filter under, if it recorded one.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub args: Vec<FilterArg>,
}

impl FilterCall {
    pub fn named(name: &str) -> Self {
        Self {
            func: format!("django.template.defaultfilters.{name}"),
            name: Some(name.to_owned()),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: FilterArg) -> Self {
        self.args.push(arg);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterArg {
    Literal(Literal),
    Variable(Variable),
}

// ============================================================================
// CONDITIONS
// ============================================================================

/// Operators understood by Django's `{% if %}` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "and")]
    And,
    #[serde(rename = "not")]
    Not,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is not")]
    IsNot,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
}

impl Operator {
    pub const ALL: [Operator; 13] = [
        Operator::Or,
        Operator::And,
        Operator::Not,
        Operator::In,
        Operator::NotIn,
        Operator::Is,
        Operator::IsNot,
        Operator::Eq,
        Operator::NotEq,
        Operator::Gt,
        Operator::GtEq,
        Operator::Lt,
        Operator::LtEq,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Or => "or",
            Operator::And => "and",
            Operator::Not => "not",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::Eq => "==",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
        }
    }

    pub fn is_prefix(self) -> bool {
        matches!(self, Operator::Not)
    }

    /// `is` and `is not` name a test on the Jinja side.
    pub fn is_identity(self) -> bool {
        matches!(self, Operator::Is | Operator::IsNot)
    }

    /// Django's binding power for the operator (higher binds tighter).
    pub fn binding_power(self) -> u8 {
        match self {
            Operator::Or => 6,
            Operator::And => 7,
            Operator::Not => 8,
            Operator::In | Operator::NotIn => 9,
            _ => 10,
        }
    }

    /// Jinja's precedence level for the operator (higher binds tighter).
    /// Comparisons share one level; `is` tests are parsed as postfix.
    pub fn jinja_precedence(self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Not => 3,
            Operator::Is | Operator::IsNot => 5,
            _ => 4,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed `{% if %}` condition. Operator nodes thread their operands
/// right to left: `first` leads toward the left of the source expression,
/// `second` holds a complete right-hand subtree and is absent for prefix
/// operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Literal(FilterExpression),
    Operator {
        op: Operator,
        first: Box<Condition>,
        #[serde(default)]
        second: Option<Box<Condition>>,
    },
}

impl Condition {
    pub fn var(path: &str) -> Self {
        Condition::Literal(FilterExpression::var(path))
    }

    pub fn binary(op: Operator, first: Condition, second: Condition) -> Self {
        Condition::Operator {
            op,
            first: Box::new(first),
            second: Some(Box::new(second)),
        }
    }

    pub fn not(operand: Condition) -> Self {
        Condition::Operator {
            op: Operator::Not,
            first: Box::new(operand),
            second: None,
        }
    }

    /// True if any operator in the tree satisfies `pred`.
    pub fn any_operator(&self, pred: impl Fn(Operator) -> bool + Copy) -> bool {
        match self {
            Condition::Literal(_) => false,
            Condition::Operator { op, first, second } => {
                pred(*op)
                    || first.any_operator(pred)
                    || second.as_ref().is_some_and(|s| s.any_operator(pred))
            }
        }
    }
}
