//! Node model for parsed Django templates.
//!
//! The host template engine owns parsing; this module only describes the shape
//! of the tree it hands over. Every node is a [`NodeValue`] plus an optional
//! [`Origin`] used for diagnostics. Trees are plain data and round-trip through
//! `serde`, so a host can dump them as JSON or YAML.

// ============================================================================
// IMPORTS
// ============================================================================

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod expr;

pub use expr::{
    Condition, ExprVar, FilterArg, FilterCall, FilterExpression, Literal, Operator, VarTarget,
    Variable,
};

// ============================================================================
// ORIGIN - Source location for diagnostics
// ============================================================================

static NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("static regex"));

/// Where a node came from: the template source and a character offset into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Load name of the template, if the host knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source: Arc<str>,
    /// Offset in characters, not bytes.
    pub position: usize,
}

impl Origin {
    pub fn new(name: Option<&str>, source: &str, position: usize) -> Self {
        Self {
            name: name.map(str::to_owned),
            source: Arc::from(source),
            position,
        }
    }

    /// Returns the display name and the 1-based line number of the node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dj2jinja::ast::Origin;
    /// let origin = Origin::new(Some("index.html"), "a\r\nb\nc", 5);
    /// assert_eq!(origin.location(), ("index.html", 3));
    /// ```
    pub fn location(&self) -> (&str, usize) {
        let name = self.name.as_deref().unwrap_or("<unknown source>");
        let end = self
            .source
            .char_indices()
            .nth(self.position)
            .map(|(idx, _)| idx)
            .unwrap_or(self.source.len());
        let lineno = NEWLINE.find_iter(&self.source[..end]).count() + 1;
        (name, lineno)
    }
}

// ============================================================================
// NODES
// ============================================================================

/// One unit of a parsed template document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub value: NodeValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl Node {
    pub fn new(value: NodeValue) -> Self {
        Self {
            value,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.value.kind()
    }

    /// Class name the host engine uses for this node.
    pub fn type_name(&self) -> &str {
        match &self.value {
            NodeValue::Custom(custom) => &custom.type_name,
            other => other.kind().type_name(),
        }
    }

    /// Module path the host engine defines this node in.
    pub fn module(&self) -> &str {
        match &self.value {
            NodeValue::Custom(custom) => &custom.module,
            other => other.kind().module(),
        }
    }
}

impl From<NodeValue> for Node {
    fn from(value: NodeValue) -> Self {
        Node::new(value)
    }
}

/// The closed set of node shapes produced by Django's standard tag library,
/// plus [`NodeValue::Custom`] for anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeValue {
    Text(TextNode),
    Variable(VariableNode),
    Comment,
    Debug,
    For(ForNode),
    If(IfNode),
    IfEqual(IfEqualNode),
    Block(BlockNode),
    Extends(ExtendsNode),
    Include(IncludeNode),
    Cycle(CycleNode),
    Filter(FilterNode),
    Autoescape(AutoescapeNode),
    Spaceless(SpacelessNode),
    TemplateTag(TemplateTagNode),
    Url(UrlNode),
    WidthRatio(WidthRatioNode),
    With(WithNode),
    Regroup(RegroupNode),
    Load,
    GetAvailableLanguages(LanguageQueryNode),
    GetCurrentLanguage(LanguageQueryNode),
    GetCurrentLanguageBidi(LanguageQueryNode),
    Translate(TranslateNode),
    BlockTranslate(BlockTranslateNode),
    SimpleTag(LibraryTagNode),
    InclusionTag(LibraryTagNode),
    Static(StaticNode),
    CsrfToken,
    Verbatim(VerbatimNode),
    Lorem(LoremNode),
    Custom(CustomNode),
}

impl NodeValue {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Text(_) => NodeKind::Text,
            NodeValue::Variable(_) => NodeKind::Variable,
            NodeValue::Comment => NodeKind::Comment,
            NodeValue::Debug => NodeKind::Debug,
            NodeValue::For(_) => NodeKind::For,
            NodeValue::If(_) => NodeKind::If,
            NodeValue::IfEqual(_) => NodeKind::IfEqual,
            NodeValue::Block(_) => NodeKind::Block,
            NodeValue::Extends(_) => NodeKind::Extends,
            NodeValue::Include(_) => NodeKind::Include,
            NodeValue::Cycle(_) => NodeKind::Cycle,
            NodeValue::Filter(_) => NodeKind::Filter,
            NodeValue::Autoescape(_) => NodeKind::Autoescape,
            NodeValue::Spaceless(_) => NodeKind::Spaceless,
            NodeValue::TemplateTag(_) => NodeKind::TemplateTag,
            NodeValue::Url(_) => NodeKind::Url,
            NodeValue::WidthRatio(_) => NodeKind::WidthRatio,
            NodeValue::With(_) => NodeKind::With,
            NodeValue::Regroup(_) => NodeKind::Regroup,
            NodeValue::Load => NodeKind::Load,
            NodeValue::GetAvailableLanguages(_) => NodeKind::GetAvailableLanguages,
            NodeValue::GetCurrentLanguage(_) => NodeKind::GetCurrentLanguage,
            NodeValue::GetCurrentLanguageBidi(_) => NodeKind::GetCurrentLanguageBidi,
            NodeValue::Translate(_) => NodeKind::Translate,
            NodeValue::BlockTranslate(_) => NodeKind::BlockTranslate,
            NodeValue::SimpleTag(_) => NodeKind::SimpleTag,
            NodeValue::InclusionTag(_) => NodeKind::InclusionTag,
            NodeValue::Static(_) => NodeKind::Static,
            NodeValue::CsrfToken => NodeKind::CsrfToken,
            NodeValue::Verbatim(_) => NodeKind::Verbatim,
            NodeValue::Lorem(_) => NodeKind::Lorem,
            NodeValue::Custom(_) => NodeKind::Custom,
        }
    }
}

/// Fieldless mirror of [`NodeValue`], used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Text,
    Variable,
    Comment,
    Debug,
    For,
    If,
    IfEqual,
    Block,
    Extends,
    Include,
    Cycle,
    Filter,
    Autoescape,
    Spaceless,
    TemplateTag,
    Url,
    WidthRatio,
    With,
    Regroup,
    Load,
    GetAvailableLanguages,
    GetCurrentLanguage,
    GetCurrentLanguageBidi,
    Translate,
    BlockTranslate,
    SimpleTag,
    InclusionTag,
    Static,
    CsrfToken,
    Verbatim,
    Lorem,
    Custom,
}

impl NodeKind {
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::Text => "TextNode",
            NodeKind::Variable => "VariableNode",
            NodeKind::Comment => "CommentNode",
            NodeKind::Debug => "DebugNode",
            NodeKind::For => "ForNode",
            NodeKind::If => "IfNode",
            NodeKind::IfEqual => "IfEqualNode",
            NodeKind::Block => "BlockNode",
            NodeKind::Extends => "ExtendsNode",
            NodeKind::Include => "IncludeNode",
            NodeKind::Cycle => "CycleNode",
            NodeKind::Filter => "FilterNode",
            NodeKind::Autoescape => "AutoEscapeControlNode",
            NodeKind::Spaceless => "SpacelessNode",
            NodeKind::TemplateTag => "TemplateTagNode",
            NodeKind::Url => "URLNode",
            NodeKind::WidthRatio => "WidthRatioNode",
            NodeKind::With => "WithNode",
            NodeKind::Regroup => "RegroupNode",
            NodeKind::Load => "LoadNode",
            NodeKind::GetAvailableLanguages => "GetAvailableLanguagesNode",
            NodeKind::GetCurrentLanguage => "GetCurrentLanguageNode",
            NodeKind::GetCurrentLanguageBidi => "GetCurrentLanguageBidiNode",
            NodeKind::Translate => "TranslateNode",
            NodeKind::BlockTranslate => "BlockTranslateNode",
            NodeKind::SimpleTag => "SimpleNode",
            NodeKind::InclusionTag => "InclusionNode",
            NodeKind::Static => "StaticNode",
            NodeKind::CsrfToken => "CsrfTokenNode",
            NodeKind::Verbatim => "VerbatimNode",
            NodeKind::Lorem => "LoremNode",
            NodeKind::Custom => "Node",
        }
    }

    pub fn module(self) -> &'static str {
        match self {
            NodeKind::Text | NodeKind::Variable | NodeKind::Custom => "django.template.base",
            NodeKind::Block | NodeKind::Extends | NodeKind::Include => {
                "django.template.loader_tags"
            }
            NodeKind::GetAvailableLanguages
            | NodeKind::GetCurrentLanguage
            | NodeKind::GetCurrentLanguageBidi
            | NodeKind::Translate
            | NodeKind::BlockTranslate => "django.templatetags.i18n",
            NodeKind::SimpleTag | NodeKind::InclusionTag => "django.template.library",
            NodeKind::Static => "django.templatetags.static",
            _ => "django.template.defaulttags",
        }
    }
}

// ============================================================================
// NODE PAYLOADS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

/// `{{ expr }}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableNode {
    pub expr: FilterExpression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForNode {
    pub loop_vars: Vec<String>,
    pub sequence: FilterExpression,
    #[serde(default)]
    pub reversed: bool,
    #[serde(default)]
    pub body: Vec<Node>,
    /// `{% empty %}` branch.
    #[serde(default)]
    pub empty: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfNode {
    pub branches: Vec<IfBranch>,
}

/// One `if`/`elif`/`else` arm. `else` has no condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBranch {
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfEqualNode {
    pub left: FilterExpression,
    pub right: FilterExpression,
    #[serde(default)]
    pub negate: bool,
    #[serde(default)]
    pub body_true: Vec<Node>,
    #[serde(default)]
    pub body_false: Vec<Node>,
}

/// A block definition. `parent` points at the override that replaced this
/// definition during inheritance resolution on the host side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    pub name: String,
    #[serde(default)]
    pub body: Vec<Node>,
    #[serde(default)]
    pub parent: Option<Box<BlockNode>>,
}

impl BlockNode {
    /// Follows the parent chain to the outermost override.
    pub fn root(&self) -> &BlockNode {
        let mut block = self;
        while let Some(parent) = &block.parent {
            block = parent;
        }
        block
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendsNode {
    pub parent_name: FilterExpression,
    #[serde(default)]
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludeNode {
    pub template: FilterExpression,
}

/// `{% cycle %}`. `raw_values` are the constructor arguments as written, which
/// the host must capture before it turns them into its shared iterator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleNode {
    pub raw_values: Vec<Variable>,
    #[serde(default)]
    pub variable_name: Option<String>,
    #[serde(default)]
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterNode {
    pub filters: Vec<FilterCall>,
    #[serde(default)]
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoescapeNode {
    pub setting: bool,
    #[serde(default)]
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacelessNode {
    #[serde(default)]
    pub body: Vec<Node>,
}

/// `{% templatetag openblock %}` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateTagNode {
    pub tag_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlNode {
    pub view_name: FilterExpression,
    #[serde(default)]
    pub args: Vec<FilterExpression>,
    #[serde(default)]
    pub kwargs: Vec<(String, FilterExpression)>,
    #[serde(default)]
    pub as_var: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidthRatioNode {
    pub value: FilterExpression,
    pub max_value: FilterExpression,
    pub max_width: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithNode {
    pub extra_context: Vec<(String, FilterExpression)>,
    #[serde(default)]
    pub body: Vec<Node>,
}

/// `{% regroup target by expression as var_name %}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegroupNode {
    pub target: FilterExpression,
    pub expression: FilterExpression,
    pub var_name: String,
}

/// Payload shared by the `get_*_language*` tags: the variable to assign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageQueryNode {
    pub variable: String,
}

/// `{% trans value [noop] [as var] %}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateNode {
    pub value: FilterExpression,
    #[serde(default)]
    pub noop: bool,
    #[serde(default)]
    pub as_var: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTranslateNode {
    #[serde(default)]
    pub extra_context: Vec<(String, FilterExpression)>,
    pub singular: Vec<Token>,
    #[serde(default)]
    pub plural: Vec<Token>,
    #[serde(default)]
    pub countervar: Option<String>,
    #[serde(default)]
    pub counter: Option<FilterExpression>,
}

impl BlockTranslateNode {
    /// The pluralisation clause, present only when all three parts are.
    pub fn plural_clause(&self) -> Option<(&str, &FilterExpression)> {
        match (&self.countervar, &self.counter) {
            (Some(var), Some(counter)) if !self.plural.is_empty() => Some((var, counter)),
            _ => None,
        }
    }
}

/// Raw lexer token kept by `{% blocktrans %}` bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Text,
    Var,
}

/// The Python function behind a registered template tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagFunction {
    pub module: String,
    pub name: String,
}

impl TagFunction {
    pub fn new(module: &str, name: &str) -> Self {
        Self {
            module: module.to_owned(),
            name: name.to_owned(),
        }
    }

    /// `module.function`, the key of the reverse tag index.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }
}

/// A `simple_tag` or `inclusion_tag` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryTagNode {
    pub func: TagFunction,
    #[serde(default)]
    pub args: Vec<FilterExpression>,
    #[serde(default)]
    pub kwargs: Vec<(String, FilterExpression)>,
    /// `as var`, only meaningful for simple tags.
    #[serde(default)]
    pub target_var: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticNode {
    pub path: FilterExpression,
    #[serde(default)]
    pub varname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbatimNode {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoremNode {
    pub count: FilterExpression,
    pub method: LoremMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoremMethod {
    /// Words.
    #[serde(rename = "w")]
    Words,
    /// HTML paragraphs.
    #[serde(rename = "p")]
    Paragraphs,
    /// Plain-text paragraphs.
    #[serde(rename = "b")]
    Blocks,
}

/// A node type outside the standard library, matched by its type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomNode {
    pub type_name: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub args: Vec<FilterExpression>,
    #[serde(default)]
    pub kwargs: Vec<(String, FilterExpression)>,
    #[serde(default)]
    pub body: Vec<Node>,
    #[serde(default)]
    pub attrs: serde_json::Map<String, serde_json::Value>,
}

// ============================================================================
// TESTS
// ============================================================================
