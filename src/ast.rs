//! Abstract syntax tree for the RiX expression language
//!
//! Nodes are built once by the parser and never mutated; children are
//! uniquely owned, so the tree has no sharing and no cycles. Every node
//! carries its source span and the verbatim text it covers, used only for
//! diagnostics.

use crate::common::Span;
use crate::lexer::StringKind;
use crate::oracle::SystemInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A syntax-tree node: a kind plus position and verbatim source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub original: String,
}

// ==================== NODE KINDS ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Numeric literal, preserved verbatim
    Number { value: String },
    /// Non-backtick string literal
    String { value: String, kind: StringKind },
    UserIdentifier { name: String },
    SystemIdentifier { name: String, system_info: SystemInfo },
    /// `_k` positional placeholder used in explicit-pipe targets
    PlaceHolder { place: u32 },
    /// The bare `_` hole symbol
    Null,
    UnaryOperation {
        operator: String,
        operand: Box<Node>,
    },
    BinaryOperation {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Explicit parenthesisation, preserved in the tree
    Grouping { expression: Box<Node> },
    /// Comma-bearing parentheses: zero, one, or more elements
    Tuple { elements: Vec<Node> },
    Array { elements: Vec<Node> },
    Set { elements: Vec<Node> },
    /// Curly container of `:=` pairs
    Map { elements: Vec<Node> },
    /// Curly container of equations
    System { elements: Vec<Node> },
    Matrix { rows: Vec<Vec<Node>> },
    Tensor {
        structure: Vec<TensorRow>,
        max_dimension: u32,
    },
    /// Array-with-metadata attachment
    WithMetadata {
        primary: Box<Node>,
        metadata: BTreeMap<String, Node>,
    },
    /// `{{ ... }}` block of statements
    CodeBlock { statements: Vec<Node> },
    FunctionCall {
        function: Box<Node>,
        arguments: CallArguments,
    },
    /// Named definition from `:->`
    FunctionDefinition {
        name: Box<Node>,
        parameters: Parameters,
        body: Box<Node>,
    },
    /// Anonymous lambda from `->`
    FunctionLambda {
        parameters: Parameters,
        body: Box<Node>,
    },
    /// From `:=>`; `name` is absent when the head is a parameter shape
    PatternMatchingFunction {
        name: Option<Box<Node>>,
        parameters: Parameters,
        patterns: Vec<PatternClause>,
        metadata: BTreeMap<String, Node>,
    },
    /// Intermediate form for a `;`-bearing grouped expression
    ParameterList { parameters: Parameters },
    /// `|>`
    Pipe { left: Box<Node>, right: Box<Node> },
    /// `||>`
    ExplicitPipe { left: Box<Node>, right: Box<Node> },
    /// `|>>`
    MapPipe { left: Box<Node>, right: Box<Node> },
    /// `|>?`
    FilterPipe { left: Box<Node>, right: Box<Node> },
    /// `|>:`
    ReducePipe { left: Box<Node>, right: Box<Node> },
    /// Postfix `[...]` or `.` access
    PropertyAccess {
        object: Box<Node>,
        property: Box<Node>,
    },
    Derivative {
        function: Box<Node>,
        order: u32,
        variables: Option<Vec<Node>>,
        evaluation: Option<Vec<Node>>,
        operations: Option<Vec<Node>>,
    },
    Integral {
        function: Box<Node>,
        order: u32,
        variables: Option<Vec<Node>>,
        evaluation: Option<Vec<Node>>,
        operations: Option<Vec<Node>>,
        metadata: IntegralMetadata,
    },
    /// Backtick-delimited foreign fragment, body carried verbatim
    EmbeddedLanguage {
        language: String,
        context: Option<String>,
        body: String,
    },
    /// Semicolon-terminated top-level or code-block expression
    Statement { expression: Box<Node> },
    Comment { value: String, kind: StringKind },
}

// ==================== SUPPORTING RECORDS ====================

/// One matrix/tensor row with the level of the separator that closed it
/// (1 = row, 2 = plane, ...; the final row carries 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorRow {
    pub row: Vec<Node>,
    pub separator_level: u32,
}

/// One pattern of a pattern-matching function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternClause {
    pub parameters: Parameters,
    pub body: Node,
}

/// Formal parameter specification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameters {
    pub positional: Vec<Parameter>,
    /// Keyword-only parameters; each carries a default value
    pub keyword: Vec<Parameter>,
    /// Boolean guards shared across the parameter list
    pub conditionals: Vec<Node>,
    pub metadata: BTreeMap<String, Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub default_value: Option<Node>,
}

/// Call-site arguments; keyword order is not semantically preserved
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CallArguments {
    pub positional: Vec<Node>,
    pub keyword: BTreeMap<String, Node>,
}

/// Integral bookkeeping carried on every integral node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegralMetadata {
    #[serde(rename = "integrationConstant")]
    pub integration_constant: String,
    #[serde(rename = "defaultValue")]
    pub default_value: i64,
}

impl Default for IntegralMetadata {
    fn default() -> Self {
        Self {
            integration_constant: "c".to_string(),
            default_value: 0,
        }
    }
}

// ==================== INSPECTION ====================

impl Node {
    /// Immediate children in left-to-right order
    pub fn children(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        match &self.kind {
            NodeKind::Number { .. }
            | NodeKind::String { .. }
            | NodeKind::UserIdentifier { .. }
            | NodeKind::SystemIdentifier { .. }
            | NodeKind::PlaceHolder { .. }
            | NodeKind::Null
            | NodeKind::EmbeddedLanguage { .. }
            | NodeKind::Comment { .. } => {}
            NodeKind::UnaryOperation { operand, .. } => out.push(operand.as_ref()),
            NodeKind::BinaryOperation { left, right, .. }
            | NodeKind::Pipe { left, right }
            | NodeKind::ExplicitPipe { left, right }
            | NodeKind::MapPipe { left, right }
            | NodeKind::FilterPipe { left, right }
            | NodeKind::ReducePipe { left, right } => {
                out.push(left.as_ref());
                out.push(right.as_ref());
            }
            NodeKind::Grouping { expression } | NodeKind::Statement { expression } => {
                out.push(expression.as_ref())
            }
            NodeKind::Tuple { elements }
            | NodeKind::Array { elements }
            | NodeKind::Set { elements }
            | NodeKind::Map { elements }
            | NodeKind::System { elements } => out.extend(elements.iter()),
            NodeKind::Matrix { rows } => out.extend(rows.iter().flatten()),
            NodeKind::Tensor { structure, .. } => {
                out.extend(structure.iter().flat_map(|r| r.row.iter()))
            }
            NodeKind::WithMetadata { primary, metadata } => {
                out.push(primary.as_ref());
                out.extend(metadata.values());
            }
            NodeKind::CodeBlock { statements } => out.extend(statements.iter()),
            NodeKind::FunctionCall {
                function,
                arguments,
            } => {
                out.push(function.as_ref());
                out.extend(arguments.positional.iter());
                out.extend(arguments.keyword.values());
            }
            NodeKind::FunctionDefinition {
                name,
                parameters,
                body,
            } => {
                out.push(name.as_ref());
                collect_parameter_children(parameters, &mut out);
                out.push(body.as_ref());
            }
            NodeKind::FunctionLambda { parameters, body } => {
                collect_parameter_children(parameters, &mut out);
                out.push(body.as_ref());
            }
            NodeKind::PatternMatchingFunction {
                name,
                parameters,
                patterns,
                metadata,
            } => {
                if let Some(name) = name {
                    out.push(name.as_ref());
                }
                collect_parameter_children(parameters, &mut out);
                for clause in patterns {
                    collect_parameter_children(&clause.parameters, &mut out);
                    out.push(&clause.body);
                }
                out.extend(metadata.values());
            }
            NodeKind::ParameterList { parameters } => {
                collect_parameter_children(parameters, &mut out)
            }
            NodeKind::PropertyAccess { object, property } => {
                out.push(object.as_ref());
                out.push(property.as_ref());
            }
            NodeKind::Derivative {
                function,
                variables,
                evaluation,
                operations,
                ..
            }
            | NodeKind::Integral {
                function,
                variables,
                evaluation,
                operations,
                ..
            } => {
                out.push(function.as_ref());
                for list in [variables, evaluation, operations].into_iter().flatten() {
                    out.extend(list.iter());
                }
            }
        }
        out
    }

    /// Whether this subtree performs a calculus operation. Derivative and
    /// integral nodes count, as does an identifier whose name embeds a
    /// prime (host tokenizers may attach primes to names).
    pub fn contains_calculus(&self) -> bool {
        match &self.kind {
            NodeKind::Derivative { .. } | NodeKind::Integral { .. } => true,
            NodeKind::UserIdentifier { name } | NodeKind::SystemIdentifier { name, .. } => {
                name.contains('\'')
            }
            _ => self.children().iter().any(|c| c.contains_calculus()),
        }
    }

    pub fn is_binary_operator(&self, operator: &str) -> bool {
        matches!(&self.kind, NodeKind::BinaryOperation { operator: op, .. } if op == operator)
    }

    /// Identifier name, if this node is a user or system identifier
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::UserIdentifier { name } | NodeKind::SystemIdentifier { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }
}

fn collect_parameter_children<'a>(parameters: &'a Parameters, out: &mut Vec<&'a Node>) {
    for param in parameters.positional.iter().chain(parameters.keyword.iter()) {
        if let Some(default) = &param.default_value {
            out.push(default);
        }
    }
    out.extend(parameters.conditionals.iter());
    out.extend(parameters.metadata.values());
}
