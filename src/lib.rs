//! Parser for the RiX mathematical expression language
//!
//! RiX unifies arithmetic, assignment, function definition, pattern
//! matching, pipelines, collection literals, matrices and tensors,
//! calculus operators, and backtick-embedded foreign fragments under one
//! expression grammar. This crate turns source text (or a pre-produced
//! token stream) into a structured syntax tree of statements.
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Pratt Parser (+ system-symbol oracle) → Syntax Tree
//! ```
//!
//! The parser is a precedence-climbing engine over a flat token stream.
//! The host supplies a [`SystemLookup`] oracle mapping system identifier
//! names to operator / constant / function metadata; operator descriptors
//! join the same precedence loop as the built-in symbol table.
//!
//! # Example
//!
//! ```
//! use rix_parser::{parse, NodeKind, SystemRegistry};
//!
//! let oracle = SystemRegistry::new();
//! let nodes = parse("f(x) :-> x + 1;", &oracle).unwrap();
//! assert!(matches!(nodes[0].kind, NodeKind::Statement { .. }));
//! ```

pub mod ast;
pub mod common;
pub mod embedded;
pub mod lexer;
pub mod oracle;
pub mod parser;

pub use ast::{
    CallArguments, IntegralMetadata, Node, NodeKind, Parameter, Parameters, PatternClause,
    TensorRow,
};
pub use common::Span;
pub use lexer::{tokenize, IdentifierKind, StringKind, Token, TokenKind};
pub use oracle::{
    Associativity, OperatorInfo, OperatorKind, SystemInfo, SystemKind, SystemLookup,
    SystemRegistry,
};
pub use parser::{parse_tokens, ParseError, Parser};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokenize and parse source code into a sequence of statement, comment,
/// and expression nodes.
pub fn parse(source: &str, oracle: &dyn SystemLookup) -> miette::Result<Vec<Node>> {
    let tokens = lexer::tokenize(source)?;
    let nodes = parser::parse_tokens(&tokens, oracle)?;
    Ok(nodes)
}
