//! Shared helpers for parser tests

use crate::ast::{Node, NodeKind};
use crate::lexer::tokenize;
use crate::oracle::{SystemInfo, SystemRegistry};
use crate::parser::{ParseError, Parser};

/// Oracle with the host-supplied symbols the tests exercise
pub(crate) fn test_oracle() -> SystemRegistry {
    SystemRegistry::new()
        .with("OR", SystemInfo::infix(30))
        .with("AND", SystemInfo::infix(40))
        .with("NOT", SystemInfo::prefix(110))
        .with("IN", SystemInfo::infix(60))
        .with("FACT", SystemInfo::postfix(115))
        .with("PI", SystemInfo::constant())
        .with("SIN", SystemInfo::function())
}

pub(crate) fn parse_source(input: &str) -> Result<Vec<Node>, ParseError> {
    let tokens = tokenize(input).expect("lexing should succeed");
    let oracle = test_oracle();
    let mut parser = Parser::new(&tokens, &oracle);
    parser.parse_program()
}

pub(crate) fn parse_ok(input: &str) -> Vec<Node> {
    parse_source(input).unwrap_or_else(|e| panic!("should parse {input:?}: {e:?}"))
}

/// Parse a program expected to hold a single entry, unwrapping a
/// `Statement` wrapper when present
pub(crate) fn parse_expr(input: &str) -> Node {
    let mut nodes = parse_ok(input);
    assert_eq!(nodes.len(), 1, "expected one node for {input:?}");
    let node = nodes.remove(0);
    match node.kind {
        NodeKind::Statement { expression } => *expression,
        _ => node,
    }
}

pub(crate) fn parse_err(input: &str) -> ParseError {
    match parse_source(input) {
        Ok(nodes) => panic!("expected {input:?} to fail, parsed {nodes:?}"),
        Err(e) => e,
    }
}
