//! Parser for the RiX expression language
//!
//! A Pratt (precedence-climbing) parser over a pre-produced token stream.
//! Bracket shapes are disambiguated by local look-ahead and by inspecting
//! already-parsed elements; arrow operators retroactively lower their left
//! operand into a parameter specification. The oracle supplies metadata
//! for system identifiers, including host-defined operators that join the
//! same precedence loop as the built-in symbol table.

mod calculus;
mod containers;
pub mod errors;
mod params;

#[cfg(test)]
mod tests;

use crate::ast::{Node, NodeKind};
use crate::common::Span;
use crate::lexer::{IdentifierKind, StringKind, Token, TokenKind};
use crate::oracle::{Associativity, OperatorKind, SystemLookup};

pub use errors::ParseError;
use errors::source_span;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a token stream into a sequence of statement/comment/expression
/// nodes.
pub fn parse_tokens(tokens: &[Token], oracle: &dyn SystemLookup) -> Result<Vec<Node>> {
    let mut parser = Parser::new(tokens, oracle);
    parser.parse_program()
}

// ==================== PRECEDENCE LADDER ====================
// Higher binds tighter. Statement terminator `;` sits at 0.

pub(crate) const PREC_STATEMENT: u8 = 0;
pub(crate) const PREC_ASSIGNMENT: u8 = 10;
pub(crate) const PREC_PIPE: u8 = 20;
pub(crate) const PREC_ARROW: u8 = 25;
pub(crate) const PREC_CONDITION: u8 = 45;
pub(crate) const PREC_EQUALITY: u8 = 50;
pub(crate) const PREC_COMPARISON: u8 = 60;
pub(crate) const PREC_INTERVAL: u8 = 70;
pub(crate) const PREC_ADDITIVE: u8 = 80;
pub(crate) const PREC_MULTIPLICATIVE: u8 = 90;
pub(crate) const PREC_POWER: u8 = 100;
pub(crate) const PREC_UNARY: u8 = 110;
pub(crate) const PREC_PRIME: u8 = 115;
pub(crate) const PREC_POSTFIX: u8 = 120;
pub(crate) const PREC_PROPERTY: u8 = 130;

/// Built-in infix symbol table: `(precedence, associativity)`.
/// `(`, `[`, and `'` are fast-paths handled before this table.
fn symbol_op_info(symbol: &str) -> Option<(u8, Associativity)> {
    use Associativity::{Left, Right};
    let info = match symbol {
        ":=" | ":=:" | ":<:" | ":>:" | ":<=:" | ":>=:" | ":=>" | "=>" | ":->" => {
            (PREC_ASSIGNMENT, Right)
        }
        "|>" | "||>" | "|>>" | "|>?" | "|>:" | "|+" | "|*" | "|:" | "|;" | "|^" | "|?" => {
            (PREC_PIPE, Left)
        }
        "->" => (PREC_ARROW, Right),
        "?" => (PREC_CONDITION, Left),
        "=" | "?=" | "!=" | "==" => (PREC_EQUALITY, Left),
        "<" | ">" | "<=" | ">=" | "?<" | "?>" | "?<=" | "?>=" => (PREC_COMPARISON, Left),
        ":" => (PREC_INTERVAL, Left),
        "+" | "-" => (PREC_ADDITIVE, Left),
        "*" | "/" | "//" | "%" | "/^" | "/~" | "/%" => (PREC_MULTIPLICATIVE, Left),
        "^" | "**" => (PREC_POWER, Right),
        "." => (PREC_PROPERTY, Left),
        _ => return None,
    };
    Some(info)
}

/// Equation operators that classify a curly container as a `System`
pub(crate) fn is_equation_operator(symbol: &str) -> bool {
    matches!(symbol, ":=:" | ":<:" | ":>:" | ":<=:" | ":>=:")
}

/// Node kinds that accept a postfix `(...)` call
fn is_callable(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::UserIdentifier { .. }
            | NodeKind::SystemIdentifier { .. }
            | NodeKind::PropertyAccess { .. }
            | NodeKind::FunctionCall { .. }
            | NodeKind::Derivative { .. }
            | NodeKind::Integral { .. }
    )
}

/// Node kinds after which a `'` is a derivative postfix rather than the
/// start of an integral
fn is_differentiable(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::UserIdentifier { .. }
            | NodeKind::SystemIdentifier { .. }
            | NodeKind::FunctionCall { .. }
            | NodeKind::PropertyAccess { .. }
            | NodeKind::Derivative { .. }
            | NodeKind::Integral { .. }
    )
}

// ==================== PARSER ====================

/// Parser state: the token slice, an integer cursor, and the oracle
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    oracle: &'a dyn SystemLookup,
    end: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], oracle: &'a dyn SystemLookup) -> Self {
        let end_span = tokens
            .last()
            .map(|t| Span::new(t.span.end, t.span.end, t.span.line))
            .unwrap_or_else(Span::dummy);
        Self {
            tokens,
            pos: 0,
            oracle,
            end: Token::end(end_span),
        }
    }

    // ==================== CURSOR ====================

    pub(crate) fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.end)
    }

    pub(crate) fn at_symbol(&self, symbol: &str) -> bool {
        self.current().is_symbol(symbol)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.current().kind == TokenKind::End
    }

    pub(crate) fn advance(&mut self) -> &Token {
        let idx = self.pos;
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.tokens.get(idx).unwrap_or(&self.end)
    }

    /// Consume the expected closing delimiter or fail
    pub(crate) fn expect_closing(&mut self, delimiter: &'static str) -> Result<()> {
        if self.at_symbol(delimiter) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::ExpectedClosing {
                span: source_span(self.current().span),
                delimiter,
                found: self.current().describe(),
            })
        }
    }

    /// Build a node covering the tokens from index `from` to the cursor
    pub(crate) fn node_from(&self, from: usize, kind: NodeKind) -> Node {
        let last = self.pos.saturating_sub(1).max(from);
        let first_span = self.tokens.get(from).map(|t| t.span).unwrap_or(self.end.span);
        let last_span = self.tokens.get(last).map(|t| t.span).unwrap_or(self.end.span);
        let span = Span::new(first_span.start, last_span.end, first_span.line);
        let hi = (last + 1).min(self.tokens.len());
        let lo = from.min(hi);
        let mut original = String::new();
        for token in &self.tokens[lo..hi] {
            original.push_str(&token.original);
        }
        Node {
            kind,
            span,
            original,
        }
    }

    /// Span covering the tokens from index `from` to the cursor
    pub(crate) fn span_from(&self, from: usize) -> Span {
        let last = self.pos.saturating_sub(1).max(from);
        let first_span = self.tokens.get(from).map(|t| t.span).unwrap_or(self.end.span);
        let last_span = self.tokens.get(last).map(|t| t.span).unwrap_or(self.end.span);
        Span::new(first_span.start, last_span.end, first_span.line)
    }

    // ==================== STATEMENT FRAMING ====================

    /// Parse the whole program: zero or more statements
    pub fn parse_program(&mut self) -> Result<Vec<Node>> {
        let mut statements = Vec::new();
        while !self.at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// One top-level (or code-block) entry: a standalone comment, or an
    /// expression wrapped in `Statement` when a `;` follows it
    pub(crate) fn parse_statement(&mut self) -> Result<Node> {
        let from = self.pos;
        if let TokenKind::String(StringKind::Comment) = self.current().kind {
            let token = self.advance().clone();
            return Ok(self.node_from(
                from,
                NodeKind::Comment {
                    value: token.value,
                    kind: StringKind::Comment,
                },
            ));
        }
        let expression = self.parse_expression(PREC_STATEMENT)?;
        if self.at_symbol(";") || self.current().kind == TokenKind::SemicolonSequence {
            self.advance();
            return Ok(self.node_from(
                from,
                NodeKind::Statement {
                    expression: Box::new(expression),
                },
            ));
        }
        Ok(expression)
    }

    // ==================== PRATT ENGINE ====================

    pub(crate) fn parse_expression(&mut self, min_prec: u8) -> Result<Node> {
        let from = self.pos;
        let mut left = self.parse_prefix()?;

        loop {
            if self.at_terminator() {
                break;
            }

            // Fast-path: `(` after a call-like node is a call, not grouping
            if self.at_symbol("(") {
                if !is_callable(&left) || PREC_POSTFIX < min_prec {
                    break;
                }
                left = self.parse_call(from, left)?;
                continue;
            }

            // Postfix `[...]` property access
            if self.at_symbol("[") {
                if PREC_POSTFIX < min_prec {
                    break;
                }
                left = self.parse_index(from, left)?;
                continue;
            }

            // Fast-path: `'` after a differentiable node is a derivative
            if self.at_symbol("'") {
                if !is_differentiable(&left) || PREC_PRIME < min_prec {
                    break;
                }
                left = self.parse_derivative(from, left)?;
                continue;
            }

            // Oracle-declared operators arrive as system identifiers
            if self.current().kind == TokenKind::Identifier(IdentifierKind::System) {
                let info = self.oracle.lookup(&self.current().value);
                let Some(op) = info.operator_info() else {
                    break;
                };
                match op.kind {
                    OperatorKind::Infix => {
                        if op.precedence < min_prec {
                            break;
                        }
                        let operator = self.advance().value.clone();
                        let next_min = if op.associativity == Associativity::Left {
                            op.precedence + 1
                        } else {
                            op.precedence
                        };
                        let right = self.parse_expression(next_min)?;
                        left = self.node_from(
                            from,
                            NodeKind::BinaryOperation {
                                operator,
                                left: Box::new(left),
                                right: Box::new(right),
                            },
                        );
                        continue;
                    }
                    OperatorKind::Postfix => {
                        if op.precedence < min_prec {
                            break;
                        }
                        let operator = self.advance().value.clone();
                        left = self.node_from(
                            from,
                            NodeKind::UnaryOperation {
                                operator,
                                operand: Box::new(left),
                            },
                        );
                        continue;
                    }
                    OperatorKind::Prefix => break,
                }
            }

            if self.current().kind != TokenKind::Symbol {
                break;
            }
            let symbol = self.current().value.clone();
            let Some((prec, assoc)) = symbol_op_info(&symbol) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            left = self.parse_infix(from, left, &symbol, prec, assoc)?;
        }

        Ok(left)
    }

    /// Tokens that end an expression without being consumed
    fn at_terminator(&self) -> bool {
        match self.current().kind {
            TokenKind::End | TokenKind::SemicolonSequence => true,
            TokenKind::String(StringKind::Comment) => true,
            TokenKind::Symbol => matches!(
                self.current().value.as_str(),
                ";" | "," | ")" | "]" | "}" | "}}"
            ),
            _ => false,
        }
    }

    // ==================== PREFIX DISPATCH ====================

    fn parse_prefix(&mut self) -> Result<Node> {
        let from = self.pos;
        match self.current().kind {
            TokenKind::Number => {
                let token = self.advance().clone();
                Ok(self.node_from(from, NodeKind::Number { value: token.value }))
            }
            TokenKind::String(StringKind::Quote) => {
                let token = self.advance().clone();
                Ok(self.node_from(
                    from,
                    NodeKind::String {
                        value: token.value,
                        kind: StringKind::Quote,
                    },
                ))
            }
            TokenKind::String(StringKind::Backtick) => {
                let token = self.advance().clone();
                let parts = crate::embedded::parse_embedded_header(&token.value, token.span)?;
                Ok(self.node_from(
                    from,
                    NodeKind::EmbeddedLanguage {
                        language: parts.language,
                        context: parts.context,
                        body: parts.body,
                    },
                ))
            }
            TokenKind::Identifier(IdentifierKind::User) => {
                let token = self.advance().clone();
                Ok(self.node_from(from, NodeKind::UserIdentifier { name: token.value }))
            }
            TokenKind::Identifier(IdentifierKind::System) => {
                let name = self.current().value.clone();
                let info = self.oracle.lookup(&name);
                if let Some(op) = info.operator_info() {
                    if op.kind == OperatorKind::Prefix {
                        self.advance();
                        let operand = self.parse_expression(op.precedence)?;
                        return Ok(self.node_from(
                            from,
                            NodeKind::UnaryOperation {
                                operator: name,
                                operand: Box::new(operand),
                            },
                        ));
                    }
                }
                self.advance();
                Ok(self.node_from(
                    from,
                    NodeKind::SystemIdentifier {
                        name,
                        system_info: info,
                    },
                ))
            }
            TokenKind::PlaceHolder => {
                let token = self.advance().clone();
                let place = token.place.unwrap_or(0);
                Ok(self.node_from(from, NodeKind::PlaceHolder { place }))
            }
            TokenKind::Symbol => match self.current().value.as_str() {
                "_" => {
                    self.advance();
                    Ok(self.node_from(from, NodeKind::Null))
                }
                "-" | "+" => {
                    let operator = self.advance().value.clone();
                    let operand = self.parse_expression(PREC_UNARY)?;
                    Ok(self.node_from(
                        from,
                        NodeKind::UnaryOperation {
                            operator,
                            operand: Box::new(operand),
                        },
                    ))
                }
                "(" => self.parse_paren(),
                "[" => self.parse_bracket(),
                "{" => self.parse_brace(),
                "{{" => self.parse_code_block(),
                "'" => self.parse_integral(),
                other => Err(ParseError::UnexpectedSymbol {
                    span: source_span(self.current().span),
                    symbol: other.to_string(),
                }),
            },
            TokenKind::End => Err(ParseError::UnexpectedEnd {
                span: source_span(self.current().span),
            }),
            TokenKind::String(StringKind::Comment) | TokenKind::SemicolonSequence => {
                Err(ParseError::UnexpectedToken {
                    span: source_span(self.current().span),
                    found: self.current().describe(),
                    context: "expected an expression".to_string(),
                })
            }
        }
    }

    /// Identifier token at the cursor becomes an identifier node, with the
    /// oracle consulted for system names
    pub(crate) fn parse_identifier_node(&mut self) -> Result<Node> {
        let from = self.pos;
        match self.current().kind {
            TokenKind::Identifier(IdentifierKind::User) => {
                let token = self.advance().clone();
                Ok(self.node_from(from, NodeKind::UserIdentifier { name: token.value }))
            }
            TokenKind::Identifier(IdentifierKind::System) => {
                let token = self.advance().clone();
                let info = self.oracle.lookup(&token.value);
                Ok(self.node_from(
                    from,
                    NodeKind::SystemIdentifier {
                        name: token.value,
                        system_info: info,
                    },
                ))
            }
            _ => Err(ParseError::UnexpectedToken {
                span: source_span(self.current().span),
                found: self.current().describe(),
                context: "expected an identifier".to_string(),
            }),
        }
    }

    // ==================== INFIX DISPATCH ====================

    /// The operator symbol has already been consumed
    fn parse_infix(
        &mut self,
        from: usize,
        left: Node,
        symbol: &str,
        prec: u8,
        assoc: Associativity,
    ) -> Result<Node> {
        match symbol {
            ":->" => self.parse_function_definition(from, left),
            "->" => self.parse_lambda(from, left),
            ":=>" => self.parse_pattern_match(from, left),
            "." => {
                let property = self.parse_expression(prec + 1)?;
                Ok(self.node_from(
                    from,
                    NodeKind::PropertyAccess {
                        object: Box::new(left),
                        property: Box::new(property),
                    },
                ))
            }
            _ => {
                let next_min = if assoc == Associativity::Left {
                    prec + 1
                } else {
                    prec
                };
                let right = self.parse_expression(next_min)?;
                let left = Box::new(left);
                let right = Box::new(right);
                let kind = match symbol {
                    "|>" => NodeKind::Pipe { left, right },
                    "||>" => NodeKind::ExplicitPipe { left, right },
                    "|>>" => NodeKind::MapPipe { left, right },
                    "|>?" => NodeKind::FilterPipe { left, right },
                    "|>:" => NodeKind::ReducePipe { left, right },
                    _ => NodeKind::BinaryOperation {
                        operator: symbol.to_string(),
                        left,
                        right,
                    },
                };
                Ok(self.node_from(from, kind))
            }
        }
    }
}
