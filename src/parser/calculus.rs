//! Derivative and integral parsing
//!
//! A run of primes after a call-like node is a derivative postfix; a run
//! of primes in prefix position starts an integral, whose function name
//! must follow as a bare identifier. Both forms take an optional
//! bracketed variable list and an optional parenthesized argument list,
//! classified as *operations* when any argument performs calculus itself
//! and as *evaluations* otherwise.

use super::errors::{source_span, ParseError};
use super::{Parser, Result, PREC_STATEMENT};
use crate::ast::{IntegralMetadata, Node, NodeKind};
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    /// Postfix derivative: `'` at the cursor, applied to `function`
    pub(crate) fn parse_derivative(&mut self, from: usize, function: Node) -> Result<Node> {
        let order = self.take_prime_run();
        let variables = self.parse_variable_list()?;
        let (evaluation, operations) = self.parse_calculus_arguments()?;
        Ok(self.node_from(
            from,
            NodeKind::Derivative {
                function: Box::new(function),
                order,
                variables,
                evaluation,
                operations,
            },
        ))
    }

    /// Prefix integral: `'` at the cursor with no preceding operand
    pub(crate) fn parse_integral(&mut self) -> Result<Node> {
        let from = self.pos;
        let order = self.take_prime_run();
        if !matches!(self.current().kind, TokenKind::Identifier(_)) {
            return Err(ParseError::ExpectedFunctionName {
                span: source_span(self.current().span),
            });
        }
        let function = self.parse_identifier_node()?;
        let variables = self.parse_variable_list()?;
        let (evaluation, operations) = self.parse_calculus_arguments()?;
        Ok(self.node_from(
            from,
            NodeKind::Integral {
                function: Box::new(function),
                order,
                variables,
                evaluation,
                operations,
                metadata: IntegralMetadata::default(),
            },
        ))
    }

    fn take_prime_run(&mut self) -> u32 {
        let mut order = 0u32;
        while self.at_symbol("'") {
            self.advance();
            order += 1;
        }
        order
    }

    /// Optional `[v1, v2, ...]` of variable names
    fn parse_variable_list(&mut self) -> Result<Option<Vec<Node>>> {
        if !self.at_symbol("[") {
            return Ok(None);
        }
        self.advance();

        let mut variables = Vec::new();
        loop {
            if self.at_symbol("]") {
                self.advance();
                break;
            }
            if self.at_end() {
                return Err(ParseError::ExpectedClosingBracket {
                    span: source_span(self.current().span),
                });
            }
            if !matches!(self.current().kind, TokenKind::Identifier(_)) {
                return Err(ParseError::ExpectedVariableName {
                    span: source_span(self.current().span),
                });
            }
            variables.push(self.parse_identifier_node()?);

            if self.at_symbol(",") {
                self.advance();
                if !matches!(self.current().kind, TokenKind::Identifier(_)) {
                    return Err(ParseError::ExpectedVariableName {
                        span: source_span(self.current().span),
                    });
                }
                continue;
            }
            if self.at_symbol("]") {
                self.advance();
                break;
            }
            if self.at_end() {
                return Err(ParseError::ExpectedClosingBracket {
                    span: source_span(self.current().span),
                });
            }
            return Err(ParseError::ExpectedCommaOrBracket {
                span: source_span(self.current().span),
            });
        }
        Ok(Some(variables))
    }

    /// Optional `(...)` after the primes: an evaluation list, or an
    /// operation list when any argument contains a calculus operation
    fn parse_calculus_arguments(&mut self) -> Result<(Option<Vec<Node>>, Option<Vec<Node>>)> {
        if !self.at_symbol("(") {
            return Ok((None, None));
        }
        self.advance();

        let mut arguments = Vec::new();
        loop {
            if self.at_symbol(")") {
                self.advance();
                break;
            }
            arguments.push(self.parse_expression(PREC_STATEMENT)?);
            if self.at_symbol(",") {
                self.advance();
                continue;
            }
            self.expect_closing(")")?;
            break;
        }

        if arguments.iter().any(Node::contains_calculus) {
            Ok((None, Some(arguments)))
        } else {
            Ok((Some(arguments), None))
        }
    }
}
