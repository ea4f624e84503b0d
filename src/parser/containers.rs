//! Bracket disambiguation
//!
//! The same bracket shape means different things depending on content:
//! parentheses are grouping, tuples, or parameter lists; square brackets
//! are arrays, matrices, tensors, or metadata attachments; single curly
//! braces are sets, maps, or equation systems; doubled braces are code
//! blocks. Parens are classified by a local look-ahead scan; the other
//! containers are classified from their parsed elements.

use std::collections::BTreeMap;
use std::mem;

use super::errors::{source_span, ParseError};
use super::{is_equation_operator, Parser, Result, PREC_STATEMENT};
use crate::ast::{Node, NodeKind, TensorRow};
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    // ==================== PARENTHESES ====================

    /// `(` at the cursor: empty tuple, parameter list, tuple, or grouping
    pub(crate) fn parse_paren(&mut self) -> Result<Node> {
        let from = self.pos;
        self.advance();

        if self.at_symbol(")") {
            self.advance();
            return Ok(self.node_from(from, NodeKind::Tuple { elements: vec![] }));
        }

        let (has_semicolon, has_comma) = self.scan_group()?;

        if has_semicolon {
            let parameters = self.parse_parameter_list()?;
            self.expect_closing(")")?;
            let inner = self.node_from(from, NodeKind::ParameterList { parameters });
            return Ok(self.node_from(
                from,
                NodeKind::Grouping {
                    expression: Box::new(inner),
                },
            ));
        }

        if has_comma {
            let mut elements = Vec::new();
            loop {
                elements.push(self.parse_expression(PREC_STATEMENT)?);
                if self.at_symbol(",") {
                    self.advance();
                    if self.at_symbol(",") {
                        return Err(ParseError::ConsecutiveCommas {
                            span: source_span(self.current().span),
                        });
                    }
                    // single trailing comma adds no element
                    if self.at_symbol(")") {
                        self.advance();
                        break;
                    }
                    continue;
                }
                self.expect_closing(")")?;
                break;
            }
            return Ok(self.node_from(from, NodeKind::Tuple { elements }));
        }

        let expression = self.parse_expression(PREC_STATEMENT)?;
        self.expect_closing(")")?;
        Ok(self.node_from(
            from,
            NodeKind::Grouping {
                expression: Box::new(expression),
            },
        ))
    }

    /// Look ahead from the cursor to the `)` matching the just-consumed
    /// `(`, reporting whether a `;` or `,` occurs at depth zero
    fn scan_group(&self) -> Result<(bool, bool)> {
        let mut depth = 0usize;
        let mut has_semicolon = false;
        let mut has_comma = false;
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match token.kind {
                TokenKind::Symbol => match token.value.as_str() {
                    "(" | "[" | "{" | "{{" => depth += 1,
                    ")" if depth == 0 => return Ok((has_semicolon, has_comma)),
                    ")" | "]" | "}" | "}}" => depth = depth.saturating_sub(1),
                    ";" if depth == 0 => has_semicolon = true,
                    "," if depth == 0 => has_comma = true,
                    _ => {}
                },
                TokenKind::End => break,
                _ => {}
            }
            i += 1;
        }
        Err(ParseError::ExpectedClosing {
            span: source_span(self.current().span),
            delimiter: ")",
            found: "end of input".to_string(),
        })
    }

    /// Postfix `[...]` on an existing node: property access
    pub(crate) fn parse_index(&mut self, from: usize, object: Node) -> Result<Node> {
        self.advance();
        let property = self.parse_expression(PREC_STATEMENT)?;
        self.expect_closing("]")?;
        Ok(self.node_from(
            from,
            NodeKind::PropertyAccess {
                object: Box::new(object),
                property: Box::new(property),
            },
        ))
    }

    // ==================== SQUARE BRACKETS ====================

    /// `[` at the cursor. Starts optimistically as an array; the first
    /// semicolon upgrades to matrix/tensor, the first `:=` element to a
    /// metadata attachment. The two upgrades are mutually exclusive.
    pub(crate) fn parse_bracket(&mut self) -> Result<Node> {
        let from = self.pos;
        self.advance();

        let mut elements: Vec<Node> = Vec::new();
        let mut metadata: BTreeMap<String, Node> = BTreeMap::new();
        let mut structure: Vec<TensorRow> = Vec::new();
        let mut non_metadata_seen = 0usize;
        let mut max_level = 0u32;

        loop {
            if self.at_symbol("]") {
                self.advance();
                break;
            }

            if let Some(level) = self.take_row_separator() {
                if !metadata.is_empty() {
                    return Err(ParseError::MixedMatrixMetadata {
                        span: source_span(self.span_from(from)),
                    });
                }
                max_level = max_level.max(level);
                structure.push(TensorRow {
                    row: mem::take(&mut elements),
                    separator_level: level,
                });
                continue;
            }

            let element = self.parse_expression(PREC_STATEMENT)?;
            if let NodeKind::BinaryOperation {
                operator,
                left,
                right,
            } = &element.kind
            {
                if operator == ":=" {
                    if max_level > 0 || !structure.is_empty() {
                        return Err(ParseError::MixedMatrixMetadata {
                            span: source_span(element.span),
                        });
                    }
                    let key = match &left.kind {
                        NodeKind::UserIdentifier { name }
                        | NodeKind::SystemIdentifier { name, .. } => name.clone(),
                        NodeKind::String { value, .. } => value.clone(),
                        _ => {
                            return Err(ParseError::InvalidMetadataKey {
                                span: source_span(left.span),
                            })
                        }
                    };
                    metadata.insert(key, (**right).clone());
                } else {
                    non_metadata_seen += 1;
                    elements.push(element);
                }
            } else {
                non_metadata_seen += 1;
                elements.push(element);
            }

            if self.at_symbol(",") {
                self.advance();
                continue;
            }
            if self.at_symbol("]")
                || self.at_symbol(";")
                || self.current().kind == TokenKind::SemicolonSequence
            {
                continue;
            }
            return Err(ParseError::UnexpectedToken {
                span: source_span(self.current().span),
                found: self.current().describe(),
                context: "expected `,`, `;`, or `]` in array".to_string(),
            });
        }

        if !metadata.is_empty() {
            if non_metadata_seen > 1 {
                return Err(ParseError::MixedElementsWithMetadata {
                    span: source_span(self.span_from(from)),
                });
            }
            let primary = match elements.into_iter().next() {
                Some(first) => first,
                None => self.node_from(from, NodeKind::Array { elements: vec![] }),
            };
            return Ok(self.node_from(
                from,
                NodeKind::WithMetadata {
                    primary: Box::new(primary),
                    metadata,
                },
            ));
        }

        if !structure.is_empty() {
            structure.push(TensorRow {
                row: elements,
                separator_level: 0,
            });
            if max_level <= 1 {
                let rows = structure.into_iter().map(|r| r.row).collect();
                return Ok(self.node_from(from, NodeKind::Matrix { rows }));
            }
            return Ok(self.node_from(
                from,
                NodeKind::Tensor {
                    structure,
                    max_dimension: max_level + 1,
                },
            ));
        }

        Ok(self.node_from(from, NodeKind::Array { elements }))
    }

    /// Consume a row separator, returning its level: `;` is 1, a run of
    /// `n` semicolons is `n`
    fn take_row_separator(&mut self) -> Option<u32> {
        if self.at_symbol(";") {
            self.advance();
            return Some(1);
        }
        if self.current().kind == TokenKind::SemicolonSequence {
            let count = self.advance().count.unwrap_or(2);
            return Some(count);
        }
        None
    }

    // ==================== CURLY BRACES ====================

    /// `{` at the cursor: set, map, or equation system, classified from
    /// the parsed elements
    pub(crate) fn parse_brace(&mut self) -> Result<Node> {
        let from = self.pos;
        self.advance();

        let mut elements = Vec::new();
        let mut used_comma = false;
        loop {
            if self.at_symbol("}") {
                self.advance();
                break;
            }
            elements.push(self.parse_expression(PREC_STATEMENT)?);
            if self.at_symbol(",") {
                used_comma = true;
                self.advance();
                continue;
            }
            if self.at_symbol(";") {
                self.advance();
                continue;
            }
            self.expect_closing("}")?;
            break;
        }

        let span = source_span(self.span_from(from));
        let mut has_equation = false;
        let mut has_assignment = false;
        let mut all_equations = true;
        let mut all_assignments = true;
        for element in &elements {
            if matches!(element.kind, NodeKind::PatternMatchingFunction { .. }) {
                return Err(ParseError::PatternMatchInBraces { span });
            }
            match &element.kind {
                NodeKind::BinaryOperation { operator, .. } if is_equation_operator(operator) => {
                    has_equation = true;
                    all_assignments = false;
                }
                NodeKind::BinaryOperation { operator, .. } if operator == ":=" => {
                    has_assignment = true;
                    all_equations = false;
                }
                _ => {
                    all_equations = false;
                    all_assignments = false;
                }
            }
        }

        if has_equation {
            if has_assignment {
                return Err(ParseError::MixedEquationAssignment { span });
            }
            if !all_equations || used_comma {
                return Err(ParseError::SystemNonEquation { span });
            }
            return Ok(self.node_from(from, NodeKind::System { elements }));
        }
        if has_assignment {
            if !all_assignments {
                return Err(ParseError::MapNonPair { span });
            }
            return Ok(self.node_from(from, NodeKind::Map { elements }));
        }
        Ok(self.node_from(from, NodeKind::Set { elements }))
    }

    // ==================== CODE BLOCKS ====================

    /// `{{` at the cursor: a block of semicolon-separated statements
    pub(crate) fn parse_code_block(&mut self) -> Result<Node> {
        let from = self.pos;
        self.advance();

        let mut statements = Vec::new();
        loop {
            if self.at_symbol("}}") {
                self.advance();
                break;
            }
            if self.at_end() {
                return Err(ParseError::ExpectedClosing {
                    span: source_span(self.current().span),
                    delimiter: "}}",
                    found: "end of input".to_string(),
                });
            }
            statements.push(self.parse_statement()?);
        }
        Ok(self.node_from(from, NodeKind::CodeBlock { statements }))
    }
}
