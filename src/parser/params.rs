//! Argument and parameter parsing, and arrow lowering
//!
//! Call sites and formal parameter lists share one surface syntax: a `;`
//! switches from the positional section to the keyword section. Arrow
//! operators reinterpret an already-parsed left operand as a parameter
//! specification: `:->` lowers a function call into a named definition,
//! `->` lowers a grouped head into an anonymous lambda, and `:=>` builds a
//! pattern-matching function from an array of lambdas.

use std::collections::BTreeMap;

use super::errors::{source_span, ParseError};
use super::{Parser, Result, PREC_ARROW, PREC_ASSIGNMENT, PREC_STATEMENT};
use crate::ast::{
    CallArguments, Node, NodeKind, Parameter, Parameters, PatternClause,
};

impl<'a> Parser<'a> {
    // ==================== CALL SITES ====================

    /// Postfix `(...)` on a call-like node. Positional arguments run until
    /// a `;`; afterwards every argument is `name := expr`, or a bare
    /// identifier as shorthand for `name := name`.
    pub(crate) fn parse_call(&mut self, from: usize, function: Node) -> Result<Node> {
        self.advance();

        let mut positional = Vec::new();
        let mut keyword = BTreeMap::new();
        let mut in_keyword_section = false;

        loop {
            if self.at_symbol(")") {
                self.advance();
                break;
            }
            if self.at_symbol(";") {
                self.advance();
                in_keyword_section = true;
                continue;
            }

            let element = self.parse_expression(PREC_STATEMENT)?;
            if in_keyword_section {
                let span = element.span;
                match element.kind {
                    NodeKind::BinaryOperation {
                        ref operator,
                        ref left,
                        ref right,
                    } if operator == ":=" => match left.identifier_name() {
                        Some(name) => {
                            keyword.insert(name.to_string(), (**right).clone());
                        }
                        None => {
                            return Err(ParseError::ExpectedParameterName {
                                span: source_span(left.span),
                            })
                        }
                    },
                    NodeKind::UserIdentifier { ref name } => {
                        // shorthand: `name` stands for `name := name`
                        keyword.insert(name.clone(), element.clone());
                    }
                    _ => {
                        return Err(ParseError::ExpectedParameterName {
                            span: source_span(span),
                        })
                    }
                }
            } else {
                positional.push(element);
            }

            if self.at_symbol(",") {
                self.advance();
                continue;
            }
            if self.at_symbol(";") || self.at_symbol(")") {
                continue;
            }
            return Err(ParseError::UnexpectedToken {
                span: source_span(self.current().span),
                found: self.current().describe(),
                context: "expected `,`, `;`, or `)` in argument list".to_string(),
            });
        }

        Ok(self.node_from(
            from,
            NodeKind::FunctionCall {
                function: Box::new(function),
                arguments: CallArguments {
                    positional,
                    keyword,
                },
            },
        ))
    }

    // ==================== FORMAL PARAMETERS ====================

    /// Parameter list inside parens already known to contain a `;`.
    /// Leaves the closing `)` for the caller.
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Parameters> {
        let mut parameters = Parameters::default();
        let mut keyword_only = false;

        loop {
            if self.at_symbol(")") {
                break;
            }
            if self.at_symbol(";") {
                self.advance();
                keyword_only = true;
                continue;
            }

            let element = self.parse_expression(PREC_STATEMENT)?;
            let span = element.span;
            let (parameter, conditional) = element_to_parameter(element)?;
            if let Some(conditional) = conditional {
                parameters.conditionals.push(conditional);
            }
            if keyword_only {
                if parameter.default_value.is_none() {
                    return Err(ParseError::KeywordParameterWithoutDefault {
                        span: source_span(span),
                    });
                }
                parameters.keyword.push(parameter);
            } else {
                parameters.positional.push(parameter);
            }

            if self.at_symbol(",") {
                self.advance();
                continue;
            }
            if self.at_symbol(";") || self.at_symbol(")") {
                continue;
            }
            return Err(ParseError::UnexpectedToken {
                span: source_span(self.current().span),
                found: self.current().describe(),
                context: "expected `,`, `;`, or `)` in parameter list".to_string(),
            });
        }

        Ok(parameters)
    }

    // ==================== ARROW LOWERING ====================

    /// `:->` — the left side must be a function call; its arguments become
    /// the parameter specification of a named definition
    pub(crate) fn parse_function_definition(&mut self, from: usize, left: Node) -> Result<Node> {
        let body = self.parse_expression(PREC_ASSIGNMENT)?;
        match left.kind {
            NodeKind::FunctionCall {
                function,
                arguments,
            } => {
                let parameters = convert_args_to_params(arguments)?;
                Ok(self.node_from(
                    from,
                    NodeKind::FunctionDefinition {
                        name: function,
                        parameters,
                        body: Box::new(body),
                    },
                ))
            }
            _ => Err(ParseError::InvalidFunctionDefinition {
                span: source_span(left.span),
            }),
        }
    }

    /// `->` — lower a parameter-shaped left side into a lambda; anything
    /// else stays a plain binary operation
    pub(crate) fn parse_lambda(&mut self, from: usize, left: Node) -> Result<Node> {
        let body = self.parse_expression(PREC_ARROW)?;
        match lambda_parameters(&left) {
            Some(parameters) => Ok(self.node_from(
                from,
                NodeKind::FunctionLambda {
                    parameters,
                    body: Box::new(body),
                },
            )),
            None => Ok(self.node_from(
                from,
                NodeKind::BinaryOperation {
                    operator: "->".to_string(),
                    left: Box::new(left),
                    right: Box::new(body),
                },
            )),
        }
    }

    /// `:=>` — a named head takes an array of arrow-lambdas (optionally
    /// metadata-adorned) as its patterns; a parameter-shaped head makes an
    /// anonymous single-pattern function
    pub(crate) fn parse_pattern_match(&mut self, from: usize, left: Node) -> Result<Node> {
        let right = self.parse_expression(PREC_ASSIGNMENT)?;

        if let Some(parameters) = lambda_parameters(&left) {
            let clause = PatternClause {
                parameters,
                body: right,
            };
            return Ok(self.node_from(
                from,
                NodeKind::PatternMatchingFunction {
                    name: None,
                    parameters: Parameters::default(),
                    patterns: vec![clause],
                    metadata: BTreeMap::new(),
                },
            ));
        }

        let (name, parameters) = match left.kind {
            NodeKind::UserIdentifier { .. } | NodeKind::SystemIdentifier { .. } => {
                (Box::new(left), Parameters::default())
            }
            NodeKind::FunctionCall {
                function,
                arguments,
            } => (function, convert_args_to_params(arguments)?),
            _ => {
                return Err(ParseError::InvalidPatternMatch {
                    span: source_span(left.span),
                })
            }
        };

        let (lambdas, metadata) = extract_patterns(right)?;
        let mut patterns = Vec::with_capacity(lambdas.len());
        for lambda in lambdas {
            let span = lambda.span;
            match lambda.kind {
                NodeKind::FunctionLambda { parameters, body } => patterns.push(PatternClause {
                    parameters,
                    body: *body,
                }),
                _ => {
                    return Err(ParseError::InvalidPatternMatch {
                        span: source_span(span),
                    })
                }
            }
        }

        Ok(self.node_from(
            from,
            NodeKind::PatternMatchingFunction {
                name: Some(name),
                parameters,
                patterns,
                metadata,
            },
        ))
    }
}

// ==================== ELEMENT CONVERSION ====================

/// Reinterpret one parsed element as a formal parameter, splitting off a
/// `? guard` conditional when present. Accepted shapes: `name`,
/// `name := default`, `name ? cond`, `name := default ? cond`.
fn element_to_parameter(element: Node) -> Result<(Parameter, Option<Node>)> {
    let span = element.span;
    match element.kind {
        NodeKind::UserIdentifier { name } => Ok((
            Parameter {
                name,
                default_value: None,
            },
            None,
        )),
        NodeKind::BinaryOperation {
            operator,
            left,
            right,
        } if operator == ":=" => {
            let name = match left.identifier_name() {
                Some(name) => name.to_string(),
                None => {
                    return Err(ParseError::ExpectedParameterName {
                        span: source_span(left.span),
                    })
                }
            };
            let (default_value, conditional) = split_condition(*right);
            Ok((
                Parameter {
                    name,
                    default_value: Some(default_value),
                },
                conditional,
            ))
        }
        NodeKind::BinaryOperation {
            operator,
            left,
            right,
        } if operator == "?" => {
            let name = match left.identifier_name() {
                Some(name) => name.to_string(),
                None => {
                    return Err(ParseError::ExpectedParameterName {
                        span: source_span(left.span),
                    })
                }
            };
            Ok((
                Parameter {
                    name,
                    default_value: None,
                },
                Some(*right),
            ))
        }
        _ => Err(ParseError::ExpectedParameterName {
            span: source_span(span),
        }),
    }
}

/// `value ? cond` splits into the value and the guard
fn split_condition(node: Node) -> (Node, Option<Node>) {
    match node.kind {
        NodeKind::BinaryOperation {
            operator,
            left,
            right,
        } if operator == "?" => (*left, Some(*right)),
        _ => (node, None),
    }
}

/// Reinterpret call-site arguments as a parameter specification
pub(crate) fn convert_args_to_params(arguments: CallArguments) -> Result<Parameters> {
    let mut parameters = Parameters::default();
    for element in arguments.positional {
        let (parameter, conditional) = element_to_parameter(element)?;
        if let Some(conditional) = conditional {
            parameters.conditionals.push(conditional);
        }
        parameters.positional.push(parameter);
    }
    for (name, value) in arguments.keyword {
        let (default_value, conditional) = split_condition(value);
        if let Some(conditional) = conditional {
            parameters.conditionals.push(conditional);
        }
        parameters.keyword.push(Parameter {
            name,
            default_value: Some(default_value),
        });
    }
    Ok(parameters)
}

// ==================== LAMBDA HEADS ====================

/// Parameter specification for a `->` left side, when it has one of the
/// lowerable shapes
fn lambda_parameters(left: &Node) -> Option<Parameters> {
    match &left.kind {
        NodeKind::Grouping { expression } => match &expression.kind {
            NodeKind::ParameterList { parameters } => Some(parameters.clone()),
            NodeKind::UserIdentifier { name } => Some(single_parameter(name.clone(), None)),
            NodeKind::BinaryOperation {
                operator,
                left: name,
                right: condition,
            } if operator == "?" => {
                let name = name.identifier_name()?.to_string();
                Some(single_parameter(name, Some((**condition).clone())))
            }
            _ => None,
        },
        NodeKind::Tuple { elements } => {
            let mut parameters = Parameters::default();
            for element in elements {
                let name = match &element.kind {
                    NodeKind::UserIdentifier { name } => name.clone(),
                    _ => return None,
                };
                parameters.positional.push(Parameter {
                    name,
                    default_value: None,
                });
            }
            Some(parameters)
        }
        _ => None,
    }
}

fn single_parameter(name: String, conditional: Option<Node>) -> Parameters {
    let mut parameters = Parameters::default();
    parameters.positional.push(Parameter {
        name,
        default_value: None,
    });
    if let Some(conditional) = conditional {
        parameters.conditionals.push(conditional);
    }
    parameters
}

// ==================== PATTERN EXTRACTION ====================

/// The right side of a named `:=>`: a lambda array, a metadata-adorned
/// lambda array, or a single lambda. Metadata lifts to the outer function.
fn extract_patterns(right: Node) -> Result<(Vec<Node>, BTreeMap<String, Node>)> {
    match right.kind {
        NodeKind::WithMetadata { primary, metadata } => {
            Ok((pattern_array(*primary)?, metadata))
        }
        _ => Ok((pattern_array(right)?, BTreeMap::new())),
    }
}

/// Unwrap a pattern container into its lambda list. A single-element
/// array whose element is itself an array is unwrapped one level (the
/// shape produced by metadata-adorned pattern arrays).
fn pattern_array(node: Node) -> Result<Vec<Node>> {
    if matches!(node.kind, NodeKind::FunctionLambda { .. }) {
        return Ok(vec![node]);
    }
    let span = node.span;
    match node.kind {
        NodeKind::Array { mut elements } => {
            if elements.len() == 1 && matches!(elements[0].kind, NodeKind::Array { .. }) {
                if let NodeKind::Array { elements: inner } = elements.remove(0).kind {
                    return Ok(inner);
                }
            }
            Ok(elements)
        }
        _ => Err(ParseError::InvalidPatternMatch {
            span: source_span(span),
        }),
    }
}
