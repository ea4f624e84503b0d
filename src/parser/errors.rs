//! Parser error diagnostics
//!
//! One diagnostic per failure category. The first error aborts parsing;
//! there is no recovery, and the parser instance is not reusable after an
//! error surfaces.

use crate::common::Span;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Convert a lexer span into a miette source span
pub(crate) fn source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    // ==================== STRUCTURAL ====================
    #[error("Unexpected {found}")]
    #[diagnostic(code(R0001))]
    UnexpectedToken {
        #[label("{context}")]
        span: SourceSpan,
        found: String,
        context: String,
    },

    #[error("Unexpected symbol `{symbol}` in expression position")]
    #[diagnostic(code(R0002))]
    UnexpectedSymbol {
        #[label("this symbol cannot start an expression")]
        span: SourceSpan,
        symbol: String,
    },

    #[error("Unexpected end of input")]
    #[diagnostic(code(R0003))]
    UnexpectedEnd {
        #[label("input ends here")]
        span: SourceSpan,
    },

    #[error("Expected `{delimiter}`, found {found}")]
    #[diagnostic(code(R0004))]
    ExpectedClosing {
        #[label("expected `{delimiter}` here")]
        span: SourceSpan,
        delimiter: &'static str,
        found: String,
    },

    // ==================== TUPLES ====================
    #[error("Consecutive commas not allowed")]
    #[diagnostic(code(R0010))]
    ConsecutiveCommas {
        #[label("second comma here")]
        span: SourceSpan,
    },

    // ==================== PARAMETER LISTS ====================
    #[error("Expected parameter name")]
    #[diagnostic(code(R0011))]
    ExpectedParameterName {
        #[label("not a parameter shape")]
        span: SourceSpan,
    },

    #[error("Keyword-only parameters must have default values")]
    #[diagnostic(code(R0012), help("give the parameter a default: `name := value`"))]
    KeywordParameterWithoutDefault {
        #[label("keyword-only parameter here")]
        span: SourceSpan,
    },

    // ==================== BRACE CONTAINERS ====================
    #[error("Pattern matching should use array syntax `[...]`, not brace syntax `{{...}}`")]
    #[diagnostic(code(R0020))]
    PatternMatchInBraces {
        #[label("pattern-matching function inside braces")]
        span: SourceSpan,
    },

    #[error("System containers must contain only equations")]
    #[diagnostic(code(R0021), help("equations use `:=:` `:<:` `:>:` `:<=:` `:>=:` and are semicolon-separated"))]
    SystemNonEquation {
        #[label("system container here")]
        span: SourceSpan,
    },

    #[error("Map containers must contain only key-value pairs")]
    #[diagnostic(code(R0022))]
    MapNonPair {
        #[label("map container here")]
        span: SourceSpan,
    },

    #[error("Cannot mix equations with other assignment types")]
    #[diagnostic(code(R0023))]
    MixedEquationAssignment {
        #[label("container mixes `:=:`-family equations with `:=`")]
        span: SourceSpan,
    },

    // ==================== ARRAYS / MATRICES ====================
    #[error("Metadata key must be an identifier or string")]
    #[diagnostic(code(R0030))]
    InvalidMetadataKey {
        #[label("this key")]
        span: SourceSpan,
    },

    #[error("Cannot mix array elements with metadata")]
    #[diagnostic(code(R0031))]
    MixedElementsWithMetadata {
        #[label("in this array")]
        span: SourceSpan,
    },

    #[error("Cannot mix matrix/tensor syntax with metadata")]
    #[diagnostic(code(R0032))]
    MixedMatrixMetadata {
        #[label("in this array")]
        span: SourceSpan,
    },

    // ==================== ARROWS ====================
    #[error("Function definition requires a function call on the left of `:->`")]
    #[diagnostic(code(R0040))]
    InvalidFunctionDefinition {
        #[label("this is not a function call")]
        span: SourceSpan,
    },

    #[error("Pattern matching requires an array of function patterns")]
    #[diagnostic(code(R0041))]
    InvalidPatternMatch {
        #[label("not a pattern shape")]
        span: SourceSpan,
    },

    // ==================== CALCULUS ====================
    #[error("Expected function name after integral operator")]
    #[diagnostic(code(R0050))]
    ExpectedFunctionName {
        #[label("expected an identifier here")]
        span: SourceSpan,
    },

    #[error("Expected variable name")]
    #[diagnostic(code(R0051))]
    ExpectedVariableName {
        #[label("expected an identifier here")]
        span: SourceSpan,
    },

    #[error("Expected comma or closing bracket")]
    #[diagnostic(code(R0052))]
    ExpectedCommaOrBracket {
        #[label("in this variable list")]
        span: SourceSpan,
    },

    #[error("Expected closing bracket after variable list")]
    #[diagnostic(code(R0053))]
    ExpectedClosingBracket {
        #[label("variable list is not closed")]
        span: SourceSpan,
    },

    // ==================== EMBEDDED LANGUAGE HEADERS ====================
    #[error("Unmatched opening parenthesis in embedded language header")]
    #[diagnostic(code(R0060))]
    UnmatchedOpeningParen {
        #[label("in this embedded fragment")]
        span: SourceSpan,
    },

    #[error("Unmatched closing parenthesis in embedded language header")]
    #[diagnostic(code(R0061))]
    UnmatchedClosingParen {
        #[label("in this embedded fragment")]
        span: SourceSpan,
    },

    #[error("Multiple parenthetical groups in embedded language header")]
    #[diagnostic(code(R0062))]
    MultipleParentheticalGroups {
        #[label("in this embedded fragment")]
        span: SourceSpan,
    },

    #[error("Invalid embedded language header format")]
    #[diagnostic(code(R0063), help("headers look like `LANG:` or `LANG(CONTEXT):`"))]
    InvalidHeaderFormat {
        #[label("in this embedded fragment")]
        span: SourceSpan,
    },
}
