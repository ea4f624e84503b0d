//! Embedded-language header parser
//!
//! A backtick string carries `LANG(CONTEXT):BODY`. The header ends at the
//! first colon outside a leading parenthesized group; everything after it
//! is the body, verbatim. Content with no header colon (or starting with
//! one) is a raw RiX string.

use crate::common::Span;
use crate::parser::errors::{source_span, ParseError};

/// Language name used when the content carries no header
pub const RAW_STRING_LANGUAGE: &str = "RiX-String";

/// Parsed pieces of a backtick fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedParts {
    pub language: String,
    pub context: Option<String>,
    pub body: String,
}

/// Split backtick content (outer delimiters already stripped) into
/// language, context, and body. `span` locates the fragment for errors.
pub fn parse_embedded_header(content: &str, span: Span) -> Result<EmbeddedParts, ParseError> {
    if content.starts_with(':') || !content.contains(':') {
        let body = content.strip_prefix(':').unwrap_or(content);
        return Ok(EmbeddedParts {
            language: RAW_STRING_LANGUAGE.to_string(),
            context: None,
            body: body.to_string(),
        });
    }

    let header_colon = locate_header_colon(content);
    let header = content[..header_colon].trim();
    let body = &content[header_colon + 1..];

    let (language, context) = parse_header(header, span)?;
    Ok(EmbeddedParts {
        language,
        context,
        body: body.to_string(),
    })
}

/// The header colon: when the content opens with `(`, it is the first `:`
/// after the matching `)`; otherwise (or when no such colon exists) it is
/// the first `:` in the content. The caller guarantees a colon exists.
fn locate_header_colon(content: &str) -> usize {
    let first_colon = content.find(':').unwrap_or(0);
    if !content.starts_with('(') {
        return first_colon;
    }
    match matching_paren(content, 0) {
        Some(close) => content[close..]
            .find(':')
            .map(|i| close + i)
            .unwrap_or(first_colon),
        None => first_colon,
    }
}

/// Index of the `)` matching the `(` at `open`
fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Validate and split the header into language and optional context
fn parse_header(header: &str, span: Span) -> Result<(String, Option<String>), ParseError> {
    let Some(open) = header.find('(') else {
        if header.contains(')') {
            return Err(ParseError::UnmatchedClosingParen {
                span: source_span(span),
            });
        }
        return Ok((header.trim().to_string(), None));
    };

    if let Some(first_close) = header.find(')') {
        if first_close < open {
            return Err(ParseError::UnmatchedClosingParen {
                span: source_span(span),
            });
        }
    }

    let Some(close) = matching_paren(header, open) else {
        return Err(ParseError::UnmatchedOpeningParen {
            span: source_span(span),
        });
    };

    if header[close + 1..].contains('(') {
        return Err(ParseError::MultipleParentheticalGroups {
            span: source_span(span),
        });
    }

    if close != header.len() - 1 {
        return Err(ParseError::InvalidHeaderFormat {
            span: source_span(span),
        });
    }

    let language = header[..open].trim().to_string();
    let context = header[open + 1..close].trim().to_string();
    Ok((language, Some(context)))
}
