//! Lexer for the RiX expression language
//!
//! Tokenizes source code into the flat token stream the parser consumes,
//! using the Logos library for the raw scan.

pub mod tokens;

pub use tokens::{IdentifierKind, StringKind, Token, TokenKind};

use crate::common::Span;
use miette::Result;
use tokens::RawToken;

use logos::Logos;

/// Lex source code into tokens.
///
/// The returned stream always ends in an [`TokenKind::End`] sentinel. Each
/// token's `original` text includes the trivia preceding it, so the
/// concatenation of all originals reproduces the source.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);
    let mut prev_end = 0usize;
    let mut line = 1usize;
    let mut line_scan = 0usize;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let raw = match result {
            Ok(raw) => raw,
            Err(_) => {
                return Err(miette::miette!(
                    "unexpected character at position {}: {:?}",
                    span.start,
                    &source[span.clone()]
                ));
            }
        };

        line += source[line_scan..span.start].matches('\n').count();
        line_scan = span.start;

        let text = &source[span.start..span.end];
        let original = source[prev_end..span.end].to_string();
        prev_end = span.end;
        let pos = Span::new(span.start, span.end, line);

        let mut value = text.to_string();
        let mut place = None;
        let mut count = None;
        let kind = match raw {
            RawToken::Number => TokenKind::Number,
            RawToken::QuoteString => {
                value = text[1..text.len() - 1].to_string();
                TokenKind::String(StringKind::Quote)
            }
            RawToken::BacktickString => {
                value = text[1..text.len() - 1].to_string();
                TokenKind::String(StringKind::Backtick)
            }
            RawToken::LineComment => {
                value = text[1..].to_string();
                TokenKind::String(StringKind::Comment)
            }
            RawToken::BlockComment => {
                value = text[2..text.len() - 2].to_string();
                TokenKind::String(StringKind::Comment)
            }
            RawToken::Identifier => {
                let system = text.chars().next().is_some_and(|c| c.is_ascii_uppercase());
                TokenKind::Identifier(if system {
                    IdentifierKind::System
                } else {
                    IdentifierKind::User
                })
            }
            RawToken::PlaceHolder => {
                place = text[1..].parse::<u32>().ok();
                TokenKind::PlaceHolder
            }
            RawToken::SemicolonRun => {
                count = Some(text.len() as u32);
                TokenKind::SemicolonSequence
            }
            RawToken::Symbol => TokenKind::Symbol,
        };

        tokens.push(Token {
            kind,
            value,
            place,
            count,
            span: pos,
            original,
        });
    }

    line += source[line_scan..].matches('\n').count();
    let mut end = Token::end(Span::new(source.len(), source.len(), line));
    end.original = source[prev_end..].to_string();
    tokens.push(end);

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_simple() {
        let tokens = tokenize("x := 42").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier(IdentifierKind::User));
        assert_eq!(tokens[0].value, "x");
        assert_eq!(tokens[1].kind, TokenKind::Symbol);
        assert_eq!(tokens[1].value, ":=");
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].value, "42");
        assert_eq!(tokens[3].kind, TokenKind::End);
    }

    #[test]
    fn test_lex_longest_symbols() {
        let tokens = tokenize(":=: :<=: ||> |>> |>? |>: :-> :=> ** // /^").unwrap();
        let symbols: Vec<&str> = tokens
            .iter()
            .take_while(|t| t.kind != TokenKind::End)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(
            symbols,
            vec![":=:", ":<=:", "||>", "|>>", "|>?", "|>:", ":->", ":=>", "**", "//", "/^"]
        );
    }

    #[test]
    fn test_lex_double_brace_distinct() {
        let tokens = tokenize("{{ { {").unwrap();
        assert_eq!(tokens[0].value, "{{");
        assert_eq!(tokens[1].value, "{");
        assert_eq!(tokens[2].value, "{");
    }

    #[test]
    fn test_lex_semicolon_runs() {
        let tokens = tokenize("; ;; ;;;").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Symbol);
        assert_eq!(tokens[1].kind, TokenKind::SemicolonSequence);
        assert_eq!(tokens[1].count, Some(2));
        assert_eq!(tokens[2].kind, TokenKind::SemicolonSequence);
        assert_eq!(tokens[2].count, Some(3));
    }

    #[test]
    fn test_lex_identifier_kinds() {
        let tokens = tokenize("sin SIN Pi x2").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier(IdentifierKind::User));
        assert_eq!(tokens[1].kind, TokenKind::Identifier(IdentifierKind::System));
        assert_eq!(tokens[2].kind, TokenKind::Identifier(IdentifierKind::System));
        assert_eq!(tokens[3].kind, TokenKind::Identifier(IdentifierKind::User));
    }

    #[test]
    fn test_lex_placeholders_and_null() {
        let tokens = tokenize("_ _2 _15").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Symbol);
        assert_eq!(tokens[0].value, "_");
        assert_eq!(tokens[1].kind, TokenKind::PlaceHolder);
        assert_eq!(tokens[1].place, Some(2));
        assert_eq!(tokens[2].place, Some(15));
    }

    #[test]
    fn test_lex_numbers_verbatim() {
        let tokens = tokenize("3.14 1e10 2.5e-3 007").unwrap();
        assert_eq!(tokens[0].value, "3.14");
        assert_eq!(tokens[1].value, "1e10");
        assert_eq!(tokens[2].value, "2.5e-3");
        assert_eq!(tokens[3].value, "007");
    }

    #[test]
    fn test_lex_strings() {
        let tokens = tokenize(r#""hello" `P(x):x^2`"#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String(StringKind::Quote));
        assert_eq!(tokens[0].value, "hello");
        assert_eq!(tokens[1].kind, TokenKind::String(StringKind::Backtick));
        assert_eq!(tokens[1].value, "P(x):x^2");
    }

    #[test]
    fn test_lex_comments() {
        let tokens = tokenize("1 # trailing\n2").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[1].kind, TokenKind::String(StringKind::Comment));
        assert_eq!(tokens[1].value, " trailing");
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].span.line, 2);
    }

    #[test]
    fn test_lex_nested_block_comments() {
        let tokens = tokenize("#* outer #* inner *# tail *# 5").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String(StringKind::Comment));
        assert_eq!(tokens[0].value, " outer #* inner *# tail ");
        assert_eq!(tokens[1].kind, TokenKind::Number);
    }

    #[test]
    fn test_lex_originals_reproduce_source() {
        let source = "  f(x) :-> x + 1;  ";
        let tokens = tokenize(source).unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.original.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_lex_division_family() {
        let tokens = tokenize("a // b /% c /~ d").unwrap();
        assert_eq!(tokens[1].value, "//");
        assert_eq!(tokens[3].value, "/%");
        assert_eq!(tokens[5].value, "/~");
    }
}
