//! Token definitions for the RiX lexer

use crate::common::Span;
use logos::{Lexer, Logos};
use serde::{Deserialize, Serialize};

/// A token with its kind, value, position, and verbatim source text.
///
/// `original` includes the trivia (whitespace) preceding the token, so
/// concatenating the originals of a token run reproduces the source slice
/// it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Number text, string interior, identifier name, or symbol text
    pub value: String,
    /// Position index for placeholder tokens (`_2` carries 2)
    pub place: Option<u32>,
    /// Run length for semicolon-sequence tokens
    pub count: Option<u32>,
    pub span: Span,
    pub original: String,
}

/// Token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Numeric literal, value kept verbatim
    Number,
    String(StringKind),
    Identifier(IdentifierKind),
    /// Operator or delimiter; the symbol text is in `value`
    Symbol,
    /// `_k` positional placeholder
    PlaceHolder,
    /// Run of two or more `;` with no intervening whitespace
    SemicolonSequence,
    /// End-of-input sentinel
    End,
}

/// String subkinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringKind {
    Quote,
    Backtick,
    Comment,
}

/// Identifier subkinds: system names start with an uppercase letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    User,
    System,
}

impl Token {
    /// Synthesized end-of-input sentinel
    pub fn end(span: Span) -> Self {
        Self {
            kind: TokenKind::End,
            value: String::new(),
            place: None,
            count: None,
            span,
            original: String::new(),
        }
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.value == symbol
    }

    /// Human-readable description for diagnostics
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Number => format!("number `{}`", self.value),
            TokenKind::String(StringKind::Comment) => "comment".to_string(),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Identifier(_) => format!("identifier `{}`", self.value),
            TokenKind::Symbol => format!("`{}`", self.value),
            TokenKind::PlaceHolder => format!("placeholder `{}`", self.value),
            TokenKind::SemicolonSequence => "`;` sequence".to_string(),
            TokenKind::End => "end of input".to_string(),
        }
    }
}

/// Raw token shapes recognized by logos; `tokenize` refines these into
/// [`Token`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum RawToken {
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    QuoteString,

    #[token("`", lex_backtick)]
    BacktickString,

    // `#` line comment; the first interior char must not be `*` so the
    // block form below wins on `#*`
    #[regex(r"#([^*\n][^\n]*)?")]
    LineComment,

    #[token("#*", lex_block_comment)]
    BlockComment,

    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Identifier,

    #[regex(r"_[0-9]+")]
    PlaceHolder,

    #[regex(r";;+")]
    SemicolonRun,

    // Assignment / definition family
    #[token(":=")]
    #[token(":=:")]
    #[token(":<:")]
    #[token(":>:")]
    #[token(":<=:")]
    #[token(":>=:")]
    #[token(":=>")]
    #[token("=>")]
    #[token(":->")]
    // Pipe family
    #[token("|>")]
    #[token("||>")]
    #[token("|>>")]
    #[token("|>?")]
    #[token("|>:")]
    #[token("|+")]
    #[token("|*")]
    #[token("|:")]
    #[token("|;")]
    #[token("|^")]
    #[token("|?")]
    // Arrows, conditions, comparisons
    #[token("->")]
    #[token("?")]
    #[token("=")]
    #[token("?=")]
    #[token("!=")]
    #[token("==")]
    #[token("<")]
    #[token(">")]
    #[token("<=")]
    #[token(">=")]
    #[token("?<")]
    #[token("?>")]
    #[token("?<=")]
    #[token("?>=")]
    // Arithmetic
    #[token(":")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("//")]
    #[token("%")]
    #[token("/^")]
    #[token("/~")]
    #[token("/%")]
    #[token("^")]
    #[token("**")]
    // Calculus prime
    #[token("'")]
    // Delimiters and punctuation
    #[token(".")]
    #[token("_")]
    #[token("(")]
    #[token(")")]
    #[token("[")]
    #[token("]")]
    #[token("{")]
    #[token("}")]
    #[token("{{")]
    #[token("}}")]
    #[token(",")]
    #[token(";")]
    Symbol,
}

/// Consume a backtick string: everything up to the next backtick.
fn lex_backtick(lex: &mut Lexer<RawToken>) -> bool {
    match lex.remainder().find('`') {
        Some(idx) => {
            lex.bump(idx + 1);
            true
        }
        None => false,
    }
}

/// Consume a `#* ... *#` block comment, honoring nesting.
fn lex_block_comment(lex: &mut Lexer<RawToken>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'#' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'*' && i + 1 < bytes.len() && bytes[i + 1] == b'#' {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return true;
            }
        } else {
            i += 1;
        }
    }
    false
}
