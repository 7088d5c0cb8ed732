//! Lexer for the bodies of `${...}` expressions

use crate::lexer::chars;
use crate::lexer::{RuleLexer, ScanRules, Scanned};
use crate::tokens::{ForeignKind, TokenKind};

const fn el(name: &'static str) -> TokenKind {
    TokenKind::Foreign(ForeignKind::new("el", name))
}

pub const WHITE_SPACE: TokenKind = el("WhiteSpace");
pub const IDENTIFIER: TokenKind = el("Identifier");
pub const KEYWORD: TokenKind = el("Keyword");
pub const NUMBER: TokenKind = el("Number");
pub const STRING: TokenKind = el("String");
pub const OPERATOR: TokenKind = el("Operator");
pub const PUNCTUATION: TokenKind = el("Punctuation");

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "eq", "ne", "lt", "gt", "le", "ge", "empty", "div", "mod", "true",
    "false", "null", "instanceof",
];

const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "->", "+", "-", "*", "/", "%", "!", "<", ">", "?", ":",
    "=",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionRules;

impl ScanRules for ExpressionRules {
    fn scan(&self, text: &str, pos: usize, state: u32) -> Scanned {
        let bytes = text.as_bytes();
        let b = bytes[pos];

        let (kind, end) = if chars::is_whitespace(b) {
            (WHITE_SPACE, chars::skip_whitespace(bytes, pos))
        } else if b == b'"' || b == b'\'' {
            (STRING, chars::scan_quoted(bytes, pos))
        } else if b.is_ascii_digit() {
            (NUMBER, chars::scan_number(bytes, pos))
        } else if chars::is_ident_start(b) {
            let end = chars::scan_while(bytes, pos, chars::is_ident_char);
            let kind = if KEYWORDS.contains(&&text[pos..end]) {
                KEYWORD
            } else {
                IDENTIFIER
            };
            (kind, end)
        } else if let Some(end) = chars::match_any(bytes, pos, OPERATORS) {
            (OPERATOR, end)
        } else {
            (PUNCTUATION, chars::char_end(text, pos))
        };
        Scanned::new(kind, end, state)
    }

    fn language(&self) -> &'static str {
        "el"
    }
}

pub type ExpressionLexer = RuleLexer<ExpressionRules>;

impl RuleLexer<ExpressionRules> {
    pub fn new() -> Self {
        RuleLexer::with_rules(ExpressionRules)
    }
}

impl Default for RuleLexer<ExpressionRules> {
    fn default() -> Self {
        Self::new()
    }
}
