//! CSS lexer for style element bodies and `style` attribute values

use crate::lexer::chars;
use crate::lexer::{RuleLexer, ScanRules, Scanned};
use crate::tokens::{ForeignKind, TokenKind};

const fn css(name: &'static str) -> TokenKind {
    TokenKind::Foreign(ForeignKind::new("css", name))
}

pub const WHITE_SPACE: TokenKind = css("WhiteSpace");
pub const COMMENT: TokenKind = css("Comment");
pub const AT_KEYWORD: TokenKind = css("AtKeyword");
pub const IDENT: TokenKind = css("Ident");
/// Identifier in a declaration block followed by `:`
pub const PROPERTY: TokenKind = css("Property");
pub const NUMBER: TokenKind = css("Number");
pub const STRING: TokenKind = css("String");
pub const HASH: TokenKind = css("Hash");
pub const LBRACE: TokenKind = css("LBrace");
pub const RBRACE: TokenKind = css("RBrace");
pub const COLON: TokenKind = css("Colon");
pub const SEMICOLON: TokenKind = css("Semicolon");
pub const COMMA: TokenKind = css("Comma");
pub const PUNCTUATION: TokenKind = css("Punctuation");

const MAX_DEPTH: u32 = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Selectors and at-rules
    Top = 0,
    /// Inside a declaration block, before a property's colon
    Block = 1,
    /// After a property's colon
    Value = 2,
}

/// State layout: mode in bits 0-1, brace depth in bits 2-7
fn unpack(state: u32) -> (Mode, u32) {
    let mode = match state & 0b11 {
        1 => Mode::Block,
        2 => Mode::Value,
        _ => Mode::Top,
    };
    (mode, (state >> 2) & MAX_DEPTH)
}

fn pack(mode: Mode, depth: u32) -> u32 {
    mode as u32 | (depth.min(MAX_DEPTH) << 2)
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

fn is_name_start(bytes: &[u8], pos: usize) -> bool {
    match bytes.get(pos) {
        Some(b'-') => bytes
            .get(pos + 1)
            .is_some_and(|&b| b == b'-' || b.is_ascii_alphabetic() || b == b'_' || b >= 0x80),
        Some(&b) => b.is_ascii_alphabetic() || b == b'_' || b >= 0x80,
        None => false,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CssRules;

impl ScanRules for CssRules {
    fn scan(&self, text: &str, pos: usize, state: u32) -> Scanned {
        let bytes = text.as_bytes();
        let (mode, depth) = unpack(state);
        let b = bytes[pos];

        if chars::is_whitespace(b) {
            return Scanned::new(WHITE_SPACE, chars::skip_whitespace(bytes, pos), state);
        }
        if bytes[pos..].starts_with(b"/*") {
            let end = chars::find(bytes, pos + 2, b"*/").map_or(bytes.len(), |at| at + 2);
            return Scanned::new(COMMENT, end, state);
        }

        match b {
            b'{' => Scanned::new(LBRACE, pos + 1, pack(Mode::Block, depth + 1)),
            b'}' => {
                let depth = depth.saturating_sub(1);
                let mode = if depth > 0 { Mode::Block } else { Mode::Top };
                Scanned::new(RBRACE, pos + 1, pack(mode, depth))
            }
            b';' => {
                let mode = if mode == Mode::Top { Mode::Top } else { Mode::Block };
                Scanned::new(SEMICOLON, pos + 1, pack(mode, depth))
            }
            b':' => {
                let mode = if mode == Mode::Block { Mode::Value } else { mode };
                Scanned::new(COLON, pos + 1, pack(mode, depth))
            }
            b',' => Scanned::new(COMMA, pos + 1, state),
            b'"' | b'\'' => Scanned::new(STRING, chars::scan_quoted(bytes, pos), state),
            b'#' if bytes.get(pos + 1).is_some_and(|&b| is_name_char(b)) => {
                Scanned::new(HASH, chars::scan_while(bytes, pos + 1, is_name_char), state)
            }
            b'@' if is_name_start(bytes, pos + 1) => {
                Scanned::new(AT_KEYWORD, chars::scan_while(bytes, pos + 1, is_name_char), state)
            }
            _ if b.is_ascii_digit()
                || (b == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)) =>
            {
                let mut end = chars::scan_number(bytes, pos);
                if bytes.get(end) == Some(&b'%') {
                    end += 1;
                } else {
                    end = chars::scan_while(bytes, end, |b| b.is_ascii_alphabetic());
                }
                Scanned::new(NUMBER, end, state)
            }
            _ if is_name_start(bytes, pos) => {
                let end = chars::scan_while(bytes, pos, is_name_char);
                let after = chars::skip_whitespace(bytes, end);
                let kind = if mode == Mode::Block && bytes.get(after) == Some(&b':') {
                    PROPERTY
                } else {
                    IDENT
                };
                Scanned::new(kind, end, state)
            }
            _ => Scanned::new(PUNCTUATION, chars::char_end(text, pos), state),
        }
    }

    /// A `style` attribute value is a declaration list
    fn initial_state_for(&self, host_kind: TokenKind) -> u32 {
        if host_kind == TokenKind::AttributeValue {
            pack(Mode::Block, 0)
        } else {
            pack(Mode::Top, 0)
        }
    }

    fn language(&self) -> &'static str {
        "css"
    }
}

pub type CssLexer = RuleLexer<CssRules>;

impl RuleLexer<CssRules> {
    pub fn new() -> Self {
        RuleLexer::with_rules(CssRules)
    }
}

impl Default for RuleLexer<CssRules> {
    fn default() -> Self {
        Self::new()
    }
}
