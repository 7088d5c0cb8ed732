//! JavaScript-family lexer for script element bodies and event handlers
//!
//! Stateless between tokens: template literals and comments are single
//! tokens, so every token start is a restart point with state 0.

use crate::lexer::chars;
use crate::lexer::{RuleLexer, ScanRules, Scanned};
use crate::tokens::{ForeignKind, TokenKind};

const fn js(name: &'static str) -> TokenKind {
    TokenKind::Foreign(ForeignKind::new("js", name))
}

pub const WHITE_SPACE: TokenKind = js("WhiteSpace");
pub const LINE_COMMENT: TokenKind = js("LineComment");
pub const BLOCK_COMMENT: TokenKind = js("BlockComment");
pub const KEYWORD: TokenKind = js("Keyword");
pub const IDENTIFIER: TokenKind = js("Identifier");
pub const NUMBER: TokenKind = js("Number");
pub const STRING: TokenKind = js("String");
pub const TEMPLATE: TokenKind = js("Template");
pub const OPERATOR: TokenKind = js("Operator");
pub const PUNCTUATION: TokenKind = js("Punctuation");

const KEYWORDS: &[&str] = &[
    "function", "var", "let", "const", "class", "new", "delete", "typeof", "instanceof", "void",
    "this", "super", "import", "export", "default", "from", "as", "of", "in", "async", "await",
    "if", "else", "switch", "case", "for", "while", "do", "break", "continue", "return",
    "throw", "try", "catch", "finally", "yield", "true", "false", "null", "undefined",
];

const OPERATORS: &[&str] = &[
    ">>>=", "===", "!==", "**=", "<<=", ">>=", ">>>", "...", "=>", "==", "!=", "<=", ">=", "&&",
    "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "**", "<<",
    ">>", "+", "-", "*", "/", "%", "=", "<", ">", "!", "&", "|", "^", "~", "?", ":",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptRules;

impl ScanRules for ScriptRules {
    fn scan(&self, text: &str, pos: usize, state: u32) -> Scanned {
        let bytes = text.as_bytes();
        let b = bytes[pos];

        if chars::is_whitespace(b) {
            return Scanned::new(WHITE_SPACE, chars::skip_whitespace(bytes, pos), state);
        }
        if bytes[pos..].starts_with(b"//") {
            let end = chars::scan_while(bytes, pos, |b| b != b'\n');
            return Scanned::new(LINE_COMMENT, end, state);
        }
        if bytes[pos..].starts_with(b"/*") {
            let end = chars::find(bytes, pos + 2, b"*/").map_or(bytes.len(), |at| at + 2);
            return Scanned::new(BLOCK_COMMENT, end, state);
        }

        let (kind, end) = match b {
            b'"' | b'\'' => (STRING, chars::scan_quoted(bytes, pos)),
            b'`' => (TEMPLATE, chars::scan_quoted(bytes, pos)),
            _ if b.is_ascii_digit()
                || (b == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)) =>
            {
                // numeric separators and the bigint suffix
                let end = chars::scan_number(bytes, pos);
                (NUMBER, chars::scan_while(bytes, end, |b| b == b'_' || b == b'n' || b.is_ascii_digit()))
            }
            _ if chars::is_ident_start(b) => {
                let end = chars::scan_while(bytes, pos, chars::is_ident_char);
                let kind = if KEYWORDS.contains(&&text[pos..end]) {
                    KEYWORD
                } else {
                    IDENTIFIER
                };
                (kind, end)
            }
            b'{' | b'}' | b'(' | b')' | b'[' | b']' | b';' | b',' | b'.' => (PUNCTUATION, pos + 1),
            _ => match chars::match_any(bytes, pos, OPERATORS) {
                Some(end) => (OPERATOR, end),
                None => (PUNCTUATION, chars::char_end(text, pos)),
            },
        };
        Scanned::new(kind, end, state)
    }

    fn language(&self) -> &'static str {
        "js"
    }
}

pub type ScriptLexer = RuleLexer<ScriptRules>;

impl RuleLexer<ScriptRules> {
    pub fn new() -> Self {
        RuleLexer::with_rules(ScriptRules)
    }
}

impl Default for RuleLexer<ScriptRules> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use std::sync::Arc;

    fn lex(text: &str) -> Vec<(TokenKind, String)> {
        let buffer: Arc<str> = Arc::from(text);
        let mut lexer = ScriptLexer::new();
        lexer.start(buffer.clone(), 0, buffer.len(), 0);
        let mut tokens = Vec::new();
        while let Some(kind) = lexer.token_type() {
            if kind != WHITE_SPACE {
                tokens.push((kind, buffer[lexer.token_start()..lexer.token_end()].to_string()));
            }
            lexer.advance();
        }
        tokens
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        lex(text).into_iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn test_statement() {
        assert_eq!(
            kinds("const x = a.b(1.5e3, 'q');"),
            vec![
                KEYWORD,
                IDENTIFIER,
                OPERATOR,
                IDENTIFIER,
                PUNCTUATION,
                IDENTIFIER,
                PUNCTUATION,
                NUMBER,
                PUNCTUATION,
                STRING,
                PUNCTUATION,
                PUNCTUATION,
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        let tokens = lex("a !== b >>>= c => d");
        let operators: Vec<&str> = tokens
            .iter()
            .filter(|(kind, _)| *kind == OPERATOR)
            .map(|(_, text)| text.as_str())
            .collect();
        assert_eq!(operators, vec!["!==", ">>>=", "=>"]);
    }

    #[test]
    fn test_comments_and_templates() {
        assert_eq!(
            lex("// one\n/* two */`t ${x}`"),
            vec![
                (LINE_COMMENT, "// one".to_string()),
                (BLOCK_COMMENT, "/* two */".to_string()),
                (TEMPLATE, "`t ${x}`".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("10n 0xFF 1_000"), vec![
            (NUMBER, "10n".to_string()),
            (NUMBER, "0xFF".to_string()),
            (NUMBER, "1_000".to_string()),
        ]);
    }

    #[test]
    fn test_unknown_characters_are_punctuation() {
        assert_eq!(kinds("#@"), vec![PUNCTUATION, PUNCTUATION]);
    }
}
