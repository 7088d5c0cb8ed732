//! Rule-driven lexers
//!
//! A [`ScanRules`] implementation is a pure function from (position, state) to
//! the next token. [`RuleLexer`] turns it into a [`Lexer`], so every lexer
//! built this way is resumable at any token start.

use super::chars;
use super::Lexer;
use crate::tokens::TokenKind;
use std::sync::Arc;

/// One token recognized by [`ScanRules::scan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    pub kind: TokenKind,
    /// Exclusive end offset
    pub end: usize,
    /// State at `end`
    pub next_state: u32,
}

impl Scanned {
    pub fn new(kind: TokenKind, end: usize, next_state: u32) -> Self {
        Self {
            kind,
            end,
            next_state,
        }
    }
}

pub trait ScanRules: Send {
    /// Recognize the token starting at `pos`
    ///
    /// `text` ends at the end of the lexed range and `pos < text.len()`. The
    /// returned end must be past `pos` and on a character boundary.
    fn scan(&self, text: &str, pos: usize, state: u32) -> Scanned;

    /// See [`Lexer::embedded_initial_state`]
    fn initial_state_for(&self, _host_kind: TokenKind) -> u32 {
        0
    }

    fn language(&self) -> &'static str;
}

pub struct RuleLexer<R> {
    rules: R,
    buffer: Arc<str>,
    end: usize,
    token: Option<TokenKind>,
    token_start: usize,
    token_end: usize,
    token_state: u32,
    next_state: u32,
}

impl<R: ScanRules> RuleLexer<R> {
    pub fn with_rules(rules: R) -> Self {
        Self {
            rules,
            buffer: Arc::from(""),
            end: 0,
            token: None,
            token_start: 0,
            token_end: 0,
            token_state: 0,
            next_state: 0,
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    /// Buffer text up to the end of the lexed range
    pub fn text(&self) -> &str {
        &self.buffer[..self.end]
    }

    pub fn range_end(&self) -> usize {
        self.end
    }

    fn lex_at(&mut self, pos: usize, state: u32) {
        self.token_start = pos;
        self.token_state = state;

        if pos >= self.end {
            self.token = None;
            self.token_end = self.end;
            self.next_state = state;
            return;
        }

        let text = &self.buffer[..self.end];
        let mut scanned = self.rules.scan(text, pos, state);
        debug_assert!(
            scanned.end > pos && text.is_char_boundary(scanned.end.min(text.len())),
            "{} rules produced a bad token end {} at {}",
            self.rules.language(),
            scanned.end,
            pos
        );
        if scanned.end <= pos || scanned.end > self.end || !text.is_char_boundary(scanned.end) {
            scanned.end = chars::char_end(text, pos);
        }

        self.token = Some(scanned.kind);
        self.token_end = scanned.end;
        self.next_state = scanned.next_state;
    }
}

impl<R: ScanRules> Lexer for RuleLexer<R> {
    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, state: u32) {
        self.end = chars::floor_char_boundary(&buffer, end);
        self.buffer = buffer;
        let start = chars::floor_char_boundary(&self.buffer, start.min(self.end));
        self.lex_at(start, state);
    }

    fn advance(&mut self) {
        if self.token.is_some() {
            self.lex_at(self.token_end, self.next_state);
        }
    }

    fn token_type(&self) -> Option<TokenKind> {
        self.token
    }

    fn token_start(&self) -> usize {
        self.token_start
    }

    fn token_end(&self) -> usize {
        self.token_end
    }

    fn state(&self) -> u32 {
        self.token_state
    }

    fn embedded_initial_state(&self, host_kind: TokenKind) -> u32 {
        self.rules.initial_state_for(host_kind)
    }

    fn language(&self) -> &'static str {
        self.rules.language()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::ForeignKind;

    const WORD: TokenKind = TokenKind::Foreign(ForeignKind::new("test", "Word"));
    const GAP: TokenKind = TokenKind::Foreign(ForeignKind::new("test", "Gap"));

    /// Words and gaps; the state counts words seen so far
    struct Words;

    impl ScanRules for Words {
        fn scan(&self, text: &str, pos: usize, state: u32) -> Scanned {
            let bytes = text.as_bytes();
            if chars::is_whitespace(bytes[pos]) {
                Scanned::new(GAP, chars::skip_whitespace(bytes, pos), state)
            } else {
                let end = chars::scan_while(bytes, pos, |b| !chars::is_whitespace(b));
                Scanned::new(WORD, end, state + 1)
            }
        }

        fn language(&self) -> &'static str {
            "test"
        }
    }

    fn collect(lexer: &mut RuleLexer<Words>) -> Vec<(TokenKind, usize, usize, u32)> {
        let mut tokens = Vec::new();
        while let Some(kind) = lexer.token_type() {
            tokens.push((kind, lexer.token_start(), lexer.token_end(), lexer.state()));
            lexer.advance();
        }
        tokens
    }

    #[test]
    fn test_state_is_captured_at_token_start() {
        let mut lexer = RuleLexer::with_rules(Words);
        lexer.start(Arc::from("ab  cd e"), 0, 8, 0);
        let tokens = collect(&mut lexer);
        assert_eq!(
            tokens,
            vec![
                (WORD, 0, 2, 0),
                (GAP, 2, 4, 1),
                (WORD, 4, 6, 1),
                (GAP, 6, 7, 2),
                (WORD, 7, 8, 2),
            ]
        );
    }

    #[test]
    fn test_restart_reproduces_tail() {
        let buffer: Arc<str> = Arc::from("one two three");
        let mut lexer = RuleLexer::with_rules(Words);
        lexer.start(buffer.clone(), 0, buffer.len(), 0);
        let full = collect(&mut lexer);

        for (index, &(_, start, _, state)) in full.iter().enumerate() {
            lexer.start(buffer.clone(), start, buffer.len(), state);
            assert_eq!(collect(&mut lexer), full[index..].to_vec());
        }
    }

    #[test]
    fn test_range_end_limits_tokens() {
        let mut lexer = RuleLexer::with_rules(Words);
        lexer.start(Arc::from("abc def"), 0, 5, 0);
        let tokens = collect(&mut lexer);
        assert_eq!(tokens.last().map(|t| t.2), Some(5));
        assert_eq!(lexer.token_type(), None);
        assert_eq!(lexer.token_start(), 5);
    }

    #[test]
    fn test_empty_range() {
        let mut lexer = RuleLexer::with_rules(Words);
        lexer.start(Arc::from("abc"), 2, 2, 7);
        assert_eq!(lexer.token_type(), None);
        assert_eq!(lexer.state(), 7);
    }
}
