//! Lexical driver over the composite highlighting lexer
//!
//! Collects token snapshots with their resume states, checks that the stream
//! stays flat, and re-lexes incrementally after edits by restarting from a
//! captured state and splicing in the unchanged tail.

use super::error::LexerError;
use crate::config::compile_time::lexical::{MAX_TOKEN_LENGTH_WARNING, RELEX_CONTEXT_TOKENS};
use crate::config::runtime::LexerPreferences;
use crate::document::Document;
use crate::embedding::{LanguageProviders, ProviderRegistry};
use crate::highlighting::HighlightingLexer;
use crate::lexer::{HostScanner, Lexer};
use crate::logging::codes;
use crate::tokens::{TokenKind, TokenSnapshot, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error, log_info, log_performance, log_warning};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub host_tokens: usize,
    pub embedded_tokens: usize,
    /// Secondary lexer activations during the last pass
    pub embedding_activations: usize,
    pub tokens_by_language: BTreeMap<&'static str, usize>,
    pub bad_characters: usize,
    pub longest_token: usize,
    /// Tokens longer than the compile-time warning length
    pub oversized_tokens: usize,
    /// Tokens carried over unchanged by the last re-lex
    pub reused_tokens: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &TokenSnapshot) {
        match token.kind {
            TokenKind::Foreign(_) => self.embedded_tokens += 1,
            TokenKind::BadCharacter => {
                self.bad_characters += 1;
                self.host_tokens += 1;
            }
            _ => self.host_tokens += 1,
        }
        *self.tokens_by_language.entry(token.kind.language()).or_insert(0) += 1;
        self.longest_token = self.longest_token.max(token.len());
        if token.len() > MAX_TOKEN_LENGTH_WARNING {
            self.oversized_tokens += 1;
        }
    }

    /// Share of tokens produced by secondary lexers
    pub fn embedded_ratio(&self) -> f64 {
        if self.total_tokens == 0 {
            0.0
        } else {
            self.embedded_tokens as f64 / self.total_tokens as f64
        }
    }
}

/// A change to the buffer a stream was lexed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub offset: usize,
    /// Bytes removed at `offset` from the old text
    pub removed: usize,
    /// Bytes inserted at `offset` in the new text
    pub inserted: usize,
}

impl TextEdit {
    pub fn new(offset: usize, removed: usize, inserted: usize) -> Self {
        Self {
            offset,
            removed,
            inserted,
        }
    }

    pub fn insert(offset: usize, inserted: usize) -> Self {
        Self::new(offset, 0, inserted)
    }

    pub fn delete(offset: usize, removed: usize) -> Self {
        Self::new(offset, removed, 0)
    }

    /// Map an old offset at or after the removed span into the new text
    fn shift(&self, old: usize) -> usize {
        old - self.removed + self.inserted
    }
}

/// A token that came out differently when lexing resumed at another token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeMismatch {
    /// Index of the token lexing resumed at
    pub resumed_at: usize,
    /// Index of the first differing token
    pub index: usize,
    pub expected: Option<TokenSnapshot>,
    pub found: Option<TokenSnapshot>,
}

pub struct LexicalAnalyzer {
    preferences: LexerPreferences,
    providers: Arc<dyn LanguageProviders>,
    metrics: LexicalMetrics,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexerPreferences::default())
    }

    pub fn with_preferences(preferences: LexerPreferences) -> Self {
        Self::with_providers(preferences, Arc::new(ProviderRegistry::with_builtin_languages()))
    }

    pub fn with_providers(
        preferences: LexerPreferences,
        providers: Arc<dyn LanguageProviders>,
    ) -> Self {
        Self {
            preferences,
            providers,
            metrics: LexicalMetrics::default(),
        }
    }

    pub fn preferences(&self) -> &LexerPreferences {
        &self.preferences
    }

    /// Metrics of the last pass
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Fresh composite lexer configured like this analyzer
    pub fn create_lexer(&self) -> HighlightingLexer {
        HighlightingLexer::html_with_providers(&self.preferences, self.providers.clone())
    }

    pub fn tokenize(&mut self, document: &Document) -> Result<TokenStream, LexerError> {
        let name = document.metadata.display_name();
        log_debug!("Starting lexical analysis",
            "document" => name.as_str(),
            "size_bytes" => document.len(),
            "token_limit" => self.preferences.effective_token_limit()
        );
        self.tokenize_range(document.text.clone(), 0, document.len(), 0)
    }

    pub fn tokenize_text(&mut self, text: &str) -> Result<TokenStream, LexerError> {
        self.tokenize_range(Arc::from(text), 0, text.len(), 0)
    }

    /// Lex `buffer[start..end]` beginning in `state`
    pub fn tokenize_range(
        &mut self,
        buffer: Arc<str>,
        start: usize,
        end: usize,
        state: u32,
    ) -> Result<TokenStream, LexerError> {
        let start_time = Instant::now();
        self.metrics = LexicalMetrics::default();

        let mut lexer = self.create_lexer();
        self.start_lexer(&mut lexer, buffer, start, end, state)?;
        let tokens = self.drive(&mut lexer, start, end, 0, |_| false)?;

        self.metrics.embedding_activations = lexer.activations();
        let stream = TokenStream::with_start_state(tokens, Span::new(start, end), state);
        self.finish_metrics(&stream);

        log_performance!(codes::success::TOKENIZATION_COMPLETE, "Tokenization complete",
            duration = start_time.elapsed(),
            "tokens" => stream.len(),
            "embedded_tokens" => self.metrics.embedded_tokens,
            "activations" => self.metrics.embedding_activations
        );
        Ok(stream)
    }

    /// Re-lex after `edit` turned the text of `previous` into `buffer`
    ///
    /// Lexing restarts a few tokens before the edit from the captured state and
    /// stops as soon as a token lines up with an old token at the same shifted
    /// position and state; the old tail is then reused.
    pub fn relex(
        &mut self,
        previous: &TokenStream,
        buffer: Arc<str>,
        edit: &TextEdit,
    ) -> Result<TokenStream, LexerError> {
        let start_time = Instant::now();
        let range = previous.range();

        if edit.offset < range.start || edit.offset + edit.removed > range.end {
            let error = LexerError::InvalidEdit {
                offset: edit.offset,
                removed: edit.removed,
                end: range.end,
            };
            log_error!(error.error_code(), "Edit does not fit the previous token stream",
                "offset" => edit.offset,
                "removed" => edit.removed,
                "range" => range
            );
            return Err(error);
        }
        let new_end = edit.shift(range.end);

        let mut lexer = self.create_lexer();
        let Some(restart_index) = restart_index(&lexer, previous, edit.offset) else {
            return self.tokenize_range(buffer, range.start, new_end, previous.start_state());
        };
        let old = previous.tokens();
        let restart = old[restart_index];

        self.metrics = LexicalMetrics::default();
        self.start_lexer(&mut lexer, buffer, restart.start, new_end, restart.state)?;

        // old tokens at or after the removed span, searched by shifted start
        let tail_from = old.partition_point(|token| token.start < edit.offset + edit.removed);
        let edit_end = edit.offset + edit.inserted;
        let mut converged_at = None;

        let fresh = self.drive(&mut lexer, restart.start, new_end, restart_index, |token| {
            if token.start < edit_end {
                return false;
            }
            let old_start = token.start - edit.inserted + edit.removed;
            let candidate = tail_from
                + old[tail_from..].partition_point(|old_token| old_token.start < old_start);
            let matches = old
                .get(candidate)
                .is_some_and(|old_token| old_token.start == old_start && old_token.state == token.state);
            if matches {
                converged_at = Some(candidate);
            }
            matches
        })?;

        let mut tokens = Vec::with_capacity(old.len() + fresh.len());
        tokens.extend_from_slice(&old[..restart_index]);
        tokens.extend(fresh.iter().copied());
        if let Some(index) = converged_at {
            tokens.extend(old[index..].iter().map(|token| TokenSnapshot {
                start: edit.shift(token.start),
                end: edit.shift(token.end),
                ..*token
            }));
        }
        self.check_limit(tokens.len())?;

        let stream =
            TokenStream::with_start_state(tokens, Span::new(range.start, new_end), previous.start_state());
        self.metrics.embedding_activations = lexer.activations();
        self.finish_metrics(&stream);
        self.metrics.reused_tokens = stream.len() - fresh.len();

        log_performance!(codes::success::RELEX_COMPLETE, "Incremental re-lex complete",
            duration = start_time.elapsed(),
            "restart_offset" => restart.start,
            "relexed_tokens" => fresh.len(),
            "reused_tokens" => self.metrics.reused_tokens
        );
        Ok(stream)
    }

    /// Restart at every token of `stream` from its captured state and compare
    /// up to `window` tokens (all remaining when `None`) with the stream
    pub fn verify_resume(
        &mut self,
        buffer: Arc<str>,
        stream: &TokenStream,
        window: Option<usize>,
    ) -> Result<Vec<ResumeMismatch>, LexerError> {
        let start_time = Instant::now();
        let expected = stream.tokens();
        let end = stream.range().end;
        let mut mismatches = Vec::new();
        let mut lexer = self.create_lexer();

        for (resumed_at, token) in expected.iter().enumerate() {
            lexer.try_start(buffer.clone(), token.start, end, token.state)?;
            let limit = window.map_or(expected.len(), |window| (resumed_at + window).min(expected.len()));

            for index in resumed_at..limit {
                let found = snapshot(&lexer);
                if found.as_ref() != Some(&expected[index]) {
                    mismatches.push(ResumeMismatch {
                        resumed_at,
                        index,
                        expected: Some(expected[index]),
                        found,
                    });
                    break;
                }
                lexer.advance();
            }
            if window.is_none() {
                if let Some(extra) = snapshot(&lexer) {
                    if mismatches.last().map(|m| m.resumed_at) != Some(resumed_at) {
                        mismatches.push(ResumeMismatch {
                            resumed_at,
                            index: expected.len(),
                            expected: None,
                            found: Some(extra),
                        });
                    }
                }
            }
        }

        if mismatches.is_empty() {
            log_performance!(codes::success::RESUME_VERIFIED, "Resume states verified",
                duration = start_time.elapsed(),
                "tokens" => expected.len()
            );
        } else {
            log_warning!("Resuming from captured states produced different tokens",
                "mismatches" => mismatches.len(),
                "first_offset" => mismatches[0].expected.or(mismatches[0].found).map_or(0, |t| t.start)
            );
        }
        Ok(mismatches)
    }

    fn start_lexer(
        &self,
        lexer: &mut HighlightingLexer,
        buffer: Arc<str>,
        start: usize,
        end: usize,
        state: u32,
    ) -> Result<(), LexerError> {
        lexer.try_start(buffer, start, end, state).map_err(|error| {
            log_error!(error.error_code(), "Cannot start lexing",
                "start" => start,
                "end" => end,
                "error" => &error
            );
            error
        })
    }

    /// Collect validated snapshots until the range is exhausted or `stop`
    /// accepts a token, which is not collected
    ///
    /// `already` counts tokens kept from elsewhere toward the token limit.
    fn drive(
        &mut self,
        lexer: &mut HighlightingLexer,
        start: usize,
        end: usize,
        already: usize,
        mut stop: impl FnMut(&TokenSnapshot) -> bool,
    ) -> Result<Vec<TokenSnapshot>, LexerError> {
        let mut tokens = Vec::new();
        let mut cursor = start;

        while let Some(token) = snapshot(&*lexer) {
            if token.start != cursor || token.end <= token.start || token.end > end {
                let error = LexerError::MalformedToken {
                    expected: cursor,
                    found: token.span(),
                };
                log_error!(error.error_code(), "Token breaks stream contiguity",
                    span = token.span(),
                    "kind" => token.kind,
                    "expected_start" => cursor
                );
                return Err(error);
            }
            if stop(&token) {
                return Ok(tokens);
            }
            self.check_limit(already + tokens.len() + 1)?;

            cursor = token.end;
            tokens.push(token);
            lexer.advance();
        }

        if cursor != end {
            let error = LexerError::IncompleteCoverage {
                covered: cursor,
                end,
            };
            log_error!(error.error_code(), "Tokens stop short of the range end",
                "covered" => cursor,
                "end" => end
            );
            return Err(error);
        }
        Ok(tokens)
    }

    fn check_limit(&self, count: usize) -> Result<(), LexerError> {
        let limit = self.preferences.effective_token_limit();
        if count > limit {
            let error = LexerError::TooManyTokens { count, limit };
            log_error!(error.error_code(), "Token limit exceeded",
                "token_count" => count,
                "limit" => limit
            );
            return Err(error);
        }
        Ok(())
    }

    fn finish_metrics(&mut self, stream: &TokenStream) {
        self.metrics.total_tokens = stream.len();
        if !self.preferences.collect_metrics {
            return;
        }
        for token in stream {
            self.metrics.record_token(token);
        }
        if self.metrics.oversized_tokens > 0 {
            log_warning!(code = codes::lexical::OVERSIZED_TOKEN,
                "Unusually long tokens",
                "count" => self.metrics.oversized_tokens,
                "longest" => self.metrics.longest_token,
                "threshold" => MAX_TOKEN_LENGTH_WARNING
            );
        }
        if crate::logging::config::log_lexer_metrics() {
            log_info!("Lexical metrics",
                "host_tokens" => self.metrics.host_tokens,
                "embedded_tokens" => self.metrics.embedded_tokens,
                "embedded_ratio" => format!("{:.2}", self.metrics.embedded_ratio()),
                "longest_token" => self.metrics.longest_token
            );
        }
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes past its own end a scanner may inspect before deciding a token
const LOOKAHEAD_BYTES: usize = 3;

/// Bytes of the longest raw-text closing tag before the byte that decides it
const CLOSING_TAG_BYTES: usize = "</script".len();

/// Index of the old token to resume at after an edit at `offset`
///
/// No token before it may depend on a byte at or after `offset`. Besides the
/// configured context this covers scanner lookahead and raw-text bodies: the
/// byte after `</style` or `</script` decides where the body ends, so an edit
/// near that closing tag resumes at the start of the body.
fn restart_index(lexer: &HighlightingLexer, previous: &TokenStream, offset: usize) -> Option<usize> {
    let tokens = previous.tokens();
    let edited = previous.token_index_at(offset)?;
    let in_raw_text = |token: &TokenSnapshot| {
        lexer
            .host()
            .is_raw_text_state(lexer.layout().decode(token.state).host)
    };
    let lookbehind = |bytes: usize| previous.token_index_at(offset.saturating_sub(bytes)).unwrap_or(0);

    let mut restart = edited
        .saturating_sub(RELEX_CONTEXT_TOKENS)
        .min(lookbehind(LOOKAHEAD_BYTES));
    if in_raw_text(&tokens[edited]) {
        restart = restart.min(lookbehind(CLOSING_TAG_BYTES));
    }
    // `</`, its name, then the deciding byte
    let closing = (restart.min(edited.saturating_sub(2))..=edited)
        .find(|&index| tokens[index].kind == TokenKind::EndTagStart && in_raw_text(&tokens[index]));
    if let Some(mut body_start) = closing {
        while body_start > 0 && in_raw_text(&tokens[body_start - 1]) {
            body_start -= 1;
        }
        restart = restart.min(body_start);
    }
    Some(restart)
}

fn snapshot<L: Lexer + ?Sized>(lexer: &L) -> Option<TokenSnapshot> {
    lexer.token_type().map(|kind| TokenSnapshot {
        kind,
        start: lexer.token_start(),
        end: lexer.token_end(),
        state: lexer.state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::css;
    use assert_matches::assert_matches;

    const PAGE: &str = concat!(
        "<html><head><style>p { color: red }\nh1{margin:0}</style></head>\n",
        "<body class=main onload=\"start()\">\n<p>Hello ${name}</p>\n",
        "<!-- note &amp; -->\n<script>let n = 1;\n</script></body></html>"
    );

    fn analyzer() -> LexicalAnalyzer {
        LexicalAnalyzer::with_preferences(LexerPreferences {
            token_limit: None,
            collect_metrics: true,
            ..LexerPreferences::default()
        })
    }

    fn apply(text: &str, edit: &TextEdit, replacement: &str) -> String {
        let mut out = text[..edit.offset].to_string();
        out.push_str(replacement);
        out.push_str(&text[edit.offset + edit.removed..]);
        out
    }

    fn assert_relex_matches_full(text: &str, offset: usize, removed: usize, replacement: &str) {
        let mut analyzer = analyzer();
        let previous = analyzer.tokenize_text(text).expect("initial lex");
        let edit = TextEdit::new(offset, removed, replacement.len());
        let edited = apply(text, &edit, replacement);

        let relexed = analyzer
            .relex(&previous, Arc::from(edited.as_str()), &edit)
            .expect("relex");
        let full = analyzer.tokenize_text(&edited).expect("full lex");
        assert_eq!(relexed, full, "edit at {offset} replacing {removed} with {replacement:?}");
    }

    #[test]
    fn test_tokenize_document() {
        let mut analyzer = analyzer();
        let stream = analyzer
            .tokenize(&Document::from_text(PAGE))
            .expect("tokenize");
        assert!(stream.is_flat());

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, stream.len());
        assert_eq!(metrics.host_tokens + metrics.embedded_tokens, stream.len());
        assert!(metrics.tokens_by_language.contains_key("css"));
        assert!(metrics.tokens_by_language.contains_key("js"));
        assert!(metrics.tokens_by_language.contains_key("el"));
        assert_eq!(metrics.embedding_activations, 4);
    }

    #[test]
    fn test_tokenize_range_from_captured_state() {
        let mut analyzer = analyzer();
        let full = analyzer.tokenize_text(PAGE).expect("tokenize");
        let property = full
            .iter()
            .position(|token| token.kind == css::PROPERTY)
            .expect("a css property");
        let token = full.tokens()[property];

        let tail = analyzer
            .tokenize_range(Arc::from(PAGE), token.start, PAGE.len(), token.state)
            .expect("resume");
        assert_eq!(tail.tokens(), &full.tokens()[property..]);
    }

    #[test]
    fn test_invalid_ranges_are_rejected() {
        let mut analyzer = analyzer();
        assert_matches!(
            analyzer.tokenize_range(Arc::from("abc"), 2, 9, 0),
            Err(LexerError::InvalidRange { len: 3, .. })
        );
        assert_matches!(
            analyzer.tokenize_range(Arc::from("é"), 1, 2, 0),
            Err(LexerError::NotCharBoundary { offset: 1 })
        );
    }

    #[test]
    fn test_token_limit() {
        let mut analyzer = LexicalAnalyzer::with_preferences(LexerPreferences {
            token_limit: Some(3),
            ..LexerPreferences::default()
        });
        assert_matches!(
            analyzer.tokenize_text("<a><b><c>"),
            Err(LexerError::TooManyTokens { count: 4, limit: 3 })
        );
        assert!(analyzer.tokenize_text("<a>").is_ok());
    }

    #[test]
    fn test_empty_input() {
        let mut analyzer = analyzer();
        let stream = analyzer.tokenize_text("").expect("tokenize");
        assert!(stream.is_empty());
        assert!(stream.is_flat());
    }

    #[test]
    fn test_relex_matches_full_lex() {
        // inside a css declaration
        let at = PAGE.find("red").unwrap_or_default();
        assert_relex_matches_full(PAGE, at, 3, "blue");
        // closing the style element early
        assert_relex_matches_full(PAGE, at, 0, "</style>");
        // turning a property into a selector
        let colon = PAGE.find(": red").unwrap_or_default();
        assert_relex_matches_full(PAGE, colon, 1, "");
        // inside an expression
        let name = PAGE.find("name}").unwrap_or_default();
        assert_relex_matches_full(PAGE, name, 4, "user.first");
        // opening a comment that swallows the rest
        assert_relex_matches_full(PAGE, 0, 0, "<!--");
        // at the very end
        assert_relex_matches_full(PAGE, PAGE.len(), 0, "<p>tail");
        // inside an event handler
        let call = PAGE.find("start()").unwrap_or_default();
        assert_relex_matches_full(PAGE, call + 5, 1, "1, 2)");
    }

    #[test]
    fn test_relex_reuses_unchanged_tail() {
        let mut analyzer = analyzer();
        let previous = analyzer.tokenize_text(PAGE).expect("tokenize");
        let at = PAGE.find("Hello").unwrap_or_default();
        let edit = TextEdit::new(at, 5, 3);
        let edited = apply(PAGE, &edit, "Bye");

        analyzer
            .relex(&previous, Arc::from(edited.as_str()), &edit)
            .expect("relex");
        assert!(analyzer.metrics().reused_tokens > previous.len() / 2);
    }

    #[test]
    fn test_relex_rejects_edits_outside_the_stream() {
        let mut analyzer = analyzer();
        let previous = analyzer.tokenize_text("<p>").expect("tokenize");
        assert_matches!(
            analyzer.relex(&previous, Arc::from("<p>"), &TextEdit::delete(2, 5)),
            Err(LexerError::InvalidEdit { end: 3, .. })
        );
    }

    #[test]
    fn test_relex_at_raw_text_closing_tag() {
        // the string may now run past the old closing tag
        assert_relex_matches_full("<style>'a b c d e</style>", 24, 1, "x");
        assert_relex_matches_full("<style>'a b c d e</stylex", 24, 1, ">");
        let script = "<script>/* open</script>";
        assert_relex_matches_full(script, 23, 0, "'");
        assert_relex_matches_full(script, 17, 6, "");
        assert_relex_matches_full(script, 15, 0, "x");
        // a number looks three bytes past its end for an exponent
        assert_relex_matches_full("<script>3e-x</script>", 11, 1, "2");
        assert_relex_matches_full("<script>3e-2</script>", 11, 1, "x");
    }

    const UNTERMINATED: &str = concat!(
        "<style>'a b c d e</style>\n",
        "<script>x = 3e-1; /* open</script >\n",
        "<script type=\"text/unknown\">raw</script>",
        "<p style=\"color:'red\" onclick=go(1)><!-- x &amp; -->${ a + 'b }"
    );

    #[test]
    fn test_relex_matches_full_lex_at_every_offset() {
        let len = UNTERMINATED.len();
        for offset in 0..=len {
            for inserted in ["x", ">", "'", "/"] {
                assert_relex_matches_full(UNTERMINATED, offset, 0, inserted);
            }
            if offset < len {
                assert_relex_matches_full(UNTERMINATED, offset, 1, "");
                assert_relex_matches_full(UNTERMINATED, offset, 1, "x");
            }
        }
    }

    #[test]
    fn test_relex_of_empty_stream_keeps_start_state() {
        let mut analyzer = analyzer();
        let comment = analyzer.tokenize_text("<!-- a -->").unwrap();
        let state = comment.get(1).map(|token| token.state).unwrap();

        let empty = analyzer.tokenize_range(Arc::from(""), 0, 0, state).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.start_state(), state);

        let relexed = analyzer
            .relex(&empty, Arc::from(" b"), &TextEdit::insert(0, 2))
            .unwrap();
        let expected = analyzer.tokenize_range(Arc::from(" b"), 0, 2, state).unwrap();
        assert_eq!(relexed, expected);
        assert_eq!(relexed.start_state(), state);
        assert_eq!(relexed.get(0).map(|token| token.kind), Some(TokenKind::CommentCharacters));
    }

    #[test]
    fn test_verify_resume_finds_no_mismatches() {
        let mut analyzer = analyzer();
        let buffer: Arc<str> = Arc::from(PAGE);
        let stream = analyzer.tokenize_text(PAGE).expect("tokenize");
        assert!(analyzer
            .verify_resume(buffer.clone(), &stream, Some(4))
            .expect("verify")
            .is_empty());
        assert!(analyzer
            .verify_resume(buffer, &stream, None)
            .expect("verify")
            .is_empty());
    }

    #[test]
    fn test_verify_resume_reports_corrupted_state() {
        let mut analyzer = analyzer();
        let text = "<p>a</p>";
        let stream = analyzer.tokenize_text(text).expect("tokenize");
        let mut tokens = stream.clone().into_tokens();
        // claim the closing tag started inside a comment
        tokens[4].state = 11;
        let corrupted = TokenStream::new(tokens, stream.range());

        let mismatches = analyzer
            .verify_resume(Arc::from(text), &corrupted, Some(2))
            .expect("verify");
        assert!(mismatches.iter().all(|m| m.index == 4));
        assert!(mismatches.iter().any(|m| m.resumed_at == 4));
    }
}
