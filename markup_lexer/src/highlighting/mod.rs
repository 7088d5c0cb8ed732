//! Composite highlighting lexer
//!
//! Drives a host markup scanner and, for embeddable spans, hands the span to a
//! secondary lexer chosen from the host's embedding context. While a secondary
//! lexer is active its tokens replace the host token they cover.
//!
//! The composite state packs the host state with the active secondary state
//! (see [`StateLayout`]), so any token start can be resumed from its state and
//! produces the same tokens as an uninterrupted pass.

pub mod remap;

pub use remap::remap_host_token;

use crate::config::runtime::LexerPreferences;
use crate::embedding::{
    select_secondary_lexer, EmbeddingCategory, LanguageProviders, LexerCache, ProviderRegistry,
};
use crate::html::HtmlScanner;
use crate::lexer::{HostScanner, Lexer, StateLayout};
use crate::lexical::error::LexerError;
use crate::logging::codes;
use crate::tokens::TokenKind;
use crate::{log_debug, log_error};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Reaction to a host token, run right after the host scanner reaches it
pub type TokenHandler<H> = fn(&mut HighlightingLexer<H>);

pub struct HighlightingLexer<H: HostScanner = HtmlScanner> {
    host: H,
    providers: Arc<dyn LanguageProviders>,
    cache: LexerCache,
    embedded: Option<EmbeddingCategory>,
    handlers: HashMap<TokenKind, TokenHandler<H>>,
    suppressed: bool,
    layout: StateLayout,
    buffer: Arc<str>,
    activations: usize,
}

impl HighlightingLexer<HtmlScanner> {
    /// HTML host with the built-in CSS, script and expression lexers
    pub fn html(preferences: &LexerPreferences) -> Self {
        Self::html_with_providers(preferences, Arc::new(ProviderRegistry::with_builtin_languages()))
    }

    pub fn html_with_providers(
        preferences: &LexerPreferences,
        providers: Arc<dyn LanguageProviders>,
    ) -> Self {
        let mut lexer = Self::new(HtmlScanner::with_preferences(preferences), providers);
        lexer.set_embedding_suppressed(!preferences.enable_embedding);
        lexer
    }
}

impl<H: HostScanner> HighlightingLexer<H> {
    /// Composite over `host` with the default handler table
    pub fn new(host: H, providers: Arc<dyn LanguageProviders>) -> Self {
        let layout = StateLayout::new(host.state_bits());
        let mut lexer = Self {
            host,
            providers,
            cache: LexerCache::new(),
            embedded: None,
            handlers: HashMap::new(),
            suppressed: false,
            layout,
            buffer: Arc::from(""),
            activations: 0,
        };
        lexer.register_handler(TokenKind::AttributeValue, Self::handle_markup_embedding);
        lexer.register_handler(TokenKind::DataCharacters, Self::handle_markup_embedding);
        lexer.register_handler(TokenKind::CommentCharacters, Self::handle_markup_embedding);
        lexer.register_handler(TokenKind::ExpressionContent, Self::handle_expression_embedding);
        lexer
    }

    /// Install `handler` for host tokens of `kind`, replacing any previous one
    pub fn register_handler(&mut self, kind: TokenKind, handler: TokenHandler<H>) {
        self.handlers.insert(kind, handler);
    }

    pub fn remove_handler(&mut self, kind: TokenKind) -> Option<TokenHandler<H>> {
        self.handlers.remove(&kind)
    }

    /// When suppressed, handlers never start a secondary lexer
    ///
    /// Resuming from a state that already has a secondary lexer active still
    /// restores it.
    pub fn set_embedding_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    pub fn is_embedding_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn layout(&self) -> StateLayout {
        self.layout
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Secondary lexers constructed over this lexer's lifetime
    pub fn construction_count(&self) -> usize {
        self.cache.construction_count()
    }

    /// Times a handler started a secondary lexer
    pub fn activations(&self) -> usize {
        self.activations
    }

    pub fn is_embedded_active(&self) -> bool {
        self.embedded.is_some()
    }

    pub fn active_category(&self) -> Option<EmbeddingCategory> {
        self.embedded
    }

    /// Language of the lexer producing the current token
    pub fn active_language(&self) -> &'static str {
        self.active_lexer()
            .map_or_else(|| self.host.language(), |lexer| lexer.language())
    }

    /// Checked [`Lexer::start`]
    pub fn try_start(
        &mut self,
        buffer: Arc<str>,
        start: usize,
        end: usize,
        state: u32,
    ) -> Result<(), LexerError> {
        if start > end || end > buffer.len() {
            return Err(LexerError::InvalidRange {
                start,
                end,
                len: buffer.len(),
            });
        }
        for offset in [start, end] {
            if !buffer.is_char_boundary(offset) {
                return Err(LexerError::NotCharBoundary { offset });
            }
        }
        self.start(buffer, start, end, state);
        Ok(())
    }

    /// Default handler for attribute values, element bodies and comment text
    pub fn handle_markup_embedding(&mut self) {
        if self.suppressed {
            return;
        }
        let context = self.host.context();
        if !(context.seen_style || context.seen_script) {
            return;
        }
        let eligible = match self.host.token_type() {
            Some(TokenKind::AttributeValue) => context.seen_attribute,
            Some(TokenKind::DataCharacters) | Some(TokenKind::CommentCharacters) => {
                context.seen_tag
            }
            _ => false,
        };
        if eligible {
            self.activate_embedded();
        }
    }

    /// Default handler for `${...}` bodies
    pub fn handle_expression_embedding(&mut self) {
        if !self.suppressed {
            self.activate_embedded();
        }
    }

    fn activate_embedded(&mut self) {
        let Some(host_kind) = self.host.token_type() else {
            return;
        };
        let context = self.host.context();
        let Some(category) =
            select_secondary_lexer(&context, &mut self.cache, self.providers.as_ref())
        else {
            return;
        };

        let start = self.host.token_start();
        let end = self.host.end_of_embedded_region();
        let Some(lexer) = self.cache.get_mut(category) else {
            return;
        };
        let initial = lexer.embedded_initial_state(host_kind);
        lexer.start(self.buffer.clone(), start, end, initial);

        if lexer.token_type().is_some() {
            log_debug!("Secondary lexer activated",
                "category" => category,
                "language" => lexer.language(),
                "start" => start,
                "end" => end
            );
            self.embedded = Some(category);
            self.activations += 1;
        }
    }

    /// Restore the secondary lexer recorded in a resumed state
    fn resume_embedded(&mut self, state: u32, secondary: u32) {
        let context = self.host.context();
        let Some(category) =
            select_secondary_lexer(&context, &mut self.cache, self.providers.as_ref())
        else {
            log_error!(
                codes::embedding::INCONSISTENT_RESUME_STATE,
                "Resumed state names an active secondary lexer that cannot be selected",
                "state" => format!("{state:#x}"),
                "offset" => self.host.token_start()
            );
            debug_assert!(
                false,
                "state {state:#x} has an active secondary lexer but none can be selected"
            );
            return;
        };

        let start = self.host.token_start();
        let end = self.host.end_of_embedded_region();
        if let Some(lexer) = self.cache.get_mut(category) {
            lexer.start(self.buffer.clone(), start, end, secondary);
            if lexer.token_type().is_some() {
                self.embedded = Some(category);
            }
        }
    }

    fn dispatch_handler(&mut self) {
        let handler = self
            .host
            .token_type()
            .and_then(|kind| self.handlers.get(&kind).copied());
        if let Some(handler) = handler {
            handler(self);
        }
    }

    fn active_lexer(&self) -> Option<&dyn Lexer> {
        self.embedded.and_then(|category| self.cache.get(category))
    }

    /// Move the host past the span the finished secondary lexer covered
    fn leave_embedded(&mut self, covered_end: usize) {
        self.embedded = None;
        self.host.advance();
        while self.host.token_type().is_some() && self.host.token_start() < covered_end {
            self.host.advance();
        }
    }
}

impl<H: HostScanner> Lexer for HighlightingLexer<H> {
    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, state: u32) {
        let decoded = self.layout.decode(state);
        self.buffer = buffer.clone();
        self.embedded = None;
        self.host.start(buffer, start, end, decoded.host);

        if self.host.token_type().is_none() {
            return;
        }
        match decoded.secondary {
            Some(secondary) => self.resume_embedded(state, secondary),
            None => self.dispatch_handler(),
        }
    }

    fn advance(&mut self) {
        if let Some(category) = self.embedded {
            let covered_end = match self.cache.get_mut(category) {
                Some(lexer) => {
                    lexer.advance();
                    if lexer.token_type().is_some() {
                        return;
                    }
                    lexer.token_end()
                }
                None => self.host.token_end(),
            };
            self.leave_embedded(covered_end);
        } else {
            self.host.advance();
        }
        self.dispatch_handler();
    }

    fn token_type(&self) -> Option<TokenKind> {
        match self.active_lexer() {
            Some(lexer) => lexer.token_type(),
            None => self
                .host
                .token_type()
                .map(|kind| remap_host_token(&self.host, kind)),
        }
    }

    fn token_start(&self) -> usize {
        self.active_lexer()
            .map_or_else(|| self.host.token_start(), |lexer| lexer.token_start())
    }

    fn token_end(&self) -> usize {
        self.active_lexer()
            .map_or_else(|| self.host.token_end(), |lexer| lexer.token_end())
    }

    fn state(&self) -> u32 {
        let secondary = self.active_lexer().map(|lexer| lexer.state());
        self.layout.encode(self.host.state(), secondary)
    }

    fn language(&self) -> &'static str {
        self.host.language()
    }
}

impl<H: HostScanner> fmt::Debug for HighlightingLexer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightingLexer")
            .field("host", &self.host.language())
            .field("embedded", &self.embedded)
            .field("suppressed", &self.suppressed)
            .field("cache", &self.cache)
            .field("activations", &self.activations)
            .finish()
    }
}
