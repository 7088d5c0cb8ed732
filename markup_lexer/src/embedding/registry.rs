//! Secondary lexer providers
//!
//! Providers hand out factories rather than lexers; the composite engine
//! decides when to construct and caches what it built.

use crate::languages::{CssLexer, ExpressionLexer, ScriptLexer};
use crate::lexer::Lexer;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a fresh secondary lexer
pub type LexerFactory = Arc<dyn Fn() -> Box<dyn Lexer> + Send + Sync>;

/// Resolution of secondary lexers by embedding category
///
/// Every method may return `None`; the span is then left to the host scanner.
pub trait LanguageProviders: Send + Sync {
    fn resolve_style_lexer(&self) -> Option<LexerFactory>;

    /// Lexer for a script element body of the given content type label
    fn resolve_script_lexer(&self, label: &str) -> Option<LexerFactory>;

    /// Lexer for event-handler attribute values
    fn resolve_inline_script_lexer(&self) -> Option<LexerFactory>;

    fn resolve_inline_expression_lexer(&self) -> Option<LexerFactory>;
}

/// Labels the built-in script lexer is registered under
pub const BUILTIN_SCRIPT_LABELS: [&str; 5] = [
    "text/javascript",
    "application/javascript",
    "module",
    "application/json",
    "text/typescript",
];

/// Label-keyed provider table
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    style: Option<LexerFactory>,
    script_content: HashMap<String, LexerFactory>,
    inline_script: Option<LexerFactory>,
    expression: Option<LexerFactory>,
}

impl ProviderRegistry {
    /// Registry with nothing registered; every resolution fails
    pub fn new() -> Self {
        Self::default()
    }

    /// CSS for style regions, the script lexer for JavaScript-family labels and
    /// event handlers, and the expression lexer for `${}` bodies
    pub fn with_builtin_languages() -> Self {
        let mut registry = Self::new()
            .register_style(|| Box::new(CssLexer::new()))
            .register_inline_script(|| Box::new(ScriptLexer::new()))
            .register_expression(|| Box::new(ExpressionLexer::new()));
        for label in BUILTIN_SCRIPT_LABELS {
            registry = registry.register_script_content(label, || Box::new(ScriptLexer::new()));
        }
        registry
    }

    pub fn register_style<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Lexer> + Send + Sync + 'static,
    {
        self.style = Some(Arc::new(factory));
        self
    }

    /// Register a script body lexer; labels are matched without regard to ASCII case
    pub fn register_script_content<F>(mut self, label: &str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Lexer> + Send + Sync + 'static,
    {
        self.script_content
            .insert(normalize_label(label), Arc::new(factory));
        self
    }

    pub fn register_inline_script<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Lexer> + Send + Sync + 'static,
    {
        self.inline_script = Some(Arc::new(factory));
        self
    }

    pub fn register_expression<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Lexer> + Send + Sync + 'static,
    {
        self.expression = Some(Arc::new(factory));
        self
    }

    pub fn script_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.script_content.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_lowercase()
}

impl LanguageProviders for ProviderRegistry {
    fn resolve_style_lexer(&self) -> Option<LexerFactory> {
        self.style.clone()
    }

    fn resolve_script_lexer(&self, label: &str) -> Option<LexerFactory> {
        self.script_content.get(&normalize_label(label)).cloned()
    }

    fn resolve_inline_script_lexer(&self) -> Option<LexerFactory> {
        self.inline_script.clone()
    }

    fn resolve_inline_expression_lexer(&self) -> Option<LexerFactory> {
        self.expression.clone()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("style", &self.style.is_some())
            .field("script_content", &self.script_labels())
            .field("inline_script", &self.inline_script.is_some())
            .field("expression", &self.expression.is_some())
            .finish()
    }
}
