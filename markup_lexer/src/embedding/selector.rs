//! Embedding selection and the per-category lexer cache

use super::context::{EmbeddingContext, ScriptType};
use super::registry::LanguageProviders;
use crate::lexer::Lexer;
use crate::logging::codes;
use crate::log_debug;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EmbeddingCategory {
    Style,
    Script,
    Expression,
}

impl EmbeddingCategory {
    pub const ALL: [EmbeddingCategory; 3] = [
        EmbeddingCategory::Style,
        EmbeddingCategory::Script,
        EmbeddingCategory::Expression,
    ];

    fn slot(self) -> usize {
        match self {
            EmbeddingCategory::Style => 0,
            EmbeddingCategory::Script => 1,
            EmbeddingCategory::Expression => 2,
        }
    }
}

impl fmt::Display for EmbeddingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingCategory::Style => write!(f, "style"),
            EmbeddingCategory::Script => write!(f, "script"),
            EmbeddingCategory::Expression => write!(f, "expression"),
        }
    }
}

/// Where a secondary lexer comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LexerSource {
    Style,
    /// Script element body with its content type label
    ScriptElement(&'static str),
    /// Event-handler attribute value
    InlineScript,
    Expression,
}

impl LexerSource {
    pub fn category(&self) -> EmbeddingCategory {
        match self {
            LexerSource::Style => EmbeddingCategory::Style,
            LexerSource::ScriptElement(_) | LexerSource::InlineScript => EmbeddingCategory::Script,
            LexerSource::Expression => EmbeddingCategory::Expression,
        }
    }

    /// Source implied by `context`: style before script before expression
    pub fn for_context(context: &EmbeddingContext) -> Option<Self> {
        if context.seen_style {
            Some(LexerSource::Style)
        } else if context.seen_script {
            if context.seen_tag {
                match context.script_type {
                    ScriptType::Unrecognized => None,
                    script_type => script_type.provider_label().map(LexerSource::ScriptElement),
                }
            } else if context.seen_attribute {
                Some(LexerSource::InlineScript)
            } else {
                None
            }
        } else {
            Some(LexerSource::Expression)
        }
    }

    fn resolve(&self, providers: &dyn LanguageProviders) -> Option<Box<dyn Lexer>> {
        let factory = match self {
            LexerSource::Style => providers.resolve_style_lexer(),
            LexerSource::ScriptElement(label) => providers.resolve_script_lexer(label),
            LexerSource::InlineScript => providers.resolve_inline_script_lexer(),
            LexerSource::Expression => providers.resolve_inline_expression_lexer(),
        }?;
        Some(factory())
    }
}

impl fmt::Display for LexerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerSource::Style => write!(f, "style"),
            LexerSource::ScriptElement(label) => write!(f, "script[{}]", label),
            LexerSource::InlineScript => write!(f, "inline-script"),
            LexerSource::Expression => write!(f, "expression"),
        }
    }
}

struct CachedLexer {
    source: LexerSource,
    lexer: Box<dyn Lexer>,
}

/// One secondary lexer per category, built on first use
///
/// The script slot remembers which source built it and is rebuilt only when a
/// different script source is selected. Failed resolutions are not cached.
#[derive(Default)]
pub struct LexerCache {
    slots: [Option<CachedLexer>; 3],
    constructions: usize,
}

impl LexerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached lexer for `source`, constructing it if needed
    pub fn get_or_create(
        &mut self,
        source: LexerSource,
        providers: &dyn LanguageProviders,
    ) -> Option<EmbeddingCategory> {
        let category = source.category();
        let slot = &mut self.slots[category.slot()];

        if slot.as_ref().is_some_and(|cached| cached.source == source) {
            return Some(category);
        }

        match source.resolve(providers) {
            Some(lexer) => {
                log_debug!("Constructed secondary lexer",
                    "source" => source,
                    "language" => lexer.language()
                );
                *slot = Some(CachedLexer { source, lexer });
                self.constructions += 1;
                Some(category)
            }
            None => {
                log_debug!(code = codes::embedding::PROVIDER_NOT_FOUND,
                    "No secondary lexer available",
                    "source" => source
                );
                None
            }
        }
    }

    pub fn get(&self, category: EmbeddingCategory) -> Option<&dyn Lexer> {
        self.slots[category.slot()]
            .as_ref()
            .map(|cached| cached.lexer.as_ref())
    }

    pub fn get_mut(&mut self, category: EmbeddingCategory) -> Option<&mut (dyn Lexer + 'static)> {
        self.slots[category.slot()]
            .as_mut()
            .map(|cached| cached.lexer.as_mut())
    }

    pub fn cached_source(&self, category: EmbeddingCategory) -> Option<LexerSource> {
        self.slots[category.slot()]
            .as_ref()
            .map(|cached| cached.source)
    }

    /// Number of secondary lexers constructed so far
    pub fn construction_count(&self) -> usize {
        self.constructions
    }
}

impl fmt::Debug for LexerCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<Option<LexerSource>> = EmbeddingCategory::ALL
            .iter()
            .map(|category| self.cached_source(*category))
            .collect();
        f.debug_struct("LexerCache")
            .field("sources", &sources)
            .field("constructions", &self.constructions)
            .finish()
    }
}

/// Pick and, if necessary, construct the secondary lexer for `context`
///
/// Returns the category whose cache slot now holds it, or `None` when nothing
/// applies or no provider can supply a lexer.
pub fn select_secondary_lexer(
    context: &EmbeddingContext,
    cache: &mut LexerCache,
    providers: &dyn LanguageProviders,
) -> Option<EmbeddingCategory> {
    let source = LexerSource::for_context(context)?;
    cache.get_or_create(source, providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::ProviderRegistry;
    use crate::languages::ScriptLexer;

    fn style_body() -> EmbeddingContext {
        EmbeddingContext {
            seen_tag: true,
            seen_style: true,
            ..EmbeddingContext::default()
        }
    }

    fn script_body(script_type: ScriptType) -> EmbeddingContext {
        EmbeddingContext {
            seen_tag: true,
            seen_script: true,
            script_type,
            ..EmbeddingContext::default()
        }
    }

    #[test]
    fn test_priority_order() {
        let both = EmbeddingContext {
            seen_style: true,
            seen_script: true,
            seen_attribute: true,
            ..EmbeddingContext::default()
        };
        assert_eq!(LexerSource::for_context(&both), Some(LexerSource::Style));

        let inline = EmbeddingContext {
            seen_script: true,
            seen_attribute: true,
            ..EmbeddingContext::default()
        };
        assert_eq!(
            LexerSource::for_context(&inline),
            Some(LexerSource::InlineScript)
        );

        assert_eq!(
            LexerSource::for_context(&EmbeddingContext::default()),
            Some(LexerSource::Expression)
        );
        assert_eq!(
            LexerSource::for_context(&script_body(ScriptType::Unrecognized)),
            None
        );
        assert_eq!(
            LexerSource::for_context(&script_body(ScriptType::Default)),
            Some(LexerSource::ScriptElement("text/javascript"))
        );
    }

    #[test]
    fn test_cache_reuses_instances() {
        let providers = ProviderRegistry::with_builtin_languages();
        let mut cache = LexerCache::new();

        for _ in 0..3 {
            assert_eq!(
                select_secondary_lexer(&style_body(), &mut cache, &providers),
                Some(EmbeddingCategory::Style)
            );
        }
        assert_eq!(cache.construction_count(), 1);
        assert_eq!(
            cache.get(EmbeddingCategory::Style).map(|l| l.language()),
            Some("css")
        );
    }

    #[test]
    fn test_script_slot_follows_source() {
        let providers = ProviderRegistry::with_builtin_languages();
        let mut cache = LexerCache::new();

        let default = script_body(ScriptType::Default);
        let module = script_body(ScriptType::Known("module"));

        select_secondary_lexer(&default, &mut cache, &providers);
        select_secondary_lexer(&default, &mut cache, &providers);
        assert_eq!(cache.construction_count(), 1);

        select_secondary_lexer(&module, &mut cache, &providers);
        assert_eq!(cache.construction_count(), 2);
        assert_eq!(
            cache.cached_source(EmbeddingCategory::Script),
            Some(LexerSource::ScriptElement("module"))
        );
    }

    #[test]
    fn test_missing_provider_is_not_cached() {
        let providers =
            ProviderRegistry::new().register_inline_script(|| Box::new(ScriptLexer::new()));
        let mut cache = LexerCache::new();

        assert_eq!(
            select_secondary_lexer(&style_body(), &mut cache, &providers),
            None
        );
        assert_eq!(
            select_secondary_lexer(&script_body(ScriptType::Default), &mut cache, &providers),
            None
        );
        assert_eq!(cache.construction_count(), 0);
        assert!(cache.get(EmbeddingCategory::Style).is_none());
    }
}
