//! Token and metric printing

use markup_lexer::lexical::ResumeMismatch;
use markup_lexer::{LexicalMetrics, TokenKind, TokenSnapshot};
use regex::Regex;
use serde_json::json;

/// `language:Name`, the form `--kind` patterns match against
pub fn kind_label(kind: TokenKind) -> String {
    format!("{}:{}", kind.language(), kind.name())
}

pub fn matches_filter(filter: Option<&Regex>, kind: TokenKind) -> bool {
    filter.map_or(true, |pattern| pattern.is_match(&kind_label(kind)))
}

pub fn format_token(token: &TokenSnapshot, source: &str) -> String {
    format!(
        "{:>6}..{:<6} {:#010x} {:<28} {:?}",
        token.start,
        token.end,
        token.state,
        kind_label(token.kind),
        token.text(source).unwrap_or("")
    )
}

pub fn token_json(file: &str, token: &TokenSnapshot, source: &str) -> serde_json::Value {
    json!({
        "file": file,
        "kind": token.kind.name(),
        "language": token.kind.language(),
        "start": token.start,
        "end": token.end,
        "state": token.state,
        "text": token.text(source),
    })
}

pub fn format_metrics(file: &str, metrics: &LexicalMetrics) -> String {
    let mut report = format!(
        "{}: {} tokens ({} markup, {} embedded, {} activations)",
        file,
        metrics.total_tokens,
        metrics.host_tokens,
        metrics.embedded_tokens,
        metrics.embedding_activations
    );
    for (language, count) in &metrics.tokens_by_language {
        report.push_str(&format!("\n    {:<8} {}", language, count));
    }
    if metrics.bad_characters > 0 {
        report.push_str(&format!("\n    bad characters: {}", metrics.bad_characters));
    }
    report.push_str(&format!("\n    longest token: {} bytes", metrics.longest_token));
    report
}

pub fn metrics_json(file: &str, metrics: &LexicalMetrics) -> serde_json::Value {
    json!({ "file": file, "metrics": metrics })
}

pub fn format_mismatch(mismatch: &ResumeMismatch) -> String {
    let describe = |token: Option<TokenSnapshot>| match token {
        Some(token) => format!(
            "{} {}..{} state {:#x}",
            kind_label(token.kind),
            token.start,
            token.end,
            token.state
        ),
        None => "end of input".to_string(),
    };
    format!(
        "resumed at token {}: token {} expected {}, found {}",
        mismatch.resumed_at,
        mismatch.index,
        describe(mismatch.expected),
        describe(mismatch.found)
    )
}
