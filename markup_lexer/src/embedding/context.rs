//! Embedding context flags
//!
//! The host scanner derives these from its state; the composite engine and
//! the selector only read them.

use serde::Serialize;
use std::fmt;

/// `type` / `language` labels a script element can carry in three bits
///
/// Index 0 is the default (no attribute) and index 7 is reserved for labels
/// outside this table.
const KNOWN_SCRIPT_TYPES: [&str; 6] = [
    "text/javascript",
    "application/javascript",
    "module",
    "application/json",
    "text/typescript",
    "text/x-template",
];

const UNRECOGNIZED_BITS: u8 = 7;

/// Subtype of a script element body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ScriptType {
    /// No `type` attribute, or an empty one
    #[default]
    Default,
    /// Normalized known label
    Known(&'static str),
    /// A label that no provider can be registered for
    Unrecognized,
}

impl ScriptType {
    /// Classify an attribute value, ignoring ASCII case and surrounding whitespace
    pub fn classify(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        let label = match label.as_str() {
            "" => return ScriptType::Default,
            "javascript" | "text/ecmascript" | "application/ecmascript" => "text/javascript",
            other => other,
        };
        KNOWN_SCRIPT_TYPES
            .iter()
            .find(|known| **known == label)
            .map_or(ScriptType::Unrecognized, |known| ScriptType::Known(*known))
    }

    /// Label used to look up a script content provider
    pub fn provider_label(&self) -> Option<&'static str> {
        match self {
            ScriptType::Default => Some(KNOWN_SCRIPT_TYPES[0]),
            ScriptType::Known(label) => Some(label),
            ScriptType::Unrecognized => None,
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            ScriptType::Default => 0,
            ScriptType::Known(label) => KNOWN_SCRIPT_TYPES
                .iter()
                .position(|known| *known == label)
                .map_or(UNRECOGNIZED_BITS, |index| index as u8 + 1),
            ScriptType::Unrecognized => UNRECOGNIZED_BITS,
        }
    }

    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => ScriptType::Default,
            bits => KNOWN_SCRIPT_TYPES
                .get(usize::from(bits) - 1)
                .map_or(ScriptType::Unrecognized, |known| ScriptType::Known(*known)),
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptType::Default => write!(f, "default"),
            ScriptType::Known(label) => write!(f, "{}", label),
            ScriptType::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Markup context deciding whether and what to embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmbeddingContext {
    /// Inside the body of a style or script element
    pub seen_tag: bool,
    /// Inside an embeddable attribute
    pub seen_attribute: bool,
    pub seen_style: bool,
    pub seen_script: bool,
    pub script_type: ScriptType,
}

impl EmbeddingContext {
    pub fn is_embeddable(&self) -> bool {
        self.seen_style || self.seen_script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_labels() {
        assert_eq!(ScriptType::classify(""), ScriptType::Default);
        assert_eq!(ScriptType::classify("  "), ScriptType::Default);
        assert_eq!(
            ScriptType::classify("Text/JavaScript"),
            ScriptType::Known("text/javascript")
        );
        assert_eq!(
            ScriptType::classify("javascript"),
            ScriptType::Known("text/javascript")
        );
        assert_eq!(ScriptType::classify("module"), ScriptType::Known("module"));
        assert_eq!(ScriptType::classify("text/unknown"), ScriptType::Unrecognized);
    }

    #[test]
    fn test_bits_round_trip() {
        for bits in 0..=7u8 {
            assert_eq!(ScriptType::from_bits(bits).to_bits(), bits);
        }
        assert_eq!(ScriptType::Unrecognized.provider_label(), None);
        assert_eq!(
            ScriptType::Default.provider_label(),
            Some("text/javascript")
        );
    }
}
