//! Packed HTML scanner state
//!
//! ```text
//!  12    10   9   8   7   6   5   4  3        0
//! +--------+----+-------+----+-------+----------+
//! | script | ct | attr  | bd | elem  | grammar  |
//! +--------+----+-------+----+-------+----------+
//! ```
//!
//! `elem` is the raw-text element being opened or read, `bd` is set inside
//! its body, `attr` is the embeddable attribute whose value comes next, `ct`
//! marks a pending `type` / `language` value and `script` holds the
//! [`ScriptType`] bits of the current script element.

use crate::embedding::{EmbeddingContext, ScriptType};

pub const HOST_STATE_BITS: u32 = 13;

const GRAMMAR_MASK: u32 = 0b1111;
const ELEMENT_SHIFT: u32 = 4;
const BODY_BIT: u32 = 1 << 6;
const ATTRIBUTE_SHIFT: u32 = 7;
const CONTENT_TYPE_BIT: u32 = 1 << 9;
const SCRIPT_TYPE_SHIFT: u32 = 10;

/// Position in the markup grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grammar {
    #[default]
    Content = 0,
    /// After `<`, expecting the tag name or its namespace prefix
    TagOpen = 1,
    /// After `</`
    EndTagOpen = 2,
    /// After `prefix:` in a start tag
    TagLocalName = 3,
    /// After `prefix:` in an end tag
    EndTagLocalName = 4,
    BeforeAttrName = 5,
    AfterAttrName = 6,
    BeforeAttrValue = 7,
    AttrValueDouble = 8,
    AttrValueSingle = 9,
    /// After the end tag name, expecting `>`
    EndTagBody = 10,
    Comment = 11,
    /// Body of a style or script element
    RawText = 12,
    /// Inside `${ ... }`
    Expression = 13,
}

impl Grammar {
    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => Grammar::TagOpen,
            2 => Grammar::EndTagOpen,
            3 => Grammar::TagLocalName,
            4 => Grammar::EndTagLocalName,
            5 => Grammar::BeforeAttrName,
            6 => Grammar::AfterAttrName,
            7 => Grammar::BeforeAttrValue,
            8 => Grammar::AttrValueDouble,
            9 => Grammar::AttrValueSingle,
            10 => Grammar::EndTagBody,
            11 => Grammar::Comment,
            12 => Grammar::RawText,
            13 => Grammar::Expression,
            _ => Grammar::Content,
        }
    }

    pub fn is_tag_name(self) -> bool {
        matches!(
            self,
            Grammar::TagOpen | Grammar::EndTagOpen | Grammar::TagLocalName | Grammar::EndTagLocalName
        )
    }
}

/// Element whose body is scanned as raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawElement {
    #[default]
    None = 0,
    Style = 1,
    Script = 2,
}

impl RawElement {
    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => RawElement::Style,
            2 => RawElement::Script,
            _ => RawElement::None,
        }
    }

    pub fn closing_tag(self) -> &'static [u8] {
        match self {
            RawElement::Style => b"</style",
            RawElement::Script => b"</script",
            RawElement::None => b"</",
        }
    }
}

/// Attribute whose value is in another language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddableAttribute {
    #[default]
    None = 0,
    Style = 1,
    Script = 2,
}

impl EmbeddableAttribute {
    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => EmbeddableAttribute::Style,
            2 => EmbeddableAttribute::Script,
            _ => EmbeddableAttribute::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HtmlState {
    pub grammar: Grammar,
    pub element: RawElement,
    pub body: bool,
    pub attribute: EmbeddableAttribute,
    pub content_type: bool,
    pub script_type: ScriptType,
}

impl HtmlState {
    pub fn unpack(state: u32) -> Self {
        Self {
            grammar: Grammar::from_bits(state & GRAMMAR_MASK),
            element: RawElement::from_bits((state >> ELEMENT_SHIFT) & 0b11),
            body: state & BODY_BIT != 0,
            attribute: EmbeddableAttribute::from_bits((state >> ATTRIBUTE_SHIFT) & 0b11),
            content_type: state & CONTENT_TYPE_BIT != 0,
            script_type: ScriptType::from_bits(((state >> SCRIPT_TYPE_SHIFT) & 0b111) as u8),
        }
    }

    pub fn pack(&self) -> u32 {
        let mut state = self.grammar as u32;
        state |= (self.element as u32) << ELEMENT_SHIFT;
        if self.body {
            state |= BODY_BIT;
        }
        state |= (self.attribute as u32) << ATTRIBUTE_SHIFT;
        if self.content_type {
            state |= CONTENT_TYPE_BIT;
        }
        state | (u32::from(self.script_type.to_bits()) << SCRIPT_TYPE_SHIFT)
    }

    /// Same flags, different grammar position
    pub fn with_grammar(self, grammar: Grammar) -> Self {
        Self { grammar, ..self }
    }

    /// Grammar position with every flag cleared
    pub fn reset(grammar: Grammar) -> Self {
        Self {
            grammar,
            ..Self::default()
        }
    }

    /// Attribute value finished: drop the attribute flags
    pub fn after_attribute(self, grammar: Grammar) -> Self {
        Self {
            grammar,
            attribute: EmbeddableAttribute::None,
            content_type: false,
            ..self
        }
    }

    pub fn embedding_context(&self) -> EmbeddingContext {
        let seen_style = self.attribute == EmbeddableAttribute::Style
            || (self.attribute == EmbeddableAttribute::None && self.element == RawElement::Style);
        let seen_script = self.attribute == EmbeddableAttribute::Script
            || (self.attribute == EmbeddableAttribute::None && self.element == RawElement::Script);

        EmbeddingContext {
            seen_tag: self.body,
            seen_attribute: self.attribute != EmbeddableAttribute::None,
            seen_style,
            seen_script,
            script_type: self.script_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_round_trip() {
        let state = HtmlState {
            grammar: Grammar::AttrValueDouble,
            element: RawElement::Script,
            body: false,
            attribute: EmbeddableAttribute::Script,
            content_type: true,
            script_type: ScriptType::Known("module"),
        };
        let packed = state.pack();
        assert!(packed < 1 << HOST_STATE_BITS);
        assert_eq!(HtmlState::unpack(packed), state);
        assert_eq!(HtmlState::default().pack(), 0);
    }

    #[test]
    fn test_embedding_context_prefers_attribute() {
        let style_element_with_handler = HtmlState {
            grammar: Grammar::BeforeAttrValue,
            element: RawElement::Style,
            attribute: EmbeddableAttribute::Script,
            ..HtmlState::default()
        };
        let context = style_element_with_handler.embedding_context();
        assert!(context.seen_script);
        assert!(!context.seen_style);
        assert!(context.seen_attribute);
        assert!(!context.seen_tag);

        let body = HtmlState {
            grammar: Grammar::RawText,
            element: RawElement::Style,
            body: true,
            ..HtmlState::default()
        };
        let context = body.embedding_context();
        assert!(context.seen_style && context.seen_tag && !context.seen_attribute);
    }
}
