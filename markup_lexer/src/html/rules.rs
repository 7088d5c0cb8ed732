//! HTML scanning rules
//!
//! Pure token recognition over [`HtmlState`]. Style and script element bodies
//! are raw text up to their closing tag, so no markup is recognized there.

use super::state::{EmbeddableAttribute, Grammar, HtmlState, RawElement};
use crate::embedding::ScriptType;
use crate::lexer::chars::{
    char_end, find, is_whitespace, scan_quoted, scan_while, skip_whitespace,
    starts_with_ignore_case,
};
use crate::lexer::{ScanRules, Scanned};
use crate::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlRules {
    /// Match `style`, `script`, `type` and `on*` without regard to ASCII case
    pub case_insensitive: bool,
    /// Recognize `${ ... }` in content
    pub recognize_expressions: bool,
}

impl Default for HtmlRules {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            recognize_expressions: true,
        }
    }
}

fn emit(kind: TokenKind, end: usize, next: HtmlState) -> Scanned {
    Scanned::new(kind, end, next.pack())
}

fn is_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.') || b >= 0x80
}

fn is_attribute_name_char(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'/' | b'>' | b'=' | b'"' | b'\'' | b'<')
}

fn is_unquoted_value_char(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'>' | b'"' | b'\'' | b'<' | b'=' | b'`')
}

/// `&name;`, `&#123;` or `&#x7B;` at `pos`
fn scan_entity(bytes: &[u8], pos: usize) -> Option<(TokenKind, usize)> {
    if bytes.get(pos + 1) == Some(&b'#') {
        let hex = matches!(bytes.get(pos + 2), Some(b'x') | Some(b'X'));
        let digits = if hex { pos + 3 } else { pos + 2 };
        let end = scan_while(bytes, digits, |b| {
            if hex {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            }
        });
        return (end > digits && bytes.get(end) == Some(&b';'))
            .then_some((TokenKind::CharEntityRef, end + 1));
    }

    if bytes.get(pos + 1).is_some_and(|b| b.is_ascii_alphabetic()) {
        let end = scan_while(bytes, pos + 1, |b| b.is_ascii_alphanumeric());
        if bytes.get(end) == Some(&b';') {
            return Some((TokenKind::EntityRef, end + 1));
        }
    }
    None
}

fn scan_unquoted_value(bytes: &[u8], pos: usize) -> usize {
    scan_while(bytes, pos, is_unquoted_value_char)
}

/// Expression body up to the closing `}`, skipping quoted strings
fn scan_expression_body(bytes: &[u8], pos: usize) -> usize {
    let mut end = pos;
    while end < bytes.len() {
        match bytes[end] {
            b'}' => break,
            b'"' | b'\'' => end = scan_quoted(bytes, end),
            _ => end += 1,
        }
    }
    end
}

impl HtmlRules {
    fn name_eq(&self, name: &[u8], expected: &[u8]) -> bool {
        if self.case_insensitive {
            name.eq_ignore_ascii_case(expected)
        } else {
            name == expected
        }
    }

    fn starts_expression(&self, bytes: &[u8], pos: usize) -> bool {
        self.recognize_expressions && bytes[pos] == b'$' && bytes.get(pos + 1) == Some(&b'{')
    }

    fn raw_element(&self, name: &[u8]) -> RawElement {
        if self.name_eq(name, b"style") {
            RawElement::Style
        } else if self.name_eq(name, b"script") {
            RawElement::Script
        } else {
            RawElement::None
        }
    }

    /// `<` constructs recognized in content
    fn scan_markup_open(&self, bytes: &[u8], pos: usize) -> Option<Scanned> {
        let next = bytes.get(pos + 1).copied();
        if bytes[pos..].starts_with(b"<!--") {
            Some(emit(TokenKind::CommentStart, pos + 4, HtmlState::reset(Grammar::Comment)))
        } else if matches!(next, Some(b'!') | Some(b'?')) {
            let end = find(bytes, pos + 2, b">").map_or(bytes.len(), |close| close + 1);
            Some(emit(TokenKind::Doctype, end, HtmlState::reset(Grammar::Content)))
        } else if next == Some(b'/') && bytes.get(pos + 2).is_some_and(|b| b.is_ascii_alphabetic()) {
            Some(emit(TokenKind::EndTagStart, pos + 2, HtmlState::reset(Grammar::EndTagOpen)))
        } else if next.is_some_and(|b| b.is_ascii_alphabetic()) {
            Some(emit(TokenKind::TagStart, pos + 1, HtmlState::reset(Grammar::TagOpen)))
        } else {
            None
        }
    }

    fn is_data_stop(&self, bytes: &[u8], pos: usize) -> bool {
        match bytes[pos] {
            b if is_whitespace(b) => true,
            b'<' => self.scan_markup_open(bytes, pos).is_some(),
            b'&' => scan_entity(bytes, pos).is_some(),
            _ => self.starts_expression(bytes, pos),
        }
    }

    fn scan_content(&self, bytes: &[u8], pos: usize, current: HtmlState) -> Scanned {
        let b = bytes[pos];
        if is_whitespace(b) {
            return emit(TokenKind::WhiteSpace, skip_whitespace(bytes, pos), current);
        }
        if b == b'<' {
            if let Some(scanned) = self.scan_markup_open(bytes, pos) {
                return scanned;
            }
        }
        if b == b'&' {
            if let Some((kind, end)) = scan_entity(bytes, pos) {
                return emit(kind, end, current);
            }
        }
        if self.starts_expression(bytes, pos) {
            return emit(
                TokenKind::ExpressionStart,
                pos + 2,
                HtmlState::reset(Grammar::Expression),
            );
        }

        // the byte at `pos` is not a stop, so the run is never empty
        let mut end = pos + 1;
        while end < bytes.len() && !self.is_data_stop(bytes, end) {
            end += 1;
        }
        emit(TokenKind::DataCharacters, end, current)
    }

    fn scan_tag_name(&self, text: &str, pos: usize, current: HtmlState) -> Scanned {
        let bytes = text.as_bytes();
        let b = bytes[pos];
        let in_prefix_position = current.grammar == Grammar::TagOpen;

        if is_tag_name_char(b) {
            let end = scan_while(bytes, pos, is_tag_name_char);
            if in_prefix_position && bytes.get(end) == Some(&b':') {
                return emit(TokenKind::Name, end, HtmlState::reset(Grammar::TagOpen));
            }
            let element = if in_prefix_position {
                self.raw_element(&bytes[pos..end])
            } else {
                RawElement::None
            };
            let next = HtmlState {
                element,
                ..HtmlState::reset(Grammar::BeforeAttrName)
            };
            return emit(TokenKind::Name, end, next);
        }

        if b == b':' && in_prefix_position {
            return emit(
                TokenKind::NameSeparator,
                pos + 1,
                current.with_grammar(Grammar::TagLocalName),
            );
        }

        self.scan_tag_interior(text, pos, current.with_grammar(Grammar::BeforeAttrName))
    }

    fn scan_end_tag_name(&self, text: &str, pos: usize, current: HtmlState) -> Scanned {
        let bytes = text.as_bytes();
        let b = bytes[pos];
        let in_prefix_position = current.grammar == Grammar::EndTagOpen;

        if is_tag_name_char(b) {
            let end = scan_while(bytes, pos, is_tag_name_char);
            let next = if in_prefix_position && bytes.get(end) == Some(&b':') {
                Grammar::EndTagOpen
            } else {
                Grammar::EndTagBody
            };
            return emit(TokenKind::Name, end, HtmlState::reset(next));
        }

        if b == b':' && in_prefix_position {
            return emit(
                TokenKind::NameSeparator,
                pos + 1,
                HtmlState::reset(Grammar::EndTagLocalName),
            );
        }

        self.scan_end_tag_body(text, pos)
    }

    fn scan_end_tag_body(&self, text: &str, pos: usize) -> Scanned {
        let bytes = text.as_bytes();
        match bytes[pos] {
            b if is_whitespace(b) => emit(
                TokenKind::WhiteSpace,
                skip_whitespace(bytes, pos),
                HtmlState::reset(Grammar::EndTagBody),
            ),
            b'>' => emit(TokenKind::TagEnd, pos + 1, HtmlState::reset(Grammar::Content)),
            _ => emit(
                TokenKind::BadCharacter,
                char_end(text, pos),
                HtmlState::reset(Grammar::EndTagBody),
            ),
        }
    }

    /// State after `>` closes a start tag
    fn after_start_tag(&self, current: HtmlState) -> HtmlState {
        match current.element {
            RawElement::None => HtmlState::reset(Grammar::Content),
            element => HtmlState {
                element,
                body: true,
                script_type: current.script_type,
                ..HtmlState::reset(Grammar::RawText)
            },
        }
    }

    fn after_attribute_name(&self, current: HtmlState, name: &[u8]) -> HtmlState {
        let mut next = current.after_attribute(Grammar::AfterAttrName);

        if current.element == RawElement::Script
            && (self.name_eq(name, b"type") || self.name_eq(name, b"language"))
        {
            next.content_type = true;
        } else if self.name_eq(name, b"style") {
            next.attribute = EmbeddableAttribute::Style;
        } else if name.len() > 2 && self.name_eq(&name[..2], b"on") && !name.contains(&b':') {
            next.attribute = EmbeddableAttribute::Script;
        }
        next
    }

    fn after_value(&self, current: HtmlState, value: &str, grammar: Grammar) -> HtmlState {
        let mut next = current.after_attribute(grammar);
        if current.content_type {
            next.script_type = ScriptType::classify(value);
        }
        next
    }

    fn scan_tag_interior(&self, text: &str, pos: usize, current: HtmlState) -> Scanned {
        let bytes = text.as_bytes();
        let b = bytes[pos];

        if is_whitespace(b) {
            let next = match current.grammar {
                Grammar::AfterAttrName | Grammar::BeforeAttrValue => current,
                _ => current.with_grammar(Grammar::BeforeAttrName),
            };
            return emit(TokenKind::WhiteSpace, skip_whitespace(bytes, pos), next);
        }
        if b == b'>' {
            return emit(TokenKind::TagEnd, pos + 1, self.after_start_tag(current));
        }
        match current.grammar {
            Grammar::BeforeAttrValue => {
                return match b {
                    b'"' => emit(
                        TokenKind::AttributeValueStartDelimiter,
                        pos + 1,
                        current.with_grammar(Grammar::AttrValueDouble),
                    ),
                    b'\'' => emit(
                        TokenKind::AttributeValueStartDelimiter,
                        pos + 1,
                        current.with_grammar(Grammar::AttrValueSingle),
                    ),
                    _ => {
                        let end = scan_unquoted_value(bytes, pos);
                        if end > pos {
                            let next =
                                self.after_value(current, &text[pos..end], Grammar::BeforeAttrName);
                            emit(TokenKind::AttributeValue, end, next)
                        } else {
                            emit(TokenKind::BadCharacter, char_end(text, pos), current)
                        }
                    }
                };
            }
            Grammar::AfterAttrName if b == b'=' => {
                return emit(
                    TokenKind::Equality,
                    pos + 1,
                    current.with_grammar(Grammar::BeforeAttrValue),
                );
            }
            _ => {}
        }

        if b == b'/' && bytes.get(pos + 1) == Some(&b'>') {
            return emit(
                TokenKind::EmptyTagEnd,
                pos + 2,
                HtmlState::reset(Grammar::Content),
            );
        }

        if is_attribute_name_char(b) {
            let end = scan_while(bytes, pos, is_attribute_name_char);
            let next = self.after_attribute_name(current, &bytes[pos..end]);
            return emit(TokenKind::Name, end, next);
        }

        emit(TokenKind::BadCharacter, char_end(text, pos), current)
    }

    fn scan_quoted_value(&self, text: &str, pos: usize, current: HtmlState, quote: u8) -> Scanned {
        let bytes = text.as_bytes();
        if bytes[pos] == quote {
            let mut next = current.after_attribute(Grammar::BeforeAttrName);
            if current.content_type {
                next.script_type = ScriptType::Default;
            }
            return emit(TokenKind::AttributeValueEndDelimiter, pos + 1, next);
        }

        let end = scan_while(bytes, pos, |b| b != quote);
        let next = self.after_value(current, &text[pos..end], current.grammar);
        emit(TokenKind::AttributeValue, end, next)
    }

    fn scan_comment(&self, bytes: &[u8], pos: usize, current: HtmlState) -> Scanned {
        if bytes[pos..].starts_with(b"-->") {
            return emit(TokenKind::CommentEnd, pos + 3, HtmlState::reset(Grammar::Content));
        }
        if bytes[pos] == b'&' {
            if let Some((kind, end)) = scan_entity(bytes, pos) {
                return emit(kind, end, current);
            }
        }

        let mut end = pos + 1;
        while end < bytes.len()
            && !bytes[end..].starts_with(b"-->")
            && !(bytes[end] == b'&' && scan_entity(bytes, end).is_some())
        {
            end += 1;
        }
        emit(TokenKind::CommentCharacters, end, current)
    }

    /// `</style` or `</script` followed by a tag boundary
    fn closes_raw_text(&self, bytes: &[u8], pos: usize, element: RawElement) -> bool {
        let closing = element.closing_tag();
        let matched = if self.case_insensitive {
            starts_with_ignore_case(bytes, pos, closing)
        } else {
            bytes[pos..].starts_with(closing)
        };
        matched
            && bytes
                .get(pos + closing.len())
                .map_or(true, |&b| is_whitespace(b) || b == b'>' || b == b'/')
    }

    fn find_raw_text_end(&self, bytes: &[u8], pos: usize, element: RawElement) -> usize {
        let mut from = pos;
        while let Some(candidate) = find(bytes, from, b"</") {
            if self.closes_raw_text(bytes, candidate, element) {
                return candidate;
            }
            from = candidate + 2;
        }
        bytes.len()
    }

    fn scan_raw_text(&self, bytes: &[u8], pos: usize, current: HtmlState) -> Scanned {
        if self.closes_raw_text(bytes, pos, current.element) {
            return emit(
                TokenKind::EndTagStart,
                pos + 2,
                HtmlState::reset(Grammar::EndTagOpen),
            );
        }
        // one token for the whole body, so a restart anywhere inside it sees
        // the same region end
        let end = self.find_raw_text_end(bytes, pos, current.element);
        emit(TokenKind::DataCharacters, end, current)
    }

    fn scan_expression(&self, bytes: &[u8], pos: usize, current: HtmlState) -> Scanned {
        if bytes[pos] == b'}' {
            return emit(TokenKind::ExpressionEnd, pos + 1, HtmlState::reset(Grammar::Content));
        }
        emit(
            TokenKind::ExpressionContent,
            scan_expression_body(bytes, pos),
            current,
        )
    }

    /// End of the embeddable region that starts at `pos` in `state`
    ///
    /// `None` when `state` does not start such a region.
    pub fn region_end(&self, text: &str, pos: usize, state: u32) -> Option<usize> {
        let bytes = text.as_bytes();
        let current = HtmlState::unpack(state);
        let end = match current.grammar {
            Grammar::RawText => self.find_raw_text_end(bytes, pos, current.element),
            Grammar::AttrValueDouble => scan_while(bytes, pos, |b| b != b'"'),
            Grammar::AttrValueSingle => scan_while(bytes, pos, |b| b != b'\''),
            Grammar::BeforeAttrValue => scan_unquoted_value(bytes, pos),
            Grammar::Expression => scan_expression_body(bytes, pos),
            _ => return None,
        };
        Some(end)
    }
}

impl ScanRules for HtmlRules {
    fn scan(&self, text: &str, pos: usize, state: u32) -> Scanned {
        let bytes = text.as_bytes();
        let current = HtmlState::unpack(state);

        match current.grammar {
            Grammar::Content => self.scan_content(bytes, pos, current),
            Grammar::TagOpen | Grammar::TagLocalName => self.scan_tag_name(text, pos, current),
            Grammar::EndTagOpen | Grammar::EndTagLocalName => {
                self.scan_end_tag_name(text, pos, current)
            }
            Grammar::BeforeAttrName | Grammar::AfterAttrName | Grammar::BeforeAttrValue => {
                self.scan_tag_interior(text, pos, current)
            }
            Grammar::AttrValueDouble => self.scan_quoted_value(text, pos, current, b'"'),
            Grammar::AttrValueSingle => self.scan_quoted_value(text, pos, current, b'\''),
            Grammar::EndTagBody => self.scan_end_tag_body(text, pos),
            Grammar::Comment => self.scan_comment(bytes, pos, current),
            Grammar::RawText => self.scan_raw_text(bytes, pos, current),
            Grammar::Expression => self.scan_expression(bytes, pos, current),
        }
    }

    fn language(&self) -> &'static str {
        "html"
    }
}
