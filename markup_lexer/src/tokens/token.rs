//! Token kinds shared by the host scanner, the secondary lexers and the
//! composite lexer.
//!
//! Markup kinds are a closed set. Secondary lexers describe their own kinds
//! through [`ForeignKind`], which the composite passes through unchanged.
use serde::Serialize;
use std::fmt;

/// Kind defined by a secondary (embedded) lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ForeignKind {
    /// Short language tag, e.g. `"css"`
    pub language: &'static str,
    pub name: &'static str,
}

impl ForeignKind {
    pub const fn new(language: &'static str, name: &'static str) -> Self {
        Self { language, name }
    }
}

impl fmt::Display for ForeignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.language, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // === TAG STRUCTURE ===
    /// `<`
    TagStart,
    /// `</`
    EndTagStart,
    /// `>`
    TagEnd,
    /// `/>`
    EmptyTagEnd,
    /// Tag or attribute name as produced by the host scanner
    Name,
    /// Name in a tag-name position, after boundary remapping
    TagName,
    /// `:` between a namespace prefix and a local name
    NameSeparator,
    /// `=`
    Equality,

    // === ATTRIBUTE VALUES ===
    AttributeValueStartDelimiter,
    AttributeValue,
    AttributeValueEndDelimiter,

    // === CONTENT ===
    DataCharacters,
    /// `<!--`
    CommentStart,
    CommentCharacters,
    /// `-->`
    CommentEnd,
    /// `<!DOCTYPE ...>` or `<? ... ?>`
    Doctype,

    // === WHITESPACE ===
    /// Whitespace as produced by the host scanner; also the remapped kind
    /// inside style and script element bodies
    WhiteSpace,
    /// Whitespace between markup constructs at document level
    RealWhiteSpace,
    /// Whitespace inside a tag
    TagWhiteSpace,

    // === ENTITIES ===
    /// `&#38;` or `&#x26;`
    CharEntityRef,
    /// `&amp;`
    EntityRef,

    // === EXPRESSIONS ===
    /// `${`
    ExpressionStart,
    ExpressionContent,
    /// `}` closing an expression
    ExpressionEnd,

    BadCharacter,

    /// Kind owned by an embedded lexer
    Foreign(ForeignKind),
}

/// Broad classification used for metrics and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenClass {
    Markup,
    Content,
    Comment,
    Whitespace,
    Entity,
    Expression,
    Embedded,
    Error,
}

impl TokenKind {
    pub fn class(&self) -> TokenClass {
        match self {
            TokenKind::TagStart
            | TokenKind::EndTagStart
            | TokenKind::TagEnd
            | TokenKind::EmptyTagEnd
            | TokenKind::Name
            | TokenKind::TagName
            | TokenKind::NameSeparator
            | TokenKind::Equality
            | TokenKind::AttributeValueStartDelimiter
            | TokenKind::AttributeValue
            | TokenKind::AttributeValueEndDelimiter
            | TokenKind::Doctype => TokenClass::Markup,
            TokenKind::DataCharacters => TokenClass::Content,
            TokenKind::CommentStart | TokenKind::CommentCharacters | TokenKind::CommentEnd => {
                TokenClass::Comment
            }
            TokenKind::WhiteSpace | TokenKind::RealWhiteSpace | TokenKind::TagWhiteSpace => {
                TokenClass::Whitespace
            }
            TokenKind::CharEntityRef | TokenKind::EntityRef => TokenClass::Entity,
            TokenKind::ExpressionStart
            | TokenKind::ExpressionContent
            | TokenKind::ExpressionEnd => TokenClass::Expression,
            TokenKind::BadCharacter => TokenClass::Error,
            TokenKind::Foreign(_) => TokenClass::Embedded,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        match self {
            TokenKind::Foreign(foreign) => foreign.name == "WhiteSpace",
            other => other.class() == TokenClass::Whitespace,
        }
    }

    /// Language the kind belongs to; `"html"` for markup kinds
    pub fn language(&self) -> &'static str {
        match self {
            TokenKind::Foreign(foreign) => foreign.language,
            _ => "html",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::TagStart => "TagStart",
            TokenKind::EndTagStart => "EndTagStart",
            TokenKind::TagEnd => "TagEnd",
            TokenKind::EmptyTagEnd => "EmptyTagEnd",
            TokenKind::Name => "Name",
            TokenKind::TagName => "TagName",
            TokenKind::NameSeparator => "NameSeparator",
            TokenKind::Equality => "Equality",
            TokenKind::AttributeValueStartDelimiter => "AttributeValueStartDelimiter",
            TokenKind::AttributeValue => "AttributeValue",
            TokenKind::AttributeValueEndDelimiter => "AttributeValueEndDelimiter",
            TokenKind::DataCharacters => "DataCharacters",
            TokenKind::CommentStart => "CommentStart",
            TokenKind::CommentCharacters => "CommentCharacters",
            TokenKind::CommentEnd => "CommentEnd",
            TokenKind::Doctype => "Doctype",
            TokenKind::WhiteSpace => "WhiteSpace",
            TokenKind::RealWhiteSpace => "RealWhiteSpace",
            TokenKind::TagWhiteSpace => "TagWhiteSpace",
            TokenKind::CharEntityRef => "CharEntityRef",
            TokenKind::EntityRef => "EntityRef",
            TokenKind::ExpressionStart => "ExpressionStart",
            TokenKind::ExpressionContent => "ExpressionContent",
            TokenKind::ExpressionEnd => "ExpressionEnd",
            TokenKind::BadCharacter => "BadCharacter",
            TokenKind::Foreign(foreign) => foreign.name,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Foreign(foreign) => write!(f, "{}", foreign),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS_IDENT: ForeignKind = ForeignKind::new("css", "Ident");

    #[test]
    fn test_display_names() {
        assert_eq!(TokenKind::TagName.to_string(), "TagName");
        assert_eq!(TokenKind::Foreign(CSS_IDENT).to_string(), "css:Ident");
    }

    #[test]
    fn test_classification() {
        assert_eq!(TokenKind::TagEnd.class(), TokenClass::Markup);
        assert_eq!(TokenKind::EntityRef.class(), TokenClass::Entity);
        assert_eq!(TokenKind::Foreign(CSS_IDENT).class(), TokenClass::Embedded);
        assert!(TokenKind::TagWhiteSpace.is_whitespace());
        assert!(TokenKind::Foreign(ForeignKind::new("js", "WhiteSpace")).is_whitespace());
        assert!(!TokenKind::DataCharacters.is_whitespace());
    }

    #[test]
    fn test_language() {
        assert_eq!(TokenKind::CommentCharacters.language(), "html");
        assert_eq!(TokenKind::Foreign(CSS_IDENT).language(), "css");
    }
}
