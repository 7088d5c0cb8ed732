use super::rules::HtmlRules;
use super::state::{HtmlState, HOST_STATE_BITS};
use crate::config::runtime::LexerPreferences;
use crate::embedding::EmbeddingContext;
use crate::lexer::{HostScanner, Lexer, RuleLexer};
use crate::tokens::TokenKind;
use std::sync::Arc;

/// HTML host scanner
///
/// Produces raw markup tokens; tag names come out as [`TokenKind::Name`] and
/// whitespace as [`TokenKind::WhiteSpace`] until the composite lexer remaps
/// them.
pub struct HtmlScanner {
    lexer: RuleLexer<HtmlRules>,
}

impl HtmlScanner {
    pub fn new() -> Self {
        Self::with_rules(HtmlRules::default())
    }

    pub fn with_rules(rules: HtmlRules) -> Self {
        Self {
            lexer: RuleLexer::with_rules(rules),
        }
    }

    pub fn with_preferences(preferences: &LexerPreferences) -> Self {
        Self::with_rules(HtmlRules {
            case_insensitive: preferences.case_insensitive,
            recognize_expressions: preferences.recognize_expressions,
        })
    }

    pub fn rules(&self) -> &HtmlRules {
        self.lexer.rules()
    }

    /// Unpacked state at the current token start
    pub fn html_state(&self) -> HtmlState {
        HtmlState::unpack(self.lexer.state())
    }
}

impl Default for HtmlScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer for HtmlScanner {
    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, state: u32) {
        self.lexer.start(buffer, start, end, state);
    }

    fn advance(&mut self) {
        self.lexer.advance();
    }

    fn token_type(&self) -> Option<TokenKind> {
        self.lexer.token_type()
    }

    fn token_start(&self) -> usize {
        self.lexer.token_start()
    }

    fn token_end(&self) -> usize {
        self.lexer.token_end()
    }

    fn state(&self) -> u32 {
        self.lexer.state()
    }

    fn language(&self) -> &'static str {
        "html"
    }
}

impl HostScanner for HtmlScanner {
    fn state_bits(&self) -> u32 {
        HOST_STATE_BITS
    }

    fn context(&self) -> EmbeddingContext {
        self.html_state().embedding_context()
    }

    fn is_tag_name_state(&self, state: u32) -> bool {
        HtmlState::unpack(state).grammar.is_tag_name()
    }

    fn is_comment_state(&self, state: u32) -> bool {
        HtmlState::unpack(state).grammar == super::state::Grammar::Comment
    }

    fn is_raw_text_state(&self, state: u32) -> bool {
        HtmlState::unpack(state).grammar == super::state::Grammar::RawText
    }

    fn end_of_embedded_region(&self) -> usize {
        if self.lexer.token_type().is_none() {
            return self.lexer.token_end();
        }
        self.lexer
            .rules()
            .region_end(self.lexer.text(), self.lexer.token_start(), self.lexer.state())
            .unwrap_or_else(|| self.lexer.token_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::ScriptType;
    use crate::html::state::{EmbeddableAttribute, Grammar, RawElement};
    use crate::tokens::TokenKind::*;

    struct Token {
        kind: TokenKind,
        text: String,
        state: HtmlState,
    }

    fn scan_with(scanner: &mut HtmlScanner, text: &str) -> Vec<Token> {
        let buffer: Arc<str> = Arc::from(text);
        scanner.start(buffer.clone(), 0, buffer.len(), 0);
        let mut tokens = Vec::new();
        while let Some(kind) = scanner.token_type() {
            tokens.push(Token {
                kind,
                text: buffer[scanner.token_start()..scanner.token_end()].to_string(),
                state: scanner.html_state(),
            });
            scanner.advance();
        }
        tokens
    }

    fn scan(text: &str) -> Vec<Token> {
        scan_with(&mut HtmlScanner::new(), text)
    }

    fn pairs(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens.iter().map(|t| (t.kind, t.text.as_str())).collect()
    }

    #[test]
    fn test_basic_markup() {
        let tokens = scan(r#"<a href="x">hi &amp; bye</a>"#);
        assert_eq!(
            pairs(&tokens),
            vec![
                (TagStart, "<"),
                (Name, "a"),
                (WhiteSpace, " "),
                (Name, "href"),
                (Equality, "="),
                (AttributeValueStartDelimiter, "\""),
                (AttributeValue, "x"),
                (AttributeValueEndDelimiter, "\""),
                (TagEnd, ">"),
                (DataCharacters, "hi"),
                (WhiteSpace, " "),
                (EntityRef, "&amp;"),
                (WhiteSpace, " "),
                (DataCharacters, "bye"),
                (EndTagStart, "</"),
                (Name, "a"),
                (TagEnd, ">"),
            ]
        );
        assert_eq!(tokens[9].state.pack(), 0);
    }

    #[test]
    fn test_namespaced_tag_names() {
        let tokens = scan("<svg:rect/></svg:rect>");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TagStart, "<"),
                (Name, "svg"),
                (NameSeparator, ":"),
                (Name, "rect"),
                (EmptyTagEnd, "/>"),
                (EndTagStart, "</"),
                (Name, "svg"),
                (NameSeparator, ":"),
                (Name, "rect"),
                (TagEnd, ">"),
            ]
        );
        let scanner = HtmlScanner::new();
        for index in [1, 3, 6, 8] {
            assert!(scanner.is_tag_name_state(tokens[index].state.pack()));
        }
    }

    #[test]
    fn test_comment_doctype_and_entities() {
        let tokens = scan("<!DOCTYPE html><!-- a &#38; b -->");
        assert_eq!(
            pairs(&tokens),
            vec![
                (Doctype, "<!DOCTYPE html>"),
                (CommentStart, "<!--"),
                (CommentCharacters, " a "),
                (CharEntityRef, "&#38;"),
                (CommentCharacters, " b "),
                (CommentEnd, "-->"),
            ]
        );
        assert_eq!(tokens[3].state.grammar, Grammar::Comment);
    }

    #[test]
    fn test_raw_text_body_is_one_token() {
        let tokens = scan("<style> a < b </div> </STYLE >");
        let body = &tokens[3];
        assert_eq!(body.kind, DataCharacters);
        assert_eq!(body.text, " a < b </div> ");
        assert_eq!(body.state.grammar, Grammar::RawText);
        assert_eq!(body.state.element, RawElement::Style);
        assert!(body.state.body);
        assert_eq!(
            pairs(&tokens[4..]),
            vec![
                (EndTagStart, "</"),
                (Name, "STYLE"),
                (WhiteSpace, " "),
                (TagEnd, ">"),
            ]
        );
        assert_eq!(tokens[4].state.element, RawElement::Style);
        assert_eq!(tokens[5].state.pack(), Grammar::EndTagOpen as u32);

        let scanner = HtmlScanner::new();
        let raw: Vec<bool> = tokens
            .iter()
            .map(|t| scanner.is_raw_text_state(t.state.pack()))
            .collect();
        assert_eq!(raw, vec![false, false, false, true, true, false, false, false]);
    }

    #[test]
    fn test_empty_raw_text_body() {
        let kinds: Vec<TokenKind> = scan("<script></script>").iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TagStart, Name, TagEnd, EndTagStart, Name, TagEnd]
        );
    }

    #[test]
    fn test_script_type_attribute() {
        let tokens = scan(r#"<script type="text/unknown">x</script>"#);
        let body = tokens.iter().find(|t| t.kind == DataCharacters).map(|t| t.state);
        assert_eq!(body.map(|s| s.script_type), Some(ScriptType::Unrecognized));

        let tokens = scan("<script type='module' async>x</script>");
        let body = tokens.iter().find(|t| t.kind == DataCharacters).map(|t| t.state);
        assert_eq!(body.map(|s| s.script_type), Some(ScriptType::Known("module")));

        let tokens = scan(r#"<script type="">x</script>"#);
        let body = tokens.iter().find(|t| t.kind == DataCharacters).map(|t| t.state);
        assert_eq!(body.map(|s| s.script_type), Some(ScriptType::Default));
    }

    #[test]
    fn test_embeddable_attributes() {
        let tokens = scan(r#"<p style="color:red" onclick=go() data-on="x">"#);
        let values: Vec<&Token> = tokens.iter().filter(|t| t.kind == AttributeValue).collect();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0].state.attribute, EmbeddableAttribute::Style);
        assert_eq!(values[1].text, "go()");
        assert_eq!(values[1].state.attribute, EmbeddableAttribute::Script);
        assert_eq!(values[2].state.attribute, EmbeddableAttribute::None);

        // the attribute flag does not outlive its value
        let end = tokens.iter().find(|t| t.kind == AttributeValueEndDelimiter);
        assert_eq!(end.map(|t| t.state.attribute), Some(EmbeddableAttribute::None));
    }

    #[test]
    fn test_event_handler_on_script_element_keeps_body() {
        let tokens = scan(r#"<script onload="init()">run()</script>"#);
        let body = tokens.iter().find(|t| t.kind == DataCharacters);
        let context = body.map(|t| t.state.embedding_context());
        assert_eq!(context.map(|c| (c.seen_tag, c.seen_script)), Some((true, true)));
    }

    #[test]
    fn test_case_sensitive_matching() {
        let mut scanner = HtmlScanner::with_rules(HtmlRules {
            case_insensitive: false,
            recognize_expressions: true,
        });
        let tokens = scan_with(&mut scanner, "<STYLE>a</STYLE>");
        assert!(tokens.iter().all(|t| t.state.element == RawElement::None));
        assert_eq!(tokens[3].kind, DataCharacters);
    }

    #[test]
    fn test_expressions() {
        let tokens = scan(r#"a ${user.name == "}" ? 1 : 2} b"#);
        assert_eq!(
            pairs(&tokens),
            vec![
                (DataCharacters, "a"),
                (WhiteSpace, " "),
                (ExpressionStart, "${"),
                (ExpressionContent, r#"user.name == "}" ? 1 : 2"#),
                (ExpressionEnd, "}"),
                (WhiteSpace, " "),
                (DataCharacters, "b"),
            ]
        );

        let mut scanner = HtmlScanner::with_rules(HtmlRules {
            case_insensitive: true,
            recognize_expressions: false,
        });
        let tokens = scan_with(&mut scanner, "${x}");
        assert_eq!(pairs(&tokens), vec![(DataCharacters, "${x}")]);
    }

    #[test]
    fn test_bad_characters_and_bare_angle_brackets() {
        let tokens = scan("a < b <p =x>");
        assert_eq!(tokens[2].kind, DataCharacters);
        assert_eq!(tokens[2].text, "<");
        let bad = tokens.iter().find(|t| t.kind == BadCharacter);
        assert_eq!(bad.map(|t| t.text.as_str()), Some("="));
    }

    #[test]
    fn test_end_of_embedded_region_is_lookahead() {
        let text = "<style>a{}</style>";
        let buffer: Arc<str> = Arc::from(text);
        let mut scanner = HtmlScanner::new();
        scanner.start(buffer.clone(), 0, buffer.len(), 0);
        while scanner.token_type() != Some(DataCharacters) {
            scanner.advance();
        }
        let state = scanner.state();
        assert_eq!(scanner.end_of_embedded_region(), 10);
        assert_eq!(scanner.token_start(), 7);

        // restarting mid-body finds the same region end
        scanner.start(buffer, 8, text.len(), state);
        assert_eq!(scanner.end_of_embedded_region(), 10);
        assert_eq!(scanner.token_end(), 10);
    }

    #[test]
    fn test_tokens_cover_input() {
        let text = "<ul>\n  <li class=a>é</li>\n</ul><!-- x";
        let tokens = scan(text);
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, text);
    }
}
