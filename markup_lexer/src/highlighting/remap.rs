//! Boundary remapping of host token kinds
//!
//! Applied only to tokens the host scanner emits while no secondary lexer is
//! active. Every decision reads the state captured at the token start.

use crate::lexer::HostScanner;
use crate::tokens::TokenKind;

/// Kind reported for the host scanner's current token of raw kind `kind`
pub fn remap_host_token<H: HostScanner + ?Sized>(host: &H, kind: TokenKind) -> TokenKind {
    let state = host.state();
    match kind {
        TokenKind::Name if host.is_tag_name_state(state) => TokenKind::TagName,
        TokenKind::WhiteSpace | TokenKind::RealWhiteSpace => {
            let context = host.context();
            if context.seen_tag && (context.seen_style || context.seen_script) {
                TokenKind::WhiteSpace
            } else if state != 0 {
                TokenKind::TagWhiteSpace
            } else {
                TokenKind::RealWhiteSpace
            }
        }
        TokenKind::CharEntityRef | TokenKind::EntityRef if host.is_comment_state(state) => {
            TokenKind::CommentCharacters
        }
        other => other,
    }
}
