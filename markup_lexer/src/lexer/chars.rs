//! Byte-level scanning helpers
//!
//! Scanners only ever stop on ASCII bytes, which are always character
//! boundaries in UTF-8, so advancing byte by byte over multi-byte characters
//! is safe as long as the stop predicates only match ASCII.

pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

pub fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

pub fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// First position at or after `pos` where `predicate` fails
pub fn scan_while(bytes: &[u8], pos: usize, predicate: impl Fn(u8) -> bool) -> usize {
    let mut end = pos;
    while end < bytes.len() && predicate(bytes[end]) {
        end += 1;
    }
    end
}

pub fn skip_whitespace(bytes: &[u8], pos: usize) -> usize {
    scan_while(bytes, pos, is_whitespace)
}

/// End of the character starting at `pos`
pub fn char_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

/// Previous character boundary at or before `pos`
pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// ASCII case-insensitive prefix test at `pos`
pub fn starts_with_ignore_case(bytes: &[u8], pos: usize, prefix: &[u8]) -> bool {
    bytes
        .get(pos..pos + prefix.len())
        .is_some_and(|window| window.eq_ignore_ascii_case(prefix))
}

/// Quoted string starting at the opening quote, with backslash escapes
///
/// Returns the end of the closing quote, or the end of input if unterminated.
pub fn scan_quoted(bytes: &[u8], pos: usize) -> usize {
    let quote = bytes[pos];
    let mut end = pos + 1;
    while end < bytes.len() {
        match bytes[end] {
            b'\\' => end = (end + 2).min(bytes.len()),
            b if b == quote => return end + 1,
            _ => end += 1,
        }
    }
    end
}

/// Decimal or hex number, with an optional fraction and exponent
pub fn scan_number(bytes: &[u8], pos: usize) -> usize {
    let mut end = pos;
    if end + 1 < bytes.len() && bytes[end] == b'0' && (bytes[end + 1] | 0x20) == b'x' {
        return scan_while(bytes, end + 2, |b| b.is_ascii_hexdigit());
    }
    end = scan_while(bytes, end, |b| b.is_ascii_digit());
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end = scan_while(bytes, end + 1, |b| b.is_ascii_digit());
    }
    if end < bytes.len() && (bytes[end] | 0x20) == b'e' {
        let mut exponent = end + 1;
        if exponent < bytes.len() && matches!(bytes[exponent], b'+' | b'-') {
            exponent += 1;
        }
        if exponent < bytes.len() && bytes[exponent].is_ascii_digit() {
            end = scan_while(bytes, exponent, |b| b.is_ascii_digit());
        }
    }
    end
}

/// Position of `needle` at or after `pos`
pub fn find(bytes: &[u8], pos: usize, needle: &[u8]) -> Option<usize> {
    if pos >= bytes.len() {
        return None;
    }
    bytes[pos..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| pos + offset)
}

/// End of the first of `candidates` found at `pos`
///
/// Candidates are tried in order, so longer operators must come first.
pub fn match_any(bytes: &[u8], pos: usize, candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find(|candidate| bytes[pos..].starts_with(candidate.as_bytes()))
        .map(|candidate| pos + candidate.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_quoted_handles_escapes() {
        let text = br#""a\"b" rest"#;
        assert_eq!(scan_quoted(text, 0), 6);
        assert_eq!(scan_quoted(b"'open", 0), 5);
    }

    #[test]
    fn test_scan_number() {
        assert_eq!(scan_number(b"12.5px", 0), 4);
        assert_eq!(scan_number(b"0x1Fz", 0), 4);
        assert_eq!(scan_number(b"3e-2;", 0), 4);
        assert_eq!(scan_number(b"7.", 0), 1);
    }

    #[test]
    fn test_char_helpers() {
        let text = "aé<";
        assert_eq!(char_end(text, 1), 3);
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert!(starts_with_ignore_case(b"</STYLE>", 0, b"</style"));
        assert!(!starts_with_ignore_case(b"</st", 0, b"</style"));
        assert_eq!(find(b"ab-->", 0, b"-->"), Some(2));
        assert_eq!(find(b"ab", 5, b"-->"), None);
        assert_eq!(match_any(b"===x", 0, &["===", "=="]), Some(3));
        assert_eq!(match_any(b"=x", 0, &["===", "=="]), None);
    }
}
