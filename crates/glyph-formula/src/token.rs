//! Scanning and canonicalization of `@`-reference tokens.
//!
//! A reference token is `@` followed by one or more characters that are
//! neither whitespace nor an arithmetic operator (`- / * +`). The part
//! before the first `.`-led suffix names an entity; the suffix, if any,
//! is a property path into it.

use std::ops::Range;

/// Characters that terminate a reference token besides whitespace.
const OPERATOR_CHARS: [char; 4] = ['-', '/', '*', '+'];

/// One `@`-reference occurrence in a text blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefToken<'a> {
    /// The matched substring, original casing, including the `@`.
    pub raw: &'a str,
    /// Byte span of the match in the source text.
    pub span: Range<usize>,
}

impl RefToken<'_> {
    /// The key under which this token is stored and deduplicated: the
    /// full raw token, lowercased, property path included.
    pub fn dedup_key(&self) -> String {
        self.raw.to_lowercase()
    }

    /// Split into the canonical entity name and the optional property
    /// path.
    ///
    /// The canonical name is the part before the first `.` that begins
    /// a non-empty suffix, lowercased, with underscores replaced by
    /// spaces. The property path keeps its original casing and
    /// underscores. A trailing lone `.` does not start a path.
    pub fn canonicalize(&self) -> (String, Option<&str>) {
        let body = &self.raw[1..];
        let split = body
            .char_indices()
            .find(|&(i, c)| c == '.' && i + 1 < body.len())
            .map(|(i, _)| i);
        match split {
            Some(dot) => {
                let head = body[..dot].to_lowercase().replace('_', " ");
                (head, Some(&body[dot + 1..]))
            }
            None => (body.to_lowercase().replace('_', " "), None),
        }
    }
}

/// Returns true if the character can appear inside a reference token.
fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && !OPERATOR_CHARS.contains(&c)
}

/// Find all reference tokens in a text blob, in order of appearance.
///
/// Matches are non-overlapping. Malformed text simply yields no tokens;
/// a bare `@` with nothing after it is not a token.
pub fn scan_references(text: &str) -> Vec<RefToken<'_>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c != '@' {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if is_token_char(next) {
                end = i + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        if end > start + c.len_utf8() {
            tokens.push(RefToken {
                raw: &text[start..end],
                span: start..end,
            });
        }
    }
    tokens
}
