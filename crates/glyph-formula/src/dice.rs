//! Scanning dice terms inside formula text.
//!
//! A dice term is a digit run, optional whitespace, a `d` or `D`
//! marker, and an optional (again whitespace-separated) digit run for
//! the face count: `3d6`, `3 D`, `12 d 8`. The scanner reports byte
//! spans so callers can substitute terms in place.

use std::ops::Range;

/// Number of faces assumed when a roll formula omits them.
pub const DEFAULT_FACES: u32 = 6;

/// One dice-term occurrence in a formula string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceTermMatch {
    /// Number of dice rolled.
    pub count: u32,
    /// Faces per die; `None` when the formula omitted them.
    pub faces: Option<u32>,
    /// The marker character as written (`d` or `D`).
    pub marker: char,
    /// Byte span of the whole term in the source text.
    pub span: Range<usize>,
}

impl DiceTermMatch {
    /// The canonical spelling of this term, defaulting missing faces.
    pub fn canonical(&self) -> String {
        format!(
            "{}{}{}",
            self.count,
            self.marker,
            self.faces.unwrap_or(DEFAULT_FACES)
        )
    }
}

/// Find all dice terms in a formula, left to right, non-overlapping.
///
/// Digit runs that are not followed by a `d`/`D` marker (modifiers like
/// the `2` in `3d6 + 2`) are not terms. A digit run too large for `u32`
/// is skipped entirely.
pub fn scan_dice_terms(text: &str) -> Vec<DiceTermMatch> {
    let bytes = text.as_bytes();
    let mut terms = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            // Skip one whole character, not one byte.
            i += text[i..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        let count_end = digit_run_end(bytes, i);
        let after_ws = whitespace_run_end(text, count_end);
        if after_ws >= bytes.len() || !matches!(bytes[after_ws], b'd' | b'D') {
            i = count_end;
            continue;
        }
        let marker = bytes[after_ws] as char;
        let Ok(count) = text[i..count_end].parse::<u32>() else {
            i = count_end;
            continue;
        };
        let faces_start = whitespace_run_end(text, after_ws + 1);
        let faces_end = digit_run_end(bytes, faces_start);
        let (faces, end) = if faces_end > faces_start {
            match text[faces_start..faces_end].parse::<u32>() {
                Ok(faces) => (Some(faces), faces_end),
                // Face run too large for u32: treat the term as having
                // no faces and leave the run as trailing text.
                Err(_) => (None, after_ws + 1),
            }
        } else {
            (None, after_ws + 1)
        };
        terms.push(DiceTermMatch {
            count,
            faces,
            marker,
            span: i..end,
        });
        i = end;
    }
    terms
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

fn whitespace_run_end(text: &str, start: usize) -> usize {
    let mut end = start;
    for c in text[start..].chars() {
        if c.is_whitespace() {
            end += c.len_utf8();
        } else {
            break;
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<&str> {
        scan_dice_terms(text)
            .into_iter()
            .map(|t| &text[t.span])
            .collect()
    }

    #[test]
    fn compact_term() {
        let terms = scan_dice_terms("3d6");
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].count, 3);
        assert_eq!(terms[0].faces, Some(6));
        assert_eq!(terms[0].marker, 'd');
        assert_eq!(terms[0].span, 0..3);
    }

    #[test]
    fn spaced_term_without_faces() {
        let terms = scan_dice_terms("3 D + 2");
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].count, 3);
        assert_eq!(terms[0].faces, None);
        assert_eq!(terms[0].marker, 'D');
        assert_eq!(terms[0].span, 0..3);
    }

    #[test]
    fn spaced_faces() {
        let terms = scan_dice_terms("12 d 8");
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].count, 12);
        assert_eq!(terms[0].faces, Some(8));
        assert_eq!(terms[0].span, 0..6);
    }

    #[test]
    fn modifier_digits_are_not_terms() {
        let terms = scan_dice_terms("3d6 + 2");
        assert_eq!(spans("3d6 + 2"), vec!["3d6"]);
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn multiple_terms() {
        assert_eq!(spans("3 D + 2 D"), vec!["3 D", "2 D"]);
        assert_eq!(spans("1d4+2d8"), vec!["1d4", "2d8"]);
    }

    #[test]
    fn zero_count_is_a_term() {
        let terms = scan_dice_terms("0 D4");
        assert_eq!(terms[0].count, 0);
        assert_eq!(terms[0].faces, Some(4));
    }

    #[test]
    fn bare_marker_without_count_is_not_a_term() {
        assert!(scan_dice_terms("d6").is_empty());
        assert!(scan_dice_terms("roll d6").is_empty());
    }

    #[test]
    fn canonical_defaults_faces_and_keeps_marker_case() {
        let terms = scan_dice_terms("3D");
        assert_eq!(terms[0].canonical(), "3D6");
        let terms = scan_dice_terms("3d3");
        assert_eq!(terms[0].canonical(), "3d3");
    }

    #[test]
    fn non_ascii_text_is_skipped_safely() {
        assert_eq!(spans("Stärke 2d6 über"), vec!["2d6"]);
    }

    #[test]
    fn empty_input() {
        assert!(scan_dice_terms("").is_empty());
    }
}
