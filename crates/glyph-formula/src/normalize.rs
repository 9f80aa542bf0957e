//! Canonicalization of roll formulas.
//!
//! Informally-spaced dice terms (`"3 D"`, `"3d"`) are rewritten into
//! canonical `NdM` form with faces defaulted to six, producing a
//! formula an external dice roller can consume. `@`-references are
//! replaced by a stand-in `0` beforehand so they cannot interfere with
//! dice-term matching; this pass never consults the entity graph.

use crate::dice::scan_dice_terms;
use crate::token::scan_references;

/// Replace every `@`-reference occurrence in `text` with the literal
/// `0`.
pub fn strip_references(text: &str) -> String {
    let tokens = scan_references(text);
    if tokens.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for token in tokens {
        out.push_str(&text[cursor..token.span.start]);
        out.push('0');
        cursor = token.span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Normalize a roll formula into canonical dice notation.
///
/// References become `0`, every dice term is rewritten as
/// `{count}{d}{faces}` with no internal whitespace (missing faces
/// default to six), and the text between terms is trimmed and rejoined
/// with single spaces. A formula without dice terms comes back
/// reference-stripped and trimmed, otherwise unchanged.
pub fn normalize_roll_formula(formula: &str) -> String {
    let stripped = strip_references(formula);
    let terms = scan_dice_terms(&stripped);
    if terms.is_empty() {
        return stripped.trim().to_string();
    }
    let mut parts: Vec<String> = Vec::new();
    let mut cursor = 0;
    for term in &terms {
        let between = stripped[cursor..term.span.start].trim();
        if !between.is_empty() {
            parts.push(between.to_string());
        }
        parts.push(term.canonical());
        cursor = term.span.end;
    }
    let tail = stripped[cursor..].trim();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts.join(" ")
}
