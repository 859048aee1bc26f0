// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text normalisation for matching.
//!
//! Matching happens on a folded form of the text: lowercase, a fixed table of
//! Latin diacritics replaced by their base letters, and runs of separator
//! characters collapsed to a single space. Unknown non-ASCII code points pass
//! through unchanged.
//!
//! Two entry points:
//! - [`normalize`] — the full fold used when indexing and parsing queries.
//! - [`fold_char`] — the per-character fold used by the highlighter, which
//!   needs a strict 1:1 mapping between folded and raw characters so that
//!   alignment spans can be sliced back out of the raw string.
//!
//! Invariant: `normalize(normalize(s)) == normalize(s)`.

/// Fold a single character: lowercase plus diacritic replacement.
///
/// One char in, one char out. Multi-char lowercase expansions (rare outside
/// Latin-1) keep their first char so the highlighter's positions stay aligned
/// with the raw string.
#[inline]
pub fn fold_char(c: char) -> char {
    let lower = if c.is_ascii() {
        c.to_ascii_lowercase()
    } else {
        c.to_lowercase().next().unwrap_or(c)
    };
    fold_diacritic(lower)
}

/// The fixed diacritic table. Anything not listed passes through.
#[inline]
fn fold_diacritic(c: char) -> char {
    match c {
        'ã' | 'à' | 'á' | 'ä' | 'â' | 'æ' => 'a',
        'ẽ' | 'è' | 'é' | 'ë' | 'ê' => 'e',
        'ì' | 'í' | 'ï' | 'î' => 'i',
        'õ' | 'ò' | 'ó' | 'ö' | 'ô' | 'œ' => 'o',
        'ù' | 'ú' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

/// Normalise a string for matching: fold every character, then collapse
/// runs of `separators` into a single space and trim the ends.
///
/// Total and deterministic; empty input yields the empty string.
pub fn normalize(value: &str, separators: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_sep = false;
    for raw in value.chars() {
        let c = fold_char(raw);
        if separators.contains(c) || c.is_whitespace() {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push(' ');
                pending_sep = false;
            }
            out.push(c);
        }
    }
    out
}

/// Length of the common prefix of two strings, in characters.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(ca, cb)| ca == cb)
        .count()
}
