// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Rendering a matched field with highlight markers.
//!
//! The raw string is split into tokens and separator runs — the output is
//! rebuilt from the raw character stream, so original whitespace and
//! punctuation survive untouched. Query tokens are paired 1-to-1 with field
//! tokens by the assignment solver; each pair contributes alignment spans,
//! mapped back into raw character positions through the per-character fold
//! (which is strictly 1:1 with the raw text).
//!
//! When the fused pass beats the token-wise pairing — the `"oldman"` case —
//! the whole folded field is aligned against the fused query as one token.

use crate::align::align;
use crate::assign::match_tokens;
use crate::config::Options;
use crate::lcs::{score_map, Alphabet};
use crate::normalize::fold_char;
use crate::query::Query;

/// One token of the raw string: folded chars plus its char offset.
struct RawToken {
    chars: Vec<char>,
    start: usize,
}

#[inline]
fn is_sep(c: char, opts: &Options) -> bool {
    opts.token_sep.contains(c) || c.is_whitespace()
}

/// Fold every raw char 1:1 and split into tokens with their positions.
fn split_folded(raw: &str, opts: &Options) -> (Vec<char>, Vec<RawToken>) {
    let folded: Vec<char> = raw.chars().map(fold_char).collect();
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, &c) in folded.iter().enumerate() {
        if is_sep(c, opts) {
            if let Some(s) = start.take() {
                tokens.push(RawToken {
                    chars: folded[s..i].to_vec(),
                    start: s,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(RawToken {
            chars: folded[s..].to_vec(),
            start: s,
        });
    }
    (folded, tokens)
}

/// Every token of a query, children included, with prebuilt alphabets.
fn query_tokens(query: &Query) -> Vec<(Vec<char>, Alphabet)> {
    let mut out: Vec<(Vec<char>, Alphabet)> = Vec::new();
    let mut gather = |q: &Query| {
        for token in &q.tokens {
            let chars: Vec<char> = token.chars().collect();
            let alpha = Alphabet::of(&chars);
            out.push((chars, alpha));
        }
    };
    gather(query);
    for child in query.children.iter().flatten() {
        gather(child);
    }
    out
}

/// Highlight `raw` against a parsed query.
pub(crate) fn highlight(raw: &str, query: &Query, opts: &Options) -> String {
    let (folded, field_tokens) = split_folded(raw, opts);
    let queries = query_tokens(query);
    if queries.is_empty() || field_tokens.is_empty() {
        return raw.to_string();
    }

    // Pairwise scores feed both the assignment and the fused comparison.
    let matrix: Vec<Vec<f64>> = queries
        .iter()
        .map(|(qc, alpha)| {
            field_tokens
                .iter()
                .map(|ft| score_map(qc, alpha, &ft.chars, opts))
                .collect()
        })
        .collect();
    let assignment = match_tokens(&matrix, opts);

    // Fused fallback: score the whole field as one string, mirroring the
    // composer's fused pass (and only when that pass is enabled).
    let fused_total = if opts.score_test_fused {
        let mut joined: Vec<char> = Vec::new();
        for (k, ft) in field_tokens.iter().enumerate() {
            if k > 0 {
                joined.push(' ');
            }
            joined.extend_from_slice(&ft.chars);
        }
        joined.truncate(opts.token_fused_max_length);
        let base = score_map(&query.fused, &query.fused_alpha, &joined, opts);
        if base > 0.0 {
            base + opts.bonus_token_order
        } else {
            0.0
        }
    } else {
        0.0
    };

    let mut spans: Vec<(usize, usize)> = Vec::new();
    if fused_total > assignment.total {
        spans = align(&query.fused, &folded, opts);
    } else {
        for (qi, tj) in assignment.pairs {
            let token = &field_tokens[tj];
            for (s, e) in align(&queries[qi].0, &token.chars, opts) {
                spans.push((token.start + s, token.start + e));
            }
        }
    }
    if spans.is_empty() {
        return raw.to_string();
    }

    spans.sort_unstable();
    emit(raw, &spans, opts)
}

/// Rebuild the raw string with markers around the spans. Overlapping or
/// touching spans collapse into one marked slice.
fn emit(raw: &str, spans: &[(usize, usize)], opts: &Options) -> String {
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for &(s, e) in spans {
        if e <= s {
            continue;
        }
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }

    let mut out = String::with_capacity(raw.len() + merged.len() * 16);
    let mut next = merged.iter().peekable();
    let mut open_end: Option<usize> = None;
    for (i, c) in raw.chars().enumerate() {
        if open_end.is_none() {
            if let Some(&&(s, e)) = next.peek() {
                if i == s {
                    out.push_str(&opts.highlight_before);
                    open_end = Some(e);
                    next.next();
                }
            }
        }
        out.push(c);
        if open_end == Some(i + 1) {
            out.push_str(&opts.highlight_after);
            open_end = None;
        }
    }
    out
}
