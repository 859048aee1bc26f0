// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Local alignment for highlight spans (Smith–Waterman–Gotoh).
//!
//! Affine gaps: opening costs `W_OPEN`, continuing costs `W_EXTEND`, a
//! matched character earns `W_MATCH`; mismatches are never taken diagonally.
//! One full traceback table is kept (spans need it); the value and A-gap
//! state are O(n) rows.
//!
//! With `score_acronym`, a match whose predecessor on either side is a
//! separator (or the string start) earns an extra `W_MATCH` per such side,
//! so an acronym query aligns onto token initials instead of scattering
//! through the text.
//!
//! Traceback starts at the global maximum and walks toward STOP. Diagonal
//! steps open or extend the current run; a gap longer than
//! `highlight_bridge_gap` closes it. Spans come back ascending, as
//! half-open `(start, end)` character positions in the field string.

use crate::config::Options;
use crate::lcs::common_prefix;

const W_MATCH: f64 = 100.0;
const W_OPEN: f64 = -10.0;
const W_EXTEND: f64 = -1.0;

const STOP: u8 = 0;
const UP: u8 = 1;
const LEFT: u8 = 2;
const DIAGONAL: u8 = 3;

#[inline]
fn is_sep(c: char, opts: &Options) -> bool {
    opts.token_sep.contains(c) || c.is_whitespace()
}

/// Align query token `a` against field token `b`; return ascending match
/// spans over `b` in character positions.
pub(crate) fn align(a: &[char], b: &[char], opts: &Options) -> Vec<(usize, usize)> {
    let a_full = &a[..a.len().min(opts.token_query_max_length)];
    let b_full = &b[..b.len().min(opts.token_field_max_length)];

    // The shared prefix is part of the LCS but not necessarily of the best
    // local alignment; when requested it is pinned before the DP instead.
    let prefix = if opts.highlight_prefix {
        common_prefix(a_full, b_full)
    } else {
        0
    };
    let a = &a_full[prefix..];
    let b = &b_full[prefix..];

    let m = a.len();
    let n = b.len();
    let mut spans: Vec<(usize, usize)> = Vec::new();

    if m > 0 && n > 0 {
        let mut value = vec![0.0f64; n + 1];
        let mut gap_a = vec![f64::NEG_INFINITY; n + 1];
        let mut trace = vec![STOP; (m + 1) * (n + 1)];

        let mut best = 0.0f64;
        let (mut best_i, mut best_j) = (0usize, 0usize);

        for i in 1..=m {
            let mut diag = value[0];
            let mut gap_b = f64::NEG_INFINITY;

            for j in 1..=n {
                let up = value[j];
                gap_a[j] = (value[j] + W_OPEN).max(gap_a[j] + W_EXTEND);
                gap_b = (value[j - 1] + W_OPEN).max(gap_b + W_EXTEND);

                let mut cell = 0.0f64;
                let mut dir = STOP;
                if a[i - 1] == b[j - 1] {
                    let mut sc = diag + W_MATCH;
                    if opts.score_acronym {
                        // Token initials pair up cheaply for acronym queries.
                        if i == 1 || is_sep(a[i - 2], opts) {
                            sc += W_MATCH;
                        }
                        if j == 1 || is_sep(b[j - 2], opts) {
                            sc += W_MATCH;
                        }
                    }
                    if sc > cell {
                        cell = sc;
                        dir = DIAGONAL;
                    }
                }
                if gap_a[j] > cell {
                    cell = gap_a[j];
                    dir = UP;
                }
                if gap_b > cell {
                    cell = gap_b;
                    dir = LEFT;
                }

                value[j] = cell;
                trace[i * (n + 1) + j] = dir;
                if cell > best {
                    best = cell;
                    best_i = i;
                    best_j = j;
                }
                diag = up;
            }
        }

        // Walk back from the maximum, splitting runs at bridged-out gaps.
        let (mut i, mut j) = (best_i, best_j);
        let mut run: Option<(usize, usize)> = None;
        let mut gap = 0usize;
        while i > 0 && j > 0 {
            match trace[i * (n + 1) + j] {
                DIAGONAL => {
                    run = match run {
                        Some(span) if gap > opts.highlight_bridge_gap => {
                            spans.push(span);
                            Some((j - 1, j))
                        }
                        Some((_, end)) => Some((j - 1, end)),
                        None => Some((j - 1, j)),
                    };
                    gap = 0;
                    i -= 1;
                    j -= 1;
                }
                UP => {
                    gap += 1;
                    i -= 1;
                }
                LEFT => {
                    gap += 1;
                    j -= 1;
                }
                _ => break,
            }
        }
        if let Some(span) = run {
            spans.push(span);
        }
        spans.reverse();
    }

    if prefix > 0 {
        for span in &mut spans {
            span.0 += prefix;
            span.1 += prefix;
        }
        match spans.first().copied() {
            Some((start, _)) if start == prefix => spans[0].0 = 0,
            _ => spans.insert(0, (0, prefix)),
        }
    }

    spans
}
