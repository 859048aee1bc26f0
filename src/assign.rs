// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! 1-to-1 assignment of query tokens to field tokens.
//!
//! Given the pairwise score matrix, pick an injective column per row (rows
//! may also stay unmatched) maximising the score sum. Solved by depth-first
//! search over rows with memoisation keyed on `(depth, used_mask)`, where
//! `used_mask` is the word-wide set of already-taken columns; columns past
//! the word width are not considered. Walking the memo from the root with an
//! evolving mask reconstructs the winning assignment.
//!
//! A row only participates where its score clears
//! `max(minimum_match, thresh_relative_to_best · row_best)` — weak
//! almost-ties are dropped before the search, which keeps the mask space
//! small in practice.

use std::collections::HashMap;

use crate::config::Options;
use crate::lcs::WORD_BITS;

/// The resolved pairing: `(row, column)` per matched row, plus the total.
#[derive(Debug, Clone, Default)]
pub(crate) struct Assignment {
    pub pairs: Vec<(usize, usize)>,
    pub total: f64,
}

/// Solve the assignment for a rows×columns score matrix.
pub(crate) fn match_tokens(matrix: &[Vec<f64>], opts: &Options) -> Assignment {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Assignment::default();
    }

    // Acceptance floor per row; everything below participates as zero.
    let mut c: Vec<Vec<f64>> = Vec::with_capacity(rows);
    for row in matrix {
        let best = row.iter().cloned().fold(0.0f64, f64::max);
        let floor = opts.minimum_match.max(opts.thresh_relative_to_best * best);
        c.push(
            row.iter()
                .map(|&v| if v >= floor && v > 0.0 { v } else { 0.0 })
                .collect(),
        );
    }

    let live: Vec<usize> = (0..rows)
        .filter(|&i| c[i].iter().any(|&v| v > 0.0))
        .collect();
    match live.len() {
        0 => return Assignment::default(),
        1 => {
            // Single contributing row: take its best column directly.
            let i = live[0];
            let (j, &v) = c[i]
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .unwrap_or((0, &0.0));
            return Assignment {
                pairs: vec![(i, j)],
                total: v,
            };
        }
        _ => {}
    }

    // More rows than columns: flip roles so the mask covers the short side.
    if rows > cols {
        let flipped: Vec<Vec<f64>> = (0..cols)
            .map(|j| (0..rows).map(|i| c[i][j]).collect())
            .collect();
        let solved = solve(&flipped);
        return Assignment {
            pairs: solved.pairs.into_iter().map(|(i, j)| (j, i)).collect(),
            total: solved.total,
        };
    }

    solve(&c)
}

fn solve(c: &[Vec<f64>]) -> Assignment {
    let rows = c.len();
    let cols = c[0].len().min(WORD_BITS);
    let mut memo: HashMap<(usize, u64), (f64, i64)> = HashMap::new();
    best_from(0, 0, c, rows, cols, &mut memo);

    // Replay the cached decisions from the root.
    let mut pairs = Vec::new();
    let mut mask = 0u64;
    let total = memo.get(&(0, 0)).map_or(0.0, |&(v, _)| v);
    for depth in 0..rows {
        match memo.get(&(depth, mask)) {
            Some(&(_, col)) if col >= 0 => {
                pairs.push((depth, col as usize));
                mask |= 1 << col;
            }
            _ => {}
        }
    }
    Assignment { pairs, total }
}

/// Best achievable sum from `depth` on, given the taken-column mask.
/// Returns the value; the decision is cached for reconstruction.
fn best_from(
    depth: usize,
    mask: u64,
    c: &[Vec<f64>],
    rows: usize,
    cols: usize,
    memo: &mut HashMap<(usize, u64), (f64, i64)>,
) -> f64 {
    if depth == rows {
        return 0.0;
    }
    if let Some(&(value, _)) = memo.get(&(depth, mask)) {
        return value;
    }

    // Skipping this row is always an option.
    let mut best = best_from(depth + 1, mask, c, rows, cols, memo);
    let mut chosen: i64 = -1;
    for col in 0..cols {
        let bit = 1u64 << col;
        if mask & bit != 0 || c[depth][col] <= 0.0 {
            continue;
        }
        let value = c[depth][col] + best_from(depth + 1, mask | bit, c, rows, cols, memo);
        if value > best {
            best = value;
            chosen = col as i64;
        }
    }
    memo.insert((depth, mask), (best, chosen));
    best
}
