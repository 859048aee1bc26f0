// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Block-list LCS length for query tokens longer than the machine word
//! (Hyyrö 2009).
//!
//! The DP row is kept as an ascending list of half-open `[start, end)`
//! blocks; every position inside a block is a "rise" of the row (equivalently
//! a Hunt–Szymanski threshold). Blocks are disjoint and non-adjacent —
//! adjacent runs are merged as they are emitted.
//!
//! Per character of the field token, the old row is merge-walked against the
//! character's ascending match-position list:
//! - a match strictly between the previous rise and a block's start replaces
//!   that block's first rise (the block's remainder, if any, is split off);
//! - a replacement landing exactly at the previous new block's end extends
//!   that block by one;
//! - blocks with no qualifying match are copied verbatim;
//! - a match beyond the last rise appends one new rise and bumps the row's
//!   LCS count (at most once per character).
//!
//! Match positions below the common prefix are skipped; the field token is
//! scanned from the prefix; the caller gets `prefix + llcs` back.

use std::collections::HashMap;

use super::alphabet::POS_INF;

/// Append a single rise, merging with the previous block when adjacent.
#[inline]
fn push_rise(row: &mut Vec<(u32, u32)>, q: u32) {
    if let Some(last) = row.last_mut() {
        if last.1 == q {
            last.1 = q + 1;
            return;
        }
    }
    row.push((q, q + 1));
}

/// Append a whole block, merging with the previous block when adjacent.
#[inline]
fn push_block(row: &mut Vec<(u32, u32)>, start: u32, end: u32) {
    if let Some(last) = row.last_mut() {
        if last.1 == start {
            last.1 = end;
            return;
        }
    }
    row.push((start, end));
}

/// LCS length via the block-list row, for a position-list alphabet.
///
/// `map` holds ascending, `POS_INF`-terminated occurrence lists for the
/// query token's characters; `b` is the field token; `prefix` their common
/// prefix length.
pub(crate) fn llcs_blocks(
    map: &HashMap<char, Vec<u32>>,
    prefix: usize,
    b: &[char],
) -> usize {
    let floor = prefix as u32;
    let mut llcs: usize = 0;
    let mut old: Vec<(u32, u32)> = Vec::new();
    let mut next: Vec<(u32, u32)> = Vec::new();

    for &c in &b[prefix..] {
        let Some(positions) = map.get(&c) else {
            continue;
        };

        next.clear();
        next.reserve((2 * old.len()).min(llcs + 2));
        let mut cursor = 0usize;
        let mut lower = floor;
        let mut changed = false;

        // Old blocks plus a virtual sentinel block at +inf.
        for index in 0..=old.len() {
            let (start, end) = if index < old.len() {
                old[index]
            } else {
                (POS_INF, POS_INF)
            };

            while positions[cursor] < lower {
                cursor += 1;
            }
            let q = positions[cursor];

            if q < start {
                changed = true;
                push_rise(&mut next, q);
                if index == old.len() {
                    // Dominant match past the last rise: the row grows.
                    llcs += 1;
                } else if end > start + 1 {
                    push_block(&mut next, start + 1, end);
                }
            } else if index < old.len() {
                push_block(&mut next, start, end);
            }

            if index < old.len() {
                lower = end;
            }
        }

        if changed {
            std::mem::swap(&mut old, &mut next);
        }
    }

    prefix + llcs
}
