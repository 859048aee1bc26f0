// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Composition of token scores into field and record scores.
//!
//! Per record: every declared field is scored leaf by leaf, the best leaf
//! wins the field, the best field (after position boost) wins the record.
//! Tagged sub-queries add their score to their own field only. The record
//! score blends the best field with the per-token aggregate kept in the
//! query scratch, so a record matching every query token somewhere ranks
//! above one matching a single token well.
//!
//! # Order bonus
//!
//! Within a field, each query-token slot remembers which leaf token it
//! matched best. Consecutive slots matching in increasing leaf order earn
//! `bonus_token_order · 1/(1+|d|)`, doubled when the step moves forward
//! (`d > 0`). A slot below `minimum_match` neither earns the bonus nor
//! advances the order cursor. Near-ties deliberately prefer the
//! later-in-field occurrence so in-order matches collect the bonus.
//!
//! # Fused fallback
//!
//! With `score_test_fused`, the whole query is also scored against the
//! leaf's words joined by spaces; when that beats the token-wise sum (plus
//! the order bonus it gets for free), it replaces the field score. This is
//! what lets `"old man"` find `"oldman"`.

use crate::config::Options;
use crate::extract::Leaf;
use crate::lcs::score_map;
use crate::query::Query;

/// Best-field outcome for one record.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ItemScore {
    pub score: f64,
    pub field: usize,
    pub leaf: usize,
}

/// Score one record's fields against the query. Resets and fills the query
/// scratch; returns the blended record score with the winning field/leaf.
pub(crate) fn score_item(fields: &[Vec<Leaf>], query: &mut Query, opts: &Options) -> ItemScore {
    query.reset_scratch();

    let mut best = 0.0f64;
    let mut match_index = 0usize;
    let mut sub_index = 0usize;
    let mut position_bonus = 1.0f64;
    let mut packed_buf: Vec<f64> = Vec::new();

    for (field_index, leaves) in fields.iter().enumerate() {
        let mut field_best = 0.0f64;
        let mut field_leaf = 0usize;

        for (leaf_index, leaf) in leaves.iter().enumerate() {
            let tokens: Vec<Vec<char>> = leaf.tokens.iter().map(|t| t.chars().collect()).collect();

            let ns = if opts.score_per_token {
                let mut ns = score_field(leaf, &tokens, query, opts, &mut packed_buf);
                if let Some(child) = query.children.get_mut(field_index).and_then(Option::as_mut) {
                    ns += score_field(leaf, &tokens, child, opts, &mut packed_buf);
                }
                ns
            } else {
                let fused_field: Vec<char> = leaf
                    .fused_text(opts.token_fused_max_length)
                    .chars()
                    .collect();
                score_map(&query.fused, &query.fused_alpha, &fused_field, opts)
            };

            if ns > field_best {
                field_best = ns;
                field_leaf = leaf_index;
            }
        }

        let boosted = field_best * (1.0 + position_bonus);
        position_bonus *= opts.bonus_position_decay;

        if boosted > best {
            best = boosted;
            match_index = field_index;
            sub_index = field_leaf;
        }
        if boosted > opts.field_good_enough {
            break;
        }
    }

    let score = if opts.score_per_token {
        0.5 * best + 0.5 * query.score_item_total()
    } else {
        best
    };

    ItemScore {
        score,
        field: match_index,
        leaf: sub_index,
    }
}

/// Score one leaf's token list against one query segment. Updates the
/// segment's per-record scratch (`score_item`, `fused_score`) as a side
/// effect.
pub(crate) fn score_field(
    leaf: &Leaf,
    tokens: &[Vec<char>],
    query: &mut Query,
    opts: &Options,
    packed_buf: &mut Vec<f64>,
) -> f64 {
    if query.groups.is_empty() && !opts.score_test_fused {
        return 0.0;
    }

    let mut field_score = 0.0f64;
    let mut last_index: isize = -1;

    for group in &mut query.groups {
        group.reset_field_scratch();

        if group.is_single() {
            for (ti, token) in tokens.iter().enumerate() {
                let sc = group.score_single(token, opts);
                update_slot(group_slot(&mut group.score_field, &mut group.field_pos, 0), sc, ti, opts);
            }
        } else {
            for (ti, token) in tokens.iter().enumerate() {
                group.score_packed(token, opts, packed_buf);
                for (k, &sc) in packed_buf.iter().enumerate() {
                    update_slot(group_slot(&mut group.score_field, &mut group.field_pos, k), sc, ti, opts);
                }
            }
        }

        for k in 0..group.slots() {
            let sc = group.score_field[k];
            field_score += sc;
            if sc > opts.minimum_match {
                let this_index = group.field_pos[k] as isize;
                let d = this_index - last_index;
                let mut bo = opts.bonus_token_order / (1.0 + d.unsigned_abs() as f64);
                if d > 0 {
                    bo *= 2.0;
                }
                field_score += bo;
                last_index = this_index;
            }
            if sc > group.score_item[k] {
                group.score_item[k] = sc;
            }
        }
    }

    if opts.score_test_fused && !query.fused.is_empty() {
        let fused_field: Vec<char> = leaf
            .fused_text(opts.token_fused_max_length)
            .chars()
            .collect();
        let base = score_map(&query.fused, &query.fused_alpha, &fused_field, opts);
        if base > 0.0 {
            // Fused cannot be out of order, so it earns the bonus outright.
            let sc = base + opts.bonus_token_order;
            if sc > field_score {
                field_score = sc;
            }
            if sc > query.fused_score {
                query.fused_score = sc;
            }
        }
    }

    field_score
}

/// Borrow one slot's (best score, best index) pair.
#[inline]
fn group_slot<'a>(
    scores: &'a mut [f64],
    positions: &'a mut [usize],
    k: usize,
) -> (&'a mut f64, &'a mut usize) {
    (&mut scores[k], &mut positions[k])
}

/// Slot update: strict improvement, or a near-tie at a later leaf token
/// (the later occurrence wins so in-order pairs collect the order bonus).
#[inline]
fn update_slot((best, pos): (&mut f64, &mut usize), sc: f64, ti: usize, opts: &Options) {
    let near_tie =
        sc > 0.0 && *best > 0.0 && *best - sc <= opts.bonus_token_order && ti > *pos;
    if sc > *best || near_tie {
        *best = sc;
        *pos = ti;
    }
}
