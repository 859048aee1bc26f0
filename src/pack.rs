// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Packing query tokens into machine-word groups.
//!
//! Several short query tokens share one DP word: each token is laid out at a
//! bit offset, the combined alphabet maps every character to its positions
//! across all packed tokens, and the `gate` mask (0 at every token's top
//! bit) keeps kernel carries from leaking between neighbours. One packed
//! pass then scores every token of the group against a field token.
//!
//! Packing is greedy over the declared token order: a token of length `l`
//! joins the current group iff `offset + l ≤ 64`. Over-width tokens form
//! their own group with a position-list alphabet and an all-ones gate.
//!
//! Each group carries the per-slot scratch the composer mutates during a
//! search (`score_item`, `score_field`, `field_pos`); the scratch is zeroed
//! per record, never reallocated.

use std::collections::HashMap;

use crate::config::Options;
use crate::lcs::bitpar::{lane_llcs, llcs_packed_row};
use crate::lcs::{
    common_prefix, low_mask, rel_size_ok, score_map, score_of, Alphabet, Word, WORD_BITS,
};

/// A group of query tokens sharing one alphabet, plus its scoring scratch.
#[derive(Debug, Clone)]
pub(crate) struct TokenGroup {
    /// Packed tokens, in declared order.
    pub tokens: Vec<Vec<char>>,
    /// Bit offset of each token inside the word (unused for the long case).
    pub offsets: Vec<usize>,
    /// Combined bitset alphabet, or a position list for one over-width token.
    pub alphabet: Alphabet,
    /// Carry gate: 1 everywhere but each packed token's top bit.
    pub gate: Word,
    /// Per-slot best across the whole record (search scratch).
    pub score_item: Vec<f64>,
    /// Per-slot best within the current field (search scratch).
    pub score_field: Vec<f64>,
    /// Leaf-token index achieving `score_field` (search scratch).
    pub field_pos: Vec<usize>,
}

impl TokenGroup {
    fn packed(tokens: Vec<Vec<char>>, offsets: Vec<usize>, map: HashMap<char, Word>, gate: Word) -> Self {
        let slots = tokens.len();
        TokenGroup {
            tokens,
            offsets,
            alphabet: Alphabet::Bits(map),
            gate,
            score_item: vec![0.0; slots],
            score_field: vec![0.0; slots],
            field_pos: vec![0; slots],
        }
    }

    fn long(token: Vec<char>) -> Self {
        let alphabet = Alphabet::of(&token);
        TokenGroup {
            tokens: vec![token],
            offsets: vec![0],
            alphabet,
            gate: !0,
            score_item: vec![0.0],
            score_field: vec![0.0],
            field_pos: vec![0],
        }
    }

    /// Number of token slots in this group.
    #[inline]
    pub fn slots(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the group holds a single token (scored by the single-token
    /// kernels rather than the packed pass).
    #[inline]
    pub fn is_single(&self) -> bool {
        self.tokens.len() == 1
    }

    /// Score the lone token of a single-token group against a field token.
    pub fn score_single(&self, b: &[char], opts: &Options) -> f64 {
        debug_assert!(self.is_single());
        score_map(&self.tokens[0], &self.alphabet, b, opts)
    }

    /// One packed pass: score every slot against field token `b`, writing
    /// into `out` (resized to the slot count).
    pub fn score_packed(&self, b: &[char], opts: &Options, out: &mut Vec<f64>) {
        out.clear();
        out.resize(self.slots(), 0.0);
        let Alphabet::Bits(map) = &self.alphabet else {
            return;
        };
        if b.is_empty() {
            return;
        }
        let row = llcs_packed_row(map, self.gate, b);
        let n = b.len();
        for (k, token) in self.tokens.iter().enumerate() {
            let m = token.len();
            if !rel_size_ok(m, n, opts) {
                continue;
            }
            let prefix = common_prefix(token, b);
            let llcs = lane_llcs(row, self.offsets[k], m, prefix);
            out[k] = score_of(m, n, llcs, prefix, opts);
        }
    }

    /// Zero the per-record scratch.
    pub fn reset_item_scratch(&mut self) {
        for slot in &mut self.score_item {
            *slot = 0.0;
        }
    }

    /// Zero the per-field scratch.
    pub fn reset_field_scratch(&mut self) {
        for slot in &mut self.score_field {
            *slot = 0.0;
        }
        for pos in &mut self.field_pos {
            *pos = 0;
        }
    }
}

/// Greedily pack an ordered token list into groups. Coverage equals the
/// input; declared order is preserved within and across groups.
pub(crate) fn pack_tokens(tokens: &[String]) -> Vec<TokenGroup> {
    let mut groups: Vec<TokenGroup> = Vec::new();

    let mut cur_tokens: Vec<Vec<char>> = Vec::new();
    let mut cur_offsets: Vec<usize> = Vec::new();
    let mut cur_map: HashMap<char, Word> = HashMap::new();
    let mut cur_gate: Word = 0;
    let mut offset = 0usize;

    macro_rules! flush {
        () => {
            if !cur_tokens.is_empty() {
                groups.push(TokenGroup::packed(
                    std::mem::take(&mut cur_tokens),
                    std::mem::take(&mut cur_offsets),
                    std::mem::take(&mut cur_map),
                    cur_gate,
                ));
                cur_gate = 0;
                offset = 0;
            }
        };
    }

    for token in tokens {
        let chars: Vec<char> = token.chars().collect();
        let len = chars.len();
        if len == 0 {
            continue;
        }
        if len > WORD_BITS {
            flush!();
            groups.push(TokenGroup::long(chars));
            continue;
        }
        if offset + len > WORD_BITS {
            flush!();
        }
        for (i, &c) in chars.iter().enumerate() {
            *cur_map.entry(c).or_insert(0) |= 1 << (offset + i);
        }
        cur_gate |= low_mask(len - 1) << offset;
        cur_offsets.push(offset);
        cur_tokens.push(chars);
        offset += len;
    }
    flush!();
    groups
}
