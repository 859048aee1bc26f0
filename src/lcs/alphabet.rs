// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-token character→position maps feeding the LCS kernels.
//!
//! A token of length ≤ [`WORD_BITS`](super::WORD_BITS) gets a bitset per
//! character (bit *i* set when the character occurs at position *i*), which
//! is what the bit-parallel kernels consume. Longer tokens get an ascending
//! position list per character, terminated by a [`POS_INF`] sentinel, which
//! is what the block-list kernel consumes.

use std::collections::HashMap;

use super::{Word, WORD_BITS};

/// Sentinel terminating every position list. Reads as "no further match".
pub const POS_INF: u32 = u32::MAX;

/// Character→position map for one query token.
#[derive(Debug, Clone)]
pub enum Alphabet {
    /// Bit *i* of `map[c]` set ⇔ `token[i] == c`. Token length ≤ 64.
    Bits(HashMap<char, Word>),
    /// Ascending occurrence positions per character, `POS_INF`-terminated.
    /// Token length > 64.
    Positions(HashMap<char, Vec<u32>>),
}

impl Alphabet {
    /// Build the map appropriate for the token's length.
    pub fn of(token: &[char]) -> Alphabet {
        if token.len() <= WORD_BITS {
            Alphabet::Bits(bitset_map(token))
        } else {
            Alphabet::Positions(position_map(token))
        }
    }
}

/// Bitset map for a token of length ≤ 64.
pub(crate) fn bitset_map(token: &[char]) -> HashMap<char, Word> {
    debug_assert!(token.len() <= WORD_BITS);
    let mut map: HashMap<char, Word> = HashMap::with_capacity(token.len());
    for (i, &c) in token.iter().enumerate() {
        *map.entry(c).or_insert(0) |= 1 << i;
    }
    map
}

/// Position-list map for a token of any length, sentinel appended.
pub(crate) fn position_map(token: &[char]) -> HashMap<char, Vec<u32>> {
    let mut map: HashMap<char, Vec<u32>> = HashMap::new();
    for (i, &c) in token.iter().enumerate() {
        map.entry(c).or_default().push(i as u32);
    }
    for positions in map.values_mut() {
        positions.push(POS_INF);
    }
    map
}
