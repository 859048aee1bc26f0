// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! LCS-length kernels and the score formula they feed.
//!
//! Three interchangeable kernels produce an LCS length:
//! [`bitpar::llcs_short`] for tokens that fit one machine word,
//! [`bitpar::llcs_packed_row`] for several query tokens packed into one
//! word, and [`blocks::llcs_blocks`] for over-width tokens. Selection is
//! purely by length; all three plug the same `llcs` into [`score_of`]:
//!
//! ```text
//! sz    = (m + n) / (2 · m · n)
//! score = sz · llcs² + bonus_match_start · prefix
//! ```
//!
//! The quadratic favours one long subsequence over many short fragments,
//! which is what makes "surgeo" find "surgery" before "survey".

pub(crate) mod alphabet;
pub(crate) mod bitpar;
pub(crate) mod blocks;

pub use alphabet::Alphabet;

use crate::config::Options;

/// The DP word. All packing decisions and the modular `+`/`-` carry tricks
/// operate at exactly this width.
pub(crate) type Word = u64;

/// Width of [`Word`] in bits.
pub(crate) const WORD_BITS: usize = Word::BITS as usize;

/// `m` consecutive low 1-bits; total for `m` up to the full word.
#[inline]
pub(crate) fn low_mask(m: usize) -> Word {
    if m >= WORD_BITS {
        !0
    } else {
        (1 << m) - 1
    }
}

/// Common prefix length of two char slices.
#[inline]
pub(crate) fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Relative-size guard: pairs whose lengths are too dissimilar score zero
/// before any kernel runs.
#[inline]
pub(crate) fn rel_size_ok(m: usize, n: usize, opts: &Options) -> bool {
    let m = m as f64;
    let n = n as f64;
    n >= opts.token_min_rel_size * m && n <= opts.token_max_rel_size * m
}

/// The score formula shared by all kernels.
#[inline]
pub(crate) fn score_of(m: usize, n: usize, llcs: usize, prefix: usize, opts: &Options) -> f64 {
    let sz = (m + n) as f64 / (2.0 * m as f64 * n as f64);
    sz * (llcs * llcs) as f64 + opts.bonus_match_start * prefix as f64
}

/// Score one query token (with its prebuilt alphabet) against one field
/// token. This is the single-token entry used by fused scoring, the
/// assignment matrix, and single-token groups.
pub(crate) fn score_map(a: &[char], alpha: &Alphabet, b: &[char], opts: &Options) -> f64 {
    let m = a.len();
    let n = b.len();
    if m == 0 || n == 0 || !rel_size_ok(m, n, opts) {
        return 0.0;
    }
    let prefix = common_prefix(a, b);
    let llcs = if prefix == m.min(n) {
        prefix
    } else {
        match alpha {
            Alphabet::Bits(map) => bitpar::llcs_short(map, m, prefix, b),
            Alphabet::Positions(map) => blocks::llcs_blocks(map, prefix, b),
        }
    };
    score_of(m, n, llcs, prefix, opts)
}
