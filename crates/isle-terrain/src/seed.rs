//! Seed resolution and seed-to-offset derivation.
//!
//! A seed string never reaches the noise function directly. It is reduced to
//! two scalar offsets that shift the sampling coordinates, so the same seed
//! always lands on the same patch of noise.

use std::ops::RangeInclusive;

use rand::Rng;

const VOWELS: &[u8] = b"aeiou";
const CONSONANTS: &[u8] = b"bcdfghjklmnpqrstvwxyz";

/// Range the length of an auto-generated seed is drawn from.
pub const RANDOM_SEED_LENGTH: RangeInclusive<usize> = 5..=10;

// ---------------------------------------------------------------------------
// Random seeds
// ---------------------------------------------------------------------------

/// Synthesize a pronounceable seed.
///
/// `length` is rounded up to even and filled with alternating vowel/consonant
/// pairs. Half the time one extra consonant is prepended. The first character
/// is upper-cased.
pub fn random_seed<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let length = length + length % 2;
    let mut body = String::with_capacity(length + 1);
    for _ in 0..length / 2 {
        body.push(pick(rng, VOWELS));
        body.push(pick(rng, CONSONANTS));
    }

    let seed = if rng.random_bool(0.5) {
        let mut prefixed = String::with_capacity(body.len() + 1);
        prefixed.push(pick(rng, CONSONANTS));
        prefixed.push_str(&body);
        prefixed
    } else {
        body
    };

    capitalize(&seed)
}

/// Pick the seed a run should use.
///
/// Returns `configured` unchanged unless it is empty or `random` is set, in
/// which case a fresh pronounceable seed is drawn from `rng`.
pub fn resolve_seed<R: Rng + ?Sized>(configured: &str, random: bool, rng: &mut R) -> String {
    if random || configured.is_empty() {
        let length = rng.random_range(RANDOM_SEED_LENGTH);
        random_seed(rng, length)
    } else {
        configured.to_string()
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8]) -> char {
    alphabet[rng.random_range(0..alphabet.len())] as char
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Offsets
// ---------------------------------------------------------------------------

/// Noise-space offsets derived from a seed string.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SeedOffsets {
    /// Added to every cell's X before sampling.
    pub x: f64,
    /// Added to every cell's Y before sampling.
    pub y: f64,
}

impl SeedOffsets {
    /// Derive offsets from a seed.
    ///
    /// The seed is split at `len / 2` characters (a one-character seed is
    /// doubled first); X sums the character codes of the first half and Y
    /// those of the second half, which keeps the odd character.
    pub fn from_seed(seed: &str) -> Self {
        let mut chars: Vec<char> = seed.chars().collect();
        if chars.len() == 1 {
            chars.push(chars[0]);
        }
        let (first, second) = chars.split_at(chars.len() / 2);
        Self {
            x: sum_codes(first),
            y: sum_codes(second),
        }
    }
}

fn sum_codes(chars: &[char]) -> f64 {
    chars.iter().map(|&c| u32::from(c) as f64).sum()
}
