/*!
 * Candidate password generation
 *
 * Enumerates every fixed-length string over a fixed alphabet in
 * lexicographic product order (leftmost position varies slowest), lazily
 * and resumable from an arbitrary candidate.
 */

use anyhow::{anyhow, Result};

/// Alphabet used by the CLI: decimal digits in ascending order.
pub const DIGITS: &str = "0123456789";

/// Total number of candidates of `length` over `alphabet`.
pub fn search_space(alphabet: &str, length: usize) -> u128 {
    (alphabet.chars().count() as u128)
        .checked_pow(length as u32)
        .unwrap_or(u128::MAX)
}

/// Fail-fast check that a resume candidate fits the configured alphabet
/// and length. Runs before any connection attempt is made.
pub fn validate_start(start: &str, alphabet: &str, length: usize) -> Result<()> {
    let got = start.chars().count();
    if got != length {
        return Err(anyhow!("start value must be {} characters, got {}", length, got));
    }
    if let Some(bad) = start.chars().find(|c| !alphabet.contains(*c)) {
        return Err(anyhow!("start value contains '{}', which is not a valid candidate character", bad));
    }
    Ok(())
}

/// Lazy enumeration of fixed-length candidates.
///
/// Works like an odometer over alphabet indices: the rightmost position
/// advances first and carries leftward. Resuming seeks directly to the
/// start candidate's index positions, so the emitted sequence is exactly
/// the suffix of the full enumeration beginning at that candidate.
pub struct Candidates {
    alphabet: Vec<char>,
    indices: Vec<usize>,
    done: bool,
}

impl Candidates {
    /// Enumerate the full product, beginning at the first candidate.
    pub fn new(alphabet: &str, length: usize) -> Self {
        let alphabet: Vec<char> = alphabet.chars().collect();
        let done = alphabet.is_empty() || length == 0;
        Self {
            alphabet,
            indices: vec![0; length],
            done,
        }
    }

    /// Resume the enumeration at `start`, inclusive.
    ///
    /// If `start` never occurs in the product (wrong length, or a
    /// character outside the alphabet), the sequence is empty rather
    /// than an error; callers validate up front when that should be
    /// fatal.
    pub fn starting_at(alphabet: &str, length: usize, start: &str) -> Self {
        let mut generator = Self::new(alphabet, length);
        if generator.done {
            return generator;
        }
        if start.chars().count() != length {
            generator.done = true;
            return generator;
        }
        for (pos, c) in start.chars().enumerate() {
            match generator.alphabet.iter().position(|&a| a == c) {
                Some(idx) => generator.indices[pos] = idx,
                None => {
                    generator.done = true;
                    return generator;
                }
            }
        }
        generator
    }
}

impl Iterator for Candidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let candidate: String = self.indices.iter().map(|&i| self.alphabet[i]).collect();
        for pos in (0..self.indices.len()).rev() {
            self.indices[pos] += 1;
            if self.indices[pos] < self.alphabet.len() {
                return Some(candidate);
            }
            self.indices[pos] = 0;
        }
        self.done = true;
        Some(candidate)
    }
}
