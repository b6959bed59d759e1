//! RNG module - deterministic token-kind generation
//!
//! A small LCG is enough here: the only requirement is a uniform draw over the
//! 16 color x shape kinds, and a fixed seed must replay the same match.

use crate::types::{Color, Shape, TokenKind, KIND_COUNT, SHAPE_COUNT};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses multiply-shift so the result depends on the high bits; the low
    /// bits of a power-of-two LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Draw a token kind uniformly from all color x shape combinations
    pub fn next_kind(&mut self) -> TokenKind {
        let idx = self.next_range(KIND_COUNT as u32) as usize;
        TokenKind::new(Color::ALL[idx / SHAPE_COUNT], Shape::ALL[idx % SHAPE_COUNT])
    }

    /// Current internal state (usable as a seed to continue the stream)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(16) < 16);
            assert!(rng.next_range(3) < 3);
        }
    }

    #[test]
    fn test_next_kind_hits_every_kind() {
        let mut rng = SimpleRng::new(42);
        let mut counts = [0u32; KIND_COUNT];
        for _ in 0..4000 {
            counts[rng.next_kind().index()] += 1;
        }
        // Roughly uniform: 250 expected per kind.
        for (idx, &count) in counts.iter().enumerate() {
            assert!(count > 150 && count < 350, "kind {} drawn {} times", idx, count);
        }
    }

    #[test]
    fn test_kind_stream_is_not_short_periodic() {
        let mut rng = SimpleRng::new(3);
        let first: Vec<usize> = (0..16).map(|_| rng.next_kind().index()).collect();
        let second: Vec<usize> = (0..16).map(|_| rng.next_kind().index()).collect();
        assert_ne!(first, second);
    }
}
