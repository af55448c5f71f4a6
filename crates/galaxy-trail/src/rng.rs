//! Deterministic random numbers for trail generation.
//!
//! Every generation run owns its own [`Rng`], seeded by the caller, so the
//! same seed and config always produce the same trail. No global state.

use std::f64::consts::TAU;

/// Seedable 64-bit LCG (Knuth MMIX multiplier and increment).
///
/// Plenty for jittering candidate points, and cheap enough to draw thousands
/// of samples per placed point.
///
/// ```
/// use galaxy_trail::rng::Rng;
///
/// let mut a = Rng::new(2024);
/// let mut b = Rng::new(2024);
/// assert_eq!(a.next_angle(), b.next_angle());
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Any seed is valid, including 0.
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Random f64 in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        // High bits have the longest period in an LCG
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Random f64 in `[min, max)`.
    #[inline]
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Random angle in `[0, 2pi)`.
    #[inline]
    pub fn next_angle(&mut self) -> f64 {
        self.next_f64() * TAU
    }

    /// `1.0` or `-1.0` with equal probability.
    #[inline]
    pub fn next_sign(&mut self) -> f64 {
        if self.next_f64() < 0.5 { -1.0 } else { 1.0 }
    }

    /// True with `probability`.
    pub fn next_bool(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Random index in `[0, len)`. `len` must be non-zero.
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}
