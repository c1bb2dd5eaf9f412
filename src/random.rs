//! Uniform random sources
//!
//! Every random decision of a release (positions, drift, tilt, duration,
//! easing) goes through [`RandomSource`], so tests can replay exact sequences.

/// A source of uniform samples in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// +1 or -1 with equal probability
    fn sign(&mut self) -> f64 {
        if self.next_unit() > 0.5 {
            1.0
        } else {
            -1.0
        }
    }

    /// Uniform sample in `[min, max)`
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min)
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64).floor() as usize).min(len.saturating_sub(1))
    }
}

/// Linear congruential generator, reproducible from its seed
#[derive(Debug, Clone)]
pub struct Lcg {
    seed: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(42)
    }
}

impl RandomSource for Lcg {
    fn next_unit(&mut self) -> f64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        self.seed as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Number of samples drawn so far
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Browser `Math.random`
#[derive(Debug, Clone, Copy, Default)]
pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_unit(&mut self) -> f64 {
        js_sys::Math::random()
    }
}
