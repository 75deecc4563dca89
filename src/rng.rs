//! Random sources for obstacle generation
//!
//! Generators never reach for a global RNG. They draw from a `RandomSource`
//! owned by the game, so tests can swap in a scripted sequence and assert an
//! exact spawn layout.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform `[0, 1)` samples, one per call
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Create a PCG source from a seed (the browser host seeds from the clock)
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed sequence of samples, wrapping around at the end
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Samples are clamped into `[0, 1)`; an empty script yields zeros
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always returns the same sample
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
