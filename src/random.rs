//! Injectable randomness.
//!
//! Every random decision the engine makes — spiral seed factors, particle
//! lane spread, kill-radius factor, breathing targets, generator delays —
//! flows through [`RandomSource`] so tests can supply deterministic
//! sequences. Production code uses [`ThreadRandom`]; tests use
//! [`SequenceRandom`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random `f32` values in `[0, 1)`.
///
/// Object-safe on purpose: engine types hold `&mut dyn RandomSource` or
/// `Box<dyn RandomSource>`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform value in `[min, max)`.
    fn in_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Pick a uniformly random element of `items`.
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = (rng.next_f32() * items.len() as f32) as usize;
    items.get(index.min(items.len() - 1))
}

/// Production random source backed by a `SmallRng`.
pub struct ThreadRandom {
    rng: SmallRng,
}

impl ThreadRandom {
    /// Seed from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.rng.gen()
    }
}

/// Deterministic random source cycling a fixed sequence. Test double.
pub struct SequenceRandom {
    values: Vec<f32>,
    index: usize,
}

impl SequenceRandom {
    /// Cycle through `values` forever. An empty sequence yields 0.5.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, index: 0 }
    }

    /// A sequence that always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_cycles() {
        let mut rng = SequenceRandom::new(vec![0.1, 0.9]);
        assert_eq!(rng.next_f32(), 0.1);
        assert_eq!(rng.next_f32(), 0.9);
        assert_eq!(rng.next_f32(), 0.1);
    }

    #[test]
    fn test_in_range() {
        let mut rng = SequenceRandom::constant(0.5);
        assert_eq!(rng.in_range(10.0, 20.0), 15.0);
    }

    #[test]
    fn test_pick_bounds() {
        let items = [1, 2, 3];
        let mut low = SequenceRandom::constant(0.0);
        assert_eq!(pick(&mut low, &items), Some(&1));
        let mut high = SequenceRandom::constant(0.999_999);
        assert_eq!(pick(&mut high, &items), Some(&3));
        let empty: [i32; 0] = [];
        assert_eq!(pick(&mut low, &empty), None);
    }

    #[test]
    fn test_thread_random_in_unit_interval() {
        let mut rng = ThreadRandom::seeded(3);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
