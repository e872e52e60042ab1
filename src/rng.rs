//! Injected randomness for the cosmetic generators.
//!
//! Impact zones and mock posts take a `&mut impl RandomSource` instead of
//! reaching for a global generator, so tests can pin every draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform samples.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick from an empty set");
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let idx = (self.next_unit() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Build the generator used by the front ends.
///
/// A fixed seed makes polygons and hashtag picks reproducible across runs.
#[must_use]
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    pos: usize,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "sequence must not be empty");
        Self { values, pos: 0 }
    }

    /// A source that always yields `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

#[cfg(test)]
impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = make_rng(Some(42));
        let mut b = make_rng(Some(42));
        for _ in 0..16 {
            assert!((a.next_unit() - b.next_unit()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_unit_range() {
        let mut rng = make_rng(None);
        for _ in 0..1_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = SequenceRandom::new([0.0, 0.26, 0.5, 0.9999]);
        assert_eq!(rng.next_index(4), 0);
        assert_eq!(rng.next_index(4), 1);
        assert_eq!(rng.next_index(4), 2);
        assert_eq!(rng.next_index(4), 3);
        // wraps
        assert_eq!(rng.next_index(4), 0);
    }
}
