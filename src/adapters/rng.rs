//! # Seeded Index Picker
//!
//! ChaCha20 (`rand_chacha::ChaCha20Rng`) seeded with
//! `SeedableRng::seed_from_u64`, then one `Rng::random_range(0..len)` draw.
//!
//! Both steps are specified by the `rand` 0.9 family and do not depend on
//! the platform's pointer width, so a seed picks the same index everywhere.
//! The draw does not reproduce Python's `random.SystemRandom` sequence.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::core::PackResult;
use crate::ports::{ensure_non_empty, IndexPicker};

/// Deterministic-per-seed index picker
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaChaPicker;

impl ChaChaPicker {
    pub fn new() -> Self {
        Self
    }
}

impl IndexPicker for ChaChaPicker {
    fn pick(&self, len: usize, seed: u64) -> PackResult<usize> {
        ensure_non_empty(len)?;
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Ok(rng.random_range(0..len))
    }

    fn name(&self) -> &'static str {
        "chacha20"
    }
}
