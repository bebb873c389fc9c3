//! # Ports
//!
//! Trait contracts for the two things the nodes need from outside pure
//! logic: a seeded index draw and the wall clock.
//!
//! Adapters implement these; tests substitute fixed implementations.

use chrono::NaiveDateTime;

use crate::core::{PackError, PackResult};

/// Draw an index in `[0, len)` determined only by `seed` and `len`
pub trait IndexPicker: Send + Sync {
    /// Pick an index
    ///
    /// Fails with `EmptyInput` when `len == 0`.
    fn pick(&self, len: usize, seed: u64) -> PackResult<usize>;

    /// Name of the algorithm, for logs
    fn name(&self) -> &'static str;
}

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Shared guard for pickers: a zero-length draw has no valid answer
pub(crate) fn ensure_non_empty(len: usize) -> PackResult<()> {
    if len == 0 {
        Err(PackError::EmptyInput)
    } else {
        Ok(())
    }
}

/// Picker that always answers `index % len`
///
/// Lets host-level tests pin the selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker {
    pub index: usize,
}

impl FixedPicker {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl IndexPicker for FixedPicker {
    fn pick(&self, len: usize, _seed: u64) -> PackResult<usize> {
        ensure_non_empty(len)?;
        Ok(self.index % len)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
