//! # Adapters
//!
//! Implementations of the port traits, plus the Python surface:
//! - `ChaChaPicker`: seeded index draw
//! - `SystemClock` / `FixedClock`: wall clock
//! - Python bindings (when enabled)

pub mod clock;
pub mod rng;

#[cfg(feature = "python")]
pub mod python;

pub use clock::{FixedClock, SystemClock};
pub use rng::ChaChaPicker;
