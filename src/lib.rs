//! # ckpt-settings - Checkpoint Settings Bundles
//!
//! > "One knob box per checkpoint"
//!
//! Packs checkpoint and sampler settings into bundles that travel along a
//! node-graph image pipeline, combines them into lists, picks one by seed,
//! and turns a bundle into a filesystem-safe filename.
//!
//! ## Philosophy
//!
//! - **Absent is a value** - `Settings::Absent`, not a null map
//! - **Same seed, same pick** - ChaCha20, documented, platform-independent
//! - **Pure core, swappable adapters** - Hexagonal architecture
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ckpt-settings                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  CORE (pure data, no I/O)                                   │
//! │    SettingsBundle, Settings, PackConfig, template           │
//! │                                                              │
//! │  PORTS (trait contracts)                                     │
//! │    IndexPicker, Clock                                       │
//! │                                                              │
//! │  NODES (typed operations)                                    │
//! │    pack, unpack, tie, merge, random_select,                 │
//! │    random_number, to_filename                               │
//! │                                                              │
//! │  ADAPTERS (swappable implementations)                       │
//! │    ChaChaPicker, SystemClock, FixedClock                    │
//! │    API: Python bindings                                      │
//! │                                                              │
//! │  ENGINE (orchestration)                                      │
//! │    NodeHost, node registry                                  │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ckpt_settings::{NodeHost, PackConfig, SettingsBundle};
//!
//! let host = NodeHost::new(PackConfig::default());
//!
//! let a = host.pack(SettingsBundle::new("sd15/anime.safetensors", "Baked VAE"));
//! let b = host.pack(SettingsBundle::new("None", "Baked VAE"));
//!
//! let list = host.tie(None, [&a, &b]);
//! assert_eq!(list.size, 1);
//!
//! let picked = host.random_select(&list.settings_list, 42).unwrap();
//! assert_eq!(picked.index, 0);
//!
//! let name = host.to_filename(&picked.settings, Some("{ckpt_name}_{steps}")).unwrap();
//! assert_eq!(name, "anime_20");
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Core domain - pure data, no I/O
/// Contains: SettingsBundle, Settings, PackConfig, PackError, template
pub mod core;

/// Port definitions - trait contracts for adapters
/// Contains: IndexPicker trait, Clock trait
pub mod ports;

/// Node operations - one function per node
pub mod nodes;

/// Adapter implementations - swappable components
/// Contains: rng, clock, python submodules
pub mod adapters;

/// Engine - orchestration layer
/// Contains: NodeHost, registry, Value
pub mod engine;

// ============================================================================
// PYTHON BINDINGS (when enabled)
// ============================================================================

#[cfg(feature = "python")]
pub use adapters::python::*;

// ============================================================================
// RE-EXPORTS (public API)
// ============================================================================

// Core types
pub use crate::core::{FieldValue, LoraEntry, LoraStack, Settings, SettingsBundle, SettingsList};
pub use crate::core::config::PackConfig;
pub use crate::core::error::{PackError, PackResult};

// Port traits
pub use crate::ports::{Clock, IndexPicker};

// Adapters
pub use crate::adapters::{ChaChaPicker, FixedClock, SystemClock};

// Engine
pub use crate::engine::{Inputs, NodeHost, Value};
