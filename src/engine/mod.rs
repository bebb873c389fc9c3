//! # Engine
//!
//! The orchestration layer the host talks to.
//!
//! This is where:
//! - Configuration is applied
//! - Adapters are connected to ports
//! - Nodes are looked up by name and invoked over dynamic values

mod host;
pub mod registry;
pub mod value;

pub use host::NodeHost;
pub use registry::{lookup, node_names, NodeKind, NodeSpec, PortType, NODES};
pub use value::{Inputs, Value};
