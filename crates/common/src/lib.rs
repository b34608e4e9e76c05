//! Shared types for the vislab cluster framework.
//!
//! # Invariants
//! - Node role is decided once at startup and never changes during a run.
//! - Viewport layout is immutable after configuration load.

pub mod config;
pub mod types;

pub use config::{ClusterConfig, ConfigError, WindowLayout};
pub use types::{NodeId, NodeRole, ProjectorId, WindowId};
