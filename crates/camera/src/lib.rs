//! Camera state and transform pipeline.
//!
//! The camera pose is owned by the master's navigation logic and replicated
//! to slaves through the frame snapshot; everyone derives view, projection
//! and pick transforms from the same pose.
//!
//! # Invariants
//! - Viewport descriptors are immutable after node initialization.
//! - The pick matrix is a cached per-frame value, never computed on slaves.

mod camera;
mod viewport;

pub use camera::{Camera, ProjectionSource};
pub use viewport::ViewportDescriptor;
