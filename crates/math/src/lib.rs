//! Geometry kernel: pure math primitives used by camera and culling code.
//!
//! # Invariants
//! - No state, no I/O. Everything here is a value type.
//! - Frustum planes keep the view volume interior on the positive-distance
//!   side of every plane.

mod aabb;
mod frustum;
mod plane;
mod ray;

pub use aabb::Aabb;
pub use frustum::{Containment, Frustum};
pub use plane::Plane;
pub use ray::Ray;

/// A line segment in 3d space, stored as its two endpoints.
pub type Line3 = [glam::Vec3; 2];
