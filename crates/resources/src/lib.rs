//! GPU resource managers: name-keyed registries with cross-node
//! synchronization.
//!
//! Loading has two paths. Unsynchronized resources are read from every
//! node's local storage (only valid when all nodes carry identical copies).
//! Synchronized resources are read once, on the master, and their raw bytes
//! are shipped to the slaves inside the frame snapshot, which guarantees
//! bit-identical content across the cluster without per-slave disk I/O.
//!
//! # Invariants
//! - At most one instance per name; repeated requests return the same `Arc`.
//! - A resource whose construction failed stays poisoned; later uses fail
//!   fast instead of silently rendering nothing.
//! - The pending request queue is drained exactly once per frame, on the
//!   master, at the snapshot commit point.

mod manager;
mod queue;
mod storage;

pub use manager::{BackendHandle, GpuFactory, NullGpuFactory, Resource, ResourceManager};
pub use queue::{PendingResourceQueue, ResourceRequest};
pub use storage::{FsStorage, MemoryStorage, Storage};

use serde::{Deserialize, Serialize};

/// Kind of GPU resource handled by the managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    GpuProgram,
    Texture,
    Mesh,
}

/// Errors from resource loading and construction.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("constructing resource '{name}' failed: {reason}")]
    Construction { name: String, reason: String },
    #[error("resource '{0}' is unusable after a failed construction")]
    Unusable(String),
}
