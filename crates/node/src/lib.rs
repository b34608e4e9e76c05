//! Application-node lifecycle driver.
//!
//! Orchestrates the fixed per-frame sequence (PreSync, sync barrier,
//! PostSync, draw per window, PostDraw) identically on master and slaves,
//! and dispatches to the application's hook implementation at every stage.
//!
//! # Invariants
//! - One rendering thread per node runs the driver; the only cross-thread
//!   shared state is the pending resource queue.
//! - Synced state is never read before the barrier and never mutated after
//!   the master committed it for the frame.
//! - The driver is constructed once in the process entry point and owns its
//!   collaborators; there is no global instance.

mod backend;
mod clock;
mod context;
mod driver;
mod hooks;
mod tracking;

pub use backend::NullBackend;
pub use clock::{Clock, FixedStepClock, SystemClock};
pub use context::NodeContext;
pub use driver::{ClusterNode, Collaborators};
pub use hooks::{FrameHooks, NoopHooks};
pub use tracking::{NullTracker, Tracker, TrackingEvent};

use vislab_common::ConfigError;
use vislab_resources::ResourceError;
use vislab_sync::SyncError;

/// Errors surfaced by the lifecycle driver.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
