//! Synchronized-state broadcaster: the master's per-frame snapshot of time,
//! camera pose, pick matrix, input events and pending resource creations,
//! replicated to all slaves once per frame.
//!
//! # Invariants
//! - The snapshot is atomic: slaves never observe a partially updated frame.
//! - No slave observes frame N+1 state before all of frame N was delivered;
//!   the ordering barrier itself is the transport's responsibility.
//! - Slaves have no mutation path into synced state.

mod broadcast;
mod input;
mod snapshot;

pub use broadcast::{LoopbackTransport, SyncedState, Transport};
pub use input::{
    CharEvent, InputBatch, InputEventBuffer, KeyAction, KeyboardEvent, MouseButtonEvent,
    MousePosEvent, MouseScrollEvent,
};
pub use snapshot::FrameSnapshot;

/// Errors from snapshot encoding and the broadcaster.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("snapshot encode error: {0}")]
    Encode(String),
    #[error("snapshot decode error: {0}")]
    Decode(String),
    #[error("no snapshot delivered for this frame")]
    NoSnapshot,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("only the master role may commit synchronized state")]
    NotMaster,
}
