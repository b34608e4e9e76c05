use crate::ResourceKind;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A deferred request to create a synchronized resource on every node.
///
/// Queued by the master (carrying the loaded payload bytes), shipped inside
/// the frame snapshot, realized once on each node, then removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub kind: ResourceKind,
    pub name: String,
    pub data: Vec<u8>,
}

impl PartialEq for ResourceRequest {
    /// Requests are identified by kind and name; the payload is not part of
    /// the identity.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name
    }
}

impl Eq for ResourceRequest {}

/// Multi-producer queue of pending resource requests.
///
/// Producers may enqueue from worker threads (e.g. a network data-transfer
/// callback); the lifecycle driver drains the queue exactly once per frame
/// when the master commits its snapshot. The mutex is the only cross-thread
/// shared state in the core.
#[derive(Debug, Default)]
pub struct PendingResourceQueue {
    inner: Mutex<Vec<ResourceRequest>>,
}

impl PendingResourceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request. A request for an already-queued (kind, name) pair
    /// replaces the older payload, so a resource is created at most once.
    pub fn enqueue(&self, request: ResourceRequest) {
        let mut pending = self.lock();
        if let Some(existing) = pending.iter_mut().find(|r| **r == request) {
            *existing = request;
        } else {
            pending.push(request);
        }
    }

    /// Take all pending requests, leaving the queue empty. Called once per
    /// frame at the snapshot commit point.
    pub fn drain(&self) -> Vec<ResourceRequest> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ResourceRequest>> {
        // A poisoned lock only means a producer panicked mid-push; the
        // already-queued requests are still valid.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
