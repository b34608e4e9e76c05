use crate::{FrameSnapshot, SyncError};
use std::sync::{Arc, Mutex};
use tracing::trace;
use vislab_common::NodeRole;

/// Transport/barrier collaborator.
///
/// The core calls [`broadcast`](Transport::broadcast) at the sync point and
/// [`current_snapshot`](Transport::current_snapshot) after the barrier.
/// Delivery is assumed in-order and all-or-nothing per frame; a stalled
/// barrier is a fatal transport-level condition, not recovered here.
pub trait Transport {
    fn broadcast(&self, snapshot: &[u8]) -> Result<(), SyncError>;
    fn current_snapshot(&self) -> Option<Vec<u8>>;
}

/// In-memory transport for tests and the cluster simulator. Clones share the
/// same buffer, so a master and any number of simulated slaves built from
/// clones observe the same broadcast.
#[derive(Debug, Clone, Default)]
pub struct LoopbackTransport {
    buffer: Arc<Mutex<Option<Vec<u8>>>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for LoopbackTransport {
    fn broadcast(&self, snapshot: &[u8]) -> Result<(), SyncError> {
        *self.buffer.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.to_vec());
        Ok(())
    }

    fn current_snapshot(&self) -> Option<Vec<u8>> {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Holder of the local (master-authored) and synced (authoritative) frame
/// snapshots.
///
/// The master mutates the local snapshot during PreSync and commits it at the
/// sync point; after the barrier every node applies the delivered snapshot
/// into its synced copy. The slave role exposes no mutating API, so every
/// non-master mutation path is rejected by construction.
#[derive(Debug)]
pub struct SyncedState {
    role: NodeRole,
    local: FrameSnapshot,
    synced: FrameSnapshot,
}

impl SyncedState {
    pub fn new(role: NodeRole) -> Self {
        Self {
            role,
            local: FrameSnapshot::default(),
            synced: FrameSnapshot::default(),
        }
    }

    pub fn role(&self) -> &NodeRole {
        &self.role
    }

    /// The authoritative snapshot of the current frame.
    pub fn synced(&self) -> &FrameSnapshot {
        &self.synced
    }

    /// Mutable access to the staging snapshot. Master only.
    pub fn local_mut(&mut self) -> Result<&mut FrameSnapshot, SyncError> {
        if !self.role.is_master() {
            return Err(SyncError::NotMaster);
        }
        Ok(&mut self.local)
    }

    /// Serialize the staged snapshot and hand it to the transport. This is
    /// the single ordering barrier of the system; sources of synced state
    /// must not be mutated after commit until the next frame.
    pub fn commit(&mut self, transport: &dyn Transport) -> Result<(), SyncError> {
        if !self.role.is_master() {
            return Err(SyncError::NotMaster);
        }
        let encoded = self.local.encode()?;
        trace!(bytes = encoded.len(), "committing frame snapshot");
        transport.broadcast(&encoded)?;
        // Resource payloads travel once; drop the staged copies.
        self.local.resources.clear();
        Ok(())
    }

    /// Decode the delivered snapshot into the synced copy. Must only be
    /// called after the transport's barrier signalled completion.
    pub fn apply(&mut self, transport: &dyn Transport) -> Result<&FrameSnapshot, SyncError> {
        let data = transport.current_snapshot().ok_or(SyncError::NoSnapshot)?;
        self.synced = FrameSnapshot::decode(&data)?;
        Ok(&self.synced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn slave_has_no_mutation_path() {
        let mut state = SyncedState::new(NodeRole::Slave { start_node: 1 });
        assert!(matches!(state.local_mut(), Err(SyncError::NotMaster)));

        let transport = LoopbackTransport::new();
        assert!(matches!(
            state.commit(&transport),
            Err(SyncError::NotMaster)
        ));
    }

    #[test]
    fn commit_then_apply_replicates_state() {
        let transport = LoopbackTransport::new();
        let mut master = SyncedState::new(NodeRole::Master { bind_port: 20400 });
        let mut slave = SyncedState::new(NodeRole::Slave { start_node: 1 });

        {
            let local = master.local_mut().unwrap();
            local.current_time = 4.2;
            local.camera_position = Vec3::new(1.0, 0.0, 0.0);
        }
        master.commit(&transport).unwrap();

        let synced = slave.apply(&transport.clone()).unwrap();
        assert_eq!(synced.current_time, 4.2);
        assert_eq!(synced.camera_position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn apply_without_broadcast_is_an_error() {
        let transport = LoopbackTransport::new();
        let mut slave = SyncedState::new(NodeRole::Slave { start_node: 1 });
        assert!(matches!(
            slave.apply(&transport),
            Err(SyncError::NoSnapshot)
        ));
    }

    #[test]
    fn later_commit_overwrites_earlier_snapshot() {
        let transport = LoopbackTransport::new();
        let mut master = SyncedState::new(NodeRole::Master { bind_port: 20400 });

        master.local_mut().unwrap().current_time = 1.0;
        master.commit(&transport).unwrap();
        master.local_mut().unwrap().current_time = 2.0;
        master.commit(&transport).unwrap();

        let mut slave = SyncedState::new(NodeRole::Slave { start_node: 1 });
        assert_eq!(slave.apply(&transport).unwrap().current_time, 2.0);
    }
}
