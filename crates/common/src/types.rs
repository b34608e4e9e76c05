use serde::{Deserialize, Serialize};

/// Identifier of a cluster node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Index of a window on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub usize);

/// Cluster-wide projector index, addressable across all nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectorId(pub u32);

/// Role of a node in the cluster, decided once at startup.
///
/// The master is authoritative for simulation time, camera and input; slaves
/// only ever receive and apply the master's per-frame snapshot. Role-specific
/// data lives on the variant so downstream code dispatches on the role instead
/// of checking a boolean flag in many places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    /// Authoritative node. Binds the synchronization socket on this port.
    Master { bind_port: u16 },
    /// Rendering node. `start_node` is the first node id served by slaves.
    Slave { start_node: u32 },
}

impl NodeRole {
    pub fn is_master(&self) -> bool {
        matches!(self, NodeRole::Master { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_master() {
        assert!(NodeRole::Master { bind_port: 20400 }.is_master());
        assert!(!NodeRole::Slave { start_node: 1 }.is_master());
    }

    #[test]
    fn ids_are_ordered() {
        assert!(NodeId(0) < NodeId(1));
        assert!(WindowId(2) > WindowId(0));
    }
}
