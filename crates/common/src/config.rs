use crate::types::{NodeId, NodeRole, ProjectorId, WindowId};
use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from configuration loading and projector addressing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown node id: {0:?}")]
    UnknownNode(NodeId),
}

/// Geometric layout of one window/projector on a node.
///
/// Created once at configuration load and immutable during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowLayout {
    /// Lower-left corner of the viewport in cluster screen space.
    pub viewport_origin: IVec2,
    /// Viewport size in pixels.
    pub viewport_size: IVec2,
    /// Scaling from cluster screen space to this window's local pixels.
    pub viewport_scaling: Vec2,
}

/// Cluster configuration supplied before the lifecycle driver starts.
///
/// The on-disk format is JSON; parsing of the lab's native projector data
/// files happens upstream and is out of scope here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// This node's id within the cluster.
    pub node_id: NodeId,
    /// Master or slave role, with role-specific data.
    pub role: NodeRole,
    /// Size of the combined virtual screen spanning all projectors.
    pub virtual_screen_size: Vec2,
    /// Window layouts for this node, indexed by window id.
    pub windows: Vec<WindowLayout>,
    /// Number of windows per node, in node id order. Used for global
    /// projector addressing across the whole cluster.
    pub windows_per_node: Vec<u32>,
    /// Resource names that must be byte-identical across the cluster and
    /// are therefore shipped by the master instead of loaded locally.
    pub synchronized_resources: Vec<String>,
}

impl ClusterConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Map (node id, window id) to a cluster-wide projector id.
    ///
    /// Projector ids are assigned contiguously in node id order, so node 0's
    /// windows come first, then node 1's, and so on.
    pub fn global_projector_id(
        &self,
        node: NodeId,
        window: WindowId,
    ) -> Result<ProjectorId, ConfigError> {
        let idx = node.0 as usize;
        if idx >= self.windows_per_node.len() {
            return Err(ConfigError::UnknownNode(node));
        }
        let base: u32 = self.windows_per_node[..idx].iter().sum();
        Ok(ProjectorId(base + window.0 as u32))
    }

    /// Whether the named resource is on the synchronized list.
    pub fn is_synchronized_resource(&self, name: &str) -> bool {
        self.synchronized_resources.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ClusterConfig {
        ClusterConfig {
            node_id: NodeId(0),
            role: NodeRole::Master { bind_port: 20400 },
            virtual_screen_size: Vec2::new(3840.0, 1080.0),
            windows: vec![
                WindowLayout {
                    viewport_origin: IVec2::new(0, 0),
                    viewport_size: IVec2::new(1920, 1080),
                    viewport_scaling: Vec2::ONE,
                },
                WindowLayout {
                    viewport_origin: IVec2::new(1920, 0),
                    viewport_size: IVec2::new(1920, 1080),
                    viewport_scaling: Vec2::ONE,
                },
            ],
            windows_per_node: vec![2, 2, 2],
            synchronized_resources: vec!["shaders/main".into()],
        }
    }

    #[test]
    fn global_projector_ids_are_contiguous() {
        let cfg = sample_config();
        assert_eq!(
            cfg.global_projector_id(NodeId(0), WindowId(0)).unwrap(),
            ProjectorId(0)
        );
        assert_eq!(
            cfg.global_projector_id(NodeId(0), WindowId(1)).unwrap(),
            ProjectorId(1)
        );
        assert_eq!(
            cfg.global_projector_id(NodeId(2), WindowId(1)).unwrap(),
            ProjectorId(5)
        );
    }

    #[test]
    fn unknown_node_is_rejected() {
        let cfg = sample_config();
        assert!(matches!(
            cfg.global_projector_id(NodeId(9), WindowId(0)),
            Err(ConfigError::UnknownNode(_))
        ));
    }

    #[test]
    fn synchronized_resource_lookup() {
        let cfg = sample_config();
        assert!(cfg.is_synchronized_resource("shaders/main"));
        assert!(!cfg.is_synchronized_resource("textures/local"));
    }

    #[test]
    fn json_roundtrip_via_file() {
        let cfg = sample_config();
        let tmp = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer_pretty(std::fs::File::create(tmp.path()).unwrap(), &cfg).unwrap();

        let loaded = ClusterConfig::from_json_file(tmp.path()).unwrap();
        assert_eq!(loaded, cfg);
    }
}
