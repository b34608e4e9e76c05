use crate::{Clock, Tracker};
use std::sync::Arc;
use tracing::warn;
use vislab_camera::{Camera, ProjectionSource, ViewportDescriptor};
use vislab_common::{ClusterConfig, ConfigError, NodeId, ProjectorId, WindowId};
use vislab_resources::{
    GpuFactory, PendingResourceQueue, Resource, ResourceError, ResourceKind, ResourceManager,
    ResourceRequest, Storage,
};
use vislab_sync::{InputEventBuffer, SyncedState};

/// Everything the driver owns and exposes to application hooks: camera,
/// resource managers, viewports, synced state and the collaborator seams.
pub struct NodeContext {
    pub(crate) config: ClusterConfig,
    pub(crate) camera: Camera,
    pub(crate) viewports: Vec<ViewportDescriptor>,
    pub(crate) programs: ResourceManager,
    pub(crate) textures: ResourceManager,
    pub(crate) meshes: ResourceManager,
    pub(crate) pending: Arc<PendingResourceQueue>,
    pub(crate) state: SyncedState,
    pub(crate) input: InputEventBuffer,
    pub(crate) backend: Box<dyn ProjectionSource>,
    pub(crate) factory: Box<dyn GpuFactory>,
    pub(crate) storage: Box<dyn Storage>,
    pub(crate) tracker: Box<dyn Tracker>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) current_time: f64,
    pub(crate) last_frame_time: f64,
    pub(crate) elapsed_time: f64,
}

impl NodeContext {
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn is_master(&self) -> bool {
        self.config.role.is_master()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access. Meaningful on the master only; slave-side
    /// mutations are overwritten by the next applied snapshot.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn backend(&self) -> &dyn ProjectionSource {
        &*self.backend
    }

    pub fn viewport(&self, window: WindowId) -> Option<&ViewportDescriptor> {
        self.viewports.get(window.0)
    }

    pub fn window_count(&self) -> usize {
        self.viewports.len()
    }

    pub fn global_projector_id(
        &self,
        node: NodeId,
        window: WindowId,
    ) -> Result<ProjectorId, ConfigError> {
        self.config.global_projector_id(node, window)
    }

    /// Simulation time of the currently synced frame, in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Time elapsed between the previous and the current synced frame.
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// The authoritative snapshot of the current frame.
    pub fn synced_state(&self) -> &SyncedState {
        &self.state
    }

    /// Shareable handle to the pending resource queue, for worker threads
    /// that want to enqueue synchronized creations (e.g. from a data-transfer
    /// callback). Only the master commits requests; anything queued on a
    /// slave is discarded at the end of its frame.
    pub fn pending_queue(&self) -> Arc<PendingResourceQueue> {
        Arc::clone(&self.pending)
    }

    pub fn load_program(&mut self, name: &str) -> Result<Arc<Resource>, ResourceError> {
        self.load_resource(ResourceKind::GpuProgram, name)
    }

    pub fn load_texture(&mut self, name: &str) -> Result<Arc<Resource>, ResourceError> {
        self.load_resource(ResourceKind::Texture, name)
    }

    pub fn load_mesh(&mut self, name: &str) -> Result<Arc<Resource>, ResourceError> {
        self.load_resource(ResourceKind::Mesh, name)
    }

    pub fn program_manager(&self) -> &ResourceManager {
        &self.programs
    }

    pub fn texture_manager(&self) -> &ResourceManager {
        &self.textures
    }

    pub fn mesh_manager(&self) -> &ResourceManager {
        &self.meshes
    }

    /// Load a resource, picking the cluster path from configuration and role.
    ///
    /// Synchronized names go through the master's queue-and-broadcast path;
    /// on a slave they must already have arrived in a snapshot. Everything
    /// else is read from local storage on every node.
    pub fn load_resource(
        &mut self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<Arc<Resource>, ResourceError> {
        let synchronized = self.config.is_synchronized_resource(name);
        let is_master = self.config.role.is_master();
        let manager = match kind {
            ResourceKind::GpuProgram => &mut self.programs,
            ResourceKind::Texture => &mut self.textures,
            ResourceKind::Mesh => &mut self.meshes,
        };
        if synchronized {
            if is_master {
                manager.request_synchronized(name, &*self.storage, &mut *self.factory, &self.pending)
            } else {
                // Slaves never touch storage for synchronized names; the
                // payload arrives inside a frame snapshot.
                manager
                    .get(name)
                    .ok_or_else(|| ResourceError::NotFound(name.to_string()))
                    .and_then(|r| r.handle().map(|_| r))
            }
        } else {
            manager.get_local(name, &*self.storage, &mut *self.factory)
        }
    }

    /// Realize synchronized resource creations found in the applied snapshot.
    /// The master already realized its half when the request was queued, so
    /// this is a no-op for names that exist.
    pub(crate) fn realize_resources(&mut self, requests: &[ResourceRequest]) {
        for request in requests {
            let manager = match request.kind {
                ResourceKind::GpuProgram => &mut self.programs,
                ResourceKind::Texture => &mut self.textures,
                ResourceKind::Mesh => &mut self.meshes,
            };
            if let Err(err) =
                manager.create_from_bytes(&request.name, &request.data, &mut *self.factory)
            {
                // The resource stays poisoned; later uses fail fast.
                warn!(name = %request.name, kind = ?request.kind, %err,
                      "failed to realize synchronized resource");
            }
        }
    }
}
