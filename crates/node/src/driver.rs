use crate::{
    Clock, FrameHooks, NodeContext, NodeError, NullBackend, NullTracker, SystemClock, Tracker,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use vislab_camera::{Camera, ProjectionSource, ViewportDescriptor};
use vislab_common::{ClusterConfig, NodeId, WindowId};
use vislab_resources::{
    GpuFactory, MemoryStorage, NullGpuFactory, PendingResourceQueue, ResourceKind,
    ResourceManager, Storage,
};
use vislab_sync::{
    CharEvent, InputEventBuffer, KeyboardEvent, LoopbackTransport, MouseButtonEvent,
    MousePosEvent, MouseScrollEvent, SyncedState, Transport,
};

/// External collaborators handed to the driver at construction: transport,
/// rendering backend, resource factory, storage, tracking and the clock.
pub struct Collaborators {
    pub transport: Box<dyn Transport>,
    pub backend: Box<dyn ProjectionSource>,
    pub factory: Box<dyn GpuFactory>,
    pub storage: Box<dyn Storage>,
    pub tracker: Box<dyn Tracker>,
    pub clock: Box<dyn Clock>,
}

impl Collaborators {
    /// Collaborator set backed by an in-memory transport and GPU-less stubs.
    /// Clusters built from clones of the same [`LoopbackTransport`] see each
    /// other's broadcasts; used by the simulator and tests.
    pub fn loopback(transport: LoopbackTransport, storage: MemoryStorage) -> Self {
        Self {
            transport: Box::new(transport),
            backend: Box::new(NullBackend::default()),
            factory: Box::new(NullGpuFactory::new()),
            storage: Box::new(storage),
            tracker: Box::new(NullTracker),
            clock: Box::new(SystemClock::new()),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// The lifecycle driver for one cluster node.
///
/// Owns the camera, the three resource managers, the synced state and all
/// collaborator seams. Constructed once in the process entry point; there is
/// deliberately no global instance to reach through.
pub struct ClusterNode<H: FrameHooks> {
    hooks: H,
    ctx: NodeContext,
    transport: Box<dyn Transport>,
    frame: u64,
}

impl<H: FrameHooks> ClusterNode<H> {
    pub fn new(config: ClusterConfig, hooks: H, collaborators: Collaborators) -> Self {
        let viewports: Vec<ViewportDescriptor> = config
            .windows
            .iter()
            .map(ViewportDescriptor::from_layout)
            .collect();
        let state = SyncedState::new(config.role.clone());

        let mut camera = Camera::new(glam::Vec3::ZERO);
        for (i, vp) in viewports.iter().enumerate() {
            camera.set_local_coord_matrix(
                WindowId(i),
                vp.local_coord_matrix(),
                vp.size.as_vec2(),
            );
        }

        Self {
            hooks,
            ctx: NodeContext {
                config,
                camera,
                viewports,
                programs: ResourceManager::new(ResourceKind::GpuProgram),
                textures: ResourceManager::new(ResourceKind::Texture),
                meshes: ResourceManager::new(ResourceKind::Mesh),
                pending: Arc::new(PendingResourceQueue::new()),
                state,
                input: InputEventBuffer::new(),
                backend: collaborators.backend,
                factory: collaborators.factory,
                storage: collaborators.storage,
                tracker: collaborators.tracker,
                clock: collaborators.clock,
                current_time: 0.0,
                last_frame_time: 0.0,
                elapsed_time: 0.0,
            },
            transport: collaborators.transport,
            frame: 0,
        }
    }

    pub fn context(&self) -> &NodeContext {
        &self.ctx
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn context_mut(&mut self) -> &mut NodeContext {
        &mut self.ctx
    }

    pub fn node_id(&self) -> NodeId {
        self.ctx.config.node_id
    }

    /// One-time initialization: PreWindow and InitRender hooks.
    pub fn init(&mut self) {
        info!(node = self.ctx.config.node_id.0,
              master = self.ctx.is_master(),
              windows = self.ctx.viewports.len(),
              "initializing cluster node");
        self.hooks.pre_window(&mut self.ctx);
        self.hooks.init_render(&mut self.ctx);
    }

    /// Run one frame of the fixed lifecycle sequence.
    ///
    /// Master: PreSync stages time, camera pose, pick matrix, input events
    /// and pending resource requests into the snapshot and commits it to the
    /// transport. All nodes: after the barrier, PostSync applies the
    /// authoritative snapshot, dispatches input callbacks in FIFO order per
    /// event type, realizes shipped resource creations, then draws every
    /// window and finishes with PostDraw.
    pub fn run_frame(&mut self) -> Result<(), NodeError> {
        self.frame += 1;
        self.poll_tracking();
        self.pre_sync()?;
        // The sync barrier itself lives in the transport; by contract the
        // snapshot below is complete for this frame once apply() succeeds.
        self.post_sync()?;
        self.draw();
        self.hooks.post_draw(&mut self.ctx);
        Ok(())
    }

    /// Cleanup hook, once at shutdown.
    pub fn shutdown(&mut self) {
        debug!(node = self.ctx.config.node_id.0, frames = self.frame, "shutting down");
        self.hooks.cleanup(&mut self.ctx);
    }

    fn poll_tracking(&mut self) {
        for event in self.ctx.tracker.poll_events() {
            // Consumed flag reserved; no chaining yet.
            let _ = self.hooks.tracking(&mut self.ctx, &event);
        }
    }

    fn pre_sync(&mut self) -> Result<(), NodeError> {
        if !self.ctx.is_master() {
            return Ok(());
        }
        let now = self.ctx.clock.now();
        self.hooks.pre_sync(&mut self.ctx);

        self.ctx.camera.update_pick_matrix(
            &*self.ctx.backend,
            self.ctx.config.virtual_screen_size,
        );

        let input = self.ctx.input.flush();
        let resources = self.ctx.pending.drain();
        let camera = &self.ctx.camera;
        let local = self.ctx.state.local_mut()?;
        local.current_time = now;
        local.camera_position = camera.position();
        local.camera_orientation = camera.orientation();
        local.pick_matrix = camera.pick_matrix();
        local.input = input;
        local.resources = resources;

        self.ctx.state.commit(&*self.transport)?;
        Ok(())
    }

    fn post_sync(&mut self) -> Result<(), NodeError> {
        let snapshot = self.ctx.state.apply(&*self.transport)?.clone();

        self.ctx.current_time = snapshot.current_time;
        self.ctx.elapsed_time = snapshot.current_time - self.ctx.last_frame_time;
        self.ctx.last_frame_time = snapshot.current_time;

        self.ctx.camera.set_position(snapshot.camera_position);
        self.ctx.camera.set_orientation(snapshot.camera_orientation);
        self.ctx.camera.set_pick_matrix(snapshot.pick_matrix);

        self.dispatch_input(&snapshot.input);
        self.ctx.realize_resources(&snapshot.resources);

        if !self.ctx.is_master() {
            // Slaves have no commit path, so requests queued here would
            // accumulate forever. Discard them once per frame.
            let dropped = self.ctx.pending.drain();
            if !dropped.is_empty() {
                warn!(
                    count = dropped.len(),
                    "discarding resource requests queued on a slave"
                );
            }
        }

        self.hooks.update_synced_info(&mut self.ctx);
        let (current, elapsed) = (self.ctx.current_time, self.ctx.elapsed_time);
        self.hooks.update_frame(&mut self.ctx, current, elapsed);
        Ok(())
    }

    fn dispatch_input(&mut self, input: &vislab_sync::InputBatch) {
        // FIFO per event type; the consumed flag is recorded but not used
        // for short-circuiting.
        for &event in &input.keyboard {
            let _ = self.hooks.keyboard(&mut self.ctx, event);
        }
        for &event in &input.chars {
            let _ = self.hooks.char_input(&mut self.ctx, event);
        }
        for &event in &input.mouse_buttons {
            let _ = self.hooks.mouse_button(&mut self.ctx, event);
        }
        for &event in &input.mouse_positions {
            let _ = self.hooks.mouse_pos(&mut self.ctx, event);
        }
        for &event in &input.mouse_scrolls {
            let _ = self.hooks.mouse_scroll(&mut self.ctx, event);
        }
    }

    fn draw(&mut self) {
        for i in 0..self.ctx.viewports.len() {
            let window = WindowId(i);
            self.hooks.clear_buffer(&mut self.ctx, window);
            self.hooks.draw_frame(&mut self.ctx, window);
            self.hooks.draw_2d(&mut self.ctx, window);
        }
    }

    /// Feed a keyboard event from the windowing layer. Slaves drop input by
    /// construction; only the master's events reach the snapshot.
    pub fn keyboard_event(&mut self, event: KeyboardEvent) {
        if self.ctx.is_master() {
            self.ctx.input.push_keyboard(event);
        }
    }

    pub fn char_event(&mut self, event: CharEvent) {
        if self.ctx.is_master() {
            self.ctx.input.push_char(event);
        }
    }

    pub fn mouse_button_event(&mut self, event: MouseButtonEvent) {
        if self.ctx.is_master() {
            self.ctx.input.push_mouse_button(event);
        }
    }

    pub fn mouse_pos_event(&mut self, event: MousePosEvent) {
        if self.ctx.is_master() {
            self.ctx.input.push_mouse_pos(event);
        }
    }

    pub fn mouse_scroll_event(&mut self, event: MouseScrollEvent) {
        if self.ctx.is_master() {
            self.ctx.input.push_mouse_scroll(event);
        }
    }

    /// Forward a received data package to the application hook.
    pub fn data_transfer(&mut self, package_id: u16, data: &[u8]) -> bool {
        self.hooks.data_transfer(&mut self.ctx, package_id, data)
    }

    pub fn data_acknowledge(&mut self, package_id: u16, client: NodeId) -> bool {
        self.hooks.data_acknowledge(&mut self.ctx, package_id, client)
    }

    pub fn data_transfer_status(&mut self, connected: bool, client: NodeId) -> bool {
        self.hooks
            .data_transfer_status(&mut self.ctx, connected, client)
    }
}
