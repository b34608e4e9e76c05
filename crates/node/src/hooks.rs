use crate::{NodeContext, TrackingEvent};
use vislab_common::{NodeId, WindowId};
use vislab_sync::{CharEvent, KeyboardEvent, MouseButtonEvent, MousePosEvent, MouseScrollEvent};

/// The application's capability set: one flat trait with a no-op default for
/// every stage and callback, so a concrete application overrides only what it
/// needs.
///
/// Input and data-transfer callbacks return a "consumed" flag. The driver
/// does not short-circuit on `true` today; the flag is reserved for future
/// chaining semantics, so implementations should return it faithfully.
#[allow(unused_variables)]
pub trait FrameHooks {
    /// Before any window or GL context exists.
    fn pre_window(&mut self, ctx: &mut NodeContext) {}
    /// Once, after the rendering context is up.
    fn init_render(&mut self, ctx: &mut NodeContext) {}
    /// Master only, before the snapshot is committed. Mutate camera, time
    /// sources and queue input here.
    fn pre_sync(&mut self, ctx: &mut NodeContext) {}
    /// All nodes, after the authoritative snapshot was applied.
    fn update_synced_info(&mut self, ctx: &mut NodeContext) {}
    /// All nodes, once per frame after sync.
    fn update_frame(&mut self, ctx: &mut NodeContext, current: f64, elapsed: f64) {}
    /// Clear the framebuffer of one window.
    fn clear_buffer(&mut self, ctx: &mut NodeContext, window: WindowId) {}
    /// Draw the 3d content of one window.
    fn draw_frame(&mut self, ctx: &mut NodeContext, window: WindowId) {}
    /// Draw overlay/2d content of one window.
    fn draw_2d(&mut self, ctx: &mut NodeContext, window: WindowId) {}
    /// After all windows of this frame were drawn.
    fn post_draw(&mut self, ctx: &mut NodeContext) {}
    /// Once, at shutdown.
    fn cleanup(&mut self, ctx: &mut NodeContext) {}

    fn keyboard(&mut self, ctx: &mut NodeContext, event: KeyboardEvent) -> bool {
        false
    }
    fn char_input(&mut self, ctx: &mut NodeContext, event: CharEvent) -> bool {
        false
    }
    fn mouse_button(&mut self, ctx: &mut NodeContext, event: MouseButtonEvent) -> bool {
        false
    }
    fn mouse_pos(&mut self, ctx: &mut NodeContext, event: MousePosEvent) -> bool {
        false
    }
    fn mouse_scroll(&mut self, ctx: &mut NodeContext, event: MouseScrollEvent) -> bool {
        false
    }

    /// A tracked VR controller or pose event, polled once per frame.
    fn tracking(&mut self, ctx: &mut NodeContext, event: &TrackingEvent) -> bool {
        false
    }

    /// Raw data package received from another node.
    fn data_transfer(&mut self, ctx: &mut NodeContext, package_id: u16, data: &[u8]) -> bool {
        false
    }
    fn data_acknowledge(&mut self, ctx: &mut NodeContext, package_id: u16, client: NodeId) -> bool {
        false
    }
    fn data_transfer_status(&mut self, ctx: &mut NodeContext, connected: bool, client: NodeId) -> bool {
        false
    }
}

/// Hook set that does nothing; useful as a placeholder application.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl FrameHooks for NoopHooks {}
