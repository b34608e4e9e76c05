use glam::{IVec2, Mat4};
use vislab_camera::ProjectionSource;

/// Rendering backend stand-in with a fixed projection and an empty depth
/// buffer. Lets the simulator and tests run the full lifecycle without a GPU.
#[derive(Debug, Clone)]
pub struct NullBackend {
    projection: Mat4,
    near: f32,
    far: f32,
}

impl NullBackend {
    pub fn new(projection: Mat4, near: f32, far: f32) -> Self {
        Self {
            projection,
            near,
            far,
        }
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new(
            Mat4::perspective_rh_gl(60.0_f32.to_radians(), 16.0 / 9.0, 0.1, 100.0),
            0.1,
            100.0,
        )
    }
}

impl ProjectionSource for NullBackend {
    fn current_view_projection(&self) -> Mat4 {
        self.projection
    }

    fn current_projection(&self) -> Mat4 {
        self.projection
    }

    fn central_projection(&self) -> Mat4 {
        self.projection
    }

    fn central_view_projection(&self) -> Mat4 {
        self.projection
    }

    fn read_depth_pixel(&self, _pixel: IVec2) -> f32 {
        1.0
    }

    fn near_plane(&self) -> f32 {
        self.near
    }

    fn far_plane(&self) -> f32 {
        self.far
    }
}
