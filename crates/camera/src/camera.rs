use glam::{IVec2, Mat4, Quat, Vec2, Vec3, Vec4};
use tracing::debug;
use vislab_common::WindowId;
use vislab_math::Line3;

/// Seam to the rendering backend for everything the camera needs per window.
///
/// `current_*` refers to the window/eye currently being rendered; `central_*`
/// is the mono-eye projection of the first window, used for picking regardless
/// of which window is active.
pub trait ProjectionSource {
    /// Model-view-projection matrix of the viewport currently rendering.
    fn current_view_projection(&self) -> Mat4;
    /// Projection matrix of the viewport currently rendering.
    fn current_projection(&self) -> Mat4;
    /// Mono-eye projection matrix of window 0.
    fn central_projection(&self) -> Mat4;
    /// Mono-eye view-projection matrix of window 0.
    fn central_view_projection(&self) -> Mat4;
    /// Synchronous depth-buffer read at a local window pixel. Stalls until
    /// the GPU read completes; only valid while a depth attachment is bound.
    fn read_depth_pixel(&self, pixel: IVec2) -> f32;
    fn near_plane(&self) -> f32;
    fn far_plane(&self) -> f32;
}

/// Camera pose plus the cached per-frame pick matrix.
///
/// `position`/`orientation` are navigation state: mutated only on the master
/// and distributed to slaves via the frame snapshot. `user_position` is the
/// tracked head position of the reference user in the lab.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    orientation: Quat,
    user_position: Vec3,
    pick_matrix: Mat4,
    /// Per-window cluster-to-local matrices with local screen sizes.
    local_coords: Vec<(Mat4, Vec2)>,
}

impl Camera {
    pub fn new(user_position: Vec3) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            user_position,
            pick_matrix: Mat4::IDENTITY,
            local_coords: Vec::new(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    pub fn user_position(&self) -> Vec3 {
        self.user_position
    }

    pub fn pick_matrix(&self) -> Mat4 {
        self.pick_matrix
    }

    pub fn set_pick_matrix(&mut self, pick_matrix: Mat4) {
        self.pick_matrix = pick_matrix;
    }

    /// Cache the cluster-to-local matrix and local screen size for a window.
    pub fn set_local_coord_matrix(&mut self, window: WindowId, matrix: Mat4, screen_size: Vec2) {
        if window.0 >= self.local_coords.len() {
            self.local_coords
                .resize(window.0 + 1, (Mat4::IDENTITY, Vec2::ZERO));
        }
        self.local_coords[window.0] = (matrix, screen_size);
    }

    /// View-delta matrix applied on top of the backend's projector-calibrated
    /// view. Composition order is significant: the reference user is moved to
    /// the origin, navigation translation and rotation are applied, then the
    /// user is moved back to the resting pose.
    ///
    /// `T(+user) * R(orientation) * T(-position) * T(-user)`
    pub fn calculate_view_update(&self) -> Mat4 {
        Mat4::from_translation(self.user_position)
            * Mat4::from_quat(self.orientation)
            * Mat4::from_translation(-self.position)
            * Mat4::from_translation(-self.user_position)
    }

    /// Full view-projection for the viewport currently rendering.
    pub fn view_perspective_matrix(&self, backend: &dyn ProjectionSource) -> Mat4 {
        backend.current_view_projection() * self.calculate_view_update()
    }

    /// Mono-eye projection of window 0, independent of the current window.
    pub fn central_perspective_matrix(&self, backend: &dyn ProjectionSource) -> Mat4 {
        backend.central_projection()
    }

    /// Mono-eye view-projection of window 0 including the navigation update.
    pub fn central_view_perspective_matrix(&self, backend: &dyn ProjectionSource) -> Mat4 {
        backend.central_view_projection() * self.calculate_view_update()
    }

    /// Near clipping plane distance of the calibrated projection.
    pub fn near_plane(&self, backend: &dyn ProjectionSource) -> f32 {
        backend.near_plane()
    }

    /// Far clipping plane distance of the calibrated projection.
    pub fn far_plane(&self, backend: &dyn ProjectionSource) -> f32 {
        backend.far_plane()
    }

    /// Recompute the cached pick matrix for this frame.
    ///
    /// Maps cluster screen coordinates through NDC and then backwards through
    /// the central view-projection, so `pick_ray` can unproject 2d screen
    /// points without further backend access. Master-only; slaves receive the
    /// result in the frame snapshot.
    pub fn update_pick_matrix(&mut self, backend: &dyn ProjectionSource, screen_size: Vec2) {
        let screen_to_ndc = Mat4::from_translation(Vec3::new(-1.0, 1.0, 0.0))
            * Mat4::from_scale(Vec3::new(
                2.0 / screen_size.x,
                -2.0 / screen_size.y,
                1.0,
            ));
        self.pick_matrix =
            self.central_view_perspective_matrix(backend).inverse() * screen_to_ndc;
    }

    /// World-space ray from the user's eye through a cluster screen point.
    pub fn pick_ray(&self, global_screen_coords: Vec2) -> Line3 {
        let eye = self.position + self.user_position;
        let far = self.pick_matrix
            * Vec4::new(global_screen_coords.x, global_screen_coords.y, -1.0, 1.0);
        [eye, far.truncate() / far.w]
    }

    /// World-space position under a cluster screen point, reconstructed from
    /// the depth buffer of the given window.
    ///
    /// The only camera operation that touches the backend's framebuffer: it
    /// performs a synchronous depth read and must only be called while the
    /// queried window's depth attachment is valid. Returns `None` when no
    /// local coordinate matrix was cached for the window.
    pub fn pick_position(
        &self,
        backend: &dyn ProjectionSource,
        window: WindowId,
        global_screen_coords: Vec2,
    ) -> Option<Vec3> {
        let (local_matrix, screen_size) = self.local_coords.get(window.0)?;
        if screen_size.x <= 0.0 || screen_size.y <= 0.0 {
            return None;
        }
        let local = *local_matrix
            * Vec4::new(global_screen_coords.x, global_screen_coords.y, 0.0, 1.0);
        let pixel = IVec2::new(local.x as i32, local.y as i32);

        let depth = backend.read_depth_pixel(pixel);
        let ndc = Vec3::new(
            local.x / screen_size.x,
            1.0 - local.y / screen_size.y,
            depth,
        ) * 2.0
            - 1.0;
        debug!(x = ndc.x, y = ndc.y, z = ndc.z, "picked position");

        let inv = self.view_perspective_matrix(backend).inverse();
        let world = inv * ndc.extend(1.0);
        Some(world.truncate() / world.w)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
