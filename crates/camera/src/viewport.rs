use glam::{IVec2, Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use vislab_common::WindowLayout;

/// Per-window geometric description, built once at node initialization from
/// the cluster configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportDescriptor {
    /// Lower-left corner in cluster screen space.
    pub origin: IVec2,
    /// Window size in pixels.
    pub size: IVec2,
    /// Scaling from cluster screen space into local window pixels.
    pub scaling: Vec2,
    /// Covered area in cluster screen space as (min, max) corners.
    pub screen_area: (IVec2, IVec2),
}

impl ViewportDescriptor {
    pub fn from_layout(layout: &WindowLayout) -> Self {
        Self {
            origin: layout.viewport_origin,
            size: layout.viewport_size,
            scaling: layout.viewport_scaling,
            screen_area: (
                layout.viewport_origin,
                layout.viewport_origin + layout.viewport_size,
            ),
        }
    }

    /// Matrix mapping cluster screen coordinates to this window's local pixel
    /// coordinates: translate by -origin, then apply the viewport scaling.
    pub fn local_coord_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(self.scaling.x, self.scaling.y, 1.0))
            * Mat4::from_translation(Vec3::new(-self.origin.x as f32, -self.origin.y as f32, 0.0))
    }

    /// Whether a cluster screen coordinate falls inside this window.
    pub fn contains(&self, screen: Vec2) -> bool {
        screen.x >= self.screen_area.0.x as f32
            && screen.y >= self.screen_area.0.y as f32
            && screen.x < self.screen_area.1.x as f32
            && screen.y < self.screen_area.1.y as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn layout() -> WindowLayout {
        WindowLayout {
            viewport_origin: IVec2::new(1920, 0),
            viewport_size: IVec2::new(1920, 1080),
            viewport_scaling: Vec2::ONE,
        }
    }

    #[test]
    fn screen_area_spans_origin_to_far_corner() {
        let vp = ViewportDescriptor::from_layout(&layout());
        assert_eq!(vp.screen_area.0, IVec2::new(1920, 0));
        assert_eq!(vp.screen_area.1, IVec2::new(3840, 1080));
    }

    #[test]
    fn local_coord_matrix_maps_into_window() {
        let vp = ViewportDescriptor::from_layout(&layout());
        let local = vp.local_coord_matrix() * Vec4::new(2000.0, 500.0, 0.0, 1.0);
        assert_eq!(local.x, 80.0);
        assert_eq!(local.y, 500.0);
    }

    #[test]
    fn local_coord_matrix_applies_scaling() {
        let mut l = layout();
        l.viewport_scaling = Vec2::new(0.5, 0.5);
        let vp = ViewportDescriptor::from_layout(&l);
        let local = vp.local_coord_matrix() * Vec4::new(3840.0, 1080.0, 0.0, 1.0);
        assert_eq!(local.x, 960.0);
        assert_eq!(local.y, 540.0);
    }

    #[test]
    fn contains_checks_bounds() {
        let vp = ViewportDescriptor::from_layout(&layout());
        assert!(vp.contains(Vec2::new(2000.0, 500.0)));
        assert!(!vp.contains(Vec2::new(100.0, 500.0)));
        assert!(!vp.contains(Vec2::new(3840.0, 500.0)));
    }
}
