use crate::{Aabb, Plane};
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Result of testing an AABB against a frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Fully outside at least one plane.
    Outside,
    /// Straddles at least one plane.
    Intersecting,
    /// Fully inside all six planes.
    Inside,
}

/// View frustum as six planes with the interior on every plane's positive side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frustum {
    /// Planes in the order left, right, top, bottom, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn left(&self) -> &Plane {
        &self.planes[0]
    }
    pub fn right(&self) -> &Plane {
        &self.planes[1]
    }
    pub fn top(&self) -> &Plane {
        &self.planes[2]
    }
    pub fn bottom(&self) -> &Plane {
        &self.planes[3]
    }
    pub fn near(&self) -> &Plane {
        &self.planes[4]
    }
    pub fn far(&self) -> &Plane {
        &self.planes[5]
    }

    /// Build the frustum of a projection (or view-projection) matrix.
    ///
    /// Unprojects the eight NDC corners (±1, ±1, ±1, 1) through the inverse
    /// matrix and spans the six planes over them. The corner winding puts the
    /// view volume interior on the positive-distance side of all planes.
    pub fn from_matrix(proj: Mat4) -> Self {
        let inv = proj.inverse();
        let unproject = |x: f32, y: f32, z: f32| -> Vec3 {
            let h = inv * Vec4::new(x, y, z, 1.0);
            h.truncate() / h.w
        };

        let nbl = unproject(-1.0, -1.0, -1.0);
        let nbr = unproject(1.0, -1.0, -1.0);
        let ntl = unproject(-1.0, 1.0, -1.0);
        let ntr = unproject(1.0, 1.0, -1.0);
        let fbl = unproject(-1.0, -1.0, 1.0);
        let fbr = unproject(1.0, -1.0, 1.0);
        let ftl = unproject(-1.0, 1.0, 1.0);
        let ftr = unproject(1.0, 1.0, 1.0);

        Self {
            planes: [
                Plane::from_points(nbl, fbl, ftl),
                Plane::from_points(nbr, ntr, ftr),
                Plane::from_points(ntl, ftl, ftr),
                Plane::from_points(nbl, nbr, fbr),
                Plane::from_points(nbl, ntl, ntr),
                Plane::from_points(fbl, fbr, ftr),
            ],
        }
    }

    /// Three-way classification of an AABB against the frustum.
    ///
    /// Per plane: if the box's p-vertex (the corner furthest along the plane
    /// normal) is behind the plane, the whole box is outside and the test
    /// rejects immediately. Otherwise a negative n-vertex distance means the
    /// plane cuts the box. Only a box with all corners in front of all six
    /// planes is fully inside.
    pub fn classify_aabb(&self, aabb: &Aabb) -> Containment {
        let mut intersecting = false;
        for plane in &self.planes {
            let normal = plane.normal();
            if plane.distance(vertex_p(aabb, normal)) < 0.0 {
                return Containment::Outside;
            }
            if plane.distance(vertex_n(aabb, normal)) < 0.0 {
                intersecting = true;
            }
        }
        if intersecting {
            Containment::Intersecting
        } else {
            Containment::Inside
        }
    }

    /// Whether the AABB overlaps the frustum at all.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.classify_aabb(aabb) != Containment::Outside
    }
}

/// Corner of the box furthest along the plane normal.
fn vertex_p(aabb: &Aabb, normal: Vec3) -> Vec3 {
    let mut p = aabb.min;
    if normal.x >= 0.0 {
        p.x = aabb.max.x;
    }
    if normal.y >= 0.0 {
        p.y = aabb.max.y;
    }
    if normal.z >= 0.0 {
        p.z = aabb.max.z;
    }
    p
}

/// Corner of the box furthest against the plane normal.
fn vertex_n(aabb: &Aabb, normal: Vec3) -> Vec3 {
    let mut n = aabb.max;
    if normal.x >= 0.0 {
        n.x = aabb.min.x;
    }
    if normal.y >= 0.0 {
        n.y = aabb.min.y;
    }
    if normal.z >= 0.0 {
        n.z = aabb.min.z;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frustum() -> Frustum {
        // Camera at origin looking down -Z (OpenGL clip conventions).
        Frustum::from_matrix(Mat4::perspective_rh_gl(
            60.0_f32.to_radians(),
            16.0 / 9.0,
            0.1,
            100.0,
        ))
    }

    #[test]
    fn interior_point_positive_to_all_planes() {
        let f = test_frustum();
        let inside = Vec3::new(0.0, 0.0, -10.0);
        for plane in &f.planes {
            assert!(plane.distance(inside) >= 0.0, "plane {plane:?}");
        }
    }

    #[test]
    fn exterior_point_negative_to_some_plane() {
        let f = test_frustum();
        for outside in [
            Vec3::new(0.0, 0.0, 10.0),     // behind the camera
            Vec3::new(0.0, 0.0, -200.0),   // beyond the far plane
            Vec3::new(500.0, 0.0, -10.0),  // far off to the right
        ] {
            assert!(
                f.planes.iter().any(|p| p.distance(outside) < 0.0),
                "{outside:?} should be outside"
            );
        }
    }

    #[test]
    fn fully_contained_box_is_inside() {
        let f = test_frustum();
        let b = Aabb::new(Vec3::new(-1.0, -1.0, -11.0), Vec3::new(1.0, 1.0, -9.0));
        assert_eq!(f.classify_aabb(&b), Containment::Inside);
    }

    #[test]
    fn box_outside_is_rejected() {
        let f = test_frustum();
        let behind = Aabb::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 7.0));
        assert_eq!(f.classify_aabb(&behind), Containment::Outside);
        assert!(!f.intersects_aabb(&behind));
    }

    #[test]
    fn box_straddling_a_plane_intersects() {
        let f = test_frustum();
        // Straddles the near plane.
        let b = Aabb::new(Vec3::new(-0.01, -0.01, -0.2), Vec3::new(0.01, 0.01, 0.0));
        assert_eq!(f.classify_aabb(&b), Containment::Intersecting);
    }

    #[test]
    fn box_containing_whole_frustum_intersects() {
        let f = test_frustum();
        let b = Aabb::new(Vec3::splat(-1000.0), Vec3::splat(1000.0));
        // Every plane cuts through the huge box, so it cannot be Inside.
        assert_eq!(f.classify_aabb(&b), Containment::Intersecting);
        assert!(f.intersects_aabb(&b));
    }
}
