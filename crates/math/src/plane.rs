use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Plane in coefficient form `a*x + b*y + c*z + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Plane {
    /// Coefficients (a, b, c, d). The normal (a, b, c) has unit length when
    /// the plane was built through one of the constructors below.
    pub coeffs: Vec4,
}

impl Plane {
    /// Plane from raw coefficients.
    pub fn new(coeffs: Vec4) -> Self {
        Self { coeffs }
    }

    /// Plane from a normal and a point on the plane. The normal is normalized.
    pub fn from_normal_point(normal: Vec3, point: Vec3) -> Self {
        let n = normal.normalize();
        Self {
            coeffs: n.extend(-n.dot(point)),
        }
    }

    /// Plane through three non-collinear points, normal along
    /// `cross(v1 - v0, v2 - v0)`.
    pub fn from_points(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self::from_normal_point((v1 - v0).cross(v2 - v0), v0)
    }

    /// Signed distance from the plane to a point. Positive on the side the
    /// normal points to.
    pub fn distance(&self, point: Vec3) -> f32 {
        self.coeffs.dot(point.extend(1.0))
    }

    /// The plane normal (a, b, c).
    pub fn normal(&self) -> Vec3 {
        self.coeffs.truncate()
    }

    /// A point on the plane.
    pub fn point(&self) -> Vec3 {
        self.normal() * -self.coeffs.w
    }

    /// Transform the plane by a matrix. Plane coefficients transform with
    /// `inverse(transpose(m))`, which stays correct under non-uniform scale.
    pub fn transform(&self, m: Mat4) -> Self {
        Self {
            coeffs: m.transpose().inverse() * self.coeffs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_signed() {
        let p = Plane::from_normal_point(Vec3::Y, Vec3::ZERO);
        assert!((p.distance(Vec3::new(0.0, 2.0, 0.0)) - 2.0).abs() < 1e-6);
        assert!((p.distance(Vec3::new(5.0, -3.0, 1.0)) + 3.0).abs() < 1e-6);
    }

    #[test]
    fn from_points_matches_normal_form() {
        let p = Plane::from_points(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
        );
        // Plane y = 1. cross(v1 - v0, v2 - v0) = cross(+X, +Z) = -Y.
        assert!(p.normal().abs_diff_eq(Vec3::NEG_Y, 1e-6));
        assert!(p.distance(Vec3::new(7.0, 1.0, -2.0)).abs() < 1e-6);
        // Points below the plane are on the normal's side.
        assert!(p.distance(Vec3::new(0.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn point_lies_on_plane() {
        let p = Plane::from_normal_point(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert!(p.distance(p.point()).abs() < 1e-5);
    }

    #[test]
    fn transform_survives_non_uniform_scale() {
        let p = Plane::from_normal_point(Vec3::Y, Vec3::new(0.0, 1.0, 0.0));
        let m = Mat4::from_scale(Vec3::new(2.0, 3.0, 1.0));
        let q = p.transform(m);
        // The transformed point (0, 3, 0) must lie on the transformed plane.
        assert!(q.distance(Vec3::new(0.0, 3.0, 0.0)).abs() < 1e-5);
        // A point off the original plane keeps its sign.
        assert!(q.distance(Vec3::new(0.0, 6.0, 0.0)) > 0.0);
    }
}
