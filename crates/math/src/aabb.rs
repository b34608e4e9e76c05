use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all given points. Empty input yields an
    /// inverted box that behaves as neutral element for `union`.
    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::empty(), |b, &p| b.extend(p))
    }

    /// Inverted box: min = +inf, max = -inf.
    pub fn empty() -> Self {
        Self {
            min: Vec3::INFINITY,
            max: Vec3::NEG_INFINITY,
        }
    }

    /// Grow the box to contain a point.
    pub fn extend(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Box containing the transformed eight corners.
    pub fn transform(&self, m: Mat4) -> Self {
        let mut result = Self::empty();
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            result = result.extend(m.project_point3(corner));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_bounds_all() {
        let b = Aabb::from_points(&[
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.0),
            Vec3::new(0.5, 0.5, 0.5),
        ]);
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn union_and_contains() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
        let u = a.union(&b);
        assert!(u.contains_point(Vec3::splat(0.5)));
        assert!(u.contains_point(Vec3::splat(2.5)));
        assert!(!a.contains_point(Vec3::splat(2.5)));
    }

    #[test]
    fn transform_translates_corners() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let t = b.transform(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(t.min, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(t.max, Vec3::new(6.0, 1.0, 1.0));
    }
}
