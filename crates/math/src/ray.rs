use crate::{Aabb, Line3};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Ray with origin, direction and precomputed inverse direction.
///
/// The inverse direction makes AABB slab tests a handful of multiplies.
/// Components of `inv_dir` may be infinite for axis-aligned directions;
/// the slab test below handles that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
    pub inv_dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir,
            inv_dir: dir.recip(),
        }
    }

    /// Ray from a line segment, direction normalized from the first endpoint
    /// to the second.
    pub fn from_segment(line: Line3) -> Self {
        Self::new(line[0], (line[1] - line[0]).normalize())
    }

    /// Point at parameter `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Slab test against an AABB. Returns the entry parameter if the ray hits
    /// the box at t >= 0.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let t1 = (aabb.min - self.origin) * self.inv_dir;
        let t2 = (aabb.max - self.origin) * self.inv_dir;
        let t_min = t1.min(t2).max_element();
        let t_max = t1.max(t2).min_element();
        if t_max >= t_min.max(0.0) {
            Some(t_min.max(0.0))
        } else {
            None
        }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_at_advances_along_direction() {
        let r = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(r.point_at(3.0), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn from_segment_normalizes_direction() {
        let r = Ray::from_segment([Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)]);
        assert!(r.dir.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn slab_test_hits_box_ahead() {
        let r = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = r.intersect_aabb(&b).unwrap();
        assert!((t - 4.0).abs() < 1e-6);
    }

    #[test]
    fn slab_test_misses_box_behind() {
        let r = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(r.intersect_aabb(&b).is_none());
    }

    #[test]
    fn slab_test_with_origin_inside() {
        let r = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0).normalize());
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(r.intersect_aabb(&b), Some(0.0));
    }

    #[test]
    fn slab_test_axis_aligned_direction() {
        // inv_dir has infinities on the y and z axes here.
        let r = Ray::new(Vec3::new(0.5, 0.5, -3.0), Vec3::Z);
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(r.intersect_aabb(&b).is_some());

        let miss = Ray::new(Vec3::new(2.0, 0.5, -3.0), Vec3::Z);
        assert!(miss.intersect_aabb(&b).is_none());
    }
}
