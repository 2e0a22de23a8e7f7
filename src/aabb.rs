//! Axis-aligned bounding boxes and the ray/box slab test.

use crate::{axis::Axis, math::ulp_eq, ray::Ray};
use cfg_if::cfg_if;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[repr(C)]
pub struct Aabb {
    /// Minimum corner of the box.
    pub min: Vec3,

    /// Maximum corner of the box.
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::INFINITY,
            max: Vec3::NEG_INFINITY,
        }
    }
}

impl Aabb {
    /// Creates a new [`Aabb`] from the given bounds.
    pub fn new(min: Vec3, max: Vec3) -> Self { Self { min, max } }

    /// Creates a new empty (i.e. invalid) [`Aabb`].
    ///
    /// Growing an empty box around a point yields a degenerate box
    /// containing exactly that point.
    pub fn empty() -> Self { Self::default() }

    /// Extends the box to contain the given point.
    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Extends the box to contain another box.
    pub fn extend(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Returns the union of two boxes.
    pub fn union(lhs: &Aabb, rhs: &Aabb) -> Aabb {
        let mut aabb = *lhs;
        aabb.extend(rhs);
        aabb
    }

    /// Returns half the surface area of the box.
    ///
    /// This is the quantity the surface area heuristic compares; the factor
    /// of two is common to every candidate and therefore elided.
    pub fn half_area(&self) -> f32 {
        let d = self.extent();
        d.x * d.y + d.y * d.z + d.z * d.x
    }

    /// Computes the box center.
    pub fn center(&self) -> Vec3 { self.min * 0.5 + self.max * 0.5 }

    /// Computes the center of the box along the given axis.
    pub fn center_along_axis(&self, axis: Axis) -> f32 {
        self.min[axis] * 0.5 + self.max[axis] * 0.5
    }

    /// Computes the box diagonal.
    pub fn extent(&self) -> Vec3 { self.max - self.min }

    /// Returns the longest axis of the box.
    pub fn max_extent_axis(&self) -> Axis { Axis::max_axis(self.extent()) }

    /// Checks if the box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Checks if the bounding box contains a point.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.x <= point.x
            && self.min.y <= point.y
            && self.min.z <= point.z
            && self.max.x >= point.x
            && self.max.y >= point.y
            && self.max.z >= point.z
    }

    /// Checks if the bounding box contains another bounding box.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }

    /// Tests intersection between the box and a ray using the slab method.
    ///
    /// The box is the space between three pairs of parallel planes; the ray
    /// is clipped against each pair and intersects the box iff some portion
    /// of it survives all three. A hit additionally requires the entry
    /// distance to undercut the ray's current nearest hit, so boxes entirely
    /// behind an already found intersection are rejected.
    pub fn intersects(&self, ray: &Ray) -> bool { self.hit_distance(ray).is_some() }

    /// Slab test returning the entry distance on a hit.
    ///
    /// This is the form used by the traversal to order children front to
    /// back. Axis-parallel rays are handled through the IEEE semantics of
    /// the reciprocal direction: the infinite slab distances on the parallel
    /// axis leave the interval constrained by the remaining axes.
    pub fn hit_distance(&self, ray: &Ray) -> Option<f32> {
        let (tmin, tmax) = self.slab_interval(ray);
        (tmax >= tmin && tmin < ray.t && tmax > 0.0).then_some(tmin)
    }
}

impl PartialEq for Aabb {
    fn eq(&self, other: &Self) -> bool {
        (0..3).all(|i| ulp_eq(self.min[i], other.min[i]) && ulp_eq(self.max[i], other.max[i]))
    }
}

cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        impl Aabb {
            /// Clips the ray against the three slab pairs at once, returning
            /// the (entry, exit) interval.
            fn slab_interval(&self, ray: &Ray) -> (f32, f32) {
                use std::arch::x86_64::*;

                let mut mins = [0.0f32; 4];
                let mut maxs = [0.0f32; 4];
                unsafe {
                    let org = _mm_setr_ps(ray.org.x, ray.org.y, ray.org.z, 0.0);
                    let inv = _mm_setr_ps(ray.inv_dir.x, ray.inv_dir.y, ray.inv_dir.z, 0.0);
                    let t1 = _mm_mul_ps(
                        _mm_sub_ps(_mm_setr_ps(self.min.x, self.min.y, self.min.z, 0.0), org),
                        inv,
                    );
                    let t2 = _mm_mul_ps(
                        _mm_sub_ps(_mm_setr_ps(self.max.x, self.max.y, self.max.z, 0.0), org),
                        inv,
                    );
                    _mm_storeu_ps(mins.as_mut_ptr(), _mm_min_ps(t1, t2));
                    _mm_storeu_ps(maxs.as_mut_ptr(), _mm_max_ps(t1, t2));
                }
                // The w lane is excluded; x, y, z reduce in axis order.
                (mins[0].max(mins[1]).max(mins[2]), maxs[0].min(maxs[1]).min(maxs[2]))
            }
        }
    } else {
        impl Aabb {
            /// Clips the ray against the three slab pairs in turn, returning
            /// the (entry, exit) interval.
            fn slab_interval(&self, ray: &Ray) -> (f32, f32) {
                let tx1 = (self.min.x - ray.org.x) * ray.inv_dir.x;
                let tx2 = (self.max.x - ray.org.x) * ray.inv_dir.x;
                let mut tmin = tx1.min(tx2);
                let mut tmax = tx1.max(tx2);
                let ty1 = (self.min.y - ray.org.y) * ray.inv_dir.y;
                let ty2 = (self.max.y - ray.org.y) * ray.inv_dir.y;
                tmin = tmin.max(ty1.min(ty2));
                tmax = tmax.min(ty1.max(ty2));
                let tz1 = (self.min.z - ray.org.z) * ray.inv_dir.z;
                let tz2 = (self.max.z - ray.org.z) * ray.inv_dir.z;
                tmin = tmin.max(tz1.min(tz2));
                tmax = tmax.min(tz1.max(tz2));
                (tmin, tmax)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_box_grows_into_degenerate_box() {
        let mut aabb = Aabb::empty();
        assert!(!aabb.is_valid());

        aabb.grow(Vec3::new(1.0, 2.0, 3.0));
        assert!(aabb.is_valid());
        assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));

        aabb.grow(Vec3::new(-1.0, 4.0, 0.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn extend_and_union() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(0.5), Vec3::splat(2.0));
        let u = Aabb::union(&a, &b);
        assert_eq!(u.min, Vec3::ZERO);
        assert_eq!(u.max, Vec3::splat(2.0));
        assert!(u.contains(&a));
        assert!(u.contains(&b));
    }

    proptest! {
        #[test]
        fn half_area_and_center(a in -1e3f32..1e3, b in -1e3f32..1e3, c in -1e3f32..1e3,
            dx in 0.0f32..1e3, dy in 0.0f32..1e3, dz in 0.0f32..1e3)
        {
            let min = Vec3::new(a, b, c);
            let max = min + Vec3::new(dx, dy, dz);
            let aabb = Aabb::new(min, max);
            let e = aabb.extent();
            prop_assert_eq!(aabb.half_area(), e.x * e.y + e.y * e.z + e.z * e.x);
            prop_assert_eq!(aabb.center(), min * 0.5 + max * 0.5);
            prop_assert_eq!(aabb.center_along_axis(Axis::Y), aabb.center().y);
        }

        #[test]
        fn grown_points_are_contained(pts in proptest::collection::vec(
            (-1e3f32..1e3, -1e3f32..1e3, -1e3f32..1e3), 1..16))
        {
            let mut aabb = Aabb::empty();
            for &(x, y, z) in &pts {
                aabb.grow(Vec3::new(x, y, z));
            }
            for &(x, y, z) in &pts {
                prop_assert!(aabb.contains_point(Vec3::new(x, y, z)));
            }
        }
    }

    #[test]
    fn slab_hit_and_miss() {
        let aabb = Aabb::new(Vec3::splat(1.0), Vec3::splat(2.0));

        let hit = Ray::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.intersects(&hit));
        let d = aabb.hit_distance(&hit).unwrap();
        // entry at (1, 1, 1), sqrt(3) away from the origin
        assert!((d - 3.0f32.sqrt()).abs() < 1e-5);

        let away = Ray::new(Vec3::ZERO, -Vec3::ONE);
        assert!(aabb.hit_distance(&away).is_none());

        let offset = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE);
        assert!(!aabb.intersects(&offset));
    }

    #[test]
    fn slab_axis_parallel_ray() {
        let aabb = Aabb::new(Vec3::new(2.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0));

        // parallel to x, passing through the box
        let through = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(aabb.hit_distance(&through), Some(2.0));

        // parallel to x, offset outside the y slab
        let beside = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::X);
        assert!(aabb.hit_distance(&beside).is_none());
    }

    #[test]
    fn slab_respects_current_nearest_hit() {
        let aabb = Aabb::new(Vec3::splat(10.0), Vec3::splat(11.0));
        let mut ray = Ray::new(Vec3::ZERO, Vec3::ONE.normalize());
        assert!(aabb.intersects(&ray));

        // a closer hit prunes the box entirely
        ray.t = 1.0;
        assert!(aabb.hit_distance(&ray).is_none());
    }

    #[test]
    fn slab_from_inside_the_box() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        // negative entry distance, but tmax > 0 keeps it a hit
        let d = aabb.hit_distance(&ray).unwrap();
        assert!(d < 0.0);
    }

    #[test]
    fn slab_nan_ray_misses() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let mut ray = Ray::new(Vec3::ZERO, Vec3::X);
        ray.org = Vec3::splat(f32::NAN);
        assert!(aabb.hit_distance(&ray).is_none());
    }
}
