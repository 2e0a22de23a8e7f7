//! Triangle primitive and the Möller-Trumbore intersection test.

use crate::ray::Ray;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tolerance below which a determinant counts as parallel, and below which a
/// hit distance counts as self-intersection.
const EPSILON: f32 = 1e-4;

/// A triangle with a cached centroid.
///
/// The centroid is the arithmetic mean of the three vertices and serves as
/// the triangle's representative point during BVH partitioning. It is filled
/// in once by [`crate::Bvh::build`] before any reordering; the vertices are
/// never mutated.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex.
    pub v0: Vec3,
    /// Second vertex.
    pub v1: Vec3,
    /// Third vertex.
    pub v2: Vec3,
    /// Mean of the three vertices, populated at the start of a build.
    pub centroid: Vec3,
}

impl Triangle {
    /// Creates a triangle from its vertices. The centroid stays zeroed until
    /// a build computes it.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            v0,
            v1,
            v2,
            centroid: Vec3::ZERO,
        }
    }

    /// Recomputes the cached centroid.
    pub(crate) fn update_centroid(&mut self) {
        self.centroid = (self.v0 + self.v1 + self.v2) / 3.0;
    }

    /// Möller-Trumbore ray/triangle intersection.
    ///
    /// Solves for the barycentric coordinates (u, v) and ray parameter t of
    /// the intersection point via scalar triple products, rejecting as soon
    /// as a coordinate leaves the triangle. On a hit in front of the origin
    /// the ray's nearest distance is tightened in place; there is no other
    /// output, and misses leave the ray untouched.
    pub fn intersect(&self, ray: &mut Ray) {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let p = ray.dir.cross(e2);

        let det = e1.dot(p);
        // ray parallel to the triangle plane
        if det.abs() < EPSILON {
            return;
        }

        let inv_det = 1.0 / det;
        let s = ray.org - self.v0;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return;
        }

        let q = s.cross(e1);
        let v = ray.dir.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return;
        }

        let t = e2.dot(q) * inv_det;
        if t > EPSILON {
            ray.t = ray.t.min(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let mut tri = unit_triangle();
        tri.update_centroid();
        assert_eq!(tri.centroid, Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
    }

    #[test]
    fn perpendicular_hit_at_unit_distance() {
        let tri = unit_triangle();
        let mut ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);
        tri.intersect(&mut ray);
        assert_eq!(ray.hit(), Some(1.0));
    }

    #[test]
    fn axis_parallel_ray_misses() {
        let tri = unit_triangle();
        let mut ray = Ray::new(Vec3::new(0.5, 0.5, -1.0), Vec3::X);
        tri.intersect(&mut ray);
        assert_eq!(ray.hit(), None);
        assert_eq!(ray.t, Ray::T_MAX);
    }

    #[test]
    fn outside_barycentric_range_misses() {
        let tri = unit_triangle();
        // u + v > 1 beyond the hypotenuse
        let mut ray = Ray::new(Vec3::new(0.9, 0.9, -1.0), Vec3::Z);
        tri.intersect(&mut ray);
        assert_eq!(ray.hit(), None);

        // u < 0
        let mut ray = Ray::new(Vec3::new(-0.1, 0.5, -1.0), Vec3::Z);
        tri.intersect(&mut ray);
        assert_eq!(ray.hit(), None);
    }

    #[test]
    fn hit_behind_origin_is_ignored() {
        let tri = unit_triangle();
        let mut ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z);
        tri.intersect(&mut ray);
        assert_eq!(ray.hit(), None);
    }

    #[test]
    fn writeback_keeps_the_nearer_hit() {
        let tri = unit_triangle();
        let mut ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);
        ray.t = 0.5;
        tri.intersect(&mut ray);
        assert_eq!(ray.t, 0.5);

        ray.t = 2.0;
        tri.intersect(&mut ray);
        assert_eq!(ray.t, 1.0);
    }

    #[test]
    fn edge_on_ray_is_rejected_as_parallel() {
        let tri = unit_triangle();
        // travelling inside the triangle's plane
        let mut ray = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::X);
        tri.intersect(&mut ray);
        assert_eq!(ray.hit(), None);
    }
}
