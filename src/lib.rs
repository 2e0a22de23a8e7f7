//! raybvh is a library for accelerated ray/triangle-mesh intersection.
//!
//! It builds a bounding volume hierarchy (BVH) over an unordered triangle
//! list and answers nearest-hit queries in sub-linear time. Two build
//! strategies are provided: a fast median-midpoint split and a surface-area
//! heuristic (SAH) optimiser. Traversal is iterative, front-to-back, and
//! allocation-free.
//!
//! ```
//! use raybvh::{Bvh, Ray, SplitStrategy, XorShift32};
//! use glam::Vec3;
//!
//! let mut rng = XorShift32::new(0x12345678);
//! let mut triangles = raybvh::random_triangles(64, &mut rng);
//! let bvh = Bvh::build(&mut triangles, SplitStrategy::Sah);
//!
//! let mut ray = Ray::new(Vec3::new(0.0, 0.0, -18.0), Vec3::Z);
//! bvh.intersect(&mut ray);
//! if let Some(t) = ray.hit() {
//!     println!("nearest hit at t = {t}");
//! }
//! ```

#![warn(missing_docs)]

mod aabb;
mod axis;
mod bvh;
mod error;
mod math;
mod mesh;
mod ray;
mod rng;
mod triangle;

pub use aabb::Aabb;
pub use axis::Axis;
pub use bvh::{Bvh, BvhNode, SplitStrategy, TraversalStats, MAX_TRAVERSAL_DEPTH};
pub use error::Error;
pub use mesh::{load_tri_file, random_triangles};
pub use ray::Ray;
pub use rng::XorShift32;
pub use triangle::Triangle;
