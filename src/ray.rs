//! Ray representation shared by the intersection routines.

use glam::Vec3;

/// A ray with a cached reciprocal direction and a shrinking hit interval.
///
/// `t` starts at [`Ray::T_MAX`] and only ever decreases: every successful
/// triangle intersection writes back the nearer distance, so after a
/// traversal `t` holds the distance to the nearest hit along the ray, or the
/// sentinel if nothing was hit. Use [`Ray::hit`] for the `Option` view.
#[derive(Debug, Copy, Clone)]
pub struct Ray {
    /// The origin of the ray.
    pub org: Vec3,

    /// The direction of the ray (unit length).
    pub dir: Vec3,

    /// Componentwise reciprocal of the direction, cached for the slab test.
    /// Axis-parallel directions yield infinities here; the slab test relies
    /// on their IEEE min/max behaviour.
    pub inv_dir: Vec3,

    /// Current nearest hit distance along the ray.
    pub t: f32,
}

impl Ray {
    /// Sentinel distance meaning "no hit yet".
    pub const T_MAX: f32 = 1e30;

    /// Creates a new ray (direction will be normalised).
    ///
    /// The direction must be non-zero; a zero direction is a caller bug and
    /// produces a ray that hits nothing.
    pub fn new(org: Vec3, dir: Vec3) -> Self {
        let dir = dir.normalize();
        Self {
            org,
            dir,
            inv_dir: dir.recip(),
            t: Self::T_MAX,
        }
    }

    /// Returns the nearest hit distance, or `None` if the ray has not hit
    /// anything.
    pub fn hit(&self) -> Option<f32> { (self.t < Self::T_MAX).then_some(self.t) }

    /// The point `org + t * dir` along the ray.
    pub fn at(&self, t: f32) -> Vec3 { self.org + self.dir * t }
}
