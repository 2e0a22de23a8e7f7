//! Shared machinery of the build strategies: the node pool, the permutation
//! array and the in-place partition.

use super::node::BvhNode;
use crate::{aabb::Aabb, axis::Axis, triangle::Triangle};

/// Mutable state threaded through a build.
///
/// Owns the node pool and the permutation array while borrowing the
/// (read-only, centroid-filled) triangles; the split strategies are free
/// functions over this context. The pool holds `2 * N` nodes, a safe upper
/// bound for a binary tree with at most `N` leaves, and `used` is the sole
/// allocation cursor: it starts at 2 (root at index 0, index 1 left vacant)
/// so that every sibling pair allocated by `used += 2` stays contiguous.
pub(super) struct Builder<'a> {
    pub triangles: &'a [Triangle],
    pub nodes: Vec<BvhNode>,
    pub indices: Vec<u32>,
    pub used: u32,
}

impl<'a> Builder<'a> {
    /// Sets up the pool and the identity permutation, roots the tree over
    /// the whole triangle range and computes the root bounds.
    ///
    /// The triangle slice must be non-empty.
    pub fn new(triangles: &'a [Triangle]) -> Self {
        let count = triangles.len();
        let mut nodes = vec![BvhNode::default(); 2 * count];
        nodes[0].first = 0;
        nodes[0].count = count as u32;

        let mut builder = Self {
            triangles,
            nodes,
            indices: (0..count as u32).collect(),
            used: 2,
        };
        builder.update_bounds(0);
        builder
    }

    /// The triangle behind a permutation slot.
    pub fn triangle_at(&self, slot: u32) -> &Triangle {
        &self.triangles[self.indices[slot as usize] as usize]
    }

    /// Recomputes a node's bounds tightly around the triangles of its slice.
    pub fn update_bounds(&mut self, node_idx: u32) {
        let mut bounds = Aabb::empty();
        for slot in self.nodes[node_idx as usize].triangle_range() {
            let tri = self.triangle_at(slot);
            bounds.grow(tri.v0);
            bounds.grow(tri.v1);
            bounds.grow(tri.v2);
        }
        self.nodes[node_idx as usize].bounds = bounds;
    }

    /// Two-pointer in-place partition of a node's permutation slice around
    /// `pos` on `axis`, returning the size of the left half.
    ///
    /// The comparison is strictly `<`: triangles whose centroid coincides
    /// with the split position always land on the right, which keeps the
    /// tree shape reproducible on degenerate flat meshes. A return of 0 or
    /// `count` means the split is one-sided and must be abandoned.
    pub fn partition(&mut self, node_idx: u32, axis: Axis, pos: f32) -> u32 {
        let range = self.nodes[node_idx as usize].triangle_range();
        let slice = &mut self.indices[range.start as usize..range.end as usize];

        let mut left = 0;
        let mut right = slice.len();
        while left < right {
            if self.triangles[slice[left] as usize].centroid[axis] < pos {
                left += 1;
            } else {
                right -= 1;
                slice.swap(left, right);
            }
        }
        left as u32
    }

    /// Allocates the contiguous child pair for `node_idx`, hands the first
    /// `left_count` slots of the parent slice to the left child and the rest
    /// to the right, computes both children's bounds and demotes the parent
    /// to an internal node. Returns the left child's index.
    pub fn allocate_children(&mut self, node_idx: u32, left_count: u32) -> u32 {
        let left_idx = self.used;
        self.used += 2;

        let parent = self.nodes[node_idx as usize];
        debug_assert!(left_count > 0 && left_count < parent.count);

        self.nodes[left_idx as usize].first = parent.first;
        self.nodes[left_idx as usize].count = left_count;
        self.nodes[left_idx as usize + 1].first = parent.first + left_count;
        self.nodes[left_idx as usize + 1].count = parent.count - left_count;

        let parent = &mut self.nodes[node_idx as usize];
        parent.first = left_idx;
        parent.count = 0;

        self.update_bounds(left_idx);
        self.update_bounds(left_idx + 1);
        left_idx
    }
}
