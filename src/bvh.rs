//! Bounding volume hierarchy construction and traversal.

mod build;
mod midpoint;
mod node;
mod sah;

pub use node::BvhNode;

use crate::{ray::Ray, triangle::Triangle};
use build::Builder;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Maximum tree depth the fixed-size traversal stack accommodates.
pub const MAX_TRAVERSAL_DEPTH: usize = 64;

/// The split strategy used to construct a [`Bvh`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Split each node at the centre of its bounding box along the longest
    /// axis. Fast builds, adequate trees.
    MedianMidpoint,
    /// Minimise the surface area heuristic over all centroid candidates.
    /// Slow builds, tight trees.
    Sah,
}

/// Counters collected by [`Bvh::intersect_with_stats`].
///
/// Useful for asserting traversal behaviour (a ray missing the scene must
/// visit no leaf) and for comparing traversal cost against the brute-force
/// reference.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes taken off the stack or descended into.
    pub nodes_visited: u32,
    /// Leaves whose triangles were tested.
    pub leaves_visited: u32,
    /// Individual ray/triangle tests performed.
    pub triangles_tested: u32,
}

/// A bounding volume hierarchy over a borrowed triangle slice.
///
/// Built once by [`Bvh::build`] and immutable afterwards; traversal only
/// mutates the caller's ray, so a `Bvh` can be shared freely across threads
/// and concurrent [`Bvh::intersect`] calls on distinct rays are
/// data-race-free.
#[derive(Debug)]
pub struct Bvh<'a> {
    triangles: &'a [Triangle],
    /// Flat node pool of `2 * N` entries; node 0 is the root, node 1 stays
    /// vacant so sibling pairs share a cache line.
    nodes: Vec<BvhNode>,
    /// Permutation mapping leaf slots to triangle indices.
    indices: Vec<u32>,
    /// Allocation cursor: number of pool slots handed out.
    used: u32,
}

impl<'a> Bvh<'a> {
    /// Builds a hierarchy over `triangles` with the given strategy.
    ///
    /// Fills in each triangle's centroid, then hands the identity
    /// permutation to the strategy; the triangles themselves are never
    /// reordered, and after the build the slice is only read. An empty
    /// slice yields an empty hierarchy whose queries are no-ops.
    ///
    /// # Panics
    ///
    /// Panics if the finished tree is deeper than [`MAX_TRAVERSAL_DEPTH`],
    /// which indicates a pathological input set.
    pub fn build(triangles: &'a mut [Triangle], strategy: SplitStrategy) -> Self {
        let start = Instant::now();
        for tri in triangles.iter_mut() {
            tri.update_centroid();
        }
        let triangles: &'a [Triangle] = triangles;

        if triangles.is_empty() {
            return Self {
                triangles,
                nodes: Vec::new(),
                indices: Vec::new(),
                used: 0,
            };
        }

        let mut builder = Builder::new(triangles);
        match strategy {
            SplitStrategy::MedianMidpoint => midpoint::split(&mut builder, 0),
            SplitStrategy::Sah => sah::split(&mut builder, 0),
        }

        let bvh = Self {
            triangles,
            nodes: builder.nodes,
            indices: builder.indices,
            used: builder.used,
        };
        let depth = bvh.depth();
        assert!(
            depth as usize <= MAX_TRAVERSAL_DEPTH,
            "BVH depth {depth} exceeds the traversal stack"
        );
        log::info!(
            "built {:?} BVH over {} triangles: {} nodes, depth {}, {:.2?}",
            strategy,
            triangles.len(),
            bvh.used,
            depth,
            start.elapsed()
        );
        bvh
    }

    /// Intersects the ray with the hierarchy, tightening `ray.t` to the
    /// nearest hit distance. A miss leaves the ray untouched.
    pub fn intersect(&self, ray: &mut Ray) { self.intersect_with_stats(ray); }

    /// [`Bvh::intersect`] with visit counters.
    ///
    /// The walk is iterative with an explicit stack. At every internal node
    /// both children are slab-tested and visited near-to-far; the far child
    /// is deferred on the stack and, because the slab test compares its
    /// entry distance against the ever-shrinking `ray.t`, is often pruned
    /// wholesale by the time it is popped.
    pub fn intersect_with_stats(&self, ray: &mut Ray) -> TraversalStats {
        let mut stats = TraversalStats::default();
        if self.nodes.is_empty() {
            return stats;
        }

        let mut stack = [0u32; MAX_TRAVERSAL_DEPTH];
        let mut stack_len = 0usize;
        let mut node = &self.nodes[0];

        loop {
            stats.nodes_visited += 1;

            if node.is_leaf() {
                stats.leaves_visited += 1;
                for slot in node.triangle_range() {
                    stats.triangles_tested += 1;
                    self.triangles[self.indices[slot as usize] as usize].intersect(ray);
                }
                if stack_len == 0 {
                    break;
                }
                stack_len -= 1;
                node = &self.nodes[stack[stack_len] as usize];
                continue;
            }

            let mut near = node.left_child();
            let mut far = near + 1;
            let mut near_dist = self.nodes[near as usize].bounds.hit_distance(ray);
            let mut far_dist = self.nodes[far as usize].bounds.hit_distance(ray);
            if near_dist.unwrap_or(f32::INFINITY) > far_dist.unwrap_or(f32::INFINITY) {
                std::mem::swap(&mut near, &mut far);
                std::mem::swap(&mut near_dist, &mut far_dist);
            }

            if near_dist.is_none() {
                // both children missed
                if stack_len == 0 {
                    break;
                }
                stack_len -= 1;
                node = &self.nodes[stack[stack_len] as usize];
            } else {
                node = &self.nodes[near as usize];
                if far_dist.is_some() {
                    stack[stack_len] = far;
                    stack_len += 1;
                }
            }
        }
        stats
    }

    /// The triangles this hierarchy was built over.
    pub fn triangles(&self) -> &[Triangle] { self.triangles }

    /// The allocated prefix of the node pool. Node 0 is the root; node 1 is
    /// the vacant alignment slot and belongs to no tree.
    pub fn nodes(&self) -> &[BvhNode] { &self.nodes[..self.used as usize] }

    /// The permutation array mapping leaf slots to triangle indices.
    pub fn indices(&self) -> &[u32] { &self.indices }

    /// The root node, unless the hierarchy is empty.
    pub fn root(&self) -> Option<&BvhNode> { self.nodes.first() }

    /// Number of pool slots handed out, including the vacant slot 1.
    pub fn node_count(&self) -> u32 { self.used }

    /// Depth of the tree: 0 when empty, 1 for a lone root leaf.
    pub fn depth(&self) -> u32 {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut depth = 0;
        let mut stack = vec![(0u32, 1u32)];
        while let Some((node_idx, level)) = stack.pop() {
            depth = depth.max(level);
            let node = &self.nodes[node_idx as usize];
            if !node.is_leaf() {
                stack.push((node.left_child(), level + 1));
                stack.push((node.left_child() + 1, level + 1));
            }
        }
        depth
    }
}
