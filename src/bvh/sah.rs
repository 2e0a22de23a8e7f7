//! Surface area heuristic split strategy.
//!
//! For every node the centroids of its triangles serve as candidate split
//! positions; the candidate minimising `n_left * area(left) + n_right *
//! area(right)` wins, and the node stays a leaf when even the best split
//! costs at least as much as leaving the node unsplit. The exhaustive sweep
//! is O(N^2) per node in the worst case but pays for itself in traversal.

use super::build::Builder;
use crate::{aabb::Aabb, axis::Axis};

/// Cost assigned to degenerate candidates, high enough to lose against any
/// real split and against every parent.
const COST_MAX: f32 = 1e30;

/// Recursively subdivides `node_idx` while a split beats the node's own
/// surface-area cost.
pub(super) fn split(builder: &mut Builder, node_idx: u32) {
    let node = builder.nodes[node_idx as usize];

    let (axis, pos, cost) = best_split(builder, node_idx);
    let parent_cost = node.count as f32 * node.bounds.half_area();
    // the unsplit leaf is at least as cheap as the best split; this is both
    // the recursion anchor and the guard against deep degenerate spines
    if cost >= parent_cost {
        return;
    }

    let left_count = builder.partition(node_idx, axis, pos);
    if left_count == 0 || left_count == node.count {
        return;
    }

    let left_idx = builder.allocate_children(node_idx, left_count);
    split(builder, left_idx);
    split(builder, left_idx + 1);
}

/// Sweeps all candidate positions over all three axes and returns the
/// cheapest `(axis, position, cost)` triple.
///
/// Iteration is axis-major with candidates in ascending order, and the
/// comparison is strictly `<`, so on cost ties the earlier axis and the
/// lower position win.
fn best_split(builder: &Builder, node_idx: u32) -> (Axis, f32, f32) {
    let node = &builder.nodes[node_idx as usize];
    let mut best = (Axis::X, 0.0, COST_MAX);

    let mut candidates = Vec::with_capacity(node.count as usize);
    for axis in Axis::ALL {
        candidates.clear();
        candidates.extend(
            node.triangle_range()
                .map(|slot| builder.triangle_at(slot).centroid[axis]),
        );
        candidates.sort_unstable_by(f32::total_cmp);
        candidates.dedup();

        for &pos in &candidates {
            let cost = split_cost(builder, node_idx, axis, pos);
            if cost < best.2 {
                best = (axis, pos, cost);
            }
        }
    }
    best
}

/// Evaluates one candidate: classifies the node's triangles by the strict
/// `<` centroid test and sums each side's triangle count weighted by the
/// area of its tight vertex bounds.
fn split_cost(builder: &Builder, node_idx: u32, axis: Axis, pos: f32) -> f32 {
    let mut left_box = Aabb::empty();
    let mut right_box = Aabb::empty();
    let mut left_count = 0u32;
    let mut right_count = 0u32;

    for slot in builder.nodes[node_idx as usize].triangle_range() {
        let tri = builder.triangle_at(slot);
        let (side_box, side_count) = if tri.centroid[axis] < pos {
            (&mut left_box, &mut left_count)
        } else {
            (&mut right_box, &mut right_count)
        };
        *side_count += 1;
        side_box.grow(tri.v0);
        side_box.grow(tri.v1);
        side_box.grow(tri.v2);
    }

    let cost = left_count as f32 * left_box.half_area() + right_count as f32 * right_box.half_area();
    // an empty side makes the cost NaN (zero count times infinite area);
    // score it out of contention
    if cost > 0.0 {
        cost
    } else {
        COST_MAX
    }
}
