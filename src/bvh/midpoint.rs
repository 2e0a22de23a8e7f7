//! Median-midpoint split strategy.
//!
//! Splits every node at the centre of its bounding box along the longest
//! axis. Cheap to evaluate and O(N log N) to build, at the price of looser
//! trees than the surface area heuristic produces.

use super::build::Builder;

/// Recursively subdivides `node_idx` until nodes hold at most two triangles
/// or a split stops separating them.
pub(super) fn split(builder: &mut Builder, node_idx: u32) {
    let node = builder.nodes[node_idx as usize];
    if node.count <= 2 {
        return;
    }

    let axis = node.bounds.max_extent_axis();
    let pos = node.bounds.center_along_axis(axis);

    let left_count = builder.partition(node_idx, axis, pos);
    // all centroids on one side of the midpoint, e.g. a cluster of
    // coincident triangles; the node stays a leaf
    if left_count == 0 || left_count == node.count {
        return;
    }

    let left_idx = builder.allocate_children(node_idx, left_count);
    split(builder, left_idx);
    split(builder, left_idx + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle::Triangle;
    use glam::Vec3;

    fn spread_triangles(count: usize) -> Vec<Triangle> {
        (0..count)
            .map(|i| {
                let base = Vec3::new(i as f32 * 2.0, 0.0, 0.0);
                let mut tri =
                    Triangle::new(base, base + Vec3::new(1.0, 0.0, 0.0), base + Vec3::Y);
                tri.update_centroid();
                tri
            })
            .collect()
    }

    #[test]
    fn small_nodes_stay_leaves() {
        let tris = spread_triangles(2);
        let mut builder = Builder::new(&tris);
        split(&mut builder, 0);
        assert_eq!(builder.used, 2);
        assert!(builder.nodes[0].is_leaf());
    }

    #[test]
    fn splits_along_the_longest_axis() {
        let tris = spread_triangles(4);
        let mut builder = Builder::new(&tris);
        split(&mut builder, 0);

        assert!(!builder.nodes[0].is_leaf());
        assert_eq!(builder.used, 4);
        let left = builder.nodes[0].left_child() as usize;
        // the spread is along x, so the midpoint split halves the row into
        // two leaves of two triangles each
        assert!(builder.nodes[left].is_leaf());
        assert!(builder.nodes[left + 1].is_leaf());
        assert_eq!(builder.nodes[left].triangle_range(), 0..2);
        assert_eq!(builder.nodes[left + 1].triangle_range(), 2..4);
    }

    #[test]
    fn coincident_centroids_terminate_as_one_leaf() {
        let tri = {
            let mut tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
            tri.update_centroid();
            tri
        };
        let tris = vec![tri; 100];
        let mut builder = Builder::new(&tris);
        split(&mut builder, 0);

        assert_eq!(builder.used, 2);
        assert!(builder.nodes[0].is_leaf());
        assert_eq!(builder.nodes[0].triangle_range(), 0..100);
    }
}
