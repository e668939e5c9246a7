// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

const MAX_LEAF_SIZE: usize = 4;

enum NodeKind {
    Leaf { start: usize, count: usize },
    Interior { left: usize, right: usize },
}

struct BVHNode {
    bounds: AABB,
    kind: NodeKind,
}

/// Bounding volume hierarchy over primitive boxes. It knows nothing about
/// the primitives themselves; intersection is delegated to a callback.
pub struct BVH {
    nodes: Vec<BVHNode>,
    indices: Vec<usize>,
}

impl BVH {
    pub fn new(prim_bounds: &[AABB]) -> Self {
        let centroids: Vec<Vector3f> = prim_bounds.iter().map(|b| b.center()).collect();
        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * prim_bounds.len()),
            indices: (0..prim_bounds.len()).collect(),
        };
        if !prim_bounds.is_empty() {
            bvh.build(prim_bounds, &centroids, 0, prim_bounds.len());
        }
        bvh
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Median split along the widest centroid axis.
    fn build(&mut self, prim_bounds: &[AABB], centroids: &[Vector3f], start: usize, end: usize) -> usize {
        let mut bounds = AABB::default();
        let mut centroid_bounds = AABB::default();
        for &idx in &self.indices[start..end] {
            bounds.expand_by_aabb(&prim_bounds[idx]);
            centroid_bounds.expand_by_point(&centroids[idx]);
        }

        let node_idx = self.nodes.len();
        let count = end - start;
        let axis = centroid_bounds.max_extent();
        if count <= MAX_LEAF_SIZE || centroid_bounds.diagonal()[axis] <= 0.0 {
            self.nodes.push(BVHNode { bounds, kind: NodeKind::Leaf { start, count } });
            return node_idx;
        }

        let mid = start + count / 2;
        self.indices[start..end].select_nth_unstable_by(count / 2, |a, b| {
            centroids[*a][axis].total_cmp(&centroids[*b][axis])
        });

        self.nodes.push(BVHNode { bounds, kind: NodeKind::Leaf { start, count } });
        let left = self.build(prim_bounds, centroids, start, mid);
        let right = self.build(prim_bounds, centroids, mid, end);
        self.nodes[node_idx].kind = NodeKind::Interior { left, right };
        node_idx
    }

    /// Closest hit reported by `hit_fn(primitive, ray) -> Option<t>`.
    pub fn ray_intersection<F>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<(usize, Float)>
    where
        F: FnMut(usize, &Ray3f) -> Option<Float>,
    {
        if self.nodes.is_empty() {
            return None;
        }

        // Shrinking the segment on every hit lets later nodes be culled.
        let mut segment = *ray;
        let mut closest: Option<(usize, Float)> = None;
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if !node.bounds.ray_intersect(&segment) {
                continue;
            }

            match node.kind {
                NodeKind::Leaf { start, count } => {
                    for &prim_idx in &self.indices[start..start + count] {
                        if let Some(t) = hit_fn(prim_idx, &segment) {
                            if t < segment.max_t {
                                segment.max_t = t;
                                closest = Some((prim_idx, t));
                            }
                        }
                    }
                }
                NodeKind::Interior { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        closest
    }
}
