// Copyright @yucwang 2026

use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{EPSILON, Float, Vector3f};
use crate::math::ray::Ray3f;

/// Parallelogram spanned by `edge_u` and `edge_v` from `corner`.
pub struct Rectangle {
    corner: Vector3f,
    edge_u: Vector3f,
    edge_v: Vector3f,
    normal: Vector3f,
    area: Float,
}

impl Rectangle {
    pub fn new(corner: Vector3f, edge_u: Vector3f, edge_v: Vector3f) -> Self {
        let cross = edge_u.cross(&edge_v);
        let area = cross.norm();
        let normal = if area > 0.0 { cross / area } else { Vector3f::new(0.0, 0.0, 1.0) };

        Self { corner, edge_u, edge_v, normal, area }
    }

    /// Square of side `size` centred on `center`, in the plane `y = center.y`,
    /// facing +y.
    pub fn horizontal(center: Vector3f, size: Float) -> Self {
        let half = 0.5 * size;
        Self::new(center - Vector3f::new(half, 0.0, half),
                  Vector3f::new(0.0, 0.0, size),
                  Vector3f::new(size, 0.0, 0.0))
    }

    // Coordinates of `p` in the (edge_u, edge_v) basis.
    fn local_coords(&self, p: &Vector3f) -> (Float, Float) {
        let d = p - self.corner;
        let uu = self.edge_u.norm_squared();
        let vv = self.edge_v.norm_squared();
        let uv = self.edge_u.dot(&self.edge_v);
        let du = d.dot(&self.edge_u);
        let dv = d.dot(&self.edge_v);
        let denom = uu * vv - uv * uv;
        if denom.abs() < 1e-12 {
            return (-1.0, -1.0);
        }
        ((du * vv - dv * uv) / denom, (dv * uu - du * uv) / denom)
    }
}

impl Shape for Rectangle {
    fn bounding_box(&self) -> AABB {
        let mut bbox = AABB::new(self.corner, self.corner + self.edge_u);
        bbox.expand_by_point(&(self.corner + self.edge_v));
        bbox.expand_by_point(&(self.corner + self.edge_u + self.edge_v));
        bbox
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float> {
        let n_dot_dir = self.normal.dot(&ray.dir());
        if n_dot_dir.abs() < EPSILON {
            return None;
        }

        let t = (self.corner - ray.origin()).dot(&self.normal) / n_dot_dir;
        if !ray.test_segment(t) {
            return None;
        }

        let (a, b) = self.local_coords(&ray.at(t));
        if (0.0..=1.0).contains(&a) && (0.0..=1.0).contains(&b) { Some(t) } else { None }
    }

    fn normal_at(&self, _p: &Vector3f) -> Vector3f {
        self.normal
    }

    fn surface_area(&self) -> Float {
        self.area
    }

    fn describe(&self) -> String {
        format!("Rectangle(corner: {:?}, u: {:?}, v: {:?})", self.corner, self.edge_u, self.edge_v)
    }
}
