// Copyright @yucwang 2023

use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{ EPSILON, Float, Vector3f };
use crate::math::ray::Ray3f;

pub struct Triangle {
    p0: Vector3f,
    p1: Vector3f,
    p2: Vector3f,
    normal: Vector3f,
}

impl Shape for Triangle {
    fn bounding_box(&self) -> AABB {
        let mut bound = AABB::new(self.p0, self.p1);
        bound.expand_by_point(&self.p2);

        bound
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float> {
        let n_dot_dir = self.normal.dot(&ray.dir());
        if n_dot_dir.abs() < EPSILON {
            return None;
        }

        let t = (self.normal.dot(&self.p0) - self.normal.dot(&ray.origin())) / n_dot_dir;
        if !ray.test_segment(t) {
            return None;
        }

        if self.is_in_triangle(&ray.at(t)) { Some(t) } else { None }
    }

    fn normal_at(&self, _p: &Vector3f) -> Vector3f {
        self.normal
    }

    fn surface_area(&self) -> Float {
        0.5 * ((self.p1 - self.p0).cross(&(self.p2 - self.p0))).norm()
    }

    fn describe(&self) -> String {
        format!("Triangle({:?}, {:?}, {:?})", self.p0, self.p1, self.p2)
    }
}

impl Triangle {
    pub fn new(new_p0: Vector3f, new_p1: Vector3f, new_p2: Vector3f) -> Self {
        let normal = (new_p1 - new_p0).cross(&(new_p2 - new_p0));
        let normal = if normal.norm() > 0.0 { normal.normalize() } else { Vector3f::new(0.0, 0.0, 1.0) };
        Triangle {
            p0: new_p0,
            p1: new_p1,
            p2: new_p2,
            normal,
        }
    }

    /// Point is assumed to lie in the triangle's plane.
    fn is_in_triangle(&self, p: &Vector3f) -> bool {
        let n0 = (self.p1 - self.p0).cross(&(p - self.p0));
        let n1 = (self.p2 - self.p1).cross(&(p - self.p1));
        let n2 = (self.p0 - self.p2).cross(&(p - self.p2));

        n0.dot(&self.normal) >= 0.0 && n1.dot(&self.normal) >= 0.0 && n2.dot(&self.normal) >= 0.0
    }

    pub fn vertices(&self) -> (Vector3f, Vector3f, Vector3f) {
        (self.p0, self.p1, self.p2)
    }

    pub fn is_degenerate(&self) -> bool {
        self.surface_area() <= 0.0
    }
}
