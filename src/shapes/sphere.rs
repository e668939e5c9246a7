// Copyright @yucwang 2026

use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::bsphere::BoundingSphere;
use crate::math::constants::{Float, Vector3f, PI};
use crate::math::ray::Ray3f;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius }
    }
}

impl Shape for Sphere {
    fn bounding_box(&self) -> AABB {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        AABB::new(self.center - r, self.center + r)
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(&ray.dir());
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        [-b - sqrt_d, -b + sqrt_d].into_iter().find(|t| ray.test_segment(*t))
    }

    fn normal_at(&self, p: &Vector3f) -> Vector3f {
        (p - self.center).normalize()
    }

    fn surface_area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.radius)
    }

    fn describe(&self) -> String {
        format!("Sphere(center: {:?}, radius: {})", self.center, self.radius)
    }
}
