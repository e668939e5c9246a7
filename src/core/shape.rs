// Copyright @yucwang 2023

use crate::math::aabb::AABB;
use crate::math::bsphere::BoundingSphere;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    fn bounding_box(&self) -> AABB;

    /// Distance along `ray` of the nearest hit inside its segment.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<Float>;

    /// Geometric normal at a point on the surface.
    fn normal_at(&self, p: &Vector3f) -> Vector3f;

    fn surface_area(&self) -> Float;

    fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_box().bounding_sphere()
    }

    fn describe(&self) -> String {
        String::from("Shape")
    }
}
