// Copyright @yucwang 2026

use crate::core::bvh::BVH;
use crate::core::environment::Environment;
use crate::core::material::Material;
use crate::core::rng::RenderRng;
use crate::core::shape::Shape;
use crate::emitters::uniform::UniformEnvironment;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };
use crate::math::energy::Energy;
use crate::math::ray::Ray3f;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<dyn Material>,
    pub name: Option<String>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material: Arc<dyn Material>) -> Self {
        Self { shape, material, name: None }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Geometric normal and material at a point on the surface.
    pub fn at(&self, point: &Vector3f) -> (Vector3f, &dyn Material) {
        (self.shape.normal_at(point), self.material.as_ref())
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }

    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }

    pub fn is_light(&self) -> bool {
        !self.material.emit().is_zero()
    }
}

#[derive(Clone, Copy)]
pub struct SceneHit<'a> {
    pub t: Float,
    pub object: &'a SceneObject,
}

pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<usize>,
    environment: Box<dyn Environment>,
    scene_bounds: AABB,
    bvh: Option<BVH>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Box::new(UniformEnvironment::new(Energy::zero())))
    }
}

impl Scene {
    pub fn new(environment: Box<dyn Environment>) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            environment,
            scene_bounds: AABB::default(),
            bvh: None,
        }
    }

    pub fn with_objects(objects: Vec<SceneObject>, environment: Box<dyn Environment>) -> Self {
        let mut scene = Self::new(environment);
        for object in objects {
            scene.add_object(object);
        }
        scene.build_bvh();
        scene
    }

    pub fn add_object(&mut self, object: SceneObject) {
        if object.is_light() {
            self.lights.push(self.objects.len());
        }
        self.objects.push(object);
        self.bvh = None;
    }

    pub fn set_environment(&mut self, environment: Box<dyn Environment>) {
        self.environment = environment;
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn scene_bounds(&self) -> &AABB {
        &self.scene_bounds
    }

    pub fn build_bvh(&mut self) {
        let mut scene_bounds = AABB::default();
        let prim_bounds: Vec<AABB> = self.objects.iter().map(|obj| {
            let bounds = obj.shape.bounding_box();
            scene_bounds.expand_by_aabb(&bounds);
            bounds
        }).collect();

        self.bvh = Some(BVH::new(&prim_bounds));
        self.scene_bounds = scene_bounds;
    }

    /// Closest hit along the ray. Falls back to a linear scan when the BVH
    /// has not been built since the last `add_object`.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<SceneHit<'_>> {
        let closest = match &self.bvh {
            Some(bvh) => bvh.ray_intersection(ray, |idx, r| self.objects[idx].shape.ray_intersection(r)),
            None => self.objects.iter().enumerate()
                .filter_map(|(idx, obj)| obj.shape.ray_intersection(ray).map(|t| (idx, t)))
                .min_by(|a, b| a.1.total_cmp(&b.1)),
        };

        closest.map(|(idx, t)| SceneHit { t, object: &self.objects[idx] })
    }

    pub fn env_at(&self, dir: &Vector3f) -> Energy {
        self.environment.radiance(dir)
    }

    /// Number of emissive objects.
    pub fn lights(&self) -> usize {
        self.lights.len()
    }

    /// Uniformly chosen emissive object.
    pub fn light(&self, rng: &mut RenderRng) -> Option<&SceneObject> {
        if self.lights.is_empty() {
            return None;
        }
        let idx = self.lights[rng.next_index(self.lights.len())];
        self.objects.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::emissive::Emissive;
    use crate::materials::lambertian_diffuse::LambertianDiffuse;
    use crate::shapes::rectangle::Rectangle;
    use crate::shapes::sphere::Sphere;

    fn build_scene() -> Scene {
        let floor = SceneObject::new(
            Arc::new(Rectangle::horizontal(Vector3f::zeros(), 10.0)),
            Arc::new(LambertianDiffuse::new(Energy::splat(0.5))))
            .with_name(String::from("floor"));
        let light = SceneObject::new(
            Arc::new(Sphere::new(Vector3f::new(0.0, 5.0, 0.0), 1.0)),
            Arc::new(Emissive::new(Energy::splat(10.0))))
            .with_name(String::from("light"));

        Scene::with_objects(vec![floor, light],
                            Box::new(UniformEnvironment::new(Energy::new(0.1, 0.2, 0.3))))
    }

    #[test]
    fn test_lights_are_registered() {
        let scene = build_scene();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.lights(), 1);

        let mut rng = RenderRng::new(5);
        for _ in 0..16 {
            let light = scene.light(&mut rng).expect("light");
            assert_eq!(light.name.as_deref(), Some("light"));
        }
    }

    #[test]
    fn test_ray_intersection_finds_closest() {
        let scene = build_scene();
        let down = Ray3f::new(Vector3f::new(0.0, 10.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), None, None);
        let hit = scene.ray_intersection(&down).expect("hit");
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert_eq!(hit.object.name.as_deref(), Some("light"));

        let (normal, material) = hit.object.at(&down.at(hit.t));
        assert!((normal - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-4);
        assert_eq!(material.emit(), Energy::splat(10.0));
    }

    #[test]
    fn test_miss_and_environment() {
        let scene = build_scene();
        let up = Ray3f::new(Vector3f::new(3.0, 1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0), None, None);
        assert!(scene.ray_intersection(&up).is_none());
        assert_eq!(scene.env_at(&up.dir()), Energy::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_unbuilt_bvh_uses_linear_scan() {
        let mut scene = Scene::default();
        scene.add_object(SceneObject::new(
            Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0)),
            Arc::new(LambertianDiffuse::new(Energy::splat(0.5)))));
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = scene.ray_intersection(&ray).expect("hit");
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert_eq!(scene.lights(), 0);

        let mut rng = RenderRng::new(0);
        assert!(scene.light(&mut rng).is_none());
    }
}
