// Copyright @yucwang 2026

use crate::core::error::ConfigError;
use crate::core::integrator::Integrator;
use crate::core::material::Material;
use crate::core::rng::RenderRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::tangent_frame::face_forward;
use crate::math::constants::{Float, Vector3f, PI, TWO_PI};
use crate::math::energy::Energy;
use crate::math::ray::Ray3f;

/// Sampling budget for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    bounces: u32,
    direct: u32,
    branch: u32,
}

impl SamplerConfig {
    pub fn new(bounces: u32, direct: u32, branch: u32) -> Result<Self, ConfigError> {
        if bounces < 1 {
            return Err(ConfigError::Bounces(bounces));
        }
        if branch < 1 {
            return Err(ConfigError::Branch(branch));
        }
        Ok(Self { bounces, direct, branch })
    }

    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    pub fn direct(&self) -> u32 {
        self.direct
    }

    pub fn branch(&self) -> u32 {
        self.branch
    }
}

/// Unidirectional path tracer with next event estimation toward emissive
/// objects and branching at the first hit.
pub struct PathIntegrator {
    config: SamplerConfig,
}

struct SurfacePoint<'a> {
    point: Vector3f,
    normal: Vector3f,
    material: &'a dyn Material,
}

fn check_finite(energy: &Energy, what: &str) {
    assert!(energy.is_finite(), "internal invariant violated: non-finite {} {:?}", what, energy);
}

impl PathIntegrator {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Number of BSDF samples taken at the first hit for a surface of the
    /// given roughness.
    pub fn branch_count(&self, roughness: Float) -> u32 {
        1 + (self.config.branch as Float * (roughness + 0.25) / 1.25).floor().max(0.0) as u32
    }

    fn surface_at<'a>(scene: &'a Scene, ray: &Ray3f) -> Option<(SurfacePoint<'a>, Float)> {
        let hit = scene.ray_intersection(ray)?;
        let point = ray.at(hit.t);
        let (normal, material) = hit.object.at(&point);
        let normal = face_forward(&normal, &ray.dir());
        Some((SurfacePoint { point, normal, material }, hit.t))
    }

    /// Light carried back along `ray` by a path that already has `depth`
    /// segments and throughput `signal`.
    pub fn trace_indirect(&self, scene: &Scene, ray: Ray3f, depth: u32, signal: Energy, rng: &mut RenderRng) -> Energy {
        self.trace_indirect_counted(scene, ray, depth, signal, rng).0
    }

    /// Same as `trace_indirect`, also reporting the depth the path stopped
    /// at. A path that starts below the limit stops at or before `bounces`;
    /// one that starts past it is returned untouched.
    pub fn trace_indirect_counted(&self,
                                  scene: &Scene,
                                  mut ray: Ray3f,
                                  mut depth: u32,
                                  mut signal: Energy,
                                  rng: &mut RenderRng) -> (Energy, u32) {
        let mut energy = Energy::zero();
        let lights = scene.lights();

        loop {
            if depth >= self.config.bounces {
                break;
            }

            signal = signal.random_gain(rng);
            if signal.is_zero() {
                break;
            }

            let (surface, distance) = match Self::surface_at(scene, &ray) {
                Some(s) => s,
                None => {
                    energy = energy.merged(&scene.env_at(&ray.dir()), &signal);
                    break;
                }
            };

            energy = energy.merged(&surface.material.emit(), &signal);
            let sample = surface.material.bsdf(&surface.normal, &ray.dir(), distance, rng);
            check_finite(&sample.strength, "bsdf strength");

            if sample.diffused && lights > 0 {
                let (direct, coverage) = self.trace_direct(scene, lights, &surface.point, &surface.normal, rng);
                energy = energy.merged(&direct.strength(&surface.material.color()), &signal);
                signal = signal.amplified((1.0 - coverage).max(0.0));
            }

            ray = Ray3f::spawn(surface.point, sample.direction);
            signal = signal.strength(&sample.strength);
            depth += 1;
        }

        check_finite(&energy, "indirect energy");
        (energy, depth)
    }

    /// Samples up to `min(direct, lights)` emitters from `point`. Returns the
    /// gathered energy and the solid angle covered by the sampled lights,
    /// clamped to the hemisphere.
    ///
    /// Sampling stops at the first light that is behind the surface or
    /// whose shadow ray escapes the scene, so in multi-light scenes later
    /// lights are under-sampled.
    pub fn trace_direct(&self,
                        scene: &Scene,
                        lights: usize,
                        point: &Vector3f,
                        normal: &Vector3f,
                        rng: &mut RenderRng) -> (Energy, Float) {
        let limit = (self.config.direct as usize).min(lights);
        let mut energy = Energy::zero();
        let mut coverage: Float = 0.0;

        for _ in 0..limit {
            let light = match scene.light(rng) {
                Some(l) => l,
                None => break,
            };

            let (shadow, solid_angle) = light.shape().bounding_sphere().shadow_ray(point, rng);
            let cos = shadow.dir().dot(normal);
            if cos <= 0.0 {
                break;
            }
            coverage += solid_angle;

            let hit = match scene.ray_intersection(&shadow) {
                Some(h) => h,
                None => break,
            };
            energy += hit.object.material().emit().amplified(solid_angle * cos / PI);
        }

        (energy, coverage.clamp(0.0, TWO_PI))
    }
}

impl Integrator for PathIntegrator {
    fn trace_primary(&self, scene: &Scene, sensor: &dyn Sensor, x: Float, y: Float, rng: &mut RenderRng) -> Energy {
        let ray = sensor.sample_ray(x, y, rng);
        let (surface, distance) = match Self::surface_at(scene, &ray) {
            Some(s) => s,
            None => return scene.env_at(&ray.dir()),
        };

        let emission = surface.material.emit();
        let branch = self.branch_count(surface.material.roughness());
        let lights = scene.lights();
        let mut sum = Energy::zero();

        for _ in 0..branch {
            let sample = surface.material.bsdf(&surface.normal, &ray.dir(), distance, rng);
            check_finite(&sample.strength, "bsdf strength");
            let mut signal = sample.strength;

            if sample.diffused && lights > 0 {
                let (direct, coverage) = self.trace_direct(scene, lights, &surface.point, &surface.normal, rng);
                sum += direct.strength(&surface.material.color());
                signal = signal.amplified((1.0 - coverage).max(0.0));
            }

            let next = Ray3f::spawn(surface.point, sample.direction);
            sum += self.trace_indirect(scene, next, 1, signal, rng);
        }

        let energy = emission + sum.amplified(1.0 / branch as Float);
        check_finite(&energy, "primary energy");
        energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::BsdfSample;
    use crate::core::scene::SceneObject;
    use crate::emitters::uniform::UniformEnvironment;
    use crate::materials::emissive::Emissive;
    use crate::materials::lambertian_diffuse::LambertianDiffuse;
    use crate::shapes::rectangle::Rectangle;
    use crate::shapes::sphere::Sphere;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    /// Always shoots the same ray.
    struct FixedSensor {
        ray: Ray3f,
    }

    impl Sensor for FixedSensor {
        fn sample_ray(&self, _x: Float, _y: Float, _rng: &mut RenderRng) -> Ray3f {
            self.ray
        }

        fn width(&self) -> usize {
            1
        }

        fn height(&self) -> usize {
            1
        }
    }

    /// Diffuse surface whose colour must never be asked for.
    struct UnlitDiffuse {
        inner: LambertianDiffuse,
    }

    impl Material for UnlitDiffuse {
        fn emit(&self) -> Energy {
            Energy::zero()
        }

        fn color(&self) -> Energy {
            panic!("direct lighting evaluated in a scene without lights");
        }

        fn roughness(&self) -> Float {
            1.0
        }

        fn bsdf(&self, normal: &Vector3f, dir: &Vector3f, distance: Float, rng: &mut RenderRng) -> BsdfSample {
            self.inner.bsdf(normal, dir, distance, rng)
        }
    }

    fn config(bounces: u32, direct: u32, branch: u32) -> SamplerConfig {
        SamplerConfig::new(bounces, direct, branch).expect("valid config")
    }

    fn floor_object(albedo: Float) -> SceneObject {
        SceneObject::new(Arc::new(Rectangle::horizontal(Vector3f::zeros(), 100.0)),
                         Arc::new(LambertianDiffuse::new(Energy::splat(albedo))))
    }

    fn down_onto_floor() -> FixedSensor {
        FixedSensor {
            ray: Ray3f::new(Vector3f::new(2.0, 1.0, 0.0), Vector3f::new(-2.0, -1.0, 0.0), None, None),
        }
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(SamplerConfig::new(0, 1, 1), Err(ConfigError::Bounces(0)));
        assert_eq!(SamplerConfig::new(1, 1, 0), Err(ConfigError::Branch(0)));
        assert!(SamplerConfig::new(1, 0, 1).is_ok());
    }

    #[test]
    fn test_branch_count() {
        let integrator = PathIntegrator::new(config(4, 1, 8));
        assert_eq!(integrator.branch_count(1.0), 9);
        assert_eq!(integrator.branch_count(0.0), 2);

        let single = PathIntegrator::new(config(4, 1, 1));
        assert_eq!(single.branch_count(1.0), 2);
        assert_eq!(single.branch_count(0.0), 1);
    }

    #[test]
    fn test_primary_miss_returns_environment() {
        let env = Energy::new(0.3, 0.6, 0.9);
        let scene = Scene::new(Box::new(UniformEnvironment::new(env)));
        let integrator = PathIntegrator::new(config(8, 1, 8));
        let sensor = FixedSensor {
            ray: Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), None, None),
        };

        let mut rng = RenderRng::new(1);
        for _ in 0..8 {
            assert_eq!(integrator.trace_primary(&scene, &sensor, 0.0, 0.0, &mut rng), env);
        }
    }

    #[test]
    fn test_primary_hit_on_emitter_includes_emission() {
        let light = SceneObject::new(Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0)),
                                     Arc::new(Emissive::new(Energy::splat(3.0))));
        let scene = Scene::with_objects(vec![light], Box::new(UniformEnvironment::new(Energy::zero())));
        let integrator = PathIntegrator::new(config(4, 1, 2));
        let sensor = FixedSensor {
            ray: Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), None, None),
        };

        let mut rng = RenderRng::new(2);
        assert_eq!(integrator.trace_primary(&scene, &sensor, 0.0, 0.0, &mut rng), Energy::splat(3.0));
    }

    #[test]
    fn test_indirect_depth_never_exceeds_bounces() {
        // Paths inside a closed sphere end only at the depth limit or by roulette.
        let inside = SceneObject::new(Arc::new(Sphere::new(Vector3f::zeros(), 10.0)),
                                      Arc::new(LambertianDiffuse::new(Energy::splat(0.99))));
        let scene = Scene::with_objects(vec![inside], Box::new(UniformEnvironment::new(Energy::splat(1.0))));

        for bounces in 1..6 {
            let integrator = PathIntegrator::new(config(bounces, 1, 1));
            for seed in 0..200u64 {
                let mut rng = RenderRng::new(seed);
                let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
                let (energy, depth) = integrator.trace_indirect_counted(&scene, ray, 1, Energy::splat(1.0), &mut rng);
                assert!(depth <= bounces);
                assert!(energy.is_zero());
            }
        }
    }

    #[test]
    fn test_indirect_stops_at_depth_limit() {
        let scene = Scene::new(Box::new(UniformEnvironment::new(Energy::splat(1.0))));
        let integrator = PathIntegrator::new(config(3, 1, 1));
        let mut rng = RenderRng::new(0);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);

        let (energy, depth) = integrator.trace_indirect_counted(&scene, ray, 3, Energy::splat(1.0), &mut rng);
        assert!(energy.is_zero());
        assert_eq!(depth, 3);

        let (energy, _) = integrator.trace_indirect_counted(&scene, ray, 1, Energy::splat(1.0), &mut rng);
        assert_eq!(energy, Energy::splat(1.0));
    }

    #[test]
    fn test_indirect_past_depth_limit_keeps_start_depth() {
        let scene = Scene::new(Box::new(UniformEnvironment::new(Energy::splat(1.0))));
        let integrator = PathIntegrator::new(config(3, 1, 1));
        let mut rng = RenderRng::new(5);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);

        let (energy, depth) = integrator.trace_indirect_counted(&scene, ray, 9, Energy::splat(1.0), &mut rng);
        assert_eq!(depth, 9);
        assert!(energy.is_zero());
    }

    #[test]
    fn test_indirect_with_full_signal_runs_to_depth_limit() {
        // Albedo one keeps the signal at one, so roulette never ends a path.
        let inside = SceneObject::new(Arc::new(Sphere::new(Vector3f::zeros(), 10.0)),
                                      Arc::new(LambertianDiffuse::new(Energy::splat(1.0))));
        let scene = Scene::with_objects(vec![inside], Box::new(UniformEnvironment::new(Energy::zero())));

        for bounces in 1..6 {
            let integrator = PathIntegrator::new(config(bounces, 1, 1));
            for start in 0..bounces {
                let mut rng = RenderRng::new(start as u64);
                let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
                let (_, depth) = integrator.trace_indirect_counted(&scene, ray, start, Energy::splat(1.0), &mut rng);
                assert_eq!(depth, bounces);
            }
        }
    }

    #[test]
    fn test_direct_coverage_is_bounded() {
        let floor = floor_object(0.5);
        let near = SceneObject::new(Arc::new(Sphere::new(Vector3f::new(0.0, 0.5, 0.0), 2.0)),
                                    Arc::new(Emissive::new(Energy::splat(1.0))));
        let far = SceneObject::new(Arc::new(Sphere::new(Vector3f::new(3.0, 4.0, 0.0), 1.0)),
                                   Arc::new(Emissive::new(Energy::splat(1.0))));
        let scene = Scene::with_objects(vec![floor, near, far], Box::new(UniformEnvironment::new(Energy::zero())));
        let integrator = PathIntegrator::new(config(4, 8, 1));
        let normal = Vector3f::new(0.0, 1.0, 0.0);

        let mut rng = RenderRng::new(77);
        for i in 0..500 {
            let point = Vector3f::new((i % 20) as Float * 0.5 - 5.0, 0.0, (i / 20) as Float * 0.4 - 5.0);
            let (energy, coverage) = integrator.trace_direct(&scene, scene.lights(), &point, &normal, &mut rng);
            assert!((0.0..=TWO_PI).contains(&coverage));
            assert!(energy.is_finite());
        }
    }

    #[test]
    fn test_lightless_scene_skips_direct_sampling() {
        let floor = SceneObject::new(
            Arc::new(Rectangle::horizontal(Vector3f::zeros(), 100.0)),
            Arc::new(UnlitDiffuse { inner: LambertianDiffuse::new(Energy::splat(0.5)) }));
        let scene = Scene::with_objects(vec![floor], Box::new(UniformEnvironment::new(Energy::splat(1.0))));
        let integrator = PathIntegrator::new(config(4, 4, 4));
        let sensor = down_onto_floor();

        let mut rng = RenderRng::new(9);
        for _ in 0..100 {
            let energy = integrator.trace_primary(&scene, &sensor, 0.0, 0.0, &mut rng);
            assert!(energy.is_finite());
        }
    }

    #[test]
    fn test_floor_under_sphere_light_matches_analytic_irradiance() {
        let albedo = 0.5;
        let radiance = 10.0;
        let (height, radius): (Float, Float) = (5.0, 1.0);

        let light = SceneObject::new(Arc::new(Sphere::new(Vector3f::new(0.0, height, 0.0), radius)),
                                     Arc::new(Emissive::new(Energy::splat(radiance))));
        let scene = Scene::with_objects(vec![floor_object(albedo), light],
                                        Box::new(UniformEnvironment::new(Energy::zero())));
        let integrator = PathIntegrator::new(config(1, 1, 1));
        let sensor = down_onto_floor();

        let n = 10_000;
        let mut rng = RenderRng::new(1234);
        let mut sum = Energy::zero();
        for _ in 0..n {
            sum += integrator.trace_primary(&scene, &sensor, 0.0, 0.0, &mut rng);
        }
        let mean = sum.amplified(1.0 / n as Float);

        // Lambertian reflection of a sphere light straight above:
        // rho * L * sin^2(theta_max).
        let expected = albedo * radiance * (radius * radius) / (height * height);
        assert_relative_eq!(mean[0], expected, max_relative = 0.05);
        assert_relative_eq!(mean[1], expected, max_relative = 0.05);
    }

    #[test]
    fn test_floor_under_uniform_environment_converges_to_albedo() {
        let albedo = 0.5;
        let env = 2.0;
        let scene = Scene::with_objects(vec![floor_object(albedo)],
                                        Box::new(UniformEnvironment::new(Energy::splat(env))));
        let integrator = PathIntegrator::new(config(2, 1, 1));
        let sensor = down_onto_floor();

        let n = 20_000;
        let mut rng = RenderRng::new(4321);
        let mut sum = Energy::zero();
        for _ in 0..n {
            sum += integrator.trace_primary(&scene, &sensor, 0.0, 0.0, &mut rng);
        }
        let mean = sum.amplified(1.0 / n as Float);
        assert_relative_eq!(mean[2], albedo * env, max_relative = 0.05);
    }
}
