// Copyright @yucwang 2026

use crate::core::environment::Environment;
use crate::core::error::{ConfigError, OutputError, SceneLoadError};
use crate::core::scene::Scene;
use crate::core::settings::RenderSettings;
use crate::emitters::envmap::EnvMap;
use crate::emitters::sky::SkyEnvironment;
use crate::emitters::uniform::UniformEnvironment;
use crate::io::collada::load_collada;
use crate::math::constants::{Float, Vector3f, PI};
use crate::math::energy::Energy;
use crate::sensors::perspective::PerspectiveCamera;

use clap::{Args, ValueEnum};
use thiserror::Error;

/// Anything that can stop a command-line render.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    SceneLoad(#[from] SceneLoadError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    PixelOutOfBounds { x: usize, y: usize, width: usize, height: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EnvironmentKind {
    Black,
    Uniform,
    Sky,
    Map,
}

/// Parses `x,y,z`.
pub fn parse_vec3(value: &str) -> Result<Vector3f, String> {
    let parts: Vec<&str> = value.split(',').map(|s| s.trim()).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z, got '{}'", value));
    }
    let mut v = Vector3f::zeros();
    for (i, part) in parts.iter().enumerate() {
        v[i] = part.parse::<Float>().map_err(|_| format!("invalid number '{}'", part))?;
    }
    Ok(v)
}

/// Scene, camera and environment options shared by the binaries.
#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Collada (.dae) scene file.
    pub scene: String,
    #[arg(long, default_value_t = 800)]
    pub width: usize,
    #[arg(long, default_value_t = 600)]
    pub height: usize,
    #[arg(long, value_parser = parse_vec3, default_value = "0,1,5")]
    pub from: Vector3f,
    #[arg(long, value_parser = parse_vec3, default_value = "0,1,0")]
    pub to: Vector3f,
    #[arg(long, value_parser = parse_vec3, default_value = "0,1,0")]
    pub up: Vector3f,
    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 45.0)]
    pub fov: Float,
    /// Lens radius; zero for a pinhole.
    #[arg(long, default_value_t = 0.0)]
    pub aperture: Float,
    /// Focus distance; defaults to the look-at distance.
    #[arg(long)]
    pub focus: Option<Float>,
    #[arg(long, value_enum, default_value_t = EnvironmentKind::Sky)]
    pub env: EnvironmentKind,
    /// Radiance of the uniform environment.
    #[arg(long, default_value_t = 1.0)]
    pub env_radiance: Float,
    /// Equirectangular image for `--env map`.
    #[arg(long)]
    pub env_map: Option<String>,
    #[arg(long, default_value_t = 1.0)]
    pub env_scale: Float,
}

impl SceneArgs {
    pub fn environment(&self) -> Result<Box<dyn Environment>, SceneLoadError> {
        let env: Box<dyn Environment> = match self.env {
            EnvironmentKind::Black => Box::new(UniformEnvironment::new(Energy::zero())),
            EnvironmentKind::Uniform => Box::new(UniformEnvironment::new(Energy::splat(self.env_radiance))),
            EnvironmentKind::Sky => Box::new(SkyEnvironment::default()),
            EnvironmentKind::Map => {
                let path = self.env_map.as_deref().ok_or(SceneLoadError::MissingField("--env-map"))?;
                Box::new(EnvMap::from_file(path, self.env_scale)?)
            }
        };
        Ok(env)
    }

    pub fn load_scene(&self) -> Result<Scene, SceneLoadError> {
        let objects = load_collada(&self.scene)?;
        let scene = Scene::with_objects(objects, self.environment()?);
        log::info!("Scene ready: {} objects, {} lights, environment {}.",
                   scene.len(), scene.lights(), scene.environment().describe());
        Ok(scene)
    }

    pub fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera::new(self.from, self.to, self.up, self.fov * PI / 180.0, self.width, self.height)
            .with_lens(self.aperture, self.focus)
    }
}

/// Sampling options shared by the binaries.
#[derive(Args, Debug, Clone)]
pub struct SamplingArgs {
    #[arg(long, default_value_t = 8)]
    pub bounces: u32,
    #[arg(long, default_value_t = 1)]
    pub direct: u32,
    #[arg(long, default_value_t = 8)]
    pub branch: u32,
    /// Base seed; omit to seed from the clock.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SamplingArgs {
    pub fn settings(&self, scene: &SceneArgs, samples_per_pixel: u32, workers: Option<usize>) -> RenderSettings {
        let defaults = RenderSettings::default();
        RenderSettings {
            width: scene.width,
            height: scene.height,
            samples_per_pixel,
            bounces: self.bounces,
            direct: self.direct,
            branch: self.branch,
            workers: workers.unwrap_or(defaults.workers),
            seed: self.seed,
        }
    }
}

/// `env_logger` with an `info` default that `RUST_LOG` overrides.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
