use macaron::cli::{init_logging, RunError, SamplingArgs, SceneArgs};
use macaron::core::integrator::Integrator;
use macaron::core::rng::RenderRng;
use macaron::core::sensor::Sensor;
use macaron::integrators::path::{PathIntegrator, SamplerConfig};
use macaron::math::constants::Float;
use macaron::math::energy::Energy;

use clap::Parser;

/// Estimates a single pixel and prints its mean radiance.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Cli {
    #[command(flatten)]
    scene: SceneArgs,
    #[command(flatten)]
    sampling: SamplingArgs,
    x: usize,
    y: usize,
    #[arg(long, default_value_t = 64)]
    spp: u32,
}

fn run(cli: &Cli) -> Result<Energy, RunError> {
    let config = SamplerConfig::new(cli.sampling.bounces, cli.sampling.direct, cli.sampling.branch)?;
    let scene = cli.scene.load_scene()?;
    let camera = cli.scene.camera();
    if cli.x >= camera.width() || cli.y >= camera.height() {
        return Err(RunError::PixelOutOfBounds {
            x: cli.x,
            y: cli.y,
            width: camera.width(),
            height: camera.height(),
        });
    }

    let integrator = PathIntegrator::new(config);
    let mut rng = RenderRng::for_worker(cli.sampling.seed, 0);
    let spp = cli.spp.max(1);
    let mut accum = Energy::zero();
    for _ in 0..spp {
        accum += integrator.trace_primary(&scene, &camera, cli.x as Float, cli.y as Float, &mut rng);
    }
    Ok(accum.amplified(1.0 / spp as Float))
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(mean) => println!("pixel ({}, {}) = {:.6} {:.6} {:.6}", cli.x, cli.y, mean[0], mean[1], mean[2]),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
