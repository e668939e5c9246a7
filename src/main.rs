// Copyright 2020 TwoCookingMice

use macaron::cli::{init_logging, RunError, SamplingArgs, SceneArgs};
use macaron::io::write_bitmap;
use macaron::renderers::simple::{Renderer, SimpleRenderer};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Monte Carlo path tracer for Collada scenes")]
struct Cli {
    #[command(flatten)]
    scene: SceneArgs,
    #[command(flatten)]
    sampling: SamplingArgs,
    /// Output image; the extension (.exr or .png) picks the format.
    #[arg(short, long, default_value = "render.png")]
    output: String,
    #[arg(long, default_value_t = 16)]
    spp: u32,
    /// Worker threads; defaults to the available parallelism.
    #[arg(long)]
    workers: Option<usize>,
}

fn run(cli: &Cli) -> Result<(), RunError> {
    let settings = cli.sampling.settings(&cli.scene, cli.spp, cli.workers);
    let renderer = SimpleRenderer::from_settings(settings)?;
    let scene = cli.scene.load_scene()?;
    let camera = cli.scene.camera();

    let image = renderer.render(&scene, &camera)?;
    write_bitmap(&image, &cli.output)?;
    log::info!("Wrote {}.", cli.output);
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
