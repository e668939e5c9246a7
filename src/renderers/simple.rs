// Copyright @yucwang 2021

use crate::core::error::ConfigError;
use crate::core::film::Film;
use crate::core::integrator::Integrator;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::settings::RenderSettings;
use crate::integrators::path::{PathIntegrator, SamplerConfig};
use crate::math::bitmap::Bitmap;
use crate::renderers::batch::{PixelBatch, SampleBatch, BATCH_SIZE};
use crate::renderers::worker::{SamplerWorker, WorkerStats};
use crossbeam::channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};
use std::thread;
use std::time::Instant;

pub use super::renderer::Renderer;

/// Renders the whole image with a pool of sampler workers fed by one
/// dispatcher thread.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    settings: RenderSettings,
    show_progress: bool,
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, settings: RenderSettings) -> Self {
        Self { integrator, settings, show_progress: true }
    }

    /// Path tracer configured from `settings`.
    pub fn from_settings(settings: RenderSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let config = SamplerConfig::new(settings.bounces, settings.direct, settings.branch)?;
        Ok(Self::new(Box::new(PathIntegrator::new(config)), settings))
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn batch_count(width: usize, height: usize, samples_per_pixel: u32) -> usize {
        let total = width * height * samples_per_pixel as usize;
        (total + BATCH_SIZE - 1) / BATCH_SIZE
    }
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene, sensor: &dyn Sensor) -> Result<Bitmap, ConfigError> {
        self.settings.validate()?;
        let (width, height) = (sensor.width(), sensor.height());
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyImage { width, height });
        }

        let total_batches = Self::batch_count(width, height, self.settings.samples_per_pixel);
        let workers = self.settings.workers;
        log::info!("Rendering {}x{} at {} spp with {} workers ({} batches).",
                   width, height, self.settings.samples_per_pixel, workers, total_batches);
        log::debug!("Sensor: {}.", sensor.describe());

        let progress = if self.show_progress {
            ProgressBar::new(total_batches as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} batches")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let start = Instant::now();
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();
        let (input_tx, input_rx) = bounded::<PixelBatch>(2 * workers);
        let (output_tx, output_rx) = bounded::<SampleBatch>(workers);
        let mut film = Film::new(width, height);

        let stats = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers).map(|id| {
                let worker = SamplerWorker::new(id, integrator_ref, sensor, scene, self.settings.seed);
                let input = input_rx.clone();
                let output = output_tx.clone();
                scope.spawn(move || worker.run(input, output))
            }).collect();
            drop(input_rx);
            drop(output_tx);

            scope.spawn(move || {
                for b in 0..total_batches {
                    if input_tx.send(PixelBatch::sequential(b * BATCH_SIZE)).is_err() {
                        break;
                    }
                }
            });

            for batch in output_rx.iter() {
                film.add_batch(batch.iter().map(|s| (s.index, &s.energy)));
                progress.inc(1);
            }

            handles.into_iter().fold(WorkerStats::default(), |acc, handle| {
                let stats = handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e));
                WorkerStats { batches: acc.batches + stats.batches, samples: acc.samples + stats.samples }
            })
        });
        progress.finish_and_clear();

        let elapsed = start.elapsed().as_secs_f64();
        log::info!("Rendered {} samples in {:.2}s ({:.0} samples/s).",
                   stats.samples, elapsed, stats.samples as f64 / elapsed.max(1e-9));
        Ok(film.to_bitmap())
    }
}
