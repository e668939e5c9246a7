// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::rng::RenderRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::Float;
use crate::renderers::batch::{new_sample_buffer, PixelBatch, Sample, SampleBatch, SampleBuffer};
use crossbeam::channel::{bounded, Receiver, Sender};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub batches: usize,
    pub samples: usize,
}

/// Turns pixel batches into sample batches on one thread.
///
/// A worker owns a single sample buffer. It cannot fill a new batch until
/// the consumer has dropped the previous one.
pub struct SamplerWorker<'a> {
    id: usize,
    integrator: &'a dyn Integrator,
    sensor: &'a dyn Sensor,
    scene: &'a Scene,
    rng: RenderRng,
    recycle_tx: Sender<SampleBuffer>,
    recycle_rx: Receiver<SampleBuffer>,
}

impl<'a> SamplerWorker<'a> {
    pub fn new(id: usize,
               integrator: &'a dyn Integrator,
               sensor: &'a dyn Sensor,
               scene: &'a Scene,
               seed: Option<u64>) -> Self {
        let (recycle_tx, recycle_rx) = bounded(1);
        // Capacity one and a fresh channel: this cannot block.
        let _ = recycle_tx.send(new_sample_buffer());

        Self {
            id,
            integrator,
            sensor,
            scene,
            rng: RenderRng::for_worker(seed, id),
            recycle_tx,
            recycle_rx,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Processes batches until `input` is closed and drained or `output`
    /// is closed.
    pub fn run(mut self, input: Receiver<PixelBatch>, output: Sender<SampleBatch>) -> WorkerStats {
        let width = self.sensor.width();
        let size = (width * self.sensor.height()).max(1);
        let mut stats = WorkerStats::default();
        log::debug!("Sampler worker {} started.", self.id);

        for pixels in input.iter() {
            let mut buffer = match self.recycle_rx.recv() {
                Ok(buffer) => buffer,
                Err(_) => break,
            };

            for (slot, pixel) in buffer.iter_mut().zip(pixels.indices()) {
                let p = pixel % size;
                let x = (p % width.max(1)) as Float;
                let y = (p / width.max(1)) as Float;
                let energy = self.integrator.trace_primary(self.scene, self.sensor, x, y, &mut self.rng);
                *slot = Sample { index: p, energy };
            }

            let samples = buffer.len();
            if output.send(SampleBatch::new(buffer, self.recycle_tx.clone())).is_err() {
                break;
            }
            stats.batches += 1;
            stats.samples += samples;
        }

        log::debug!("Sampler worker {} finished: {} batches, {} samples.",
                    self.id, stats.batches, stats.samples);
        stats
    }
}
