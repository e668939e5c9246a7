// Copyright @yucwang 2026

use crate::math::energy::Energy;
use crossbeam::channel::Sender;

/// Pixels per batch. Sample batches have the same length.
pub const BATCH_SIZE: usize = 256;

pub type SampleBuffer = Box<[Sample; BATCH_SIZE]>;

/// Flat pixel indices for one unit of work. Indices may exceed the image
/// size; workers wrap them.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBatch {
    indices: [usize; BATCH_SIZE],
}

impl PixelBatch {
    pub fn new(indices: [usize; BATCH_SIZE]) -> Self {
        Self { indices }
    }

    /// `start..start + BATCH_SIZE`.
    pub fn sequential(start: usize) -> Self {
        let mut indices = [0usize; BATCH_SIZE];
        for (i, index) in indices.iter_mut().enumerate() {
            *index = start.wrapping_add(i);
        }
        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub energy: Energy,
}

pub fn new_sample_buffer() -> SampleBuffer {
    Box::new([Sample::default(); BATCH_SIZE])
}

/// Results for one `PixelBatch`, slot `i` answering input slot `i`.
///
/// The buffer belongs to the worker that filled it. Dropping the batch
/// sends the buffer back so the worker can fill it again.
pub struct SampleBatch {
    samples: Option<SampleBuffer>,
    recycle: Sender<SampleBuffer>,
}

impl SampleBatch {
    pub fn new(samples: SampleBuffer, recycle: Sender<SampleBuffer>) -> Self {
        Self { samples: Some(samples), recycle }
    }

    pub fn samples(&self) -> &[Sample] {
        match &self.samples {
            Some(samples) => &samples[..],
            // The buffer is only taken out in `drop`.
            None => &[],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples().iter()
    }

    pub fn len(&self) -> usize {
        self.samples().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples().is_empty()
    }
}

impl Drop for SampleBatch {
    fn drop(&mut self) {
        if let Some(samples) = self.samples.take() {
            // The worker may already be gone; the buffer is then freed here.
            let _ = self.recycle.send(samples);
        }
    }
}
