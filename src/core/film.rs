// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::energy::Energy;

/// Running per-pixel sums. Samples arrive in any order and carry their own
/// flat pixel index.
pub struct Film {
    width: usize,
    height: usize,
    sums: Vec<Energy>,
    counts: Vec<u32>,
}

impl Film {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            sums: vec![Energy::zero(); width * height],
            counts: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn add_sample(&mut self, index: usize, energy: &Energy) {
        let p = index % self.sums.len().max(1);
        if let Some(sum) = self.sums.get_mut(p) {
            *sum += *energy;
            self.counts[p] += 1;
        }
    }

    pub fn add_batch<'a, I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = (usize, &'a Energy)>,
    {
        for (index, energy) in samples {
            self.add_sample(index, energy);
        }
    }

    pub fn samples_at(&self, x: usize, y: usize) -> u32 {
        self.counts[x + self.width * y]
    }

    pub fn total_samples(&self) -> u64 {
        self.counts.iter().map(|c| *c as u64).sum()
    }

    /// Per-pixel mean. Pixels that never received a sample stay black.
    pub fn to_bitmap(&self) -> Bitmap {
        let mut bitmap = Bitmap::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let p = x + self.width * y;
                if self.counts[p] > 0 {
                    bitmap[(x, y)] = self.sums[p].amplified(1.0 / self.counts[p] as Float);
                }
            }
        }
        bitmap
    }
}
