// Copyright 2020 @TwoCookingMice

use super::energy::Energy;

use std::ops;

#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<Energy>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Energy;

    fn index(&self, index: (usize, usize)) -> &Energy {
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Energy {
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self { data: vec![Energy::zero(); width * height],
               width,
               height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Energy] {
        &self.data
    }
}
