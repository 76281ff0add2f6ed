//! The radio field: one scalar amplitude per grid cell
//!
//! Reset at the start of every step, then accumulated into by each transmitter.
//! Indexing outside the grid is a bug in the caller and panics.

use serde::{Deserialize, Serialize};

/// Square grid of signal amplitudes, column-major (`x` outer, `y` inner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioField {
    size: usize,
    amplitudes: Vec<f64>,
}

impl RadioField {
    /// Create a `size` x `size` field of silence
    pub fn new(size: usize) -> Self {
        Self {
            size,
            amplitudes: vec![0.0; size * size],
        }
    }

    /// Cells per side
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.size && y < self.size,
            "radio field index ({x}, {y}) out of range for size {}",
            self.size
        );
        x * self.size + y
    }

    /// Silence every cell
    pub fn reset(&mut self) {
        self.amplitudes.fill(0.0);
    }

    /// Add `amount` to one cell
    pub fn accumulate(&mut self, x: usize, y: usize, amount: f64) {
        let i = self.index(x, y);
        self.amplitudes[i] += amount;
    }

    /// Add `amount` to every cell
    pub fn accumulate_uniform(&mut self, amount: f64) {
        for a in &mut self.amplitudes {
            *a += amount;
        }
    }

    /// Current amplitude at a cell
    pub fn read(&self, x: usize, y: usize) -> f64 {
        self.amplitudes[self.index(x, y)]
    }

    /// All cells as `(x, y)` in storage order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let size = self.size;
        (0..size).flat_map(move |x| (0..size).map(move |y| (x, y)))
    }

    /// Raw amplitudes in storage order
    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }
}
