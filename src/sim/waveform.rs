//! Waveform history: what a receiver in each cell heard over one dot-dash cycle
//!
//! Each cell keeps one slot per fraction of the cycle. A slot is overwritten when
//! the beam's phase comes around to it again; nothing is ever cleared.

use serde::{Deserialize, Serialize};

use super::field::RadioField;
use super::transmitter::BeamTransmitter;

/// Per-cell sample buffers for the whole field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformHistory {
    size: usize,
    length: usize,
    /// `size * size` runs of `length` slots, same cell order as `RadioField`
    samples: Vec<Option<f64>>,
}

impl WaveformHistory {
    /// Empty history: every slot unset
    pub fn new(size: usize, length: usize) -> Self {
        Self {
            size,
            length,
            samples: vec![None; size * size * length],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Slots per cell
    pub fn length(&self) -> usize {
        self.length
    }

    /// Slot that a cycle phase fraction in [0, 1) maps to
    pub fn slot_for(&self, phase_fraction: f64) -> usize {
        ((phase_fraction * self.length as f64).floor() as usize).min(self.length - 1)
    }

    /// Sample buffer of one cell
    pub fn cell(&self, x: usize, y: usize) -> &[Option<f64>] {
        assert!(
            x < self.size && y < self.size,
            "waveform index ({x}, {y}) out of range for size {}",
            self.size
        );
        let start = (x * self.size + y) * self.length;
        &self.samples[start..start + self.length]
    }

    /// Record the current field into the slot chosen by the beam's phase
    pub fn update(&mut self, field: &RadioField, beam: &BeamTransmitter) {
        debug_assert_eq!(field.size(), self.size);
        let slot = self.slot_for(beam.phase_fraction);
        for (i, &amplitude) in field.amplitudes().iter().enumerate() {
            self.samples[i * self.length + slot] = Some(amplitude);
        }
    }
}

/// Slot 0 (start of the dot) and the final slot (end of the dash)
pub fn endpoints(samples: &[Option<f64>]) -> (Option<f64>, Option<f64>) {
    (
        samples.first().copied().flatten(),
        samples.last().copied().flatten(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;

    #[test]
    fn test_new_history_is_unset() {
        let history = WaveformHistory::new(3, 7);
        assert!(history.cell(2, 1).iter().all(Option::is_none));
        assert_eq!(endpoints(history.cell(0, 0)), (None, None));
    }

    #[test]
    fn test_slot_for_phase() {
        let history = WaveformHistory::new(1, 7);
        assert_eq!(history.slot_for(0.0), 0);
        assert_eq!(history.slot_for(3.0 / 7.0), 3);
        assert_eq!(history.slot_for(0.999), 6);
        assert_eq!(history.slot_for(1.0), 6);
    }

    #[test]
    fn test_update_writes_phase_slot_only() {
        let config = SimConfig::for_field_size(2);
        let mut beam = BeamTransmitter::new(&config);
        let mut field = RadioField::new(2);
        let mut history = WaveformHistory::new(2, 7);

        field.accumulate_uniform(0.3);
        beam.update_phase(0.5); // 0.5 / 1.75 -> slot 2
        history.update(&field, &beam);

        let cell = history.cell(1, 0);
        assert_eq!(cell[2], Some(0.3));
        assert_eq!(cell.iter().filter(|s| s.is_some()).count(), 1);
    }

    #[test]
    fn test_samples_persist_until_overwritten() {
        let config = SimConfig::for_field_size(1);
        let mut beam = BeamTransmitter::new(&config);
        let mut field = RadioField::new(1);
        let mut history = WaveformHistory::new(1, 7);

        field.accumulate(0, 0, 0.2);
        beam.update_phase(0.0);
        history.update(&field, &beam);

        field.reset();
        field.accumulate(0, 0, 0.9);
        beam.update_phase(1.5); // slot 6
        history.update(&field, &beam);
        assert_eq!(endpoints(history.cell(0, 0)), (Some(0.2), Some(0.9)));

        field.reset();
        beam.update_phase(1.75); // next cycle, slot 0 again
        history.update(&field, &beam);
        assert_eq!(endpoints(history.cell(0, 0)), (Some(0.0), Some(0.9)));
    }
}
