//! Dynamics compressor for the radio shaper.
//!
//! A very fast peak detector that decays slowly drives an energy follower
//! which rises quickly and falls slowly. Each sample is divided by the
//! energy estimate, so quiet passages are lifted (up to `1 / min_energy`)
//! and loud ones are pulled toward the target level.

use crate::config::CompressorConfig;
use crate::dsp::ramp::approach;
use crate::dsp::FULL_SCALE;

/// Peak detector decay lag, in samples.
const PEAK_DECAY_LAG: f64 = 2000.0;
/// Energy follower lag while the peak is above the current energy.
const ATTACK_LAG: f64 = 20.0;
/// Energy follower lag while the peak is below the current energy.
const RELEASE_LAG: f64 = 2000.0;

#[derive(Debug, Clone)]
pub struct Compressor {
    target_level: f64,
    min_energy: f64,

    // Internal state
    peak: f64,
    energy: f64,
}

impl Compressor {
    pub fn new(config: &CompressorConfig) -> Self {
        Self {
            target_level: config.target_level,
            min_energy: config.min_energy,
            peak: 0.0,
            energy: 1.0,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f64) -> f64 {
        let level = sample.abs() / (FULL_SCALE * self.target_level);

        if level > self.peak {
            self.peak = level;
        }
        self.peak = approach(self.peak, 0.0, 1.0 / PEAK_DECAY_LAG);

        let lag = if self.peak >= self.energy {
            ATTACK_LAG
        } else {
            RELEASE_LAG
        };
        self.energy = approach(self.energy, self.peak, 1.0 / lag).max(self.min_energy);

        sample / self.energy
    }

    pub fn process_block(&mut self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.peak = 0.0;
        self.energy = 1.0;
    }

    #[cfg(test)]
    fn gain(&self) -> f64 {
        1.0 / self.energy
    }
}
