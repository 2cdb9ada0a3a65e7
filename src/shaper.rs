//! Signal shaping for the genuine (non-noise) part of the output.
//!
//! The shaper works in three places of the pipeline:
//! - `condition` runs once per incoming sample, as it is queued.
//! - `shape` applies the caller's gain at each chunk position.
//! - `equalize` runs on a whole chunk after the noise has been mixed in,
//!   so the noise bed gets the same band-limited colour as the voice.
//!
//! In [`ShaperMode::Gain`] the first and last stages are identity.

use crate::compressor::Compressor;
use crate::config::{DistortConfig, ShaperMode};
use crate::dsp::FULL_SCALE;
use crate::equalizer::BandEqualizer;

/// Bound on a shaped sample. Far past the 16-bit range, so anything this
/// loud still saturates at commit, but small enough that the mix and the
/// equaliser stay finite for any finite gain.
pub const HEADROOM: f64 = 64.0 * FULL_SCALE;

pub struct SignalShaper {
    mode: ShaperMode,
    compressor: Option<Compressor>,
    equalizer: Option<BandEqualizer>,
}

impl SignalShaper {
    pub fn new(config: &DistortConfig, sample_rate: f64, chunk_len: usize) -> Self {
        let (compressor, equalizer) = match config.shaper {
            ShaperMode::Gain => (None, None),
            ShaperMode::Radio => (
                Some(Compressor::new(&config.compressor)),
                Some(BandEqualizer::new(sample_rate, chunk_len)),
            ),
        };
        Self {
            mode: config.shaper,
            compressor,
            equalizer,
        }
    }

    pub fn mode(&self) -> ShaperMode {
        self.mode
    }

    pub fn condition(&mut self, samples: &mut [f64]) {
        if let Some(ref mut comp) = self.compressor {
            comp.process_block(samples);
        }
    }

    #[inline]
    pub fn shape(&self, sample: f64, amplify: f64) -> f64 {
        (sample * amplify).clamp(-HEADROOM, HEADROOM)
    }

    pub fn equalize(&mut self, chunk: &mut [f64]) {
        if let Some(ref mut eq) = self.equalizer {
            eq.process(chunk);
        }
    }

    pub fn reset(&mut self) {
        if let Some(ref mut comp) = self.compressor {
            comp.reset();
        }
    }
}
