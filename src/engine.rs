//! The distortion session: one independent, stateful audio stream.

use crate::config::{DistortConfig, ShaperMode};
use crate::continuity::ContinuityBuffer;
use crate::dsp::FULL_SCALE;
use crate::error::DistortError;
use crate::noise::NoiseGenerator;
use crate::shaper::SignalShaper;

/// Samples of overlap between consecutive chunks, crossfaded on commit.
pub const EDGE_BLEND: usize = 600;

/// Sample rates a session can run at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRate {
    Hz44100,
    Hz48000,
}

impl SampleRate {
    pub fn hz(self) -> u32 {
        match self {
            SampleRate::Hz44100 => 44_100,
            SampleRate::Hz48000 => 48_000,
        }
    }

    /// Chunks per second. Must divide the rate evenly.
    fn time_quantum(self) -> u32 {
        match self {
            SampleRate::Hz44100 => 30,
            SampleRate::Hz48000 => 32,
        }
    }

    /// Length of one processing chunk in samples.
    pub fn chunk_len(self) -> usize {
        (self.hz() / self.time_quantum()) as usize
    }
}

impl TryFrom<i64> for SampleRate {
    type Error = DistortError;

    fn try_from(hz: i64) -> Result<Self, Self::Error> {
        match hz {
            44_100 => Ok(SampleRate::Hz44100),
            48_000 => Ok(SampleRate::Hz48000),
            other => Err(DistortError::UnsupportedSampleRate(other)),
        }
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = DistortError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::try_from(hz as i64)
    }
}

/// Mix the shaped signal with the noise bed.
///
/// `level` crossfades from signal only (0.0) to noise only (1.0); `noise` is
/// already scaled to sample units. The signal weight does not depend on the
/// caller's gain, so fading `amplify` never changes the noise floor.
#[inline]
pub fn mix(shaped: f64, noise: f64, level: f64) -> f64 {
    (1.0 - level) * shaped + level * noise
}

/// A distortion session.
///
/// Owns all per-stream state. Output lags input by [`latency`](Self::latency)
/// samples; the first `latency` samples of a stream, and of every stream
/// after [`clear_buffers`](Self::clear_buffers), are silence.
pub struct Distorter {
    sample_rate: SampleRate,
    shaper: SignalShaper,
    noise: NoiseGenerator,
    continuity: ContinuityBuffer,

    // Noise wander steps on every other chunk
    wander_phase: bool,

    // Scratch, reused between calls
    ingest: Vec<f64>,
    chunk: Vec<f64>,
}

impl Distorter {
    pub fn new(sample_rate: u32) -> Result<Self, DistortError> {
        Self::with_config(sample_rate, &DistortConfig::default())
    }

    pub fn with_config(sample_rate: u32, config: &DistortConfig) -> Result<Self, DistortError> {
        let rate = SampleRate::try_from(sample_rate)?;
        config.validate(rate.hz())?;

        let chunk_len = rate.chunk_len();
        let hz = rate.hz() as f64;
        log::debug!(
            "distort session: {} Hz, {}-sample chunks, shaper {:?}, seed {:#x}",
            rate.hz(),
            chunk_len,
            config.shaper,
            config.seed
        );

        Ok(Self {
            sample_rate: rate,
            shaper: SignalShaper::new(config, hz, chunk_len),
            noise: NoiseGenerator::new(&config.noise, hz, config.seed),
            continuity: ContinuityBuffer::new(chunk_len, EDGE_BLEND),
            wander_phase: false,
            ingest: Vec::with_capacity(chunk_len),
            chunk: Vec::with_capacity(chunk_len),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.hz()
    }

    pub fn shaper_mode(&self) -> ShaperMode {
        self.shaper.mode()
    }

    pub fn latency(&self) -> usize {
        self.continuity.latency()
    }

    /// Distort `samples` in place.
    ///
    /// `amplify` scales the genuine signal only (1.0 = unity); `noise_level`
    /// runs from 0.0 (no noise) to 1.0 (noise only). On a parameter error the
    /// buffer and the session are left untouched.
    pub fn distort(
        &mut self,
        samples: &mut [i16],
        amplify: f64,
        noise_level: f64,
    ) -> Result<(), DistortError> {
        if !(amplify.is_finite() && amplify >= 0.0) {
            return Err(DistortError::InvalidAmplify(amplify));
        }
        if !(0.0..=1.0).contains(&noise_level) {
            return Err(DistortError::InvalidNoiseLevel(noise_level));
        }
        if samples.is_empty() {
            return Ok(());
        }

        self.ingest.clear();
        self.ingest.extend(samples.iter().map(|&s| s as f64));
        self.shaper.condition(&mut self.ingest);
        self.continuity.push(&self.ingest);

        while self.continuity.next_chunk(&mut self.chunk) {
            if !self.wander_phase {
                self.noise.wander();
            }
            self.wander_phase = !self.wander_phase;

            let noise_gain = self.noise.level_scale() * FULL_SCALE;
            for sample in self.chunk.iter_mut() {
                let shaped = self.shaper.shape(*sample, amplify);
                let noise = self.noise.next_sample() * noise_gain;
                *sample = mix(shaped, noise, noise_level);
            }
            self.shaper.equalize(&mut self.chunk);
            self.continuity.commit(&mut self.chunk);
        }

        self.continuity.pull(samples);
        Ok(())
    }

    /// Forget all carried audio and restart the noise sequence, as if the
    /// session had just been created. Call between unrelated transmissions.
    pub fn clear_buffers(&mut self) {
        log::debug!("distort session: clearing buffers");
        self.continuity.clear();
        self.noise.reset();
        self.shaper.reset();
        self.wander_phase = false;
    }
}
