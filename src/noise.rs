use crate::config::{NoiseConfig, NoiseDistribution};
use crate::dsp::ramp::approach;
use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Type, Q_BUTTERWORTH_F64};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

// --- Level wander ---
// Each wander step draws a target multiplier in [1 - SPAN/2, 1 + SPAN/2)
// and glides the current multiplier 1 / WANDER_LAG of the way toward it.
const WANDER_SPAN: f64 = 1.0;
const WANDER_LAG: f64 = 2.0;

// --- Gaussian scaling ---
// Three standard deviations map to full scale; the rare excess is clamped.
const GAUSSIAN_SIGMA: f64 = 1.0 / 3.0;

// Each band edge is a cascade of two Butterworth sections (24 dB/oct).
const BAND_STAGES: usize = 2;

#[derive(Clone, Copy)]
enum BandEdge {
    Low,
    High,
}

/// Cascaded biquad stages that share one set of coefficients.
struct FilterCascade {
    coeffs: Coefficients<f64>,
    stages: Vec<DirectForm2Transposed<f64>>,
}

impl FilterCascade {
    fn new(edge: BandEdge, sample_rate: f64, corner: f64) -> Option<Self> {
        let filter = match edge {
            BandEdge::Low => Type::HighPass,
            BandEdge::High => Type::LowPass,
        };
        let coeffs = Coefficients::<f64>::from_params(
            filter,
            sample_rate.hz(),
            corner.hz(),
            Q_BUTTERWORTH_F64,
        )
        .ok()?;
        Some(Self {
            coeffs,
            stages: vec![DirectForm2Transposed::<f64>::new(coeffs); BAND_STAGES],
        })
    }

    #[inline]
    fn run(&mut self, mut sample: f64) -> f64 {
        for stage in self.stages.iter_mut() {
            sample = stage.run(sample);
        }
        sample
    }

    fn reset(&mut self) {
        for stage in self.stages.iter_mut() {
            *stage = DirectForm2Transposed::<f64>::new(self.coeffs);
        }
    }
}

/// Seeded white-noise source for the background bed.
///
/// Samples are unit scale (roughly `[-1, 1]`); the caller applies the
/// requested level and [`level_scale`](Self::level_scale).
pub struct NoiseGenerator {
    seed: u64,
    rng: StdRng,
    distribution: NoiseDistribution,

    // Wander state
    wander_enabled: bool,
    level_scale: f64,

    // Optional band limiting
    highpass: Option<FilterCascade>,
    lowpass: Option<FilterCascade>,
}

impl NoiseGenerator {
    pub fn new(config: &NoiseConfig, sample_rate: f64, seed: u64) -> Self {
        let highpass = config
            .lowcut
            .and_then(|fc| FilterCascade::new(BandEdge::Low, sample_rate, fc));
        let lowpass = config
            .highcut
            .and_then(|fc| FilterCascade::new(BandEdge::High, sample_rate, fc));
        if config.lowcut.is_some() && highpass.is_none() {
            log::warn!("noise lowcut {:?} Hz rejected by filter design; ignoring", config.lowcut);
        }
        if config.highcut.is_some() && lowpass.is_none() {
            log::warn!("noise highcut {:?} Hz rejected by filter design; ignoring", config.highcut);
        }

        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            distribution: config.distribution,
            wander_enabled: config.wander,
            level_scale: 1.0,
            highpass,
            lowpass,
        }
    }

    /// Return to the cold-start state: same seed, unity level, empty filters.
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.level_scale = 1.0;
        if let Some(ref mut f) = self.highpass {
            f.reset();
        }
        if let Some(ref mut f) = self.lowpass {
            f.reset();
        }
    }

    /// Multiplier applied on top of the requested noise level.
    pub fn level_scale(&self) -> f64 {
        self.level_scale
    }

    /// Take one step of the slow level randomiser.
    pub fn wander(&mut self) {
        if !self.wander_enabled {
            return;
        }
        let target = 1.0 + (self.rng.gen::<f64>() - 0.5) * WANDER_SPAN;
        self.level_scale = approach(self.level_scale, target, 1.0 / WANDER_LAG);
    }

    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        let mut sample = match self.distribution {
            NoiseDistribution::Uniform => self.rng.gen_range(-1.0..1.0),
            NoiseDistribution::Gaussian => {
                let z: f64 = self.rng.sample(StandardNormal);
                (z * GAUSSIAN_SIGMA).clamp(-1.0, 1.0)
            }
        };

        if let Some(ref mut f) = self.highpass {
            sample = f.run(sample);
        }
        if let Some(ref mut f) = self.lowpass {
            sample = f.run(sample);
        }
        sample
    }

    #[cfg(test)]
    pub fn fill(&mut self, out: &mut [f64]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}
