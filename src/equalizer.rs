//! FFT band-pass equaliser giving voices their narrow "radio" character.
//!
//! Each block is taken to the frequency domain, every bin is scaled by the
//! voice-band curve and the block is transformed back. The curve is
//! evaluated on the bin's distance from DC, so the mirrored upper half of
//! the spectrum gets the same gain as its conjugate bin and the output
//! stays real.

use crate::dsp::curve::PiecewiseLinear;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Gain over frequency (Hz). Below 240 Hz and above 3.5 kHz is removed,
/// the low mids are lifted and the presence region peaks at 1.6x.
const VOICE_BAND: PiecewiseLinear = PiecewiseLinear::new(&[
    (0.0, 0.0),
    (240.0, 0.0),
    (300.0, 1.4),
    (1700.0, 1.6),
    (3000.0, 1.0),
    (3500.0, 0.0),
]);

pub struct BandEqualizer {
    size: usize,
    fft_forward: Arc<dyn Fft<f64>>,
    fft_inverse: Arc<dyn Fft<f64>>,
    bin_gains: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    fft_scratch: Vec<Complex<f64>>,
}

impl BandEqualizer {
    pub fn new(sample_rate: f64, size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(size);
        let fft_inverse = planner.plan_fft_inverse(size);
        let scratch_len = fft_forward
            .get_inplace_scratch_len()
            .max(fft_inverse.get_inplace_scratch_len());

        let bin_gains = (0..size)
            .map(|i| {
                let bin = i.min(size - i);
                let freq = bin as f64 * sample_rate / size as f64;
                VOICE_BAND.eval(freq)
            })
            .collect();

        Self {
            size,
            fft_forward,
            fft_inverse,
            bin_gains,
            spectrum: vec![Complex::new(0.0, 0.0); size],
            fft_scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }

    /// Equalise `block` in place. Blocks of the wrong length are left untouched.
    pub fn process(&mut self, block: &mut [f64]) {
        if block.len() != self.size {
            log::warn!(
                "equalizer expected a {}-sample block, got {}; skipping",
                self.size,
                block.len()
            );
            return;
        }

        for (bin, &x) in self.spectrum.iter_mut().zip(block.iter()) {
            *bin = Complex::new(x, 0.0);
        }
        self.fft_forward
            .process_with_scratch(&mut self.spectrum, &mut self.fft_scratch);

        for (bin, gain) in self.spectrum.iter_mut().zip(&self.bin_gains) {
            *bin *= *gain;
        }

        self.fft_inverse
            .process_with_scratch(&mut self.spectrum, &mut self.fft_scratch);

        let norm = self.size as f64;
        for (x, bin) in block.iter_mut().zip(&self.spectrum) {
            *x = bin.re / norm;
        }
    }
}
