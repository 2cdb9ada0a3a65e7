//! Carry-over state between `distort` calls.
//!
//! Incoming (conditioned) samples queue up in `pending` until a full chunk
//! is available. Chunks overlap by `blend_len` samples: each processed chunk
//! commits its first `chunk_len - blend_len` samples and keeps the last
//! `blend_len` as `overlap`, which is crossfaded into the head of the next
//! chunk. Committed samples are quantised into `ready`.
//!
//! `ready` starts out holding one chunk of silence. That silence is the
//! lead-in every stream gets before its first processed sample, and it is
//! also what keeps `ready` from ever running dry: after processing,
//! `pending` holds less than one chunk, so at least as many samples as the
//! caller pushed are always ready to pull.

use crate::dsp::ramp::crossfade;
use crate::dsp::saturate_i16;
use std::collections::VecDeque;

pub struct ContinuityBuffer {
    chunk_len: usize,
    blend_len: usize,
    pending: VecDeque<f64>,
    overlap: Vec<f64>,
    ready: VecDeque<i16>,
}

impl ContinuityBuffer {
    pub fn new(chunk_len: usize, blend_len: usize) -> Self {
        debug_assert!(blend_len < chunk_len, "blend must be shorter than a chunk");
        let mut buffer = Self {
            chunk_len,
            blend_len,
            pending: VecDeque::with_capacity(2 * chunk_len),
            overlap: Vec::with_capacity(blend_len),
            ready: VecDeque::with_capacity(2 * chunk_len),
        };
        buffer.clear();
        buffer
    }

    /// Drop all carried state and re-prime the silent lead-in.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.overlap.clear();
        self.ready.clear();
        self.ready.resize(self.chunk_len, 0);
    }

    /// Samples between an input sample going in and its output coming out.
    pub fn latency(&self) -> usize {
        self.chunk_len
    }

    /// Output samples already quantised and waiting to be pulled.
    #[cfg(test)]
    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    #[cfg(test)]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn push(&mut self, samples: &[f64]) {
        self.pending.extend(samples.iter().copied());
    }

    /// Copy the next full chunk into `out`. Returns `false` if there isn't one yet.
    pub fn next_chunk(&mut self, out: &mut Vec<f64>) -> bool {
        if self.pending.len() < self.chunk_len {
            return false;
        }
        out.clear();
        out.extend(self.pending.iter().take(self.chunk_len).copied());
        true
    }

    /// Accept the processed version of the chunk last returned by `next_chunk`.
    pub fn commit(&mut self, processed: &mut [f64]) {
        debug_assert_eq!(processed.len(), self.chunk_len);
        let keep = self.chunk_len - self.blend_len;

        if !self.overlap.is_empty() {
            for (i, (sample, &old)) in processed.iter_mut().zip(&self.overlap).enumerate() {
                *sample = crossfade(old, *sample, i as f64 / self.blend_len as f64);
            }
        }

        self.ready
            .extend(processed[..keep].iter().map(|&s| saturate_i16(s)));
        self.overlap.clear();
        self.overlap.extend_from_slice(&processed[keep..]);
        self.pending.drain(..keep);
    }

    /// Fill `out` with the oldest ready samples.
    ///
    /// Should `ready` ever hold fewer samples than requested, the shortfall is
    /// placed at the front of `out` as silence.
    pub fn pull(&mut self, out: &mut [i16]) {
        let available = self.ready.len().min(out.len());
        let gap = out.len() - available;
        if gap > 0 {
            log::warn!("continuity underrun: padding {} samples of silence", gap);
            out[..gap].fill(0);
        }
        for (dst, src) in out[gap..].iter_mut().zip(self.ready.drain(..available)) {
            *dst = src;
        }
    }
}
