use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistortError {
    #[error("unsupported sample rate {0} Hz (expected 44100 or 48000)")]
    UnsupportedSampleRate(i64),
    #[error("amplify must be a finite, non-negative gain (got {0})")]
    InvalidAmplify(f64),
    #[error("noise level must lie within [0.0, 1.0] (got {0})")]
    InvalidNoiseLevel(f64),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("handle {0:#x} is not a live distortion context")]
    InvalidHandle(usize),
}
