//! Streaming radio-style distortion for 16-bit mono PCM.
//!
//! A [`Distorter`] session applies gain to the genuine signal, mixes in a
//! seeded background-noise bed and (in radio mode) compresses and
//! band-limits the result. Audio is processed in overlapping chunks; the
//! first chunk's worth of output of every stream is silence, so a caller
//! never hears undistorted input.
//!
//! The same engine is exported through a C ABI (see [`ffi`]) as the
//! `distort` native library.

pub mod audio_io;
pub mod compressor;
pub mod config;
pub mod continuity;
pub mod dsp;
pub mod engine;
pub mod equalizer;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod noise;
pub mod shaper;

pub use config::{DistortConfig, NoiseDistribution, ShaperMode};
pub use engine::{Distorter, SampleRate};
pub use error::DistortError;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
