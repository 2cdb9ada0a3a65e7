//! Session configuration.
//!
//! Every struct uses `#[serde(default)]`, so a config file only needs the
//! keys it wants to change:
//!
//! ```toml
//! seed = 42
//! shaper = "radio"
//!
//! [noise]
//! distribution = "gaussian"
//! highcut = 6000.0
//! ```

use crate::error::DistortError;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_SEED: u64 = 0x5EED_D157_0127_0000;

/// How genuine input samples are transformed before the noise is mixed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaperMode {
    /// Linear gain only.
    #[default]
    Gain,
    /// Compressor on ingest plus a voice band-pass equaliser per chunk.
    Radio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseDistribution {
    #[default]
    Uniform,
    Gaussian,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Level (fraction of full scale) the compressor steers toward.
    pub target_level: f64,
    /// Floor of the energy estimate; caps the boost at `1 / min_energy`.
    pub min_energy: f64,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            target_level: 0.7,
            min_energy: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub distribution: NoiseDistribution,
    /// Let the noise level drift between 0.5x and 1.5x of the requested level.
    pub wander: bool,
    /// High-pass corner for the noise bed, in Hz.
    pub lowcut: Option<f64>,
    /// Low-pass corner for the noise bed, in Hz.
    pub highcut: Option<f64>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            distribution: NoiseDistribution::Uniform,
            wander: true,
            lowcut: None,
            highcut: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DistortConfig {
    /// Noise generator seed. A session replays the same noise after every reset.
    pub seed: u64,
    pub shaper: ShaperMode,
    pub compressor: CompressorConfig,
    pub noise: NoiseConfig,
}

impl Default for DistortConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            shaper: ShaperMode::default(),
            compressor: CompressorConfig::default(),
            noise: NoiseConfig::default(),
        }
    }
}

impl DistortConfig {
    /// Load a config file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            serde_json::from_str(&text)
                .map_err(|e| anyhow::anyhow!("Invalid JSON config {}: {}", path.display(), e))
        } else {
            Self::from_toml_str(&text)
                .map_err(|e| anyhow::anyhow!("Invalid TOML config {}: {}", path.display(), e))
        }
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Check the values that depend on the session's sample rate.
    pub fn validate(&self, sample_rate: u32) -> Result<(), DistortError> {
        let c = &self.compressor;
        if !(c.target_level.is_finite() && c.target_level > 0.0) {
            return Err(DistortError::InvalidConfig(format!(
                "compressor.target_level must be positive, got {}",
                c.target_level
            )));
        }
        if !(c.min_energy > 0.0 && c.min_energy <= 1.0) {
            return Err(DistortError::InvalidConfig(format!(
                "compressor.min_energy must lie in (0, 1], got {}",
                c.min_energy
            )));
        }

        let nyquist = sample_rate as f64 / 2.0;
        for (name, corner) in [("lowcut", self.noise.lowcut), ("highcut", self.noise.highcut)] {
            if let Some(hz) = corner {
                if !(hz > 0.0 && hz < nyquist) {
                    return Err(DistortError::InvalidConfig(format!(
                        "noise.{name} must lie in (0, {nyquist}) Hz, got {hz}"
                    )));
                }
            }
        }
        if let (Some(low), Some(high)) = (self.noise.lowcut, self.noise.highcut) {
            if low >= high {
                return Err(DistortError::InvalidConfig(format!(
                    "noise.lowcut ({low} Hz) must be below noise.highcut ({high} Hz)"
                )));
            }
        }
        Ok(())
    }
}
