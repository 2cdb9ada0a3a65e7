//! 16-bit PCM WAV file IO for offline rendering.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// A mono clip of 16-bit samples.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoClip {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

/// Read a 16-bit integer WAV file. Multi-channel files are averaged down to mono.
pub fn read_mono_wav(path: &Path) -> anyhow::Result<MonoClip> {
    let mut reader = WavReader::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open WAV file {}: {}", path.display(), e))?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        anyhow::bail!(
            "{}: expected 16-bit integer PCM, got {} bit {:?}",
            path.display(),
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    let interleaved = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Failed to read samples from {}: {}", path.display(), e))?;

    let channels = spec.channels.max(1) as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / frame.len() as i32) as i16
            })
            .collect()
    };

    log::debug!(
        "read {} mono samples at {} Hz from {} ({} channel(s))",
        samples.len(),
        spec.sample_rate,
        path.display(),
        channels
    );

    Ok(MonoClip {
        sample_rate: spec.sample_rate,
        samples,
    })
}

/// Write a mono 16-bit WAV file, creating parent directories as needed.
pub fn write_mono_wav(path: &Path, clip: &MonoClip) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create output directory: {}", e))?;
        }
    }

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| anyhow::anyhow!("Failed to create WAV file: {}", e))?;
    for &sample in &clip.samples {
        writer
            .write_sample(sample)
            .map_err(|e| anyhow::anyhow!("Failed to write sample: {}", e))?;
    }
    writer
        .finalize()
        .map_err(|e| anyhow::anyhow!("Failed to finalize WAV file: {}", e))?;

    Ok(())
}
