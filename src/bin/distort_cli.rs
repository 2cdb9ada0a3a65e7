use anyhow::Context;
use clap::Parser;
use distort::audio_io::{read_mono_wav, write_mono_wav, MonoClip};
use distort::logging::init_logging;
use distort::{DistortConfig, Distorter, ShaperMode};
use std::path::PathBuf;

/// Run a WAV file through the radio distortion engine.
#[derive(Parser, Debug)]
#[command(name = "distort_cli", version, about)]
struct Args {
    /// 16-bit PCM input (44.1 or 48 kHz; multi-channel is mixed to mono)
    input: PathBuf,
    /// Mono 16-bit output file
    output: PathBuf,
    /// Gain for the voice signal (1.0 = unity)
    #[arg(long, default_value_t = 1.0)]
    amplify: f64,
    /// Background noise level, 0.0 (none) to 1.0 (noise only)
    #[arg(long, default_value_t = 0.2)]
    noise_level: f64,
    /// Samples per `distort` call, to mimic a streaming host
    #[arg(long, default_value_t = 512)]
    block: usize,
    /// TOML or JSON session config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the noise seed from the config
    #[arg(long)]
    seed: Option<u64>,
    /// Use the radio shaper (compressor + voice band EQ)
    #[arg(long)]
    radio: bool,
    /// Feed trailing silence so the last chunk of input reaches the output
    #[arg(long)]
    flush: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DistortConfig::load(path)?,
        None => DistortConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.radio {
        config.shaper = ShaperMode::Radio;
    }
    if args.block == 0 {
        anyhow::bail!("--block must be at least 1");
    }

    let clip = read_mono_wav(&args.input)?;
    let mut distorter = Distorter::with_config(clip.sample_rate, &config)
        .with_context(|| format!("Cannot process {}", args.input.display()))?;

    let mut samples = clip.samples;
    if args.flush {
        samples.resize(samples.len() + distorter.latency(), 0);
    }

    log::info!(
        "Distorting {} samples at {} Hz (amplify {}, noise {}, {:?} shaper, {}-sample blocks)",
        samples.len(),
        clip.sample_rate,
        args.amplify,
        args.noise_level,
        config.shaper,
        args.block
    );
    let start_time = std::time::Instant::now();

    for block in samples.chunks_mut(args.block) {
        distorter.distort(block, args.amplify, args.noise_level)?;
    }

    write_mono_wav(
        &args.output,
        &MonoClip {
            sample_rate: clip.sample_rate,
            samples,
        },
    )?;

    log::info!(
        "Wrote {} in {:.3}s",
        args.output.display(),
        start_time.elapsed().as_secs_f32()
    );
    Ok(())
}
