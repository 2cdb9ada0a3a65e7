use distort::dsp::saturate_i16;
use distort::{DistortConfig, DistortError, Distorter, ShaperMode};

fn voice(len: usize, amplitude: f64) -> Vec<i16> {
    // Two detuned partials so the signal is not periodic within a chunk
    (0..len)
        .map(|n| {
            let t = n as f64;
            (amplitude * (0.6 * (t * 0.031).sin() + 0.4 * (t * 0.0173).sin())) as i16
        })
        .collect()
}

/// Feed `input` through `session` in calls of `block` samples.
fn stream(session: &mut Distorter, input: &[i16], block: usize, amplify: f64, noise: f64) -> Vec<i16> {
    let mut out = input.to_vec();
    for chunk in out.chunks_mut(block) {
        session.distort(chunk, amplify, noise).unwrap();
    }
    out
}

fn seeded(rate: u32, seed: u64, shaper: ShaperMode) -> Distorter {
    let config = DistortConfig {
        seed,
        shaper,
        ..DistortConfig::default()
    };
    Distorter::with_config(rate, &config).unwrap()
}

#[test]
fn test_supported_rates_only() {
    for rate in [44_100, 48_000] {
        let session = Distorter::new(rate).unwrap();
        assert_eq!(session.sample_rate(), rate);
    }
    for rate in [0, 1, 11_025, 16_000, 44_000, 47_999, 88_200, u32::MAX] {
        assert!(matches!(
            Distorter::new(rate),
            Err(DistortError::UnsupportedSampleRate(_))
        ));
    }
}

#[test]
fn test_zeros_in_zeros_out() {
    let mut session = Distorter::new(44_100).unwrap();
    let mut buf = vec![0i16; 512];
    session.distort(&mut buf, 1.0, 0.0).unwrap();
    assert!(buf.iter().all(|&s| s == 0));
}

#[test]
fn test_without_noise_output_is_scaled_input() {
    for rate in [44_100, 48_000] {
        for amplify in [1.0, 0.5, 0.25, 1.3] {
            let mut session = Distorter::new(rate).unwrap();
            let input = voice(10_000, 20_000.0);
            let output = stream(&mut session, &input, 441, amplify, 0.0);
            let latency = session.latency();

            assert!(output[..latency].iter().all(|&s| s == 0));
            for (i, (&out, &raw)) in output[latency..].iter().zip(&input).enumerate() {
                let expected = saturate_i16(raw as f64 * amplify);
                assert_eq!(out, expected, "rate {rate}, amplify {amplify}, sample {i}");
            }
        }
    }
}

#[test]
fn test_full_noise_masks_the_signal() {
    let mut loud = seeded(48_000, 77, ShaperMode::Gain);
    let mut silent = seeded(48_000, 77, ShaperMode::Gain);

    let out_loud = stream(&mut loud, &voice(9000, 25_000.0), 300, 1.0, 1.0);
    let out_silent = stream(&mut silent, &vec![0; 9000], 300, 1.0, 1.0);
    assert_eq!(out_loud, out_silent);
    assert!(out_loud[loud.latency()..].iter().any(|&s| s != 0));
}

#[test]
fn test_amplify_leaves_noise_floor_alone() {
    let zeros = vec![0i16; 8000];
    let mut unity = seeded(44_100, 3, ShaperMode::Gain);
    let mut faded = seeded(44_100, 3, ShaperMode::Gain);
    let floor_unity = stream(&mut unity, &zeros, 256, 1.0, 0.2);
    let floor_faded = stream(&mut faded, &zeros, 256, 0.1, 0.2);
    assert_eq!(floor_unity, floor_faded);

    // With a voice present, lower gain means a smaller deviation from the floor
    let input = voice(8000, 15_000.0);
    let deviation = |amplify: f64| -> i64 {
        let mut session = seeded(44_100, 3, ShaperMode::Gain);
        let out = stream(&mut session, &input, 256, amplify, 0.2);
        out.iter()
            .zip(&floor_unity)
            .map(|(&a, &b)| (a as i64 - b as i64).abs())
            .sum()
    };
    let full = deviation(1.0);
    let half = deviation(0.5);
    let tenth = deviation(0.1);
    assert!(full > half && half > tenth, "{full} > {half} > {tenth} expected");
}

#[test]
fn test_clear_buffers_restores_cold_start() {
    for shaper in [ShaperMode::Gain, ShaperMode::Radio] {
        let zeros = vec![0i16; 5000];

        let mut fresh = seeded(48_000, 1234, shaper);
        let cold = stream(&mut fresh, &zeros, 480, 1.0, 0.3);

        let mut reused = seeded(48_000, 1234, shaper);
        stream(&mut reused, &voice(7777, 30_000.0), 333, 0.7, 0.6);
        reused.clear_buffers();
        let after_clear = stream(&mut reused, &zeros, 480, 1.0, 0.3);

        assert_eq!(cold, after_clear, "{shaper:?} shaper did not reset cleanly");
    }
}

#[test]
fn test_short_buffers_never_leak_raw_input() {
    let mut session = Distorter::new(44_100).unwrap();
    let input = vec![10_000i16; 6000];
    let output = stream(&mut session, &input, 7, 0.5, 0.0);
    let latency = session.latency();

    assert!(output.iter().all(|&s| s != 10_000));
    assert!(output[..latency].iter().all(|&s| s == 0));
    assert!(output[latency..].iter().all(|&s| s == 5000));
}

#[test]
fn test_noisy_stream_starts_with_silence() {
    let mut session = Distorter::new(48_000).unwrap();
    let input = voice(3000, 20_000.0);
    let output = stream(&mut session, &input, 64, 1.0, 0.6);
    let latency = session.latency();
    assert!(output[..latency].iter().all(|&s| s == 0));
    assert!(output[latency..].iter().any(|&s| s != 0));
}

#[test]
fn test_saturates_instead_of_wrapping() {
    let mut session = Distorter::new(44_100).unwrap();
    let input: Vec<i16> = (0..4000).map(|n| if n % 2 == 0 { 30_000 } else { -30_000 }).collect();
    let output = stream(&mut session, &input, 1000, 2.0, 0.0);
    let latency = session.latency();
    for (i, &s) in output[latency..].iter().enumerate() {
        let expected = if i % 2 == 0 { i16::MAX } else { i16::MIN };
        assert_eq!(s, expected, "sample {i}");
    }
}

#[test]
fn test_extreme_gain_cannot_unmask_noise() {
    for shaper in [ShaperMode::Gain, ShaperMode::Radio] {
        let mut loud = seeded(44_100, 21, shaper);
        let mut silent = seeded(44_100, 21, shaper);

        let out_loud = stream(&mut loud, &voice(6000, 30_000.0), 512, 1e305, 1.0);
        let out_silent = stream(&mut silent, &vec![0; 6000], 512, 1e305, 1.0);
        let audible = out_silent[silent.latency()..].iter().filter(|&&s| s != 0).count();
        assert!(audible > 0, "{shaper:?}: noise bed is silent");
        assert_eq!(out_loud, out_silent, "{shaper:?}: input leaked through full noise");
    }
}

#[test]
fn test_extreme_gain_saturates_in_radio_mode() {
    let mut session = seeded(48_000, 8, ShaperMode::Radio);
    // 1 kHz sits in the middle of the voice band
    let tone: Vec<i16> = (0..6000)
        .map(|n| (10_000.0 * (2.0 * std::f64::consts::PI * 1000.0 * n as f64 / 48_000.0).sin()) as i16)
        .collect();
    let output = stream(&mut session, &tone, 500, 1e305, 0.2);
    let body = &output[session.latency()..];

    let high = body.iter().filter(|&&s| s == i16::MAX).count();
    let low = body.iter().filter(|&&s| s == i16::MIN).count();
    assert!(high > 0 && low > 0, "expected both rails, got {high} high and {low} low");
    assert!(
        (high + low) * 10 >= body.len() * 9,
        "only {} of {} samples saturated",
        high + low,
        body.len()
    );
}

#[test]
fn test_call_size_does_not_change_output() {
    for shaper in [ShaperMode::Gain, ShaperMode::Radio] {
        let input = voice(12_000, 18_000.0);
        let mut reference_session = seeded(44_100, 9, shaper);
        let reference = stream(&mut reference_session, &input, input.len(), 0.8, 0.25);

        for block in [1, 13, 256, 1470, 1471, 5000] {
            let mut session = seeded(44_100, 9, shaper);
            let out = stream(&mut session, &input, block, 0.8, 0.25);
            assert_eq!(out, reference, "{shaper:?} shaper, {block}-sample calls");
        }
    }
}

#[test]
fn test_repeated_runs_are_deterministic() {
    let run = || {
        let mut session = seeded(48_000, 42, ShaperMode::Gain);
        let mut first = voice(256, 9000.0);
        let mut second = voice(256, 9000.0);
        session.distort(&mut first, 1.0, 0.2).unwrap();
        session.distort(&mut second, 1.0, 0.2).unwrap();
        let rest = stream(&mut session, &voice(4000, 9000.0), 256, 1.0, 0.2);
        (first, second, rest)
    };
    let (a1, a2, a3) = run();
    let (b1, b2, b3) = run();
    assert_eq!(a1, b1);
    assert_eq!(a2, b2);
    assert_eq!(a3, b3);
    // Both 256-sample calls fall inside the lead-in
    assert!(a1.iter().chain(&a2).all(|&s| s == 0));
    assert!(a3.iter().any(|&s| s != 0));
}

#[test]
fn test_different_seeds_give_different_noise() {
    let zeros = vec![0i16; 6000];
    let mut a = seeded(44_100, 1, ShaperMode::Gain);
    let mut b = seeded(44_100, 2, ShaperMode::Gain);
    assert_ne!(
        stream(&mut a, &zeros, 500, 1.0, 0.2),
        stream(&mut b, &zeros, 500, 1.0, 0.2)
    );
}

#[test]
fn test_sessions_run_independently_on_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                let mut session = seeded(48_000, 5, ShaperMode::Radio);
                stream(&mut session, &voice(8000, 12_000.0), 400, 0.9, 0.2)
            })
        })
        .collect();
    let outputs: Vec<Vec<i16>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}
