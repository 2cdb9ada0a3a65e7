//! C ABI for the distortion engine (`distort.dll` / `libdistort.so`).
//!
//! Entry points use the `system` calling convention (stdcall on 32-bit
//! Windows, the platform C convention elsewhere) and keep the widths of the
//! original header: `i32` sample rate, `i16` samples, `i64` sample count,
//! `f64` gain and noise level.
//!
//! Every handle handed out is recorded in a live-handle registry. Calls with
//! a null, foreign or already released handle are logged and ignored, so a
//! double `distort_fini` is harmless. No panic crosses the boundary.

use crate::config::{DistortConfig, ShaperMode};
use crate::engine::Distorter;
use crate::error::DistortError;
use crate::logging;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

// Addresses of sessions created by the init entry points and not yet released.
// Only addresses live here; all audio state stays inside each session.
lazy_static! {
    static ref LIVE_SESSIONS: Mutex<HashSet<usize>> = Mutex::new(HashSet::new());
}

fn is_live(dis: *mut Distorter) -> bool {
    !dis.is_null() && LIVE_SESSIONS.lock().contains(&(dis as usize))
}

/// Run `f` on a live session, or report why we couldn't.
///
/// # Safety
/// `dis` must not be used concurrently from another thread.
unsafe fn with_session<R>(
    dis: *mut Distorter,
    f: impl FnOnce(&mut Distorter) -> R,
) -> Result<R, DistortError> {
    if !is_live(dis) {
        return Err(DistortError::InvalidHandle(dis as usize));
    }
    // SAFETY: the registry only holds pointers produced by `Box::into_raw`
    // in `open_session` that `distort_fini` has not reclaimed yet.
    let session = unsafe { &mut *dis };
    Ok(f(session))
}

fn log_panic(entry: &str, payload: Box<dyn std::any::Any + Send>) {
    log::error!(
        "{entry}: panic caught at the C boundary: {}",
        logging::panic_message(&*payload)
    );
}

fn open_session(entry: &str, sample_rate: i32, config: &DistortConfig) -> *mut Distorter {
    logging::init_logging();

    let result = catch_unwind(|| {
        let session = u32::try_from(sample_rate)
            .map_err(|_| DistortError::UnsupportedSampleRate(sample_rate as i64))
            .and_then(|hz| Distorter::with_config(hz, config));
        match session {
            Ok(session) => {
                let ptr = Box::into_raw(Box::new(session));
                LIVE_SESSIONS.lock().insert(ptr as usize);
                ptr
            }
            Err(e) => {
                log::error!("{entry}: {e}");
                std::ptr::null_mut()
            }
        }
    });
    result.unwrap_or_else(|payload| {
        log_panic(entry, payload);
        std::ptr::null_mut()
    })
}

/// Create a session. Returns null unless `sample_rate` is 44100 or 48000.
///
/// The session applies plain gain to the signal.
#[no_mangle]
pub extern "system" fn distort_init(sample_rate: i32) -> *mut Distorter {
    open_session("distort_init", sample_rate, &DistortConfig::default())
}

/// Like [`distort_init`], but the session also compresses the signal and
/// band-limits each chunk to the voice band.
#[no_mangle]
pub extern "system" fn distort_init_radio(sample_rate: i32) -> *mut Distorter {
    let config = DistortConfig {
        shaper: ShaperMode::Radio,
        ..DistortConfig::default()
    };
    open_session("distort_init_radio", sample_rate, &config)
}

/// Release a session created by `distort_init` or `distort_init_radio`.
///
/// # Safety
/// `dis` must not be in use by another thread during or after this call.
#[no_mangle]
pub unsafe extern "system" fn distort_fini(dis: *mut Distorter) {
    let released = LIVE_SESSIONS.lock().remove(&(dis as usize));
    if !released {
        log::error!(
            "distort_fini: {}",
            DistortError::InvalidHandle(dis as usize)
        );
        return;
    }
    // SAFETY: the address was live, so it came from `Box::into_raw` and is
    // reclaimed exactly once (it is no longer in the registry).
    let result = catch_unwind(AssertUnwindSafe(|| drop(unsafe { Box::from_raw(dis) })));
    if let Err(payload) = result {
        log_panic("distort_fini", payload);
    }
}

/// Distort `num_samples` samples at `samples` in place.
///
/// `num_samples <= 0` or a null `samples` pointer is a no-op. If the gain or
/// noise level is invalid the buffer is overwritten with silence.
///
/// # Safety
/// `samples` must point to at least `num_samples` writable `i16` values, and
/// the session must not be used concurrently.
#[no_mangle]
pub unsafe extern "system" fn distort(
    dis: *mut Distorter,
    samples: *mut i16,
    num_samples: i64,
    amplify: f64,
    noise_level: f64,
) {
    if samples.is_null() || num_samples <= 0 {
        return;
    }
    let len = match usize::try_from(num_samples) {
        Ok(len) => len,
        Err(_) => return,
    };

    let result = catch_unwind(AssertUnwindSafe(|| {
        unsafe {
            with_session(dis, |session| {
                // SAFETY: caller guarantees `samples` covers `num_samples` values.
                let buf = std::slice::from_raw_parts_mut(samples, len);
                if let Err(e) = session.distort(buf, amplify, noise_level) {
                    log::warn!("distort: {e}; emitting silence");
                    buf.fill(0);
                }
            })
        }
    }));

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::error!("distort: {e}"),
        Err(payload) => log_panic("distort", payload),
    }
}

/// Reset a session's carried audio and noise sequence.
///
/// # Safety
/// The session must not be used concurrently.
#[no_mangle]
pub unsafe extern "system" fn distort_clear_buffers(dis: *mut Distorter) {
    let result = catch_unwind(AssertUnwindSafe(|| {
        unsafe { with_session(dis, |session| session.clear_buffers()) }
    }));
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::error!("distort_clear_buffers: {e}"),
        Err(payload) => log_panic("distort_clear_buffers", payload),
    }
}
