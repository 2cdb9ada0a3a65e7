use std::any::Any;
use std::panic;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install a logger backend and the panic hook. Safe to call repeatedly;
/// only the first call does anything.
pub fn init_logging() {
    INIT.call_once(|| {
        // Platform-specific logger initialization
        #[cfg(target_os = "android")]
        {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(log::LevelFilter::Debug)
                    .with_tag("Distort"),
            );
        }

        #[cfg(target_os = "ios")]
        {
            let _ = oslog::OsLogger::new("com.distort.engine")
                .level_filter(log::LevelFilter::Debug)
                .init();
        }

        #[cfg(not(any(target_os = "android", target_os = "ios")))]
        {
            // Desktop and tests: fmt subscriber, which also picks up `log`
            // records. A host that installed its own subscriber keeps it.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .try_init();
        }

        set_panic_hook();

        log::info!("distort {} logging initialized", crate::VERSION);
    });
}

/// The message carried by a panic payload, when it has one.
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<Any>"
    }
}

fn set_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let msg = panic_message(panic_info.payload());

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let bt = backtrace::Backtrace::new();

        log::error!(
            "PANIC: {}\nLocation: {}\nBacktrace:\n{:?}",
            msg,
            location,
            bt
        );

        default_hook(panic_info);
    }));
}
