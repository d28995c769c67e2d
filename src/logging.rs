use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise logging. The default level is `info`; `debug` is used when
/// enabled via the settings file, in which case `RUST_LOG` may override it.
///
/// When `log_dir` is given, output is also written to a daily rotated
/// `key_overlay.log` in that directory. The returned guard flushes the
/// file writer when dropped and must be held until the process exits.
#[must_use]
pub fn init(debug: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Without debug logging `RUST_LOG` is ignored so a stray variable in the
    // user's environment can't turn on per-key tracing.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    if let Some(dir) = log_dir {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "key_overlay.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = registry
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .try_init();
        Some(guard)
    } else {
        let _ = registry.try_init();
        None
    }
}
