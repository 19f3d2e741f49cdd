use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;
use std::time::SystemTime;

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1B[31m",
        Level::Warn => "\x1B[33m",
        Level::Info => "\x1B[32m",
        Level::Debug => "\x1B[36m",
        Level::Trace => "\x1B[35m",
    }
}

/// Installs the global logger. `RUST_LOG` overrides `default_level`.
pub fn setup_logging(default_level: LevelFilter) {
    let colored = atty::is(atty::Stream::Stderr);

    Builder::new()
        .filter_level(default_level)
        .parse_env("RUST_LOG")
        .format(move |buf, record| {
            let level = record.level();
            let timestamp = humantime::format_rfc3339_millis(SystemTime::now());
            let (color, reset) = if colored {
                (level_color(level), "\x1B[0m")
            } else {
                ("", "")
            };

            write!(buf, "{}{:>5}{} [{}] {}", color, level, reset, timestamp, record.args())?;
            // file:line only pays off when debugging
            if level >= Level::Debug {
                write!(
                    buf,
                    " - {}:{}",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )?;
            }
            writeln!(buf)
        })
        .init();
}

#[macro_export]
macro_rules! log_request {
    ($method:expr, $path:expr) => {
        log::info!("→ {} {}", $method, $path)
    };
}

#[macro_export]
macro_rules! log_response {
    ($status:expr, $duration:expr, $size:expr, $encoding:expr) => {
        log::info!(
            "← {} ({:?}) - Size: {} ({})",
            $status,
            $duration,
            $size,
            $encoding
        )
    };
}

#[macro_export]
macro_rules! log_error {
    ($error:expr, $context:expr) => {
        log::error!("❌ {} - {}", $context, $error)
    };
}
