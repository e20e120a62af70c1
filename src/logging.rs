use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::TVError;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set, otherwise the level follows the `-v` count
/// (warn, info, debug, trace). Logs go to stderr so stdout only carries
/// table output, or to `log_file` when given.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<(), TVError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    let fmt_layer = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .boxed()
        }
        None => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| TVError::IoError(std::io::Error::other(e)))
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
