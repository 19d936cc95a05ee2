//! Global `tracing` subscriber setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Subscriber configuration.
///
/// `filter` uses `EnvFilter` directive syntax (e.g. "info",
/// "tumble_engine=debug,tumble_demo=trace"). `RUST_LOG` wins when set;
/// with neither, the level is "info".
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            ansi: true,
        }
    }
}

static INIT: Once = Once::new();

/// Install the global subscriber once. Later calls are ignored, as is a
/// subscriber installed by someone else first.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .ok()
            .or_else(|| {
                config
                    .filter
                    .as_deref()
                    .and_then(|f| EnvFilter::try_new(f).ok())
            })
            .unwrap_or_else(|| EnvFilter::new("info"));

        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.ansi)
            .with_target(true)
            .try_init()
            .is_ok();

        if installed {
            tracing::debug!("logging initialized");
        }
    });
}
