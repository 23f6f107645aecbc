use core::fmt;
use std::sync::Once;
use tracing_subscriber::{
    field::MakeExt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const RUST_LOG: &str = "info";

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, single line output
    #[default]
    #[clap(name = "compact")]
    Compact,
    /// One JSON object per line
    #[clap(name = "json")]
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

static INIT: Once = Once::new();

/// Initialize the global subscriber. Only the first call has an effect.
///
/// Filtering follows `RUST_LOG`, falling back to `info`. Events of the `log` crate are
/// forwarded too.
pub fn init_tracing(name: &str, format: LogFormat) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            eprintln!("RUST_LOG is unset, using default: '{RUST_LOG}'");
            EnvFilter::new(RUST_LOG)
        });

        let result = match format {
            LogFormat::Compact => tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .map_fmt_fields(|f| f.debug_alt())
                        .with_ansi(true)
                        .with_level(true)
                        .compact(),
                )
                .try_init(),
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
                .try_init(),
        };

        match result {
            Ok(()) => log::debug!("logging initialized for {name} ({format})"),
            Err(err) => eprintln!("Error initializing logging: {:?}", err),
        }
    });
}
