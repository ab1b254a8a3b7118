//! Process-wide tracing setup. Logs go to stderr so stdout stays the
//! wizard's console.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "OPWIZ_LOG";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            other => Err(anyhow::anyhow!("unknown log level `{other}`")),
        }
    }
}

/// Pick the effective level: CLI flags first, then the settings file.
pub fn resolve_level(verbose: bool, quiet: bool, configured: Option<&str>) -> Level {
    if quiet {
        return Level::Error;
    }
    if verbose {
        return Level::Debug;
    }
    configured
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(Level::Warn)
}

/// Install the stderr subscriber. `OPWIZ_LOG` takes precedence over `level`.
pub fn init(level: Level) -> anyhow::Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(raw) if !raw.trim().is_empty() => EnvFilter::try_new(raw.trim())
            .map_err(|err| anyhow::anyhow!("invalid {LOG_ENV} filter: {err}"))?,
        _ => EnvFilter::new(level.as_str()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}
