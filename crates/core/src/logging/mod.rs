//! Leveled console logging
//!
//! Call sites use the regular `tracing` macros plus [`fatal!`](crate::fatal):
//!
//! - `debug!` / `info!` / `warn!` for plain messages
//! - `error!(error = %err, "...")` for failures, the error text lands on its
//!   own line ahead of the message
//! - `fatal!(...)` for configuration misuse
//!
//! Every line is written as `[ {prefix}:{TAG} ] {date} {time} {message}` to a
//! per-severity [`Sink`]. The subscriber is built from an explicit
//! [`LoggerConfig`]: install it once with [`init`], or scope it with
//! `tracing::subscriber::with_default(subscriber(&config)?, || ...)`.
//!
//! Test suppression (`OSC_IS_TESTING=true`) drops everything except fatal
//! lines, and keeps [`fatal_exit_code`] from asking the caller to exit.

mod format;
mod sink;

pub use format::PrefixFormatter;
pub use sink::{SharedBuffer, Sink, SinkWriter, Sinks};

use std::env;

use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::filter::{filter_fn, Directive, EnvFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::error::{Error, Result};

/// Target that marks an `ERROR`-level event as fatal.
pub const FATAL_TARGET: &str = "osc::fatal";

/// Environment variable that turns test suppression on when set to `true`.
pub const TESTING_ENV_VAR: &str = "OSC_IS_TESTING";

/// Process exit status for an unrecoverable error.
pub const FATAL_EXIT_CODE: i32 = 1;

pub const DEFAULT_PREFIX_NAME: &str = "osc";

const DEFAULT_FILTER: &str = "debug";

/// Log at fatal severity. Accepts the same arguments as `tracing::error!`.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::tracing::error!(target: $crate::logging::FATAL_TARGET, $($arg)+)
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// Fixed-width tag used in the line prefix.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO ",
            Severity::Warn => "WARN ",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    pub fn of(meta: &Metadata<'_>) -> Self {
        if meta.target() == FATAL_TARGET {
            return Severity::Fatal;
        }

        let level = *meta.level();
        if level == Level::ERROR {
            Severity::Error
        } else if level == Level::WARN {
            Severity::Warn
        } else if level == Level::INFO {
            Severity::Info
        } else {
            Severity::Debug
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Application name shown in every prefix, e.g. `rhad`.
    pub prefix_name: String,
    /// Drop all but fatal lines and never request a fatal exit.
    pub testing: bool,
    pub timestamps: bool,
    /// `EnvFilter` directives.
    pub filter: String,
    pub sinks: Sinks,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            prefix_name: DEFAULT_PREFIX_NAME.to_string(),
            testing: false,
            timestamps: true,
            filter: DEFAULT_FILTER.to_string(),
            sinks: Sinks::default(),
        }
    }
}

impl LoggerConfig {
    /// Defaults, with `testing` taken from `OSC_IS_TESTING` and the filter
    /// from `RUST_LOG` when set.
    pub fn from_env() -> Self {
        let testing = env::var(TESTING_ENV_VAR).is_ok_and(|value| value == "true");
        let filter = env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        Self {
            testing,
            filter,
            ..Self::default()
        }
    }

    pub fn with_prefix_name(mut self, name: impl Into<String>) -> Self {
        self.prefix_name = name.into();
        self
    }

    pub fn with_testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_sinks(mut self, sinks: Sinks) -> Self {
        self.sinks = sinks;
        self
    }

    pub fn with_sink(mut self, severity: Severity, sink: Sink) -> Self {
        self.sinks = self.sinks.with(severity, sink);
        self
    }
}

/// Build a subscriber for `config` without installing it.
pub fn subscriber(
    config: &LoggerConfig,
) -> Result<impl Subscriber + Send + Sync + 'static + use<>> {
    let fatal_directive: Directive = format!("{FATAL_TARGET}=error")
        .parse()
        .map_err(|e| Error::LoggerInit(format!("{e}")))?;
    let env_filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| Error::LoggerInit(format!("invalid filter '{}': {e}", config.filter)))?
        .add_directive(fatal_directive);

    let testing = config.testing;
    let layer = tracing_subscriber::fmt::layer()
        .event_format(PrefixFormatter::new(&config.prefix_name, config.timestamps))
        .with_writer(config.sinks.clone())
        .with_filter(filter_fn(move |meta| {
            !testing || Severity::of(meta) == Severity::Fatal
        }));

    Ok(tracing_subscriber::registry().with(env_filter).with(layer))
}

/// Install the process-wide subscriber. Call once at startup.
pub fn init(config: &LoggerConfig) -> Result<()> {
    subscriber(config)?
        .try_init()
        .map_err(|e| Error::LoggerInit(e.to_string()))
}

/// Exit status the top-level entry point should terminate with for `err`,
/// or `None` when it should carry on.
pub fn fatal_exit_code(config: &LoggerConfig, err: &Error) -> Option<i32> {
    (err.is_unrecoverable() && !config.testing).then_some(FATAL_EXIT_CODE)
}
