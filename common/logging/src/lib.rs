use metrics::{inc_counter, try_create_int_counter, IntCounter, Result as MetricsResult};
use serde::{Deserialize, Serialize};
use slog::{o, Drain, Level, Logger, OwnedKVList, Record};
use std::str::FromStr;
use std::sync::LazyLock;

pub static INFOS_TOTAL: LazyLock<MetricsResult<IntCounter>> =
    LazyLock::new(|| try_create_int_counter("info_total", "Count of infos logged"));
pub static WARNS_TOTAL: LazyLock<MetricsResult<IntCounter>> =
    LazyLock::new(|| try_create_int_counter("warn_total", "Count of warns logged"));
pub static ERRORS_TOTAL: LazyLock<MetricsResult<IntCounter>> =
    LazyLock::new(|| try_create_int_counter("error_total", "Count of errors logged"));
pub static CRITS_TOTAL: LazyLock<MetricsResult<IntCounter>> =
    LazyLock::new(|| try_create_int_counter("crit_total", "Count of crits logged"));

/// The output format of the root logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Terminal,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TERMINAL" | "DEFAULT" => Ok(LogFormat::Terminal),
            "JSON" => Ok(LogFormat::Json),
            _ => Err("Logging format provided is not supported".to_string()),
        }
    }
}

/// How the root logger of a process is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub debug_level: String,
    pub log_format: LogFormat,
    pub log_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            debug_level: "info".to_string(),
            log_format: LogFormat::Terminal,
            log_color: true,
        }
    }
}

/// Parses a `--debug-level` style string into a `slog::Level`.
pub fn parse_level(debug_level: &str) -> Result<Level, String> {
    match debug_level {
        "info" => Ok(Level::Info),
        "debug" => Ok(Level::Debug),
        "trace" => Ok(Level::Trace),
        "warn" => Ok(Level::Warning),
        "error" => Ok(Level::Error),
        "crit" => Ok(Level::Critical),
        unknown => Err(format!("Unknown debug-level: {}", unknown)),
    }
}

/// A drain that counts the records passing through it per level before handing them on.
///
/// `build_logger` places it in front of the level filter, so records below the configured level
/// are counted too.
pub struct CountingDrain<D> {
    drain: D,
}

impl<D> CountingDrain<D> {
    pub fn new(drain: D) -> Self {
        Self { drain }
    }
}

impl<D: Drain> Drain for CountingDrain<D> {
    type Ok = D::Ok;
    type Err = D::Err;

    fn log(&self, record: &Record, values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        match record.level() {
            Level::Info => inc_counter(&INFOS_TOTAL),
            Level::Warning => inc_counter(&WARNS_TOTAL),
            Level::Error => inc_counter(&ERRORS_TOTAL),
            Level::Critical => inc_counter(&CRITS_TOTAL),
            _ => (),
        }

        self.drain.log(record, values)
    }
}

/// Builds an asynchronous root logger writing to stdout.
///
/// The logger is "async" because it has a dedicated thread that accepts logs and then flushes them
/// to stdout. The thread that raised the log does not have to wait for the flush.
pub fn build_logger(config: &LoggerConfig) -> Result<Logger, String> {
    let level = parse_level(&config.debug_level)?;

    let drain = match config.log_format {
        LogFormat::Json => {
            let drain = slog_json::Json::default(std::io::stdout()).fuse();
            slog_async::Async::new(drain).build()
        }
        LogFormat::Terminal => {
            let decorator = if config.log_color {
                slog_term::TermDecorator::new().build()
            } else {
                slog_term::TermDecorator::new().force_plain().build()
            };
            let drain = slog_term::FullFormat::new(decorator).build().fuse();
            slog_async::Async::new(drain).build()
        }
    };

    let drain = CountingDrain::new(drain.filter_level(level)).fuse();

    Ok(Logger::root(drain, o!()))
}

/// Returns a logger that drops every record.
pub fn null_logger() -> Result<Logger, String> {
    use sloggers::Build;

    sloggers::null::NullLoggerBuilder
        .build()
        .map_err(|e| format!("Failed to start null logger: {:?}", e))
}

/// Return a logger suitable for test usage.
///
/// By default no logs will be printed, but they can be enabled via the `test_logger` feature:
///
/// ```bash
/// $ cargo test -p slot_viz --features 'logging/test_logger'
/// ```
pub fn test_logger() -> Logger {
    use sloggers::Build;

    if cfg!(feature = "test_logger") {
        sloggers::terminal::TerminalLoggerBuilder::new()
            .level(sloggers::types::Severity::Debug)
            .build()
            .expect("Should build test_logger")
    } else {
        sloggers::null::NullLoggerBuilder
            .build()
            .expect("Should build null_logger")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::{info, warn};

    #[test]
    fn parses_debug_levels() {
        assert_eq!(parse_level("info"), Ok(Level::Info));
        assert_eq!(parse_level("warn"), Ok(Level::Warning));
        assert_eq!(parse_level("crit"), Ok(Level::Critical));
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn parses_log_formats() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("terminal".parse::<LogFormat>(), Ok(LogFormat::Terminal));
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn logger_config_from_json() {
        let config: LoggerConfig = serde_json::from_str(
            r#"{"debug_level": "debug", "log_format": "json", "log_color": false}"#,
        )
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.debug_level, "debug");
    }

    #[test]
    fn build_rejects_unknown_level() {
        let config = LoggerConfig {
            debug_level: "verbose".to_string(),
            ..LoggerConfig::default()
        };
        assert!(build_logger(&config).is_err());
    }

    #[test]
    fn counting_drain_counts_per_level() {
        let warns_before = WARNS_TOTAL.as_ref().map(|c| c.get()).unwrap_or(0);

        let log = Logger::root(CountingDrain::new(slog::Discard), o!());
        info!(log, "Counted"; "level" => "info");
        warn!(log, "Counted"; "level" => "warn");
        warn!(log, "Counted"; "level" => "warn");

        let warns_after = WARNS_TOTAL.as_ref().map(|c| c.get()).unwrap_or(0);
        assert!(warns_after >= warns_before + 2);
    }

    #[test]
    fn counts_records_below_the_level_filter() {
        let infos_before = INFOS_TOTAL.as_ref().map(|c| c.get()).unwrap_or(0);

        let drain = CountingDrain::new(slog::Discard.filter_level(Level::Error)).fuse();
        let log = Logger::root(drain, o!());
        info!(log, "Filtered"; "level" => "info");

        let infos_after = INFOS_TOTAL.as_ref().map(|c| c.get()).unwrap_or(0);
        assert!(infos_after > infos_before);
    }
}
