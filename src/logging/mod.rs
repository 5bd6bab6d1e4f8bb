//! Structured render log.
//!
//! One JSON line per rendered view, appended to
//! `~/.sportsviz/render-log.jsonl` (configurable). Logging is best-effort:
//! a log file that cannot be written never fails a render.

use std::fmt;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;
use crate::data::Dataset;
use crate::views::{self, Chart, ViewRequest, ViewSettings};

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Unknown names fall back to `Info`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderLogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    /// Page identifier, e.g. `"monthly"`.
    pub view: String,
    /// Selections as `key=value` pairs.
    pub params: String,
    pub rows: usize,
    pub duration_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl RenderLogEntry {
    /// Failed renders log at `Error`, all-placeholder charts at `Warn`,
    /// everything else at `Info`.
    pub fn new(request: &ViewRequest, result: &Result<Chart>, elapsed: Duration) -> Self {
        let (level, rows, error) = match result {
            Ok(chart) if chart.is_placeholder() => (LogLevel::Warn, chart.rows.len(), None),
            Ok(chart) => (LogLevel::Info, chart.rows.len(), None),
            Err(err) => (LogLevel::Error, 0, Some(format!("{err:#}"))),
        };

        Self {
            timestamp: Utc::now().to_rfc3339(),
            level,
            view: request.name().to_string(),
            params: request.to_string(),
            rows,
            duration_ms: elapsed.as_millis() as u64,
            success: result.is_ok(),
            error,
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderLogger {
    /// `None` disables logging.
    path: Option<PathBuf>,
    level: LogLevel,
}

impl RenderLogger {
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            path: if config.enabled {
                expand_home(&config.path)
            } else {
                None
            },
            level: LogLevel::parse(&config.level),
        }
    }

    pub fn disabled() -> Self {
        Self {
            path: None,
            level: LogLevel::Info,
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Append `entry` unless it is below the configured level.
    pub fn log(&self, entry: &RenderLogEntry) {
        if entry.level < self.level {
            return;
        }
        if let Some(path) = &self.path {
            let _ = append_entry(path, entry);
        }
    }

    /// Render `request` and log the outcome.
    pub fn render(
        &self,
        dataset: &Dataset,
        request: &ViewRequest,
        settings: &ViewSettings,
    ) -> Result<Chart> {
        let started = Instant::now();
        let result = views::render(dataset, request, settings);
        self.log(&RenderLogEntry::new(request, &result, started.elapsed()));
        result
    }

    /// All entries in the log file. Malformed lines are skipped; a missing
    /// file yields an empty vec.
    pub fn read_all_entries(&self) -> Vec<RenderLogEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(std::io::Result::ok)
            .filter_map(|line| serde_json::from_str::<RenderLogEntry>(&line).ok())
            .collect()
    }
}

fn append_entry(path: &PathBuf, entry: &RenderLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> Option<PathBuf> {
    match raw.strip_prefix('~') {
        Some(rest) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            dirs::home_dir().map(|home| home.join(rest))
        }
        None => Some(PathBuf::from(raw)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Statistic;
    use crate::data::ActivityType;

    fn logger_at(path: PathBuf, level: &str) -> RenderLogger {
        RenderLogger::from_config(&LoggingConfig {
            enabled: true,
            path: path.to_string_lossy().into_owned(),
            level: level.to_string(),
        })
    }

    fn request() -> ViewRequest {
        ViewRequest::Monthly {
            activity: Some(ActivityType::Running),
            statistic: Statistic::Distance,
            year: None,
        }
    }

    #[test]
    fn level_parsing_and_order() {
        assert_eq!(LogLevel::parse("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::parse("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("nonsense"), LogLevel::Info);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn failed_render_logs_error_entry() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger_at(dir.path().join("log.jsonl"), "info");

        let result = logger.render(&Dataset::default(), &request(), &ViewSettings::default());
        assert!(result.is_err());

        let entries = logger.read_all_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].view, "monthly");
        assert_eq!(entries[0].level, LogLevel::Error);
        assert!(!entries[0].success);
        assert!(entries[0].error.is_some());
        assert_eq!(entries[0].params, "activity=Running statistic=distance year=-");
    }

    #[test]
    fn entries_below_level_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger_at(dir.path().join("log.jsonl"), "error");

        let failed: Result<Chart> = Err(anyhow::anyhow!("boom"));
        let mut entry = RenderLogEntry::new(&request(), &failed, Duration::from_millis(3));
        logger.log(&entry);
        entry.level = LogLevel::Info;
        logger.log(&entry);

        assert_eq!(logger.read_all_entries().len(), 1);
    }

    #[test]
    fn disabled_logger_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let logger = RenderLogger::from_config(&LoggingConfig {
            enabled: false,
            path: path.to_string_lossy().into_owned(),
            level: "debug".to_string(),
        });

        let _ = logger.render(&Dataset::default(), &request(), &ViewSettings::default());
        assert!(!path.exists());
        assert!(logger.read_all_entries().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let logger = logger_at(path.clone(), "debug");

        let failed: Result<Chart> = Err(anyhow::anyhow!("boom"));
        logger.log(&RenderLogEntry::new(&request(), &failed, Duration::ZERO));
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();

        assert_eq!(logger.read_all_entries().len(), 1);
    }

    #[test]
    fn expand_home_handles_tilde() {
        assert_eq!(expand_home("/tmp/x.jsonl"), Some(PathBuf::from("/tmp/x.jsonl")));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home("~/.sportsviz/render-log.jsonl"),
                Some(home.join(".sportsviz/render-log.jsonl"))
            );
        }
    }
}
