/// Configuration schema and defaults for sportsviz.
///
/// Sections: `[data]`, `[web]`, `[views]`, `[palette]` and `[logging]`.
/// Every field has a built-in default, so a config file only needs the
/// keys it changes.
use serde::{Deserialize, Serialize};

use crate::analytics::Statistic;
use crate::analytics::colors::Palette;
use crate::views::ViewSettings;
use crate::views::pages::MAX_RECENT_YEARS;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Maps directly to `~/.sportsviz/config.toml` and `.sportsviz.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SportsvizConfig {
    pub data: DataConfig,
    pub web: WebConfig,
    pub views: ViewsConfig,
    pub palette: Palette,
    pub logging: LoggingConfig,
}

impl SportsvizConfig {
    /// The subset of settings the view renderers need.
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            palette: self.palette.clone(),
            recent_years: self.views.recent_years.clamp(1, MAX_RECENT_YEARS),
        }
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Workout CSV file. Relative paths resolve against the working directory.
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "rwc.csv".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8501".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [views]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Years covered by the recent-years page.
    pub recent_years: u32,
    /// Statistic selected when a request does not name one.
    pub default_statistic: Statistic,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            recent_years: 3,
            default_statistic: Statistic::Count,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether rendered views are logged.
    pub enabled: bool,
    /// Path to the render log. `~` is expanded to the home directory.
    pub path: String,
    /// Minimum level written: `"debug"`, `"info"`, `"warn"`, `"error"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.sportsviz/render-log.jsonl".to_string(),
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML
// ---------------------------------------------------------------------------

impl SportsvizConfig {
    /// The annotated config written by `sportsviz config init`.
    pub fn default_toml() -> String {
        r#"# sportsviz configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SPORTSVIZ_*)
#   2. Project config (.sportsviz.toml in current directory)
#   3. User global config (~/.sportsviz/config.toml)
#   4. Built-in defaults

[data]
path = "rwc.csv"                      # Or SPORTSVIZ_DATA

[web]
addr = "127.0.0.1:8501"               # Or SPORTSVIZ_ADDR
open_browser = true

[views]
recent_years = 3                      # Years shown on the recent-years page (1-50)
default_statistic = "count"           # count | distance | time

[palette.rank]
max = "red"
min = "green"
other = "blue"

[palette.comparison]
base = "green"
comparison = "red"

[palette.span]
earliest = "blue"
latest = "green"
between = "red"

[palette.activities]
running = "red"
walking = "green"
cycling = "blue"
other = "gray"

[logging]
enabled = true
path = "~/.sportsviz/render-log.jsonl"
level = "info"                        # debug | info | warn | error
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
