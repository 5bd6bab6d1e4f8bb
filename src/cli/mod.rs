//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `sportsviz options`: activities and years available in the data file
//! - `sportsviz yearly|monthly|compare-years|compare-activities|recent|time-share|evolution`:
//!   render one chart page as a table, JSON or CSV
//! - `sportsviz health`: check the data file, config and render log
//! - `sportsviz config show|init|set|reset`: configuration management

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::analytics::labels::format_thousands;
use crate::config::{self, SportsvizConfig};
use crate::data::{self, Dataset};
use crate::logging::RenderLogger;
use crate::views::{self, Chart, ChartRow, ViewRequest};

/// Output format for chart commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Resolved config plus the data file to read.
pub struct Session {
    pub config: SportsvizConfig,
    pub data_path: PathBuf,
}

impl Session {
    /// `data_override` (from `--data`) beats the configured path.
    pub fn new(data_override: Option<PathBuf>) -> Self {
        let config = config::load();
        let data_path = data_override.unwrap_or_else(|| PathBuf::from(&config.data.path));
        Self { config, data_path }
    }

    pub fn dataset(&self) -> Result<Dataset> {
        data::load(&self.data_path)
    }

    pub fn logger(&self) -> RenderLogger {
        RenderLogger::from_config(&self.config.logging)
    }
}

// ---------------------------------------------------------------------------
// sportsviz options
// ---------------------------------------------------------------------------

pub fn run_options(session: &Session, format: OutputFormat) -> Result<()> {
    let dataset = session.dataset()?;
    let options = views::options(
        &dataset,
        &session.config.view_settings(),
        session.config.views.default_statistic,
    );

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    if format == OutputFormat::Csv {
        println!("activity,years");
        for (activity, years) in &options.years_by_activity {
            let years: Vec<String> = years.iter().map(ToString::to_string).collect();
            println!("{},{}", activity, years.join(";"));
        }
        return Ok(());
    }

    println!("{}", "Available Selections".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  {} {} ({})",
        "Data file:".bold(),
        session.data_path.display(),
        options.records
    );
    println!();
    println!("  {:<20} Years", "Activity");
    println!("  {}", "-".repeat(58));
    for (activity, years) in &options.years_by_activity {
        let span = match (years.first(), years.last()) {
            (Some(first), Some(last)) if first != last => format!("{first}-{last} ({} years)", years.len()),
            (Some(first), _) => first.to_string(),
            _ => "-".to_string(),
        };
        println!("  {:<20} {}", truncate(activity, 20), span);
    }
    println!();
    let statistics: Vec<String> = options.statistics.iter().map(ToString::to_string).collect();
    println!("  {} {}", "Statistics:".bold(), statistics.join(", "));
    println!(
        "  {} {}",
        "Recent years:".bold(),
        options.recent_years
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// sportsviz <chart page>
// ---------------------------------------------------------------------------

/// Render one page and print it.
pub fn run_view(session: &Session, request: &ViewRequest, format: OutputFormat) -> Result<()> {
    let dataset = session.dataset()?;
    let chart = session
        .logger()
        .render(&dataset, request, &session.config.view_settings())
        .with_context(|| format!("failed to render {} view", request.name()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&chart)?),
        OutputFormat::Csv => print!("{}", chart_csv(&chart)?),
        OutputFormat::Table => print_chart_table(&chart),
    }

    Ok(())
}

fn print_chart_table(chart: &Chart) {
    println!("{}", chart.title.bold().cyan());
    if let Some(subtitle) = &chart.subtitle {
        println!("{}", subtitle.dimmed());
    }
    println!("{}", "=".repeat(78));

    let grouped = chart.rows.iter().any(|r| r.group.is_some());
    let head = if grouped { "Group / Category" } else { "Category" };
    println!(
        "  {:<22} {:>12} {:>10} {:>6} {:>12} {:>9}",
        head,
        truncate(axis_name(chart), 12),
        "Label",
        "Count",
        "Distance",
        "Color"
    );
    println!("  {}", "-".repeat(76));

    for row in &chart.rows {
        let name = match &row.group {
            Some(group) => format!("{group} / {}", row.category),
            None => row.category.clone(),
        };
        let line = format!(
            "  {:<22} {:>12} {:>10} {:>6} {:>12} {:>9}",
            truncate(&name, 22),
            format_thousands(row.value, 2),
            row.label.as_deref().unwrap_or("-"),
            row.data.count,
            format_thousands(row.data.distance_km, 2),
            row.data.color.as_deref().unwrap_or("-"),
        );
        if row.data.is_gap() {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }

    if !chart.totals.is_empty() {
        println!();
        println!("{}", "Totals".bold().cyan());
        for total in &chart.totals {
            println!(
                "  {:<22} {:>12} {:>10}",
                total.category,
                format_thousands(total.value, 2),
                total.label
            );
        }
    }

    if !chart.legend.is_empty() {
        println!();
        let legend: Vec<String> = chart
            .legend
            .iter()
            .map(|l| format!("{} = {}", l.name, l.color))
            .collect();
        println!("  {} {}", "Legend:".dimmed(), legend.join(", ").dimmed());
    }

    if chart.is_placeholder() {
        println!();
        println!("{}", "No activity recorded for this selection.".yellow());
    }
}

/// Y-axis label, or the value column for charts without one.
fn axis_name(chart: &Chart) -> &str {
    if chart.y_axis_label.is_empty() {
        &chart.value_column
    } else {
        &chart.y_axis_label
    }
}

/// Flat CSV record for one chart row.
#[derive(Serialize)]
struct CsvRow<'a> {
    group: Option<&'a str>,
    category: &'a str,
    value: f64,
    label: Option<&'a str>,
    #[serde(rename = "Type")]
    activity: Option<String>,
    #[serde(rename = "Year")]
    year: Option<i32>,
    #[serde(rename = "Month")]
    month: Option<u32>,
    #[serde(rename = "Distance_km")]
    distance_km: f64,
    #[serde(rename = "Time_h")]
    time_h: f64,
    #[serde(rename = "Calories")]
    calories: i64,
    #[serde(rename = "ElevGain_m")]
    elev_gain_m: f64,
    avg_speed: f64,
    count: usize,
    color: Option<&'a str>,
    time_spent: Option<&'a str>,
    share_pct: Option<f64>,
}

impl<'a> From<&'a ChartRow> for CsvRow<'a> {
    fn from(row: &'a ChartRow) -> Self {
        let data = &row.data;
        Self {
            group: row.group.as_deref(),
            category: &row.category,
            value: row.value,
            label: row.label.as_deref(),
            activity: data.key.activity.as_ref().map(ToString::to_string),
            year: data.key.year,
            month: data.key.month,
            distance_km: data.distance_km,
            time_h: data.time_h,
            calories: data.calories,
            elev_gain_m: data.elev_gain_m,
            avg_speed: data.avg_speed,
            count: data.count,
            color: data.color.as_deref(),
            time_spent: data.time_spent.as_deref(),
            share_pct: data.share_pct,
        }
    }
}

/// The chart rows as CSV with a header line.
fn chart_csv(chart: &Chart) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &chart.rows {
        writer.serialize(CsvRow::from(row))?;
    }
    let bytes = writer.into_inner().context("failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

// ---------------------------------------------------------------------------
// sportsviz health
// ---------------------------------------------------------------------------

/// Check the data file, config files and render log.
pub fn run_health(session: &Session) -> Result<()> {
    println!("{}", "sportsviz Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    match session.dataset() {
        Ok(dataset) => {
            print_health_item(
                "Data file",
                true,
                &format!("{} ({} records)", session.data_path.display(), dataset.len()),
            );
            let activities: Vec<String> =
                dataset.activities().iter().map(ToString::to_string).collect();
            print_health_item("Activities", !activities.is_empty(), &activities.join(", "));
            let years = dataset.years();
            let span = match (years.first(), years.last()) {
                (Some(first), Some(last)) => format!("{first}-{last}"),
                _ => "none".to_string(),
            };
            print_health_item("Years", !years.is_empty(), &span);
        }
        Err(e) => print_health_item("Data file", false, &format!("{e:#}")),
    }

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.sportsviz/config.toml found"
        } else {
            "not found (run `sportsviz config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".sportsviz.toml found"
        } else {
            "none (optional)"
        },
    );

    let logger = session.logger();
    match logger.path() {
        Some(path) => {
            let entries = logger.read_all_entries();
            let failures = entries.iter().filter(|e| !e.success).count();
            print_health_item(
                "Render log",
                path.exists(),
                &if path.exists() {
                    format!("{} entries, {} failed", entries.len(), failures)
                } else {
                    "no log file yet".to_string()
                },
            );
        }
        None => print_health_item("Render log", false, "disabled"),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<16} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// sportsviz config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective sportsviz Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.sportsviz/config.toml");
    print_source(project_exists, ".sportsviz.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "SPORTSVIZ_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Write a default config file at `~/.sportsviz/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to change colors, paths and defaults.".dimmed());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
