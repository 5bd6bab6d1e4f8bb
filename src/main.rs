use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sportsviz::analytics::Statistic;
use sportsviz::cli::{self, OutputFormat, Session};
use sportsviz::data::ActivityType;
use sportsviz::views::{Magnitude, ViewRequest};
use sportsviz::web;

#[derive(Debug, Parser)]
#[command(name = "sportsviz")]
#[command(about = "Charts of running, cycling and walking workouts from a CSV export")]
struct App {
    /// Workout CSV file (overrides `data.path` from the config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Launch the web dashboard
    Web {
        /// Address to bind (default: config `web.addr`)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// List the activities, years and statistics available for selection
    Options {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Totals per year for one activity
    Yearly {
        #[arg(long)]
        activity: Option<String>,
        /// count, distance or time (default: config `views.default_statistic`)
        #[arg(long)]
        statistic: Option<String>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Totals per month of one year for one activity
    Monthly {
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        statistic: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Compare two years of one activity month by month
    CompareYears {
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        statistic: Option<String>,
        #[arg(long)]
        base: Option<i32>,
        #[arg(long)]
        comparison: Option<i32>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Compare two activities within one year month by month
    CompareActivities {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        statistic: Option<String>,
        #[arg(long)]
        base: Option<String>,
        #[arg(long)]
        comparison: Option<String>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// The last few years of one activity month by month
    Recent {
        #[arg(long)]
        activity: Option<String>,
        #[arg(long)]
        statistic: Option<String>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Share of time per activity within one year
    TimeShare {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Time per activity for every year, stacked
    Evolution {
        /// absolute (hours) or relative (percent of the year)
        #[arg(long, default_value = "absolute")]
        magnitude: String,
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check the data file, config files and render log
    Health,
    /// Manage sportsviz configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create a default config file at ~/.sportsviz/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a configuration value (e.g., `views.recent_years 5`)
    Set {
        /// Dotted key path
        key: String,
        /// New value
        value: String,
    },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let session = Session::new(app.data.clone());
    let default_statistic = session.config.views.default_statistic;
    let statistic = |value: Option<String>| -> Result<Statistic> {
        value.map_or(Ok(default_statistic), |v| Statistic::parse(&v))
    };
    let activity = |value: Option<String>| value.map(|v| ActivityType::parse(&v));
    let view = |request: ViewRequest, format: String| {
        cli::run_view(&session, &request, OutputFormat::from_str_opt(Some(&format)))
    };

    match app.command {
        Commands::Web { addr, no_open } => {
            let addr = addr.unwrap_or_else(|| session.config.web.addr.clone());
            let open = session.config.web.open_browser && !no_open;
            web::serve(&addr, open, web::State { data_override: app.data })
        }
        Commands::Options { format } => {
            cli::run_options(&session, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Yearly { activity: a, statistic: s, format } => view(
            ViewRequest::Yearly {
                activity: activity(a),
                statistic: statistic(s)?,
            },
            format,
        ),
        Commands::Monthly { activity: a, statistic: s, year, format } => view(
            ViewRequest::Monthly {
                activity: activity(a),
                statistic: statistic(s)?,
                year,
            },
            format,
        ),
        Commands::CompareYears { activity: a, statistic: s, base, comparison, format } => view(
            ViewRequest::YearComparison {
                activity: activity(a),
                statistic: statistic(s)?,
                base,
                comparison,
            },
            format,
        ),
        Commands::CompareActivities { year, statistic: s, base, comparison, format } => view(
            ViewRequest::ActivityComparison {
                year,
                statistic: statistic(s)?,
                base: activity(base),
                comparison: activity(comparison),
            },
            format,
        ),
        Commands::Recent { activity: a, statistic: s, format } => view(
            ViewRequest::RecentYears {
                activity: activity(a),
                statistic: statistic(s)?,
            },
            format,
        ),
        Commands::TimeShare { year, format } => view(ViewRequest::TimeShare { year }, format),
        Commands::Evolution { magnitude, format } => view(
            ViewRequest::Evolution {
                magnitude: Magnitude::parse(&magnitude)?,
            },
            format,
        ),
        Commands::Health => cli::run_health(&session),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
