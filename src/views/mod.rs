//! Dashboard pages.
//!
//! Every page is a [`ViewRequest`]. Bar pages share one pipeline,
//! [`render_bars`], driven by a per-page [`BarView`] description; the pie
//! and stacked pages have their own renderers in [`time_share`] and
//! [`evolution`].

pub mod chart;
pub mod evolution;
pub mod pages;
pub mod time_share;

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::analytics::colors::{ColorPolicy, Palette};
use crate::analytics::labels::{TimeLabelStyle, label_rows};
use crate::analytics::{
    AggregateRow, DistanceRounding, Filter, GroupField, GroupKey, Statistic, aggregate, gaps,
};
use crate::data::{ActivityType, Dataset};

pub use chart::{Chart, ChartKind, ChartRow, LegendEntry, StackTotal, TooltipField};
pub use evolution::Magnitude;

/// Month tick labels.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Settings that shape views but are not part of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub palette: Palette,
    /// Number of years the recent-years page covers.
    pub recent_years: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            recent_years: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A page plus the user's selections. Unset selections fall back to the
/// same defaults the selectors start on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    /// Totals per year for one activity.
    Yearly {
        activity: Option<ActivityType>,
        statistic: Statistic,
    },
    /// Totals per month of one year for one activity.
    Monthly {
        activity: Option<ActivityType>,
        statistic: Statistic,
        year: Option<i32>,
    },
    /// Two years of one activity, month by month.
    YearComparison {
        activity: Option<ActivityType>,
        statistic: Statistic,
        base: Option<i32>,
        comparison: Option<i32>,
    },
    /// Two activities within one year, month by month.
    ActivityComparison {
        year: Option<i32>,
        statistic: Statistic,
        base: Option<ActivityType>,
        comparison: Option<ActivityType>,
    },
    /// The last few years of one activity, month by month.
    RecentYears {
        activity: Option<ActivityType>,
        statistic: Statistic,
    },
    /// Share of time per activity within one year.
    TimeShare { year: Option<i32> },
    /// Time per activity for every year, stacked.
    Evolution { magnitude: Magnitude },
}

impl ViewRequest {
    /// Stable page identifier, also used in URLs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yearly { .. } => "yearly",
            Self::Monthly { .. } => "monthly",
            Self::YearComparison { .. } => "year-comparison",
            Self::ActivityComparison { .. } => "activity-comparison",
            Self::RecentYears { .. } => "recent",
            Self::TimeShare { .. } => "time-share",
            Self::Evolution { .. } => "evolution",
        }
    }
}

impl fmt::Display for ViewRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(value: &Option<T>) -> String {
            value.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
        }

        match self {
            Self::Yearly { activity, statistic } | Self::RecentYears { activity, statistic } => {
                write!(f, "activity={} statistic={statistic}", opt(activity))
            }
            Self::Monthly { activity, statistic, year } => write!(
                f,
                "activity={} statistic={statistic} year={}",
                opt(activity),
                opt(year)
            ),
            Self::YearComparison { activity, statistic, base, comparison } => write!(
                f,
                "activity={} statistic={statistic} base={} comparison={}",
                opt(activity),
                opt(base),
                opt(comparison)
            ),
            Self::ActivityComparison { year, statistic, base, comparison } => write!(
                f,
                "year={} statistic={statistic} base={} comparison={}",
                opt(year),
                opt(base),
                opt(comparison)
            ),
            Self::TimeShare { year } => write!(f, "year={}", opt(year)),
            Self::Evolution { magnitude } => write!(f, "magnitude={magnitude}"),
        }
    }
}

/// Render one page from the full dataset.
pub fn render(dataset: &Dataset, request: &ViewRequest, settings: &ViewSettings) -> Result<Chart> {
    match request {
        ViewRequest::Yearly { activity, statistic } => {
            let activity = resolve_activity(dataset, activity.as_ref())?;
            Ok(render_bars(dataset, pages::yearly(dataset, activity, *statistic), &settings.palette))
        }
        ViewRequest::Monthly { activity, statistic, year } => {
            let activity = resolve_activity(dataset, activity.as_ref())?;
            let year = match year {
                Some(year) => *year,
                None => first_year_for(dataset, &activity)?,
            };
            Ok(render_bars(dataset, pages::monthly(activity, *statistic, year), &settings.palette))
        }
        ViewRequest::YearComparison { activity, statistic, base, comparison } => {
            let activity = resolve_activity(dataset, activity.as_ref())?;
            let options = dataset.years_for(&activity);
            let (base, comparison) = resolve_pair(&options, *base, *comparison, "year")?;
            Ok(render_bars(
                dataset,
                pages::year_comparison(activity, *statistic, base, comparison),
                &settings.palette,
            ))
        }
        ViewRequest::ActivityComparison { year, statistic, base, comparison } => {
            let year = match year {
                Some(year) => *year,
                None => *dataset.years().first().context("the data file has no records")?,
            };
            let options = dataset.activities_in(year);
            let (base, comparison) =
                resolve_pair(&options, base.clone(), comparison.clone(), "activity")?;
            Ok(render_bars(
                dataset,
                pages::activity_comparison(year, *statistic, base, comparison),
                &settings.palette,
            ))
        }
        ViewRequest::RecentYears { activity, statistic } => {
            let activity = resolve_activity(dataset, activity.as_ref())?;
            let latest = dataset.max_year().context("the data file has no records")?;
            Ok(render_bars(
                dataset,
                pages::recent_years(activity, *statistic, latest, settings.recent_years),
                &settings.palette,
            ))
        }
        ViewRequest::TimeShare { year } => {
            let year = match year {
                Some(year) => *year,
                None => *dataset.years().first().context("the data file has no records")?,
            };
            Ok(time_share::render(dataset, year, &settings.palette))
        }
        ViewRequest::Evolution { magnitude } => {
            Ok(evolution::render(dataset, *magnitude, &settings.palette))
        }
    }
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// The values each page's selectors offer for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    pub activities: Vec<ActivityType>,
    pub years: Vec<i32>,
    /// Years with at least one record, per activity.
    pub years_by_activity: BTreeMap<String, Vec<i32>>,
    /// Activities with at least one record, per year.
    pub activities_by_year: BTreeMap<i32, Vec<ActivityType>>,
    pub statistics: Vec<Statistic>,
    pub default_statistic: Statistic,
    pub magnitudes: Vec<Magnitude>,
    pub recent_years: u32,
    pub latest_year: Option<i32>,
    pub records: usize,
}

pub fn options(dataset: &Dataset, settings: &ViewSettings, default_statistic: Statistic) -> Options {
    let activities = dataset.activities();
    let years = dataset.years();

    Options {
        years_by_activity: activities
            .iter()
            .map(|a| (a.to_string(), dataset.years_for(a)))
            .collect(),
        activities_by_year: years.iter().map(|y| (*y, dataset.activities_in(*y))).collect(),
        activities,
        years,
        statistics: Statistic::ALL.to_vec(),
        default_statistic,
        magnitudes: vec![Magnitude::Absolute, Magnitude::Relative],
        recent_years: settings.recent_years,
        latest_year: dataset.max_year(),
        records: dataset.len(),
    }
}

// ---------------------------------------------------------------------------
// Selection defaults
// ---------------------------------------------------------------------------

fn resolve_activity(dataset: &Dataset, activity: Option<&ActivityType>) -> Result<ActivityType> {
    match activity {
        Some(activity) => Ok(activity.clone()),
        None => dataset
            .activities()
            .into_iter()
            .next()
            .context("the data file has no records"),
    }
}

fn first_year_for(dataset: &Dataset, activity: &ActivityType) -> Result<i32> {
    dataset
        .years_for(activity)
        .first()
        .copied()
        .with_context(|| format!("no {activity} records to pick a year from"))
}

/// Pick a base and a distinct comparison entity from `options`.
fn resolve_pair<T>(
    options: &[T],
    base: Option<T>,
    comparison: Option<T>,
    what: &str,
) -> Result<(T, T)>
where
    T: Clone + PartialEq + fmt::Display,
{
    let base = match base {
        Some(base) => base,
        None => options
            .first()
            .cloned()
            .with_context(|| format!("no {what} available to compare"))?,
    };
    let comparison = match comparison {
        Some(comparison) => comparison,
        None => options
            .iter()
            .find(|o| **o != base)
            .cloned()
            .with_context(|| format!("only one {what} ({base}) available, nothing to compare"))?,
    };
    if base == comparison {
        bail!("base and comparison {what} must differ (both {base})");
    }
    Ok((base, comparison))
}

// ---------------------------------------------------------------------------
// Bar pipeline
// ---------------------------------------------------------------------------

/// Everything that distinguishes one bar page from another.
#[derive(Debug, Clone)]
pub struct BarView {
    pub name: &'static str,
    pub kind: ChartKind,
    pub filter: Filter,
    pub group_by: Vec<GroupField>,
    /// Keys that must each have exactly one row in the output.
    pub expected: Vec<GroupKey>,
    pub rounding: DistanceRounding,
    pub label_style: TimeLabelStyle,
    pub colors: ColorPolicy,
    pub statistic: Statistic,
    pub counter_name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub x_axis_label: String,
    pub y_axis_label: String,
}

/// Aggregate, label, color and gap-fill according to `view`.
pub fn render_bars(dataset: &Dataset, view: BarView, palette: &Palette) -> Chart {
    let mut rows = aggregate(&dataset.records, &view.filter, &view.group_by, view.rounding);
    label_rows(&mut rows, view.label_style);
    view.colors.apply(&mut rows, palette);
    let rows = gaps::fill_gaps(rows, &view.expected);

    let chart_rows = rows
        .into_iter()
        .map(|row| ChartRow {
            category: category_of(&row.key),
            group: group_of(&row.key),
            value: row.value(view.statistic),
            label: bar_label(&row, view.statistic),
            tooltip: chart::bar_tooltip(&row, &view.counter_name),
            data: row,
            start_angle: None,
            end_angle: None,
        })
        .collect();

    Chart {
        kind: view.kind,
        view: view.name.to_string(),
        title: view.title,
        subtitle: view.subtitle,
        x_axis_label: view.x_axis_label,
        y_axis_label: view.y_axis_label,
        value_column: view.statistic.column().to_string(),
        legend: Vec::new(),
        rows: chart_rows,
        totals: Vec::new(),
    }
}

/// Text drawn on a bar: the distance, the time label, or the count.
fn bar_label(row: &AggregateRow, statistic: Statistic) -> Option<String> {
    if row.is_gap() {
        return None;
    }
    match statistic {
        Statistic::Count => Some(row.count.to_string()),
        Statistic::Distance => Some(row.distance_km.to_string()),
        Statistic::Time => row.time_spent.clone(),
    }
}

/// Innermost grouping value: the month name, else the year, else the activity.
fn category_of(key: &GroupKey) -> String {
    if let Some(month) = key.month {
        return month_name(month).to_string();
    }
    if let Some(year) = key.year {
        return year.to_string();
    }
    key.activity
        .as_ref()
        .map(|a| a.to_string())
        .unwrap_or_default()
}

/// Outer grouping value for two-key groupings.
fn group_of(key: &GroupKey) -> Option<String> {
    key.month?;
    key.year
        .map(|y| y.to_string())
        .or_else(|| key.activity.as_ref().map(|a| a.to_string()))
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("?")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_and_group_from_keys() {
        let key = GroupKey::year(2022).with_month(3);
        assert_eq!(category_of(&key), "Mar");
        assert_eq!(group_of(&key), Some("2022".to_string()));

        let key = GroupKey::year(2022);
        assert_eq!(category_of(&key), "2022");
        assert_eq!(group_of(&key), None);

        let key = GroupKey::activity(ActivityType::Walking).with_month(12);
        assert_eq!(category_of(&key), "Dec");
        assert_eq!(group_of(&key), Some("Walking".to_string()));
    }

    #[test]
    fn month_names_are_bounded() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "?");
        assert_eq!(month_name(13), "?");
    }

    #[test]
    fn resolve_pair_defaults_and_validation() {
        let years = [2020, 2021, 2022];
        assert_eq!(resolve_pair(&years, None, None, "year").unwrap(), (2020, 2021));
        assert_eq!(resolve_pair(&years, Some(2021), None, "year").unwrap(), (2021, 2020));
        assert!(resolve_pair(&years, Some(2021), Some(2021), "year").is_err());
        assert!(resolve_pair(&[2020], None, None, "year").is_err());
    }

    #[test]
    fn request_display_lists_parameters() {
        let request = ViewRequest::Monthly {
            activity: Some(ActivityType::Running),
            statistic: Statistic::Time,
            year: None,
        };
        assert_eq!(request.name(), "monthly");
        assert_eq!(request.to_string(), "activity=Running statistic=time year=-");
    }
    #[test]
    fn options_index_years_and_activities() {
        use crate::data::ActivityRecord;
        use chrono::NaiveDate;

        let record = |activity: ActivityType, year: i32| ActivityRecord {
            date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            activity,
            distance_km: 1.0,
            time_h: 0.1,
            calories: 10,
            elev_gain_m: 0.0,
            avg_speed_kmh: 10.0,
            year,
            month: 1,
        };
        let ds = Dataset::new(vec![
            record(ActivityType::Walking, 2021),
            record(ActivityType::Running, 2022),
            record(ActivityType::Walking, 2023),
        ]);
        let opts = options(&ds, &ViewSettings::default(), Statistic::Time);

        assert_eq!(opts.activities, [ActivityType::Running, ActivityType::Walking]);
        assert_eq!(opts.years, [2021, 2022, 2023]);
        assert_eq!(opts.years_by_activity["Walking"], [2021, 2023]);
        assert_eq!(opts.activities_by_year[&2022], [ActivityType::Running]);
        assert_eq!(opts.latest_year, Some(2023));
        assert_eq!(opts.default_statistic, Statistic::Time);
        assert_eq!(opts.records, 3);
    }
}
