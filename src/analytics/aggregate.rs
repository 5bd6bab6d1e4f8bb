//! Filtering and per-group summation of workout records.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Statistic, round_to};
use crate::data::{ActivityRecord, ActivityType};

// ---------------------------------------------------------------------------
// Group keys
// ---------------------------------------------------------------------------

/// A dimension records can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Activity,
    Year,
    Month,
}

/// One combination of grouping values. Dimensions that are not grouped on
/// stay `None`, so keys order by activity, then year, then month.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    #[serde(rename = "Type")]
    pub activity: Option<ActivityType>,
    #[serde(rename = "Year")]
    pub year: Option<i32>,
    #[serde(rename = "Month")]
    pub month: Option<u32>,
}

impl GroupKey {
    pub fn of(record: &ActivityRecord, fields: &[GroupField]) -> Self {
        let mut key = Self::default();
        for field in fields {
            match field {
                GroupField::Activity => key.activity = Some(record.activity.clone()),
                GroupField::Year => key.year = Some(record.year),
                GroupField::Month => key.month = Some(record.month),
            }
        }
        key
    }

    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn month(month: u32) -> Self {
        Self {
            month: Some(month),
            ..Self::default()
        }
    }

    pub fn activity(activity: ActivityType) -> Self {
        Self {
            activity: Some(activity),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Which years a view considers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearFilter {
    Only(Vec<i32>),
    /// Inclusive lower bound.
    Since(i32),
}

/// Row predicate: activity membership and year membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub activities: Option<Vec<ActivityType>>,
    pub years: Option<YearFilter>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn activity(mut self, activity: ActivityType) -> Self {
        self.activities = Some(vec![activity]);
        self
    }

    pub fn activities(mut self, activities: Vec<ActivityType>) -> Self {
        self.activities = Some(activities);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.years = Some(YearFilter::Only(vec![year]));
        self
    }

    pub fn years(mut self, years: Vec<i32>) -> Self {
        self.years = Some(YearFilter::Only(years));
        self
    }

    pub fn since(mut self, year: i32) -> Self {
        self.years = Some(YearFilter::Since(year));
        self
    }

    pub fn matches(&self, record: &ActivityRecord) -> bool {
        let activity_ok = self
            .activities
            .as_ref()
            .is_none_or(|list| list.contains(&record.activity));
        let year_ok = match &self.years {
            None => true,
            Some(YearFilter::Only(years)) => years.contains(&record.year),
            Some(YearFilter::Since(from)) => record.year >= *from,
        };
        activity_ok && year_ok
    }

    /// The activity when the filter admits exactly one.
    pub fn single_activity(&self) -> Option<&ActivityType> {
        match self.activities.as_deref() {
            Some([only]) => Some(only),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rounding policy
// ---------------------------------------------------------------------------

/// How summed distance is rounded for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceRounding {
    /// Two decimals for every activity.
    #[default]
    Standard,
    /// Whole kilometers for Cycling, two decimals otherwise. Used by the
    /// year-level and year-comparison views.
    WholeKmForCycling,
}

impl DistanceRounding {
    pub fn decimals(self, activity: Option<&ActivityType>) -> i32 {
        match (self, activity) {
            (Self::WholeKmForCycling, Some(ActivityType::Cycling)) => 0,
            _ => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate rows
// ---------------------------------------------------------------------------

/// Sums for one group key plus the display fields views attach later.
///
/// Column names match the source file so charts can bind axes and tooltips
/// by name. A row with `count == 0` is a gap row: all numbers are zero and
/// the display fields stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    #[serde(flatten)]
    pub key: GroupKey,
    #[serde(rename = "Distance_km")]
    pub distance_km: f64,
    #[serde(rename = "Time_h")]
    pub time_h: f64,
    #[serde(rename = "Calories")]
    pub calories: i64,
    #[serde(rename = "ElevGain_m")]
    pub elev_gain_m: f64,
    /// Unweighted mean of the records' average speed, two decimals.
    pub avg_speed: f64,
    pub count: usize,
    pub color: Option<String>,
    pub time_spent: Option<String>,
    /// Share of the period's total duration, percent with two decimals.
    pub share_pct: Option<f64>,
}

impl AggregateRow {
    /// A gap row for a key with no contributing records.
    pub fn zero(key: GroupKey) -> Self {
        Self {
            key,
            distance_km: 0.0,
            time_h: 0.0,
            calories: 0,
            elev_gain_m: 0.0,
            avg_speed: 0.0,
            count: 0,
            color: None,
            time_spent: None,
            share_pct: None,
        }
    }

    pub fn is_gap(&self) -> bool {
        self.count == 0
    }

    pub fn value(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Count => self.count as f64,
            Statistic::Distance => self.distance_km,
            Statistic::Time => self.time_h,
        }
    }
}

/// Running sums for one group.
#[derive(Debug, Clone, Default)]
pub struct Totals {
    pub distance_km: f64,
    pub time_h: f64,
    pub calories: i64,
    pub elev_gain_m: f64,
    pub speed_sum: f64,
    pub count: usize,
}

impl Totals {
    fn add(&mut self, record: &ActivityRecord) {
        self.distance_km += record.distance_km;
        self.time_h += record.time_h;
        self.calories += record.calories;
        self.elev_gain_m += record.elev_gain_m;
        self.speed_sum += record.avg_speed_kmh;
        self.count += 1;
    }

    fn into_row(self, key: GroupKey, distance_decimals: i32) -> AggregateRow {
        let avg_speed = if self.count == 0 {
            0.0
        } else {
            round_to(self.speed_sum / self.count as f64, 2)
        };

        AggregateRow {
            key,
            distance_km: round_to(self.distance_km, distance_decimals),
            time_h: self.time_h,
            calories: self.calories,
            elev_gain_m: self.elev_gain_m,
            avg_speed,
            count: self.count,
            color: None,
            time_spent: None,
            share_pct: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Group the records admitted by `filter` on `fields`.
pub fn group(
    records: &[ActivityRecord],
    filter: &Filter,
    fields: &[GroupField],
) -> BTreeMap<GroupKey, Totals> {
    let mut groups: BTreeMap<GroupKey, Totals> = BTreeMap::new();
    for record in records.iter().filter(|r| filter.matches(r)) {
        groups
            .entry(GroupKey::of(record, fields))
            .or_default()
            .add(record);
    }
    groups
}

/// One row per group key present in the filtered records, ascending by key.
///
/// Returns an empty vec when nothing matches; placeholder rows are the gap
/// filler's job.
pub fn aggregate(
    records: &[ActivityRecord],
    filter: &Filter,
    fields: &[GroupField],
    rounding: DistanceRounding,
) -> Vec<AggregateRow> {
    group(records, filter, fields)
        .into_iter()
        .map(|(key, totals)| {
            let activity = key.activity.as_ref().or(filter.single_activity());
            let decimals = rounding.decimals(activity);
            totals.into_row(key, decimals)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
