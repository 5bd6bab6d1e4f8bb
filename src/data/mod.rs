//! Workout records and the in-memory dataset.
//!
//! The CSV file is the only durable store. [`loader::load`] reads it in full
//! into a [`Dataset`]; nothing is cached between views.

pub mod loader;

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use loader::load;

// ---------------------------------------------------------------------------
// Activity type
// ---------------------------------------------------------------------------

/// Category of exercise.
///
/// Unknown names are kept verbatim in [`ActivityType::Other`] so new
/// categories in the data show up without code changes.
#[derive(Debug, Clone)]
pub enum ActivityType {
    Running,
    Cycling,
    Walking,
    Other(String),
}

impl ActivityType {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "Running" => Self::Running,
            "Cycling" => Self::Cycling,
            "Walking" => Self::Walking,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
            Self::Walking => "Walking",
            Self::Other(name) => name,
        }
    }

    /// Hover label for the record count, e.g. `"Number of runs"`.
    pub fn counter_name(&self) -> &'static str {
        match self {
            Self::Running => "Number of runs",
            Self::Cycling => "Number of bike rides",
            Self::Walking => "Number of walks",
            Self::Other(_) => "Number of activities",
        }
    }

    /// Past participle used in distance titles ("Kilometers Cycled").
    pub fn distance_verb(&self) -> &'static str {
        match self {
            Self::Running => "Run",
            Self::Cycling => "Cycled",
            Self::Walking => "Walked",
            Self::Other(_) => "Covered",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Activities compare, hash and sort by name, the same order the selectors
// list them in, so `Other("Running")` and `Running` are one activity.
impl PartialEq for ActivityType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ActivityType {}

impl Hash for ActivityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Ord for ActivityType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for ActivityType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for ActivityType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

// ---------------------------------------------------------------------------
// Activity record
// ---------------------------------------------------------------------------

/// One row of the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub activity: ActivityType,
    pub distance_km: f64,
    /// Duration in decimal hours.
    pub time_h: f64,
    pub calories: i64,
    pub elev_gain_m: f64,
    pub avg_speed_kmh: f64,
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// All records of the source file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<ActivityRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ActivityRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct activity types, sorted by name.
    pub fn activities(&self) -> Vec<ActivityType> {
        self.records
            .iter()
            .map(|r| r.activity.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct years across every activity, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct years in which `activity` was recorded, ascending.
    pub fn years_for(&self, activity: &ActivityType) -> Vec<i32> {
        self.records
            .iter()
            .filter(|r| &r.activity == activity)
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct activities recorded during `year`, sorted by name.
    pub fn activities_in(&self, year: i32) -> Vec<ActivityType> {
        self.records
            .iter()
            .filter(|r| r.year == year)
            .map(|r| r.activity.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Latest year present in the file, if any.
    pub fn max_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(activity: &str, year: i32, month: u32) -> ActivityRecord {
        ActivityRecord {
            date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            activity: ActivityType::parse(activity),
            distance_km: 1.0,
            time_h: 0.1,
            calories: 10,
            elev_gain_m: 0.0,
            avg_speed_kmh: 10.0,
            year,
            month,
        }
    }

    #[test]
    fn activity_type_round_trips_names() {
        assert_eq!(ActivityType::parse("Running"), ActivityType::Running);
        assert_eq!(ActivityType::parse(" Cycling "), ActivityType::Cycling);
        assert_eq!(
            ActivityType::parse("Swimming"),
            ActivityType::Other("Swimming".to_string())
        );
        assert_eq!(ActivityType::parse("Swimming").as_str(), "Swimming");
    }

    #[test]
    fn activities_sort_by_name() {
        let mut list = vec![
            ActivityType::Walking,
            ActivityType::parse("Rowing"),
            ActivityType::Cycling,
            ActivityType::Running,
        ];
        list.sort();
        let names: Vec<_> = list.iter().map(|a| a.as_str()).collect();
        assert_eq!(names, ["Cycling", "Rowing", "Running", "Walking"]);
    }

    #[test]
    fn equality_and_ordering_agree_on_names() {
        use std::cmp::Ordering;
        use std::collections::HashSet;

        let spelled = ActivityType::Other("Running".to_string());
        assert_eq!(spelled, ActivityType::Running);
        assert_eq!(spelled.cmp(&ActivityType::Running), Ordering::Equal);

        let set: HashSet<_> = [spelled, ActivityType::Running, ActivityType::Walking]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_ne!(ActivityType::parse("Rowing"), ActivityType::parse("Swimming"));
    }

    #[test]
    fn counter_names_and_verbs() {
        assert_eq!(ActivityType::Running.counter_name(), "Number of runs");
        assert_eq!(ActivityType::Cycling.counter_name(), "Number of bike rides");
        assert_eq!(ActivityType::Walking.counter_name(), "Number of walks");
        assert_eq!(ActivityType::Walking.distance_verb(), "Walked");
        assert_eq!(ActivityType::Cycling.distance_verb(), "Cycled");
        assert_eq!(ActivityType::Running.distance_verb(), "Run");
    }

    #[test]
    fn dataset_distinct_queries() {
        let ds = Dataset::new(vec![
            record("Running", 2022, 3),
            record("Walking", 2021, 5),
            record("Running", 2023, 1),
            record("Running", 2022, 4),
        ]);

        assert_eq!(ds.activities(), vec![ActivityType::Running, ActivityType::Walking]);
        assert_eq!(ds.years(), vec![2021, 2022, 2023]);
        assert_eq!(ds.years_for(&ActivityType::Running), vec![2022, 2023]);
        assert_eq!(ds.activities_in(2021), vec![ActivityType::Walking]);
        assert_eq!(ds.max_year(), Some(2023));
    }

    #[test]
    fn empty_dataset_has_no_years() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert!(ds.years().is_empty());
        assert_eq!(ds.max_year(), None);
    }
}
