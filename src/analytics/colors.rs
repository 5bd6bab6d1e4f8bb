//! Bar and wedge color assignment.
//!
//! Two policies exist: rank-based (the extremes of the plotted statistic
//! stand out) and fixed-entity (the color follows the year or activity a row
//! belongs to). Gap rows never receive a color.

use serde::{Deserialize, Serialize};

use super::{AggregateRow, Statistic};
use crate::data::ActivityType;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Colors used by the rank policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankColors {
    pub max: String,
    pub min: String,
    pub other: String,
}

impl Default for RankColors {
    fn default() -> Self {
        Self {
            max: "red".to_string(),
            min: "green".to_string(),
            other: "blue".to_string(),
        }
    }
}

/// Colors for two-entity comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonColors {
    pub base: String,
    pub comparison: String,
}

impl Default for ComparisonColors {
    fn default() -> Self {
        Self {
            base: "green".to_string(),
            comparison: "red".to_string(),
        }
    }
}

/// Colors for multi-year spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanColors {
    pub earliest: String,
    pub latest: String,
    pub between: String,
}

impl Default for SpanColors {
    fn default() -> Self {
        Self {
            earliest: "blue".to_string(),
            latest: "green".to_string(),
            between: "red".to_string(),
        }
    }
}

/// One fixed color per activity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityColors {
    pub running: String,
    pub walking: String,
    pub cycling: String,
    pub other: String,
}

impl Default for ActivityColors {
    fn default() -> Self {
        Self {
            running: "red".to_string(),
            walking: "green".to_string(),
            cycling: "blue".to_string(),
            other: "gray".to_string(),
        }
    }
}

impl ActivityColors {
    pub fn color_for(&self, activity: &ActivityType) -> &str {
        match activity {
            ActivityType::Running => &self.running,
            ActivityType::Walking => &self.walking,
            ActivityType::Cycling => &self.cycling,
            ActivityType::Other(_) => &self.other,
        }
    }
}

/// Every color the views use, grouped by policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub rank: RankColors,
    pub comparison: ComparisonColors,
    pub span: SpanColors,
    pub activities: ActivityColors,
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// The entity a fixed color is tied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Year(i32),
    Activity(ActivityType),
}

/// How a view colors its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Max value red, min value green, the rest blue. Every row tied with an
    /// extreme gets that extreme's color; max wins when all rows are equal.
    Rank(Statistic),
    /// Rows of `base` get the base color, all other rows the comparison color.
    BaseComparison { base: Entity },
    /// Rows colored by year position within `earliest..=latest`.
    YearSpan { earliest: i32, latest: i32 },
    /// Rows colored by their activity.
    PerActivity,
}

impl ColorPolicy {
    pub fn apply(&self, rows: &mut [AggregateRow], palette: &Palette) {
        match self {
            Self::Rank(statistic) => assign_rank_colors(rows, *statistic, &palette.rank),
            Self::BaseComparison { base } => {
                let colors = &palette.comparison;
                assign_entity_colors(rows, |row| {
                    let is_base = match base {
                        Entity::Year(year) => row.key.year == Some(*year),
                        Entity::Activity(activity) => row.key.activity.as_ref() == Some(activity),
                    };
                    Some(if is_base { colors.base.clone() } else { colors.comparison.clone() })
                });
            }
            Self::YearSpan { earliest, latest } => {
                let colors = &palette.span;
                assign_entity_colors(rows, |row| {
                    let year = row.key.year?;
                    Some(if year == *earliest {
                        colors.earliest.clone()
                    } else if year == *latest {
                        colors.latest.clone()
                    } else {
                        colors.between.clone()
                    })
                });
            }
            Self::PerActivity => {
                let colors = &palette.activities;
                assign_entity_colors(rows, |row| {
                    row.key
                        .activity
                        .as_ref()
                        .map(|a| colors.color_for(a).to_string())
                });
            }
        }
    }
}

/// Color rows by where their `statistic` value sits among the non-gap rows.
pub fn assign_rank_colors(rows: &mut [AggregateRow], statistic: Statistic, colors: &RankColors) {
    let values = rows.iter().filter(|r| !r.is_gap()).map(|r| r.value(statistic));
    let Some((min, max)) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    }) else {
        return;
    };

    for row in rows.iter_mut().filter(|r| !r.is_gap()) {
        let value = row.value(statistic);
        let color = if value == max {
            &colors.max
        } else if value == min {
            &colors.min
        } else {
            &colors.other
        };
        row.color = Some(color.clone());
    }
}

/// Color each non-gap row with whatever `color_of` picks for it.
pub fn assign_entity_colors<F>(rows: &mut [AggregateRow], color_of: F)
where
    F: Fn(&AggregateRow) -> Option<String>,
{
    for row in rows.iter_mut().filter(|r| !r.is_gap()) {
        row.color = color_of(row);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
