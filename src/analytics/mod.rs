//! Aggregation and presentation helpers shared by every view.
//!
//! The pipeline for a view is always the same:
//! - [`aggregate`]: filter records and sum them per group key
//! - [`labels`] / [`colors`] / [`share`]: derive display fields
//! - [`gaps`]: materialize zero rows for keys with no records

pub mod aggregate;
pub mod colors;
pub mod gaps;
pub mod labels;
pub mod share;

use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub use aggregate::{AggregateRow, DistanceRounding, Filter, GroupField, GroupKey, aggregate};

// ---------------------------------------------------------------------------
// Statistic
// ---------------------------------------------------------------------------

/// The quantity a bar chart plots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Statistic {
    /// Number of recorded activities.
    #[default]
    Count,
    /// Summed kilometers.
    Distance,
    /// Summed decimal hours.
    Time,
}

impl Statistic {
    pub const ALL: [Statistic; 3] = [Self::Count, Self::Distance, Self::Time];

    /// Parse a statistic name. `counter` is accepted as an alias of `count`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "count" | "counter" => Ok(Self::Count),
            "distance" => Ok(Self::Distance),
            "time" => Ok(Self::Time),
            other => bail!("unknown statistic '{other}' (expected count, distance or time)"),
        }
    }

    /// Name of the aggregate column this statistic reads.
    pub fn column(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Distance => "Distance_km",
            Self::Time => "Time_h",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => write!(f, "count"),
            Self::Distance => write!(f, "distance"),
            Self::Time => write!(f, "time"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round `value` to `decimals` places, ties to even on the scaled value.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
