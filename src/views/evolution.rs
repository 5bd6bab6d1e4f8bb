//! Stacked bars of time per activity, one stack per year.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::chart::{self, Chart, ChartKind, ChartRow, LegendEntry, StackTotal};
use crate::analytics::colors::{ColorPolicy, Palette};
use crate::analytics::labels::{TimeLabelStyle, clock_label, label_rows};
use crate::analytics::share::apply_time_shares;
use crate::analytics::{AggregateRow, DistanceRounding, Filter, GroupField, aggregate, gaps, round_to};
use crate::data::Dataset;

/// Whether stacks show hours or each activity's share of the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Magnitude {
    #[default]
    Absolute,
    Relative,
}

impl Magnitude {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            other => bail!("unknown magnitude '{other}' (expected absolute or relative)"),
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => write!(f, "absolute"),
            Self::Relative => write!(f, "relative"),
        }
    }
}

/// One segment per (activity, year) over every activity and year in the
/// file; missing combinations become zero segments.
pub fn render(dataset: &Dataset, magnitude: Magnitude, palette: &Palette) -> Chart {
    let mut rows = aggregate(
        &dataset.records,
        &Filter::all(),
        &[GroupField::Activity, GroupField::Year],
        DistanceRounding::Standard,
    );
    label_rows(&mut rows, TimeLabelStyle::Verbose);
    ColorPolicy::PerActivity.apply(&mut rows, palette);

    let activities = dataset.activities();
    let years = dataset.years();
    let rows = gaps::fill_gaps(rows, &gaps::key_range(&activities, &years, false));

    // Shares are computed within each year across activities.
    let mut by_year: BTreeMap<i32, Vec<AggregateRow>> = BTreeMap::new();
    for row in rows {
        by_year.entry(row.key.year.unwrap_or_default()).or_default().push(row);
    }

    let mut chart_rows = Vec::new();
    let mut totals = Vec::new();
    for (year, mut segments) in by_year {
        apply_time_shares(&mut segments);

        let total = round_to(segments.iter().map(|r| r.time_h).sum(), 2);
        totals.push(StackTotal {
            category: year.to_string(),
            value: total,
            label: clock_label(total),
        });

        for row in segments {
            let value = match magnitude {
                Magnitude::Absolute => row.time_h,
                Magnitude::Relative => row.share_pct.unwrap_or(0.0),
            };
            chart_rows.push(ChartRow {
                category: year.to_string(),
                group: row.key.activity.as_ref().map(|a| a.to_string()),
                value,
                label: None,
                tooltip: chart::segment_tooltip(&row),
                data: row,
                start_angle: None,
                end_angle: None,
            });
        }
    }

    let (title, y_axis_label) = match magnitude {
        Magnitude::Absolute => ("Evolution of the Time Spent per Activity per Year", "Hours"),
        Magnitude::Relative => (
            "Evolution of the Share of Time Spent per Activity per Year",
            "Percentage of Time Spent",
        ),
    };

    let legend = activities
        .iter()
        .map(|a| LegendEntry {
            name: a.to_string(),
            color: palette.activities.color_for(a).to_string(),
        })
        .collect();

    Chart {
        kind: ChartKind::StackedBar,
        view: "evolution".to_string(),
        title: title.to_string(),
        subtitle: None,
        x_axis_label: "Year".to_string(),
        y_axis_label: y_axis_label.to_string(),
        value_column: match magnitude {
            Magnitude::Absolute => "Time_h".to_string(),
            Magnitude::Relative => "share_pct".to_string(),
        },
        legend,
        rows: chart_rows,
        // Stack totals are only drawn in hours.
        totals: if magnitude == Magnitude::Absolute { totals } else { Vec::new() },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
