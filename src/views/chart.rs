//! The table handed to the chart renderer.
//!
//! One [`ChartRow`] per category slot. Column names are stable so the
//! frontend binds bar heights, labels and tooltips by name.

use serde::Serialize;

use crate::analytics::AggregateRow;
use crate::analytics::labels::format_thousands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Bar,
    /// Bars keyed by (group, category), e.g. (2022, "Mar").
    GroupedBar,
    /// Segments stacked per category, one segment per group.
    StackedBar,
    Pie,
}

/// A `(name, value)` pair shown when hovering a bar or wedge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipField {
    pub name: String,
    pub value: String,
}

impl TooltipField {
    fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    /// Axis tick, e.g. `"2023"`, `"Jan"` or `"Running"`.
    pub category: String,
    /// Outer factor for grouped bars, stack name for stacked bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Bar height or wedge size.
    pub value: f64,
    /// Text drawn above the bar; `None` for gap rows.
    pub label: Option<String>,
    #[serde(flatten)]
    pub data: AggregateRow,
    pub tooltip: Vec<TooltipField>,
    /// Wedge start and end angles in radians (pie charts only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_angle: Option<f64>,
}

/// Height and label drawn on top of a whole stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackTotal {
    pub category: String,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub view: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub x_axis_label: String,
    pub y_axis_label: String,
    /// Aggregate column the bar heights come from.
    pub value_column: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub legend: Vec<LegendEntry>,
    pub rows: Vec<ChartRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub totals: Vec<StackTotal>,
}

impl Chart {
    /// True when every row is a gap row.
    pub fn is_placeholder(&self) -> bool {
        self.rows.iter().all(|r| r.data.is_gap())
    }
}

// ---------------------------------------------------------------------------
// Tooltips
// ---------------------------------------------------------------------------

const NO_ACTIVITY: &str = "No activity";

fn time_field(row: &AggregateRow) -> TooltipField {
    TooltipField::new("Time", row.time_spent.as_deref().unwrap_or(NO_ACTIVITY))
}

fn distance_field(row: &AggregateRow) -> TooltipField {
    TooltipField::new("Distance", format!("{} km", format_thousands(row.distance_km, 2)))
}

fn effort_fields(row: &AggregateRow, calories_name: &str) -> [TooltipField; 2] {
    [
        TooltipField::new(calories_name, format_thousands(row.calories as f64, 0)),
        TooltipField::new(
            "Cumulative Elevation Gain",
            format!("{} m", format_thousands(row.elev_gain_m, 0)),
        ),
    ]
}

fn speed_field(row: &AggregateRow) -> TooltipField {
    TooltipField::new("Average Speed", format!("{:.2} km/h", row.avg_speed))
}

fn share_field(row: &AggregateRow) -> TooltipField {
    TooltipField::new(
        "Percentage of Time Spent",
        format!("{:.2}%", row.share_pct.unwrap_or(0.0)),
    )
}

/// Tooltip for bar pages: distance, time, calories, elevation, speed, count.
pub fn bar_tooltip(row: &AggregateRow, counter_name: &str) -> Vec<TooltipField> {
    let mut fields = vec![distance_field(row), time_field(row)];
    fields.extend(effort_fields(row, "Calories burned"));
    fields.push(speed_field(row));
    fields.push(TooltipField::new(counter_name, row.count.to_string()));
    fields
}

/// Tooltip for pie wedges: adds the time share, drops the speed.
pub fn wedge_tooltip(row: &AggregateRow) -> Vec<TooltipField> {
    let mut fields = vec![distance_field(row), time_field(row), share_field(row)];
    fields.extend(effort_fields(row, "Calories burned"));
    fields.push(TooltipField::new("Number of activities", row.count.to_string()));
    fields
}

/// Tooltip for one stacked segment.
pub fn segment_tooltip(row: &AggregateRow) -> Vec<TooltipField> {
    let mut fields = vec![distance_field(row), time_field(row)];
    fields.extend(effort_fields(row, "Calories Burned"));
    fields.push(speed_field(row));
    fields.push(TooltipField::new("Number of Activities", row.count.to_string()));
    fields.push(share_field(row));
    fields
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::GroupKey;

    #[test]
    fn bar_tooltip_formats_fields() {
        let mut row = AggregateRow::zero(GroupKey::month(1));
        row.count = 2;
        row.distance_km = 1234.5;
        row.calories = 15320;
        row.elev_gain_m = 845.6;
        row.avg_speed = 10.256;
        row.time_spent = Some("0:45'".to_string());

        let tooltip = bar_tooltip(&row, "Number of runs");
        let values: Vec<(&str, &str)> = tooltip
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            values,
            [
                ("Distance", "1,234.50 km"),
                ("Time", "0:45'"),
                ("Calories burned", "15,320"),
                ("Cumulative Elevation Gain", "846 m"),
                ("Average Speed", "10.26 km/h"),
                ("Number of runs", "2"),
            ]
        );
    }

    #[test]
    fn gap_rows_show_no_activity() {
        let row = AggregateRow::zero(GroupKey::month(4));
        let tooltip = bar_tooltip(&row, "Number of walks");
        assert_eq!(tooltip[1].value, "No activity");
        assert_eq!(tooltip[0].value, "0.00 km");
    }

    #[test]
    fn chart_row_serializes_source_column_names() {
        let mut data = AggregateRow::zero(GroupKey::month(1));
        data.count = 1;
        data.distance_km = 8.0;
        let row = ChartRow {
            category: "Jan".to_string(),
            group: None,
            value: 8.0,
            label: Some("8".to_string()),
            data,
            tooltip: Vec::new(),
            start_angle: None,
            end_angle: None,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"Distance_km\":8.0"));
        assert!(json.contains("\"Month\":1"));
        assert!(json.contains("\"count\":1"));
        assert!(!json.contains("start_angle"));
    }
}
