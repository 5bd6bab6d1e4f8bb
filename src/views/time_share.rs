//! Pie chart of the time spent per activity in one year.

use super::chart::{self, Chart, ChartKind, ChartRow, LegendEntry};
use crate::analytics::colors::{ColorPolicy, Palette};
use crate::analytics::labels::{TimeLabelStyle, clock_label, label_rows};
use crate::analytics::share::{apply_time_shares, wedge_angle};
use crate::analytics::{DistanceRounding, Filter, GroupField, aggregate, gaps};
use crate::data::Dataset;

/// Every activity in the file gets a wedge, so activities not done in
/// `year` show up in the legend with a zero share. Wedges are ordered by
/// ascending time.
pub fn render(dataset: &Dataset, year: i32, palette: &Palette) -> Chart {
    let filter = Filter::all().year(year);
    let mut rows = aggregate(&dataset.records, &filter, &[GroupField::Activity], DistanceRounding::Standard);
    label_rows(&mut rows, TimeLabelStyle::Clock);
    ColorPolicy::PerActivity.apply(&mut rows, palette);

    let expected = gaps::key_range(&dataset.activities(), &[], false);
    let mut rows = gaps::fill_gaps(rows, &expected);
    rows.sort_by(|a, b| a.time_h.total_cmp(&b.time_h));
    apply_time_shares(&mut rows);

    let total_hours: f64 = rows.iter().map(|r| r.time_h).sum();

    let mut angle = 0.0;
    let chart_rows: Vec<ChartRow> = rows
        .into_iter()
        .map(|row| {
            let start = angle;
            angle += wedge_angle(row.share_pct.unwrap_or(0.0));
            let activity = row.key.activity.as_ref().map(|a| a.to_string()).unwrap_or_default();
            ChartRow {
                category: activity,
                group: None,
                value: row.share_pct.unwrap_or(0.0),
                label: row.share_pct.filter(|_| !row.is_gap()).map(|p| format!("{p:.2}%")),
                tooltip: chart::wedge_tooltip(&row),
                data: row,
                start_angle: Some(start),
                end_angle: Some(angle),
            }
        })
        .collect();

    let legend = dataset
        .activities()
        .iter()
        .map(|a| LegendEntry {
            name: a.to_string(),
            color: palette.activities.color_for(a).to_string(),
        })
        .collect();

    Chart {
        kind: ChartKind::Pie,
        view: "time-share".to_string(),
        title: format!(
            "Time Spent in Exercising Activities in {year} - {}",
            clock_label(total_hours)
        ),
        subtitle: None,
        x_axis_label: String::new(),
        y_axis_label: String::new(),
        value_column: "share_pct".to_string(),
        legend,
        rows: chart_rows,
        totals: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ActivityRecord, ActivityType};
    use chrono::NaiveDate;

    fn record(activity: ActivityType, year: i32, hours: f64) -> ActivityRecord {
        ActivityRecord {
            date: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            activity,
            distance_km: 10.0,
            time_h: hours,
            calories: 300,
            elev_gain_m: 50.0,
            avg_speed_kmh: 10.0 / hours,
            year,
            month: 6,
        }
    }

    #[test]
    fn wedges_sorted_by_time_with_shares() {
        let ds = Dataset::new(vec![
            record(ActivityType::Running, 2022, 20.0),
            record(ActivityType::Cycling, 2022, 30.0),
            record(ActivityType::Walking, 2022, 10.0),
        ]);
        let chart = render(&ds, 2022, &Palette::default());

        let order: Vec<&str> = chart.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(order, ["Walking", "Running", "Cycling"]);
        let shares: Vec<f64> = chart.rows.iter().map(|r| r.value).collect();
        assert_eq!(shares, [16.67, 33.33, 50.0]);
        assert_eq!(chart.title, "Time Spent in Exercising Activities in 2022 - 60");

        let last = chart.rows.last().unwrap();
        assert!((last.end_angle.unwrap() - std::f64::consts::TAU).abs() < 1e-3);
        assert_eq!(chart.rows[0].data.color.as_deref(), Some("green"));
    }

    #[test]
    fn year_without_records_renders_zero_wedges() {
        let ds = Dataset::new(vec![record(ActivityType::Running, 2021, 1.5)]);
        let chart = render(&ds, 2030, &Palette::default());

        assert_eq!(chart.rows.len(), 1);
        assert!(chart.is_placeholder());
        assert_eq!(chart.rows[0].value, 0.0);
        assert_eq!(chart.rows[0].label, None);
        assert_eq!(chart.title, "Time Spent in Exercising Activities in 2030 - 0");
    }

    #[test]
    fn inactive_activities_get_zero_share() {
        let ds = Dataset::new(vec![
            record(ActivityType::Running, 2021, 1.5),
            record(ActivityType::Walking, 2022, 1.0),
        ]);
        let chart = render(&ds, 2021, &Palette::default());

        assert_eq!(chart.rows.len(), 2);
        assert_eq!(chart.rows[0].category, "Walking");
        assert_eq!(chart.rows[0].value, 0.0);
        assert_eq!(chart.rows[0].data.share_pct, None);
        assert_eq!(chart.rows[1].value, 100.0);
        assert_eq!(chart.title, "Time Spent in Exercising Activities in 2021 - 1:30'");
    }
}
