/// Aggregation tests over a workout file on disk.
///
/// Covers loading, grouping, rounding, labels, gap filling, shares and
/// rank colors. Page-level assembly lives in `view_tests.rs`.
use std::io::Write;

use sportsviz::analytics::colors::{RankColors, assign_rank_colors};
use sportsviz::analytics::gaps::{fill_gaps, key_range, months};
use sportsviz::analytics::labels::{TimeLabelStyle, label_rows};
use sportsviz::analytics::share::{apply_time_shares, percentages};
use sportsviz::analytics::{DistanceRounding, Filter, GroupField, GroupKey, Statistic, aggregate};
use sportsviz::data::{self, ActivityType, Dataset};
use tempfile::NamedTempFile;

const WORKOUTS: &str = "\
Date,Type,Distance_km,Time_h,Calories,ElevGain_m,AvgSpeed_km/h
2021-05-05,Cycling,30.6,1.5,900,200,20.4
2022-06-01,Running,10.0,1.0,800,50,10.0
2022-07-14,Walking,6.0,1.5,300,15,4.0
2023-01-03,Running,5.0,0.5,400,20,10.0
2023-01-20,Running,3.0,0.25,250,10,12.0
2023-02-11,Cycling,40.4,2.0,1200,300,20.2
";

fn load_workouts() -> (NamedTempFile, Dataset) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(WORKOUTS.as_bytes()).unwrap();
    file.flush().unwrap();
    let dataset = data::load(file.path()).unwrap();
    (file, dataset)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn load_reads_every_record() {
    let (_file, dataset) = load_workouts();
    assert_eq!(dataset.len(), 6);
    assert_eq!(
        dataset.activities(),
        vec![ActivityType::Cycling, ActivityType::Running, ActivityType::Walking]
    );
    assert_eq!(dataset.years(), vec![2021, 2022, 2023]);
    assert_eq!(dataset.years_for(&ActivityType::Running), vec![2022, 2023]);
    assert_eq!(dataset.max_year(), Some(2023));
}

#[test]
fn load_fails_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = data::load(dir.path().join("absent.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("failed to open data file"));
}

#[test]
fn load_fails_on_missing_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Type,Distance_km").unwrap();
    writeln!(file, "2023-01-03,Running,5.0").unwrap();
    file.flush().unwrap();

    let err = data::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Time_h"));
}

// ---------------------------------------------------------------------------
// Grouping and labels
// ---------------------------------------------------------------------------

#[test]
fn january_running_sums_two_records() {
    let (_file, dataset) = load_workouts();
    let filter = Filter::all().activity(ActivityType::Running).year(2023);
    let mut rows = aggregate(&dataset.records, &filter, &[GroupField::Month], DistanceRounding::Standard);
    label_rows(&mut rows, TimeLabelStyle::Clock);

    assert_eq!(rows.len(), 1);
    let january = &rows[0];
    assert_eq!(january.key, GroupKey::month(1));
    assert_eq!(january.distance_km, 8.0);
    assert_eq!(january.time_h, 0.75);
    assert_eq!(january.count, 2);
    assert_eq!(january.calories, 650);
    assert_eq!(january.avg_speed, 11.0);
    assert_eq!(january.time_spent.as_deref(), Some("0:45'"));
}

#[test]
fn cycling_rounds_to_whole_kilometers_on_year_views() {
    let (_file, dataset) = load_workouts();
    let filter = Filter::all().activity(ActivityType::Cycling);

    let whole = aggregate(&dataset.records, &filter, &[GroupField::Year], DistanceRounding::WholeKmForCycling);
    let standard = aggregate(&dataset.records, &filter, &[GroupField::Year], DistanceRounding::Standard);

    assert_eq!(whole[0].distance_km, 31.0);
    assert_eq!(whole[1].distance_km, 40.0);
    assert_eq!(standard[0].distance_km, 30.6);
    assert_eq!(standard[1].distance_km, 40.4);
}

#[test]
fn verbose_labels_always_show_minutes() {
    let (_file, dataset) = load_workouts();
    let mut rows = aggregate(
        &dataset.records,
        &Filter::all().activity(ActivityType::Running),
        &[GroupField::Year],
        DistanceRounding::Standard,
    );
    label_rows(&mut rows, TimeLabelStyle::Verbose);

    let labels: Vec<_> = rows.iter().map(|r| r.time_spent.clone()).collect();
    assert_eq!(labels, vec![Some("1h 0m".to_string()), Some("0h 45m".to_string())]);
}

// ---------------------------------------------------------------------------
// Gaps, shares and colors
// ---------------------------------------------------------------------------

#[test]
fn gap_filling_yields_twelve_months() {
    let (_file, dataset) = load_workouts();
    let filter = Filter::all().activity(ActivityType::Running).year(2023);
    let rows = aggregate(&dataset.records, &filter, &[GroupField::Month], DistanceRounding::Standard);
    let filled = fill_gaps(rows, &months());

    assert_eq!(filled.len(), 12);
    assert_eq!(filled.iter().filter(|r| !r.is_gap()).count(), 1);
    let months_seen: Vec<u32> = filled.iter().filter_map(|r| r.key.month).collect();
    assert_eq!(months_seen, (1..=12).collect::<Vec<_>>());
    assert!(filled[1..].iter().all(|r| r.color.is_none() && r.time_spent.is_none()));
}

#[test]
fn activity_by_year_grid_is_complete() {
    let (_file, dataset) = load_workouts();
    let activities = dataset.activities();
    let years = dataset.years();
    let rows = aggregate(
        &dataset.records,
        &Filter::all(),
        &[GroupField::Activity, GroupField::Year],
        DistanceRounding::Standard,
    );
    let filled = fill_gaps(rows, &key_range(&activities, &years, false));

    assert_eq!(filled.len(), 9);
    assert_eq!(filled.iter().filter(|r| r.is_gap()).count(), 4);
}

#[test]
fn shares_of_one_year_sum_to_one_hundred() {
    let (_file, dataset) = load_workouts();
    let mut rows = aggregate(
        &dataset.records,
        &Filter::all().year(2023),
        &[GroupField::Activity],
        DistanceRounding::Standard,
    );
    apply_time_shares(&mut rows);

    let shares: Vec<f64> = rows.iter().filter_map(|r| r.share_pct).collect();
    assert_eq!(shares, vec![72.73, 27.27]);
    assert!((shares.iter().sum::<f64>() - 100.0).abs() < 0.02);
    assert_eq!(percentages(&[0.0, 0.0]), vec![0.0, 0.0]);
}

#[test]
fn rank_colors_mark_the_extremes() {
    let (_file, dataset) = load_workouts();
    let mut rows = aggregate(
        &dataset.records,
        &Filter::all(),
        &[GroupField::Year],
        DistanceRounding::Standard,
    );
    assign_rank_colors(&mut rows, Statistic::Distance, &RankColors::default());

    let colors: Vec<_> = rows.iter().map(|r| r.color.as_deref()).collect();
    // 2021: 30.6 km, 2022: 16 km, 2023: 48.4 km
    assert_eq!(colors, vec![Some("blue"), Some("green"), Some("red")]);
}
