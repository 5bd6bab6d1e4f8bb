use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::{ActivityRecord, ActivityType, Dataset};

/// Columns every input file must carry. `Year` and `Month` are optional and
/// derived from `Date` when absent; `Hours`, `Minutes` and `Seconds` are
/// ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Date",
    "Type",
    "Distance_km",
    "Time_h",
    "Calories",
    "ElevGain_m",
    "AvgSpeed_km/h",
];

/// Date layouts accepted in the `Date` column, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    activity: String,
    #[serde(rename = "Distance_km")]
    distance_km: f64,
    #[serde(rename = "Time_h")]
    time_h: f64,
    #[serde(rename = "Calories")]
    calories: f64,
    #[serde(rename = "ElevGain_m")]
    elev_gain_m: f64,
    #[serde(rename = "AvgSpeed_km/h")]
    avg_speed_kmh: f64,
    #[serde(rename = "Year", default)]
    year: Option<i32>,
    #[serde(rename = "Month", default)]
    month: Option<u32>,
}

/// Read the whole workout file at `path`.
///
/// A missing or malformed file is fatal; there is no partial load.
pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open data file {}", path.display()))?;
    from_reader(file).with_context(|| format!("failed to read data file {}", path.display()))
}

/// Parse workout records from any CSV source.
pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().context("missing header row")?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("missing required column(s): {}", missing.join(", "));
    }

    let mut records = Vec::new();
    for (idx, row) in csv_reader.deserialize::<RawRecord>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let raw = row.with_context(|| format!("malformed row at line {line}"))?;
        let record = convert(raw).with_context(|| format!("invalid row at line {line}"))?;
        records.push(record);
    }

    Ok(Dataset::new(records))
}

fn convert(raw: RawRecord) -> Result<ActivityRecord> {
    let date = parse_date(&raw.date)?;
    let year = raw.year.unwrap_or_else(|| date.year());
    let month = raw.month.unwrap_or_else(|| date.month());

    if !(1..=12).contains(&month) {
        bail!("month out of range: {month}");
    }
    if raw.activity.is_empty() {
        bail!("empty activity type");
    }
    if raw.distance_km < 0.0 || raw.time_h < 0.0 || raw.avg_speed_kmh < 0.0 {
        bail!("negative distance, duration or speed");
    }

    Ok(ActivityRecord {
        date,
        activity: ActivityType::parse(&raw.activity),
        distance_km: raw.distance_km,
        time_h: raw.time_h,
        calories: raw.calories.round() as i64,
        elev_gain_m: raw.elev_gain_m,
        avg_speed_kmh: raw.avg_speed_kmh,
        year,
        month,
    })
}

/// Parse a calendar date, ignoring any time-of-day suffix.
fn parse_date(value: &str) -> Result<NaiveDate> {
    let day_part = value.split([' ', 'T']).next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day_part, fmt).ok())
        .with_context(|| format!("unparseable date: '{value}'"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        ",Date,Type,Distance_km,Hours,Minutes,Seconds,Time_h,Calories,ElevGain_m,AvgSpeed_km/h,Year,Month\n";

    #[test]
    fn parses_full_rows_and_ignores_extra_columns() {
        let csv = format!(
            "{HEADER}0,2023-01-05,Running,5.0,0,30,0,0.5,350,42.0,10.0,2023,1\n\
             1,2023-01-09,Cycling,20.5,1,0,0,1.0,600,120.5,20.5,2023,1\n"
        );
        let ds = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(ds.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.activity, ActivityType::Running);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
        assert_eq!(first.calories, 350);
        assert_eq!(first.year, 2023);
        assert_eq!(first.month, 1);
        assert_eq!(ds.records[1].activity, ActivityType::Cycling);
    }

    #[test]
    fn derives_year_and_month_from_date() {
        let csv = "Date,Type,Distance_km,Time_h,Calories,ElevGain_m,AvgSpeed_km/h\n\
                   2021-07-14 08:30:00,Walking,4.2,1.1,210,15,3.8\n";
        let ds = from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].year, 2021);
        assert_eq!(ds.records[0].month, 7);
    }

    #[test]
    fn accepts_day_first_dates() {
        assert_eq!(
            parse_date("14/07/2021").unwrap(),
            NaiveDate::from_ymd_opt(2021, 7, 14).unwrap()
        );
    }

    #[test]
    fn rejects_missing_columns() {
        let csv = "Date,Type,Distance_km\n2023-01-01,Running,5\n";
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Time_h"));
    }

    #[test]
    fn rejects_bad_dates_with_line_number() {
        let csv = format!("{HEADER}0,not-a-date,Running,5.0,0,30,0,0.5,350,42.0,10.0,2023,1\n");
        let err = from_reader(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_out_of_range_month() {
        let csv = format!("{HEADER}0,2023-01-05,Running,5.0,0,30,0,0.5,350,42.0,10.0,2023,13\n");
        assert!(from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load("/definitely/not/here/rwc.csv").unwrap_err();
        assert!(err.to_string().contains("failed to open data file"));
    }
}
