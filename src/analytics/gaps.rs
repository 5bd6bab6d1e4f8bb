//! Zero rows for periods and categories without records, so bar charts
//! keep a continuous category axis.

use std::collections::BTreeMap;

use super::{AggregateRow, GroupKey};
use crate::data::ActivityType;

/// Return exactly one row per expected key, ascending by key.
///
/// Existing rows are kept as they are; missing keys get a
/// [`AggregateRow::zero`] row. Rows whose key is not expected are dropped.
pub fn fill_gaps(rows: Vec<AggregateRow>, expected: &[GroupKey]) -> Vec<AggregateRow> {
    let mut by_key: BTreeMap<GroupKey, AggregateRow> =
        rows.into_iter().map(|row| (row.key.clone(), row)).collect();

    let mut keys = expected.to_vec();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .map(|key| by_key.remove(&key).unwrap_or_else(|| AggregateRow::zero(key)))
        .collect()
}

/// Cartesian product of the given dimensions. An empty `activities` or
/// `years` slice leaves that dimension ungrouped; `with_months` adds all
/// twelve months.
pub fn key_range(activities: &[ActivityType], years: &[i32], with_months: bool) -> Vec<GroupKey> {
    let activity_values: Vec<Option<ActivityType>> = if activities.is_empty() {
        vec![None]
    } else {
        activities.iter().cloned().map(Some).collect()
    };
    let year_values: Vec<Option<i32>> = if years.is_empty() {
        vec![None]
    } else {
        years.iter().copied().map(Some).collect()
    };
    let month_values: Vec<Option<u32>> = if with_months {
        (1..=12).map(Some).collect()
    } else {
        vec![None]
    };

    let mut keys = Vec::new();
    for activity in &activity_values {
        for year in &year_values {
            for month in &month_values {
                keys.push(GroupKey {
                    activity: activity.clone(),
                    year: *year,
                    month: *month,
                });
            }
        }
    }
    keys
}

/// The twelve month keys of a single-year view.
pub fn months() -> Vec<GroupKey> {
    key_range(&[], &[], true)
}

/// Every year from `first` to `last` inclusive.
pub fn year_span(first: i32, last: i32) -> Vec<i32> {
    (first..=last).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn active(key: GroupKey, km: f64) -> AggregateRow {
        let mut row = AggregateRow::zero(key);
        row.count = 1;
        row.distance_km = km;
        row.time_spent = Some("1".to_string());
        row
    }

    #[test]
    fn fills_all_twelve_months() {
        let rows = vec![active(GroupKey::month(3), 4.0), active(GroupKey::month(11), 2.0)];
        let filled = fill_gaps(rows, &months());

        assert_eq!(filled.len(), 12);
        let order: Vec<u32> = filled.iter().map(|r| r.key.month.unwrap()).collect();
        assert_eq!(order, (1..=12).collect::<Vec<_>>());
        assert_eq!(filled[2].distance_km, 4.0);
        assert_eq!(filled[10].distance_km, 2.0);
        assert!(filled[0].is_gap());
        assert_eq!(filled[0].time_spent, None);
        assert_eq!(filled[0].color, None);
    }

    #[test]
    fn empty_input_becomes_all_zero_rows() {
        let filled = fill_gaps(Vec::new(), &months());
        assert_eq!(filled.len(), 12);
        assert!(filled.iter().all(|r| r.is_gap() && r.distance_km == 0.0));
    }

    #[test]
    fn two_year_comparison_range() {
        let expected = key_range(&[], &[2022, 2021], true);
        let rows = vec![active(GroupKey::year(2022).with_month(6), 1.0)];
        let filled = fill_gaps(rows, &expected);

        assert_eq!(filled.len(), 24);
        assert_eq!(filled[0].key, GroupKey::year(2021).with_month(1));
        assert_eq!(filled[17].key, GroupKey::year(2022).with_month(6));
        assert!(!filled[17].is_gap());
    }

    #[test]
    fn unexpected_rows_are_dropped() {
        let rows = vec![active(GroupKey::year(1999), 1.0), active(GroupKey::year(2020), 1.0)];
        let filled = fill_gaps(rows, &key_range(&[], &year_span(2020, 2021), false));
        let years: Vec<_> = filled.iter().map(|r| r.key.year.unwrap()).collect();
        assert_eq!(years, [2020, 2021]);
    }

    #[test]
    fn activity_by_year_product() {
        let keys = key_range(&[ActivityType::Running, ActivityType::Cycling], &[2020, 2021], false);
        assert_eq!(keys.len(), 4);
        assert!(keys.iter().all(|k| k.month.is_none()));
    }
}
