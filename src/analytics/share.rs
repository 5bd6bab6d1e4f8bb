//! Percentage share of total duration within a period.

use std::f64::consts::TAU;

use super::{AggregateRow, round_to};

/// Each value's percentage of the sum of `values`.
///
/// Returns all zeros when the total is zero, so an all-zero period renders
/// instead of dividing by zero.
pub fn percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / total * 100.0).collect()
}

/// Set `share_pct` on every non-gap row from its share of the rows' summed
/// duration, rounded to two decimals. Gap rows keep `None`.
pub fn apply_time_shares(rows: &mut [AggregateRow]) {
    let times: Vec<f64> = rows.iter().map(|r| r.time_h).collect();
    for (row, pct) in rows.iter_mut().zip(percentages(&times)) {
        if !row.is_gap() {
            row.share_pct = Some(round_to(pct, 2));
        }
    }
}

/// Convert a percentage into a pie wedge angle in radians.
pub fn wedge_angle(pct: f64) -> f64 {
    pct / 100.0 * TAU
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::GroupKey;
    use crate::data::ActivityType;

    #[test]
    fn shares_of_three_categories() {
        let shares: Vec<f64> = percentages(&[10.0, 20.0, 30.0])
            .into_iter()
            .map(|p| round_to(p, 2))
            .collect();
        assert_eq!(shares, [16.67, 33.33, 50.0]);
        let sum: f64 = shares.iter().sum();
        assert!((sum - 100.0).abs() <= 0.01);
    }

    #[test]
    fn zero_total_yields_zero_shares() {
        assert_eq!(percentages(&[0.0, 0.0]), [0.0, 0.0]);
        assert!(percentages(&[]).is_empty());
    }

    #[test]
    fn apply_time_shares_skips_gap_rows() {
        let mut rows: Vec<_> = [(ActivityType::Cycling, 1.0), (ActivityType::Running, 3.0)]
            .into_iter()
            .map(|(a, t)| {
                let mut row = AggregateRow::zero(GroupKey::activity(a));
                row.count = 1;
                row.time_h = t;
                row
            })
            .collect();
        rows.push(AggregateRow::zero(GroupKey::activity(ActivityType::Walking)));

        apply_time_shares(&mut rows);
        let shares: Vec<_> = rows.iter().map(|r| r.share_pct).collect();
        assert_eq!(shares, [Some(25.0), Some(75.0), None]);
    }

    #[test]
    fn full_share_is_a_full_turn() {
        assert!((wedge_angle(100.0) - TAU).abs() < 1e-12);
        assert!((wedge_angle(25.0) - TAU / 4.0).abs() < 1e-12);
    }
}
