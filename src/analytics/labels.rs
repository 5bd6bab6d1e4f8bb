//! Display strings for durations and numbers.

use super::AggregateRow;

/// The two duration label layouts in use across the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLabelStyle {
    /// `"1:30'"`, `"0:05'"`, or just `"2"` when the minutes are zero.
    Clock,
    /// `"1h 30m"`, always with both parts, minutes never padded.
    Verbose,
}

impl TimeLabelStyle {
    pub fn format(self, hours: f64) -> String {
        match self {
            Self::Clock => clock_label(hours),
            Self::Verbose => verbose_label(hours),
        }
    }
}

/// Split decimal hours into whole hours and rounded minutes.
///
/// Minutes round half-to-even; a result of 60 carries into the hour.
fn split_hours(hours: f64) -> (u64, u64) {
    let hours = hours.max(0.0);
    let mut whole = hours.trunc() as u64;
    let mut minutes = ((hours - whole as f64) * 60.0).round_ties_even() as u64;
    if minutes >= 60 {
        whole += 1;
        minutes -= 60;
    }
    (whole, minutes)
}

pub fn clock_label(hours: f64) -> String {
    match split_hours(hours) {
        (whole, 0) => whole.to_string(),
        (whole, minutes) => format!("{whole}:{minutes:02}'"),
    }
}

pub fn verbose_label(hours: f64) -> String {
    let (whole, minutes) = split_hours(hours);
    format!("{whole}h {minutes}m")
}

/// Attach a time label to every non-gap row.
pub fn label_rows(rows: &mut [AggregateRow], style: TimeLabelStyle) {
    for row in rows.iter_mut().filter(|r| !r.is_gap()) {
        row.time_spent = Some(style.format(row.time_h));
    }
}

/// Format a number with comma thousands separators and fixed decimals,
/// e.g. `12345.678` with 2 decimals becomes `"12,345.68"`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let mut result: String = grouped.chars().rev().collect();

    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }
    if value < 0.0 && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        result.insert(0, '-');
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
