//! Per-page [`BarView`] descriptions: filters, groupings, colors and texts.

use super::{BarView, ChartKind};
use crate::analytics::colors::{ColorPolicy, Entity};
use crate::analytics::gaps::{key_range, months, year_span};
use crate::analytics::labels::TimeLabelStyle;
use crate::analytics::{DistanceRounding, Filter, GroupField, Statistic};
use crate::data::{ActivityType, Dataset};

/// Title, y-axis label pair.
type Texts = (String, String);

/// Texts shared by the single-activity pages. `scope` is appended to
/// distance and count titles, e.g. "per Year".
fn activity_texts(activity: &ActivityType, statistic: Statistic, prefix: &str, scope: &str) -> Texts {
    let counter = activity.counter_name();
    match statistic {
        Statistic::Time => (
            format!("{prefix}Time Spent {activity}"),
            "Hours".to_string(),
        ),
        Statistic::Distance => (
            format!(
                "{prefix}Number of Kilometers {} {scope}",
                activity.distance_verb()
            ),
            "Kilometers".to_string(),
        ),
        Statistic::Count => (format!("{prefix}{counter} {scope}"), counter.to_string()),
    }
}

/// Totals per year. Every year between the first and last recorded year
/// of `activity` gets a bar.
pub fn yearly(dataset: &Dataset, activity: ActivityType, statistic: Statistic) -> BarView {
    let years = dataset.years_for(&activity);
    let expected = match (years.first(), years.last()) {
        (Some(first), Some(last)) => key_range(&[], &year_span(*first, *last), false),
        _ => Vec::new(),
    };

    let (title, y_axis_label) = match statistic {
        Statistic::Time => (
            format!("Amount of Time Spent {activity}"),
            "Hours".to_string(),
        ),
        _ => activity_texts(&activity, statistic, "", "per Year"),
    };

    BarView {
        name: "yearly",
        kind: ChartKind::Bar,
        filter: Filter::all().activity(activity.clone()),
        group_by: vec![GroupField::Year],
        expected,
        rounding: DistanceRounding::WholeKmForCycling,
        label_style: TimeLabelStyle::Clock,
        colors: ColorPolicy::Rank(statistic),
        statistic,
        counter_name: activity.counter_name().to_string(),
        title,
        subtitle: None,
        x_axis_label: "Year".to_string(),
        y_axis_label,
    }
}

/// Totals per month of `year`. Always twelve bars.
pub fn monthly(activity: ActivityType, statistic: Statistic, year: i32) -> BarView {
    let (title, y_axis_label) = match statistic {
        Statistic::Time => (
            format!("Amount of Time Spent {activity} in {year}"),
            "Hours".to_string(),
        ),
        _ => activity_texts(&activity, statistic, "", &format!("per Month in {year}")),
    };

    BarView {
        name: "monthly",
        kind: ChartKind::Bar,
        filter: Filter::all().activity(activity.clone()).year(year),
        group_by: vec![GroupField::Month],
        expected: months(),
        rounding: DistanceRounding::Standard,
        label_style: TimeLabelStyle::Clock,
        colors: ColorPolicy::Rank(statistic),
        statistic,
        counter_name: activity.counter_name().to_string(),
        title,
        subtitle: None,
        x_axis_label: "Month".to_string(),
        y_axis_label,
    }
}

/// Two years of one activity, twelve months each.
pub fn year_comparison(activity: ActivityType, statistic: Statistic, base: i32, comparison: i32) -> BarView {
    let (title, y_axis_label) =
        activity_texts(&activity, statistic, "Comparison of the ", "per Month");

    BarView {
        name: "year-comparison",
        kind: ChartKind::GroupedBar,
        filter: Filter::all()
            .activity(activity.clone())
            .years(vec![base, comparison]),
        group_by: vec![GroupField::Year, GroupField::Month],
        expected: key_range(&[], &[base, comparison], true),
        rounding: DistanceRounding::WholeKmForCycling,
        label_style: TimeLabelStyle::Verbose,
        colors: ColorPolicy::BaseComparison { base: Entity::Year(base) },
        statistic,
        counter_name: activity.counter_name().to_string(),
        title,
        subtitle: Some(format!("between {base} and {comparison}")),
        x_axis_label: "Month".to_string(),
        y_axis_label,
    }
}

/// Two activities within one year, twelve months each.
pub fn activity_comparison(
    year: i32,
    statistic: Statistic,
    base: ActivityType,
    comparison: ActivityType,
) -> BarView {
    let (title, y_axis_label) = match statistic {
        Statistic::Time => (
            format!("Comparison of the Time Spent in {year}"),
            "Hours".to_string(),
        ),
        Statistic::Distance => (
            format!("Comparison of the Distance Covered in {year} per Month"),
            "Kilometers".to_string(),
        ),
        Statistic::Count => (
            format!("Comparison of the Number of Activities in {year} per Month"),
            "Number of Activities".to_string(),
        ),
    };
    let subtitle = Some(format!("between {base} and {comparison}"));

    BarView {
        name: "activity-comparison",
        kind: ChartKind::GroupedBar,
        filter: Filter::all()
            .year(year)
            .activities(vec![base.clone(), comparison.clone()]),
        group_by: vec![GroupField::Activity, GroupField::Month],
        expected: key_range(&[base.clone(), comparison], &[], true),
        rounding: DistanceRounding::Standard,
        label_style: TimeLabelStyle::Verbose,
        colors: ColorPolicy::BaseComparison { base: Entity::Activity(base) },
        statistic,
        counter_name: "Number of activities".to_string(),
        title,
        subtitle,
        x_axis_label: "Month".to_string(),
        y_axis_label,
    }
}

/// Upper bound on the recent-years span.
pub const MAX_RECENT_YEARS: u32 = 50;

/// The last `span` years up to `latest`, twelve months each. `span` is
/// clamped to `1..=MAX_RECENT_YEARS`.
pub fn recent_years(activity: ActivityType, statistic: Statistic, latest: i32, span: u32) -> BarView {
    let span = span.clamp(1, MAX_RECENT_YEARS);
    let earliest = latest.saturating_sub(span as i32 - 1);
    let years = year_span(earliest, latest);
    let (title, y_axis_label) =
        activity_texts(&activity, statistic, "Evolution of the ", "per Month");

    BarView {
        name: "recent",
        kind: ChartKind::GroupedBar,
        filter: Filter::all().activity(activity.clone()).since(earliest),
        group_by: vec![GroupField::Year, GroupField::Month],
        expected: key_range(&[], &years, true),
        rounding: DistanceRounding::Standard,
        label_style: TimeLabelStyle::Verbose,
        colors: ColorPolicy::YearSpan { earliest, latest },
        statistic,
        counter_name: activity.counter_name().to_string(),
        title,
        subtitle: Some(format!("During the Last {span} Years")),
        x_axis_label: "Month".to_string(),
        y_axis_label,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yearly_titles_follow_statistic() {
        let ds = Dataset::default();
        assert_eq!(
            yearly(&ds, ActivityType::Walking, Statistic::Distance).title,
            "Number of Kilometers Walked per Year"
        );
        assert_eq!(
            yearly(&ds, ActivityType::Running, Statistic::Count).title,
            "Number of runs per Year"
        );
        let view = yearly(&ds, ActivityType::Cycling, Statistic::Time);
        assert_eq!(view.title, "Amount of Time Spent Cycling");
        assert_eq!(view.y_axis_label, "Hours");
        assert!(view.expected.is_empty());
    }

    #[test]
    fn monthly_titles_name_the_year() {
        assert_eq!(
            monthly(ActivityType::Cycling, Statistic::Distance, 2021).title,
            "Number of Kilometers Cycled per Month in 2021"
        );
        assert_eq!(
            monthly(ActivityType::Running, Statistic::Time, 2021).title,
            "Amount of Time Spent Running in 2021"
        );
        assert_eq!(monthly(ActivityType::Running, Statistic::Count, 2021).expected.len(), 12);
    }

    #[test]
    fn comparison_pages_have_subtitles() {
        let view = year_comparison(ActivityType::Running, Statistic::Count, 2021, 2023);
        assert_eq!(view.title, "Comparison of the Number of runs per Month");
        assert_eq!(view.subtitle.as_deref(), Some("between 2021 and 2023"));
        assert_eq!(view.expected.len(), 24);

        let view = activity_comparison(2022, Statistic::Time, ActivityType::Running, ActivityType::Walking);
        assert_eq!(view.title, "Comparison of the Time Spent in 2022");
        assert_eq!(view.subtitle.as_deref(), Some("between Running and Walking"));
    }

    #[test]
    fn recent_years_spans_back_from_latest() {
        let view = recent_years(ActivityType::Running, Statistic::Distance, 2023, 3);
        assert_eq!(view.filter, Filter::all().activity(ActivityType::Running).since(2021));
        assert_eq!(view.expected.len(), 36);
        assert_eq!(view.colors, ColorPolicy::YearSpan { earliest: 2021, latest: 2023 });
        assert_eq!(view.subtitle.as_deref(), Some("During the Last 3 Years"));
        assert_eq!(view.title, "Evolution of the Number of Kilometers Run per Month");
    }

    #[test]
    fn recent_years_span_is_bounded() {
        for span in [MAX_RECENT_YEARS + 1, 2_147_483_648, 3_000_000_000, u32::MAX] {
            let view = recent_years(ActivityType::Running, Statistic::Count, 2023, span);
            assert_eq!(view.expected.len(), 12 * MAX_RECENT_YEARS as usize);
            assert!(view.expected.iter().all(|k| k.year.is_some()));
            assert_eq!(view.filter, Filter::all().activity(ActivityType::Running).since(1974));
            assert_eq!(view.subtitle.as_deref(), Some("During the Last 50 Years"));
        }

        let view = recent_years(ActivityType::Running, Statistic::Count, 2023, 0);
        assert_eq!(view.expected.len(), 12);
        assert_eq!(view.colors, ColorPolicy::YearSpan { earliest: 2023, latest: 2023 });
    }

    #[test]
    fn recent_years_near_the_minimum_year_saturates() {
        let view = recent_years(ActivityType::Running, Statistic::Count, i32::MIN + 2, 10);
        assert!(view.expected.iter().all(|k| k.year.is_some()));
        assert_eq!(view.expected.len(), 36);
    }
}
