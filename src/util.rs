//! Calendar-date formatting and arithmetic used by the message composers.

use chrono::{Datelike, NaiveDate};

/// Weekday labels, Sunday first.
pub const DEFAULT_DAY_LABELS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// `M/D` without zero padding (`9/8`).
pub fn format_md(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// `M/D(曜)`. Custom labels are used only when exactly seven are given.
pub fn format_md_weekday(date: NaiveDate, day_labels: &[String]) -> String {
    let idx = date.weekday().num_days_from_sunday() as usize;
    let label = if day_labels.len() == 7 {
        day_labels[idx].as_str()
    } else {
        DEFAULT_DAY_LABELS[idx]
    };
    format!("{}({})", format_md(date), label)
}

/// Whole days from `today` to `target`. Negative once `target` has passed.
pub fn signed_days_between(today: NaiveDate, target: NaiveDate) -> i64 {
    (target - today).num_days()
}

/// Resolve a year-less `M/D` to the date nearest `reference`.
///
/// Tries the reference year and its neighbours so `12/20` written for a
/// January event lands in the previous December.
pub fn resolve_month_day(month: u32, day: u32, reference: NaiveDate) -> Option<NaiveDate> {
    let year = reference.year();
    [year - 1, year, year + 1]
        .into_iter()
        .filter_map(|y| NaiveDate::from_ymd_opt(y, month, day))
        .min_by_key(|d| signed_days_between(reference, *d).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_format_md() {
        assert_eq!(format_md(d(2025, 9, 8)), "9/8");
        assert_eq!(format_md(d(2025, 12, 31)), "12/31");
    }

    #[test]
    fn test_format_md_weekday_default_labels() {
        // 2025-09-08 is a Monday
        assert_eq!(format_md_weekday(d(2025, 9, 8), &[]), "9/8(月)");
        assert_eq!(format_md_weekday(d(2025, 9, 7), &[]), "9/7(日)");
    }

    #[test]
    fn test_format_md_weekday_custom_labels() {
        let labels: Vec<String> = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(format_md_weekday(d(2025, 9, 8), &labels), "9/8(Mo)");

        let short = vec!["x".to_string()];
        assert_eq!(format_md_weekday(d(2025, 9, 8), &short), "9/8(月)");
    }

    #[test]
    fn test_signed_days_between() {
        assert_eq!(signed_days_between(d(2025, 9, 8), d(2025, 9, 8)), 0);
        assert_eq!(signed_days_between(d(2025, 9, 8), d(2025, 9, 9)), 1);
        assert_eq!(signed_days_between(d(2025, 9, 8), d(2025, 9, 7)), -1);
        assert_eq!(signed_days_between(d(2025, 12, 31), d(2026, 1, 2)), 2);
    }

    #[test]
    fn test_resolve_month_day() {
        assert_eq!(resolve_month_day(10, 10, d(2025, 10, 25)), Some(d(2025, 10, 10)));
        assert_eq!(resolve_month_day(12, 20, d(2026, 1, 10)), Some(d(2025, 12, 20)));
        assert_eq!(resolve_month_day(1, 5, d(2025, 12, 28)), Some(d(2026, 1, 5)));
        assert_eq!(resolve_month_day(2, 30, d(2025, 3, 1)), None);
    }
}
