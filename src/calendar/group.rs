//! Bucketing and ordering of recognized events.
//!
//! Everything here borrows: the same event may sit in several class buckets,
//! and callers cannot mutate it while grouped.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::classes::OrdinalClass;
use crate::types::{ClassTable, Scheduled};

fn re_start_time() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?P<h>[0-9]{1,2}):(?P<m>[0-9]{2})|(?P<hhmm>[0-9]{3,4})|(?P<hour>[0-9]{1,2})")
            .unwrap()
    })
}

/// Minutes after midnight of the first time in a range.
///
/// Reads `9:30-12:00`, `0930-1200`, `930-1200` and `9-12`.
/// `None` when the text has no digits.
pub fn start_minutes(time_range: &str) -> Option<u32> {
    let caps = re_start_time().captures(time_range)?;

    if let (Some(h), Some(m)) = (caps.name("h"), caps.name("m")) {
        return Some(h.as_str().parse::<u32>().ok()? * 60 + m.as_str().parse::<u32>().ok()?);
    }
    if let Some(hhmm) = caps.name("hhmm") {
        let digits = hhmm.as_str();
        let (h, m) = digits.split_at(digits.len() - 2);
        return Some(h.parse::<u32>().ok()? * 60 + m.parse::<u32>().ok()?);
    }
    let hour = caps.name("hour")?;
    Some(hour.as_str().parse::<u32>().ok()? * 60)
}

fn sort_key<T: Scheduled>(event: &T) -> (chrono::NaiveDateTime, u32) {
    let minutes = event
        .time_range()
        .and_then(start_minutes)
        .unwrap_or(u32::MAX);
    (event.starts_at(), minutes)
}

/// Events ordered by date, then by the start of their time range.
///
/// Stable: entries with equal keys keep their input order. Unreadable time
/// ranges sort after readable ones on the same date.
pub fn sort_chronological<T: Scheduled>(events: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = events.iter().collect();
    sorted.sort_by_key(|e| sort_key(*e));
    sorted
}

/// One bucket per class (empty buckets included).
///
/// An event targeting several classes appears in each of their buckets.
pub fn group_by_class<T: Scheduled>(events: &[T]) -> ClassTable<Vec<&T>> {
    let mut table: ClassTable<Vec<&T>> = OrdinalClass::ALL
        .into_iter()
        .map(|class| (class, Vec::new()))
        .collect();

    for event in events {
        for class in event.classes().to_class_set().iter() {
            table.entry(class).or_default().push(event);
        }
    }
    table
}

/// Events keyed by calendar day, in input order within each day.
pub fn group_by_calendar_day<T: Scheduled>(events: &[T]) -> BTreeMap<NaiveDate, Vec<&T>> {
    let mut days: BTreeMap<NaiveDate, Vec<&T>> = BTreeMap::new();
    for event in events {
        days.entry(event.starts_at().date()).or_default().push(event);
    }
    days
}
