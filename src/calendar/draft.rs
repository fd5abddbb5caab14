//! Writing external practices back to the calendar.
//!
//! Titles are produced in the same shape the extractor reads
//! (`<title><HHMM>-<HHMM> <classes>:<M/D>〆`), so a practice registered from
//! the chat shows up in the next digest like a hand-typed one.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::{CalendarError, CalendarProvider, NewCalendarEvent};
use crate::classes::{ClassSet, ALL_CLASSES_LABEL, AT_LEAST_SUFFIX};
use crate::util::format_md;

fn re_time_range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{3,4}-[0-9]{3,4}$").unwrap())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPracticeDraft {
    pub title: String,
    pub date: NaiveDate,
    /// `HHMM-HHMM`
    pub time_range: String,
    pub classes: ClassSet,
    pub deadline: Option<NaiveDate>,
    pub location: String,
    pub description: String,
}

/// Shortest descriptor for a class set: `D以上` for A..=D, else the letters.
fn class_descriptor(classes: &ClassSet) -> String {
    if classes.is_empty() || classes.is_all() {
        return ALL_CLASSES_LABEL.to_string();
    }
    match classes.iter().last() {
        Some(weakest) if classes.len() > 1 && *classes == ClassSet::through(weakest) => {
            format!("{}{}", weakest, AT_LEAST_SUFFIX)
        }
        _ => classes.to_string(),
    }
}

impl ExternalPracticeDraft {
    /// Calendar title for this practice.
    pub fn summary(&self) -> String {
        let deadline = self
            .deadline
            .map(|d| format!("{}〆", format_md(d)))
            .unwrap_or_default();
        format!(
            "{}{} {}:{}",
            self.title.trim(),
            self.time_range.trim(),
            class_descriptor(&self.classes),
            deadline
        )
    }

    /// Create the all-day entry on `calendar_id`.
    pub fn submit(
        &self,
        provider: &mut dyn CalendarProvider,
        calendar_id: &str,
    ) -> Result<(), CalendarError> {
        if !re_time_range().is_match(self.time_range.trim()) {
            return Err(CalendarError::InvalidTime(self.time_range.clone()));
        }
        provider.create_event(
            calendar_id,
            NewCalendarEvent {
                title: self.summary(),
                date: self.date,
                location: self.location.clone(),
                description: self.description.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::extract::EventExtractor;
    use crate::calendar::json_file::JsonCalendarProvider;
    use crate::classes::{parse_strict, OrdinalClass};
    use crate::types::{CalendarIds, ClubDirectory, DomainEvent, EventCategory};

    fn draft() -> ExternalPracticeDraft {
        ExternalPracticeDraft {
            title: "千葉練".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, 25).unwrap(),
            time_range: "0900-1600".to_string(),
            classes: ClassSet::through(OrdinalClass::E),
            deadline: NaiveDate::from_ymd_opt(2025, 10, 10),
            location: "千葉公民館".to_string(),
            description: "外部練習です".to_string(),
        }
    }

    #[test]
    fn test_summary() {
        assert_eq!(draft().summary(), "千葉練0900-1600 E以上:10/10〆");

        let mut d = draft();
        d.classes = parse_strict("DF");
        d.deadline = None;
        assert_eq!(d.summary(), "千葉練0900-1600 DF:");

        d.classes = ClassSet::empty();
        assert_eq!(d.summary(), "千葉練0900-1600 全級:");
    }

    #[test]
    fn test_submit_is_read_back_by_extractor() {
        let mut provider = JsonCalendarProvider::default();
        draft().submit(&mut provider, "ex@group").unwrap();

        let directory = ClubDirectory::default();
        let calendars = CalendarIds {
            external_practice: "ex@group".to_string(),
            ..Default::default()
        };
        let extractor = EventExtractor::new(&directory, &calendars);
        let start = draft().date.and_hms_opt(0, 0, 0).unwrap();
        let events = extractor
            .fetch(
                &provider,
                EventCategory::ExternalPractice,
                start,
                start + chrono::Duration::days(1),
            )
            .unwrap();

        let [DomainEvent::ExternalPractice(e)] = events.as_slice() else {
            panic!("expected one external practice, got {:?}", events);
        };
        assert_eq!(e.title, "千葉練");
        assert_eq!(e.classes.to_class_set(), ClassSet::through(OrdinalClass::E));
        assert_eq!(e.deadline, NaiveDate::from_ymd_opt(2025, 10, 10));
    }

    #[test]
    fn test_submit_rejects_bad_time_range() {
        let mut provider = JsonCalendarProvider::default();
        let mut d = draft();
        d.time_range = "朝から".to_string();
        assert!(matches!(
            d.submit(&mut provider, "ex@group"),
            Err(CalendarError::InvalidTime(_))
        ));
    }
}
