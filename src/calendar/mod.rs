//! Calendar access and event-title interpretation.
//!
//! Modules:
//! - extract: per-category title grammars → typed `DomainEvent`s
//! - group: bucketing by class / day, chronological ordering
//! - draft: canonical titles for newly registered external practices
//! - json_file: file-backed `CalendarProvider` used by the CLI and tests

pub mod draft;
pub mod extract;
pub mod group;
pub mod json_file;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::Serialize;

// ============================================================================
// Provider port
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),
    #[error("No calendar configured for {0}")]
    NotConfigured(&'static str),
    #[error("Invalid event time: {0}")]
    InvalidTime(String),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Provider error: {0}")]
    Provider(String),
}

impl CalendarError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CalendarError::Provider(_))
    }
}

/// A calendar entry as the provider hands it over. Times are wall-clock in
/// the club's zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawCalendarEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
    pub description: String,
}

/// All-day entry to be written to a calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: String,
}

/// Read/write access to the club's calendars.
pub trait CalendarProvider {
    /// Events starting in `[start, end)`.
    fn get_events(
        &self,
        calendar_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawCalendarEvent>, CalendarError>;

    fn create_event(
        &mut self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> Result<(), CalendarError>;
}

/// Parse an event time into wall-clock time in `tz`.
///
/// RFC 3339 values are converted; values without an offset are taken as
/// already local; date-only values (all-day events) become midnight.
pub fn parse_event_datetime(s: &str, tz: Tz) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains('T') {
        DateTime::parse_from_rfc3339(&s.replace('Z', "+00:00"))
            .or_else(|_| DateTime::parse_from_rfc3339(s))
            .map(|dt| dt.with_timezone(&tz).naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .ok()
    } else {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}
