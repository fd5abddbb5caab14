//! File-backed calendar provider.
//!
//! Reads a calendar export shaped as
//! `{ "<calendarId>": [ { "title", "start", "end", "location", "description" } ] }`
//! with RFC 3339 or date-only times. Created events stay in memory.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{Days, NaiveDateTime};
use chrono_tz::Tz;
use serde::Deserialize;

use super::{
    parse_event_datetime, CalendarError, CalendarProvider, NewCalendarEvent, RawCalendarEvent,
};

#[derive(Debug, Deserialize)]
struct StoredEvent {
    title: String,
    start: String,
    #[serde(default)]
    end: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    description: String,
}

impl StoredEvent {
    fn into_raw(self, tz: Tz) -> Result<RawCalendarEvent, CalendarError> {
        let start = parse_event_datetime(&self.start, tz)
            .ok_or_else(|| CalendarError::InvalidTime(self.start.clone()))?;
        let end = if self.end.trim().is_empty() {
            start
        } else {
            parse_event_datetime(&self.end, tz)
                .ok_or_else(|| CalendarError::InvalidTime(self.end.clone()))?
        };
        Ok(RawCalendarEvent {
            title: self.title,
            start,
            end,
            location: self.location,
            description: self.description,
        })
    }
}

#[derive(Debug, Default)]
pub struct JsonCalendarProvider {
    calendars: HashMap<String, Vec<RawCalendarEvent>>,
}

impl JsonCalendarProvider {
    pub fn load(path: &Path, tz: Tz) -> Result<Self, CalendarError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content, tz)
    }

    pub fn from_json(json: &str, tz: Tz) -> Result<Self, CalendarError> {
        let stored: HashMap<String, Vec<StoredEvent>> = serde_json::from_str(json)?;
        let mut calendars = HashMap::new();
        for (id, events) in stored {
            let events = events
                .into_iter()
                .map(|e| e.into_raw(tz))
                .collect::<Result<Vec<_>, _>>()?;
            calendars.insert(id, events);
        }
        Ok(Self { calendars })
    }

    pub fn insert(&mut self, calendar_id: &str, event: RawCalendarEvent) {
        self.calendars
            .entry(calendar_id.to_string())
            .or_default()
            .push(event);
    }
}

impl CalendarProvider for JsonCalendarProvider {
    fn get_events(
        &self,
        calendar_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawCalendarEvent>, CalendarError> {
        let events = self
            .calendars
            .get(calendar_id)
            .ok_or_else(|| CalendarError::CalendarNotFound(calendar_id.to_string()))?;

        let mut found: Vec<RawCalendarEvent> = events
            .iter()
            .filter(|e| e.start >= start && e.start < end)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.start);
        Ok(found)
    }

    fn create_event(
        &mut self,
        calendar_id: &str,
        event: NewCalendarEvent,
    ) -> Result<(), CalendarError> {
        let start = event.date.and_time(chrono::NaiveTime::MIN);
        let end = event
            .date
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .ok_or_else(|| CalendarError::InvalidTime(event.date.to_string()))?;

        log::info!("Creating event {:?} on {}", event.title, calendar_id);
        self.insert(
            calendar_id,
            RawCalendarEvent {
                title: event.title,
                start,
                end,
                location: event.location,
                description: event.description,
            },
        );
        Ok(())
    }
}
