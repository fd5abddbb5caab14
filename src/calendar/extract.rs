//! Title grammars for each calendar.
//!
//! Club members type event titles by hand, so each calendar has a loose
//! grammar:
//!
//! | Calendar | Example title |
//! |---|---|
//! | club practice | `岸町.基本1300-1830E以上(久下、伊藤)※持ち物あり` |
//! | external practice | `千葉練0900-1600 E以上:10/10〆` |
//! | match | `全国選手権CDE` |
//! | internal deadline | `〆E|府中大会` |
//!
//! Each category is one [`EventTypeConfig`] record (pattern + builder).
//! A title that does not fit is not an error: it simply is not an event of
//! that category, and is skipped with a debug log.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::{Captures, Regex};

use super::{CalendarError, CalendarProvider, RawCalendarEvent};
use crate::classes::{parse_lenient, parse_strict, ClassLabel, ClassSet};
use crate::helpers::{first_segment, html_to_plain_text, strip_bracket_symbols};
use crate::types::{
    CalendarIds, ClubDirectory, ClubPracticeEvent, DomainEvent, EventCategory,
    ExternalPracticeEvent, InternalDeadlineEvent, MatchEvent,
};
use crate::util::resolve_month_day;

/// Marker in internal-deadline titles that refer to an external practice.
pub const EXTERNAL_PRACTICE_MARKER: &str = "外部";

// Compile-once regex patterns via OnceLock.
fn re_club_practice() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<head>.+?)(?P<time>[0-9]{3,4}-[0-9]{3,4})(?P<classes>[^(（]*)[(（](?P<persons>[^)）]*)[)）](?P<notes>.*)$",
        )
        .unwrap()
    })
}

fn re_external_practice() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<title>.+?)(?P<time>[0-9]{3,4}-[0-9]{3,4})\s*(?P<classes>[^:：]+)[:：](?P<payload>.*)$",
        )
        .unwrap()
    })
}

fn re_match() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<title>.+?)(?P<classes>[A-G]+)?$").unwrap())
}

fn re_internal_deadline() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^〆(?P<classes>[A-G]+)[|｜](?P<title>.+)$").unwrap())
}

fn re_month_day() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]{1,2})/([0-9]{1,2})").unwrap())
}

// ============================================================================
// Registry
// ============================================================================

type Builder = fn(&Captures<'_>, &RawCalendarEvent, &ClubDirectory) -> Option<DomainEvent>;

/// How one calendar's titles are read.
pub struct EventTypeConfig {
    pub category: EventCategory,
    /// Calendar the category is read from.
    pub source_id: String,
    pattern: fn() -> &'static Regex,
    build: Builder,
}

impl EventTypeConfig {
    pub fn pattern(&self) -> &'static Regex {
        (self.pattern)()
    }
}

/// Turns raw calendar entries into [`DomainEvent`]s.
pub struct EventExtractor<'a> {
    directory: &'a ClubDirectory,
    registry: Vec<EventTypeConfig>,
}

impl<'a> EventExtractor<'a> {
    pub fn new(directory: &'a ClubDirectory, calendars: &CalendarIds) -> Self {
        let registry = vec![
            EventTypeConfig {
                category: EventCategory::ClubPractice,
                source_id: calendars.club_practice.clone(),
                pattern: re_club_practice,
                build: build_club_practice,
            },
            EventTypeConfig {
                category: EventCategory::ExternalPractice,
                source_id: calendars.external_practice.clone(),
                pattern: re_external_practice,
                build: build_external_practice,
            },
            EventTypeConfig {
                category: EventCategory::Match,
                source_id: calendars.matches.clone(),
                pattern: re_match,
                build: build_match,
            },
            EventTypeConfig {
                category: EventCategory::InternalDeadline,
                source_id: calendars.internal_deadline.clone(),
                pattern: re_internal_deadline,
                build: build_internal_deadline,
            },
        ];
        Self {
            directory,
            registry,
        }
    }

    pub fn config(&self, category: EventCategory) -> Option<&EventTypeConfig> {
        self.registry.iter().find(|c| c.category == category)
    }

    /// Read one entry as `category`. `None` means the title does not fit.
    pub fn extract(&self, category: EventCategory, raw: &RawCalendarEvent) -> Option<DomainEvent> {
        let config = self.config(category)?;
        let title = raw.title.trim();

        let Some(caps) = config.pattern().captures(title) else {
            log::debug!("Skipping {} entry {:?}: title does not match", category.label(), title);
            return None;
        };

        let event = (config.build)(&caps, raw, self.directory);
        if event.is_none() {
            log::debug!("Skipping {} entry {:?}: incomplete fields", category.label(), title);
        }
        event
    }

    pub fn extract_all(&self, category: EventCategory, raws: &[RawCalendarEvent]) -> Vec<DomainEvent> {
        raws.iter()
            .filter_map(|raw| self.extract(category, raw))
            .collect()
    }

    /// Read `category`'s calendar over `[start, end)`.
    pub fn fetch(
        &self,
        provider: &dyn CalendarProvider,
        category: EventCategory,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<DomainEvent>, CalendarError> {
        let source_id = self
            .config(category)
            .map(|c| c.source_id.as_str())
            .filter(|id| !id.is_empty())
            .ok_or(CalendarError::NotConfigured(category.label()))?;

        let raws = provider.get_events(source_id, start, end)?;
        let events = self.extract_all(category, &raws);
        log::debug!(
            "{}: {} of {} entries recognized",
            category.label(),
            events.len(),
            raws.len()
        );
        Ok(events)
    }
}

// ============================================================================
// Builders
// ============================================================================

fn build_club_practice(
    caps: &Captures<'_>,
    raw: &RawCalendarEvent,
    directory: &ClubDirectory,
) -> Option<DomainEvent> {
    let head = caps["head"].trim();

    // `<code>.<type>` or the code glued to the type (`岸町基本`)
    let (location, practice_type) = match head.split_once(|c: char| c == '.' || c == '．') {
        Some((code, kind)) => (directory.location(&strip_bracket_symbols(code))?, kind),
        None => directory.location_prefix(head)?,
    };

    let notes = &caps["notes"];
    let (notes, classes) = match caps["classes"].trim() {
        "" => match split_trailing_classes(notes) {
            Some((text, label)) => (text, label),
            None => (notes, ClassLabel::Set(ClassSet::all())),
        },
        expr => (notes, parse_lenient(expr)),
    };

    Some(DomainEvent::ClubPractice(ClubPracticeEvent {
        date: raw.start,
        location: location.clone(),
        practice_type: strip_bracket_symbols(practice_type),
        time_range: caps["time"].to_string(),
        classes,
        person_in_charge: strip_bracket_symbols(&caps["persons"]),
        description: strip_bracket_symbols(notes),
    }))
}

/// `※notes|E以上` → (`※notes`, A..E). A bar followed by anything other
/// than a class expression is part of the notes.
fn split_trailing_classes(notes: &str) -> Option<(&str, ClassLabel)> {
    let (text, expr) = notes.rsplit_once(|c: char| c == '|' || c == '｜')?;
    match parse_lenient(expr.trim()) {
        label @ ClassLabel::Set(_) if !label.is_empty() => Some((text, label)),
        _ => None,
    }
}

fn build_external_practice(
    caps: &Captures<'_>,
    raw: &RawCalendarEvent,
    _directory: &ClubDirectory,
) -> Option<DomainEvent> {
    let title = caps["title"].trim();
    if title.is_empty() {
        return None;
    }

    let deadline = re_month_day().captures(&caps["payload"]).and_then(|md| {
        let month = md[1].parse().ok()?;
        let day = md[2].parse().ok()?;
        resolve_month_day(month, day, raw.start.date())
    });

    Some(DomainEvent::ExternalPractice(ExternalPracticeEvent {
        date: raw.start,
        title: title.to_string(),
        time_range: caps["time"].to_string(),
        classes: parse_lenient(caps["classes"].trim()),
        location: first_segment(&raw.location),
        description: html_to_plain_text(&raw.description),
        deadline,
    }))
}

fn build_match(
    caps: &Captures<'_>,
    raw: &RawCalendarEvent,
    _directory: &ClubDirectory,
) -> Option<DomainEvent> {
    let title = caps["title"].trim();
    if title.is_empty() {
        return None;
    }
    let classes = caps
        .name("classes")
        .map(|m| parse_lenient(m.as_str()))
        .unwrap_or_default();

    Some(DomainEvent::Match(MatchEvent {
        date: raw.start,
        title: title.to_string(),
        classes,
        location: first_segment(&raw.location),
    }))
}

fn build_internal_deadline(
    caps: &Captures<'_>,
    raw: &RawCalendarEvent,
    _directory: &ClubDirectory,
) -> Option<DomainEvent> {
    let title = caps["title"].trim();
    if title.is_empty() {
        return None;
    }

    Some(DomainEvent::InternalDeadline(InternalDeadlineEvent {
        date: raw.start,
        title: title.to_string(),
        classes: ClassLabel::Set(parse_strict(&caps["classes"])),
        is_external_practice_deadline: title.contains(EXTERNAL_PRACTICE_MARKER),
    }))
}
