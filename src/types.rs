use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::classes::{ClassLabel, OrdinalClass};
use crate::error::ConfigError;
use crate::util::DEFAULT_DAY_LABELS;

/// Per-class table. Iterates strongest class first.
pub type ClassTable<T> = BTreeMap<OrdinalClass, T>;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration stored in ~/.clubnotify/config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// IANA zone the club's calendars are read in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub calendars: CalendarIds,
    /// Short location code (as typed in practice titles) → venue.
    #[serde(default)]
    pub locations: HashMap<String, PracticeLocation>,
    /// Match-registration form per class.
    #[serde(default)]
    pub registration_urls: BTreeMap<OrdinalClass, String>,
    /// Emoji prefix per class. Missing classes use the built-in palette.
    #[serde(default)]
    pub class_colors: BTreeMap<OrdinalClass, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_title: Option<String>,
    /// Image pushed after the weekly digest (e.g. a month calendar).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_image_url: Option<String>,
    /// Weekday labels, Sunday first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_labels: Option<Vec<String>>,
}

/// Source calendar per event category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarIds {
    #[serde(default)]
    pub club_practice: String,
    #[serde(default)]
    pub external_practice: String,
    #[serde(default)]
    pub matches: String,
    #[serde(default)]
    pub internal_deadline: String,
}

fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}

impl Config {
    /// Parsed time zone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tz()?;

        if let Some(labels) = &self.day_labels {
            if labels.len() != DEFAULT_DAY_LABELS.len() {
                return Err(ConfigError::InvalidDayLabels(labels.len()));
            }
        }

        for (code, location) in &self.locations {
            if location.building_name.trim().is_empty()
                || location.short_building_name.trim().is_empty()
            {
                return Err(ConfigError::IncompleteLocation(code.clone()));
            }
        }

        Ok(())
    }

    /// Read-only lookup tables handed to the extractor and composers.
    pub fn directory(&self) -> ClubDirectory {
        ClubDirectory {
            locations: self.locations.clone(),
            registration_urls: self.registration_urls.clone(),
            class_colors: self.class_colors.clone(),
        }
    }
}

/// A practice venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeLocation {
    #[serde(default)]
    pub club_name: String,
    #[serde(default)]
    pub map_url: String,
    pub building_name: String,
    pub short_building_name: String,
}

/// Fallback class palette, strongest first.
pub const DEFAULT_CLASS_COLORS: [&str; 7] = ["🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "🟫"];

/// Static club data: venues, registration forms, class colors.
///
/// Built once from [`Config`] and borrowed by everything downstream.
#[derive(Debug, Clone, Default)]
pub struct ClubDirectory {
    locations: HashMap<String, PracticeLocation>,
    registration_urls: BTreeMap<OrdinalClass, String>,
    class_colors: BTreeMap<OrdinalClass, String>,
}

impl ClubDirectory {
    pub fn with_location(mut self, code: &str, location: PracticeLocation) -> Self {
        self.locations.insert(code.to_string(), location);
        self
    }

    pub fn with_registration_url(mut self, class: OrdinalClass, url: &str) -> Self {
        self.registration_urls.insert(class, url.to_string());
        self
    }

    pub fn with_class_color(mut self, class: OrdinalClass, color: &str) -> Self {
        self.class_colors.insert(class, color.to_string());
        self
    }

    pub fn location(&self, code: &str) -> Option<&PracticeLocation> {
        self.locations.get(code.trim())
    }

    /// Longest location code that prefixes `head`, with the text after it.
    pub fn location_prefix<'h>(&self, head: &'h str) -> Option<(&PracticeLocation, &'h str)> {
        self.locations
            .iter()
            .filter(|(code, _)| !code.is_empty() && head.starts_with(code.as_str()))
            .max_by_key(|(code, _)| code.len())
            .map(|(code, location)| (location, &head[code.len()..]))
    }

    pub fn registration_url(&self, class: OrdinalClass) -> Option<&str> {
        self.registration_urls
            .get(&class)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn class_color(&self, class: OrdinalClass) -> &str {
        match self.class_colors.get(&class) {
            Some(color) => color,
            None => DEFAULT_CLASS_COLORS[class as usize],
        }
    }
}

// ============================================================================
// Domain events
// ============================================================================

/// Which calendar an event came from, and therefore how its title reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    ClubPractice,
    ExternalPractice,
    Match,
    InternalDeadline,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::ClubPractice,
        EventCategory::ExternalPractice,
        EventCategory::Match,
        EventCategory::InternalDeadline,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ClubPractice => "club_practice",
            Self::ExternalPractice => "external_practice",
            Self::Match => "match",
            Self::InternalDeadline => "internal_deadline",
        }
    }
}

/// Regular practice run by the club, e.g. `岸町.基本1300-1830(久下、伊藤)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubPracticeEvent {
    pub date: NaiveDateTime,
    pub location: PracticeLocation,
    pub practice_type: String,
    pub time_range: String,
    pub classes: ClassLabel,
    pub person_in_charge: String,
    pub description: String,
}

/// Practice hosted by another club, with a sign-up deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalPracticeEvent {
    pub date: NaiveDateTime,
    pub title: String,
    pub time_range: String,
    pub classes: ClassLabel,
    pub location: String,
    pub description: String,
    pub deadline: Option<NaiveDate>,
}

/// Tournament, e.g. `全国選手権CDE`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    pub date: NaiveDateTime,
    pub title: String,
    pub classes: ClassLabel,
    pub location: String,
}

/// Club-internal sign-up cutoff, e.g. `〆E|府中大会`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalDeadlineEvent {
    pub date: NaiveDateTime,
    pub title: String,
    pub classes: ClassLabel,
    pub is_external_practice_deadline: bool,
}

impl InternalDeadlineEvent {
    pub fn is_match_deadline(&self) -> bool {
        !self.is_external_practice_deadline
    }
}

/// A calendar entry whose title was recognized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum DomainEvent {
    ClubPractice(ClubPracticeEvent),
    ExternalPractice(ExternalPracticeEvent),
    Match(MatchEvent),
    InternalDeadline(InternalDeadlineEvent),
}

impl DomainEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            Self::ClubPractice(_) => EventCategory::ClubPractice,
            Self::ExternalPractice(_) => EventCategory::ExternalPractice,
            Self::Match(_) => EventCategory::Match,
            Self::InternalDeadline(_) => EventCategory::InternalDeadline,
        }
    }
}

/// Anything placed on the calendar that can be sorted and bucketed.
pub trait Scheduled {
    fn starts_at(&self) -> NaiveDateTime;

    /// Hand-typed time range (`1300-1830`), when the title carries one.
    fn time_range(&self) -> Option<&str> {
        None
    }

    fn classes(&self) -> &ClassLabel;
}

impl Scheduled for ClubPracticeEvent {
    fn starts_at(&self) -> NaiveDateTime {
        self.date
    }
    fn time_range(&self) -> Option<&str> {
        Some(&self.time_range)
    }
    fn classes(&self) -> &ClassLabel {
        &self.classes
    }
}

impl Scheduled for ExternalPracticeEvent {
    fn starts_at(&self) -> NaiveDateTime {
        self.date
    }
    fn time_range(&self) -> Option<&str> {
        Some(&self.time_range)
    }
    fn classes(&self) -> &ClassLabel {
        &self.classes
    }
}

impl Scheduled for MatchEvent {
    fn starts_at(&self) -> NaiveDateTime {
        self.date
    }
    fn classes(&self) -> &ClassLabel {
        &self.classes
    }
}

impl Scheduled for InternalDeadlineEvent {
    fn starts_at(&self) -> NaiveDateTime {
        self.date
    }
    fn classes(&self) -> &ClassLabel {
        &self.classes
    }
}

impl Scheduled for DomainEvent {
    fn starts_at(&self) -> NaiveDateTime {
        match self {
            Self::ClubPractice(e) => e.starts_at(),
            Self::ExternalPractice(e) => e.starts_at(),
            Self::Match(e) => e.starts_at(),
            Self::InternalDeadline(e) => e.starts_at(),
        }
    }

    fn time_range(&self) -> Option<&str> {
        match self {
            Self::ClubPractice(e) => e.time_range(),
            Self::ExternalPractice(e) => e.time_range(),
            Self::Match(e) => e.time_range(),
            Self::InternalDeadline(e) => e.time_range(),
        }
    }

    fn classes(&self) -> &ClassLabel {
        match self {
            Self::ClubPractice(e) => e.classes(),
            Self::ExternalPractice(e) => e.classes(),
            Self::Match(e) => e.classes(),
            Self::InternalDeadline(e) => e.classes(),
        }
    }
}

/// Recognized events split by category.
#[derive(Debug, Clone, Default)]
pub struct EventBatch {
    pub club_practices: Vec<ClubPracticeEvent>,
    pub external_practices: Vec<ExternalPracticeEvent>,
    pub matches: Vec<MatchEvent>,
    pub internal_deadlines: Vec<InternalDeadlineEvent>,
}

impl EventBatch {
    pub fn from_events(events: impl IntoIterator<Item = DomainEvent>) -> Self {
        let mut batch = Self::default();
        for event in events {
            match event {
                DomainEvent::ClubPractice(e) => batch.club_practices.push(e),
                DomainEvent::ExternalPractice(e) => batch.external_practices.push(e),
                DomainEvent::Match(e) => batch.matches.push(e),
                DomainEvent::InternalDeadline(e) => batch.internal_deadlines.push(e),
            }
        }
        batch
    }
}

// ============================================================================
// Registrations
// ============================================================================

/// One match in the per-class registration sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub title: String,
    pub event_date: NaiveDate,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub participants: Participants,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participants {
    #[serde(default)]
    pub attending: Vec<String>,
    #[serde(default)]
    pub not_attending: Vec<String>,
    #[serde(default)]
    pub undecided: Vec<String>,
}
