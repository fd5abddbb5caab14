//! Scheduled announcement jobs.
//!
//! Wires the calendar, registration source and chat sink around the pure
//! extract → group → compose pipeline. Each job reads what it needs, composes
//! synchronously and sends only when there is something to say.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::calendar::extract::EventExtractor;
use crate::calendar::{CalendarError, CalendarProvider};
use crate::error::AnnounceError;
use crate::message::compose::{
    compose_club_practice, compose_external_practice, compose_location_guide, compose_matches,
};
use crate::message::deadline::{compose_classwise_deadlines, compose_external_practice_deadlines};
use crate::message::MessageOptions;
use crate::notification::{send_if_any, TextSink};
use crate::registration::RegistrationSource;
use crate::types::{ClubDirectory, Config, EventBatch, EventCategory};

pub const SEPARATOR: &str = "━━━━━━━━━━━━";
pub const DEFAULT_WEEKLY_TITLE: &str = "📅今週のお知らせ📅";

pub struct Announcer<'a> {
    config: &'a Config,
    directory: ClubDirectory,
    calendar: &'a dyn CalendarProvider,
    registrations: &'a dyn RegistrationSource,
    sink: &'a dyn TextSink,
    today: NaiveDate,
}

fn days_after(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

impl<'a> Announcer<'a> {
    pub fn new(
        config: &'a Config,
        calendar: &'a dyn CalendarProvider,
        registrations: &'a dyn RegistrationSource,
        sink: &'a dyn TextSink,
        today: NaiveDate,
    ) -> Self {
        Self {
            config,
            directory: config.directory(),
            calendar,
            registrations,
            sink,
            today,
        }
    }

    fn options(&self) -> MessageOptions {
        let mut options = MessageOptions::for_day(self.today);
        if let Some(labels) = &self.config.day_labels {
            options.day_labels = labels.clone();
        }
        options
    }

    /// Events of `category` starting in `[from, until)`. A category without a
    /// configured calendar contributes nothing.
    fn fetch(
        &self,
        category: EventCategory,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<EventBatch, AnnounceError> {
        let extractor = EventExtractor::new(&self.directory, &self.config.calendars);
        let start = from.and_time(NaiveTime::MIN);
        let end = until.and_time(NaiveTime::MIN);
        match extractor.fetch(self.calendar, category, start, end) {
            Ok(events) => Ok(EventBatch::from_events(events)),
            Err(CalendarError::NotConfigured(label)) => {
                log::warn!("No calendar configured for {}, skipping", label);
                Ok(EventBatch::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// External-practice and match deadlines falling in `[from, to]`.
    ///
    /// `label` names the window in the headers (`今週`, `明日`...). Empty when
    /// neither part has anything.
    pub fn deadline_message(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        label: &str,
    ) -> Result<String, AnnounceError> {
        let internal = self
            .fetch(EventCategory::InternalDeadline, from, days_after(to, 1))?
            .internal_deadlines;
        let external = compose_external_practice_deadlines(
            &internal,
            &self
                .options()
                .with_header(&format!("🔔{}の〆切(外部練)🔔", label)),
        );

        let registrations = self.registrations.registrations(from, to)?;
        let matches = compose_classwise_deadlines(
            &registrations,
            &self.directory,
            &self.options().with_header(&format!("🔔{}の〆切(大会)🔔", label)),
        );

        Ok([external, matches]
            .into_iter()
            .filter(|a| a.has_any)
            .map(|a| a.text)
            .collect::<Vec<_>>()
            .join("\n\n\n"))
    }

    pub fn announce_deadlines(
        &self,
        recipient: &str,
        from: NaiveDate,
        to: NaiveDate,
        label: &str,
    ) -> Result<bool, AnnounceError> {
        let text = self.deadline_message(from, to, label)?;
        Ok(send_if_any(self.sink, recipient, &text)?)
    }

    /// This week's practices with a venue guide, external practices, and
    /// matches in the next two weeks.
    pub fn weekly_message(&self) -> Result<String, AnnounceError> {
        let week_end = days_after(self.today, 7);
        let practices = self
            .fetch(EventCategory::ClubPractice, self.today, week_end)?
            .club_practices;
        let externals = self
            .fetch(EventCategory::ExternalPractice, self.today, week_end)?
            .external_practices;
        let matches = self
            .fetch(EventCategory::Match, self.today, days_after(self.today, 14))?
            .matches;

        if practices.is_empty() && externals.is_empty() && matches.is_empty() {
            return Ok(String::new());
        }

        let options = self.options();
        let title = self
            .config
            .weekly_title
            .as_deref()
            .unwrap_or(DEFAULT_WEEKLY_TITLE);
        let mut parts = vec![title.to_string()];

        if !practices.is_empty() {
            let practice_options = MessageOptions {
                show_person_in_charge: false,
                ..options.clone()
            };
            parts.push(compose_club_practice(&practices, &practice_options));
            parts.push(format!(
                "📍会場案内\n{}",
                compose_location_guide(&practices, &options)
            ));
        }
        if !externals.is_empty() {
            parts.push(format!(
                "{}\n{}",
                SEPARATOR,
                compose_external_practice(&externals, &options)
            ));
        }
        if !matches.is_empty() {
            parts.push(format!("{}\n{}", SEPARATOR, compose_matches(&matches, &options)));
        }
        if let Some(url) = self.config.calendar_url.as_deref().filter(|u| !u.is_empty()) {
            parts.push(format!("📆カレンダー\n{}", url));
        }

        Ok(parts.join("\n\n"))
    }

    pub fn announce_weekly(&self, recipient: &str) -> Result<bool, AnnounceError> {
        let text = self.weekly_message()?;
        let sent = send_if_any(self.sink, recipient, &text)?;
        if sent {
            if let Some(url) = self.config.weekly_image_url.as_deref() {
                self.sink.push_image(recipient, url, url)?;
            }
        }
        Ok(sent)
    }
}
