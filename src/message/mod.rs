//! Chat message composition.
//!
//! Modules:
//! - builder: line buffer with section/bullet/indent primitives
//! - compose: calendar digests (club practice, external practice, matches)
//! - deadline: registration deadline reminders

pub mod builder;
pub mod compose;
pub mod deadline;

use chrono::NaiveDate;
use serde::Serialize;

use crate::util::DEFAULT_DAY_LABELS;

pub use builder::MessageBuilder;

pub const CLUB_PRACTICE_HEADER: &str = "🔵練習のお知らせ🔵";
pub const EXTERNAL_PRACTICE_HEADER: &str = "🟠外部練習のお知らせ🟠";
pub const MATCH_HEADER: &str = "🟢近日大会のお知らせ🟢";
pub const MATCH_DEADLINE_HEADER: &str = "🔔近日の〆切(大会)🔔";
pub const EXTERNAL_PRACTICE_DEADLINE_HEADER: &str = "🔔近日の〆切(外部練)🔔";
pub const EVENTWISE_DEADLINE_HEADER: &str = "🧑‍💻〆切(大会別)🧑‍💻";

/// Display switches shared by every composer.
#[derive(Debug, Clone)]
pub struct MessageOptions {
    /// Replaces the composer's default header.
    pub header: Option<String>,
    pub bullet: String,
    pub show_target_classes: bool,
    pub show_person_in_charge: bool,
    pub show_description: bool,
    pub show_attending: bool,
    /// Weekday labels, Sunday first. Any length other than 7 uses the defaults.
    pub day_labels: Vec<String>,
    /// Reference day for deadline countdowns.
    pub today: NaiveDate,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            header: None,
            bullet: "・".to_string(),
            show_target_classes: true,
            show_person_in_charge: true,
            show_description: true,
            show_attending: true,
            day_labels: DEFAULT_DAY_LABELS.iter().map(|s| s.to_string()).collect(),
            today: chrono::Local::now().date_naive(),
        }
    }
}

impl MessageOptions {
    pub fn for_day(today: NaiveDate) -> Self {
        Self {
            today,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn header_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.header.as_deref().unwrap_or(default)
    }
}

/// Composed text plus whether there was anything to report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub has_any: bool,
    pub text: String,
}

impl Announcement {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_text(text: String) -> Self {
        Self {
            has_any: !text.is_empty(),
            text,
        }
    }
}

/// Countdown tag for a deadline `days` away (negative once passed).
pub fn deadline_tag(days: i64) -> String {
    match days {
        0 => "本日〆切".to_string(),
        d if d > 0 => format!("〆切まであと{}日", d),
        d => format!("期限超過{}日", -d),
    }
}
