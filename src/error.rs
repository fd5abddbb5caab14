//! Error types for configuration loading and announcement jobs.
//!
//! The parsing and composing core never fails: unrecognized input is dropped
//! or kept raw. Errors only come from the collaborators around it.

use std::path::PathBuf;
use thiserror::Error;

use crate::calendar::CalendarError;
use crate::notification::NotifyError;
use crate::registration::RegistrationError;

/// Errors reading or validating ~/.clubnotify/config.json
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDirectory,

    #[error("Config file not found at {0}")]
    NotFound(PathBuf),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown time zone: {0}")]
    InvalidTimezone(String),

    #[error("dayLabels must list 7 weekdays, got {0}")]
    InvalidDayLabels(usize),

    #[error("Location {0} needs buildingName and shortBuildingName")]
    IncompleteLocation(String),
}

/// Errors from a scheduled announcement job.
#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("Calendar: {0}")]
    Calendar(#[from] CalendarError),

    #[error("Registrations: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Delivery: {0}")]
    Notify(#[from] NotifyError),
}

impl AnnounceError {
    /// Returns true if rerunning the job later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AnnounceError::Calendar(e) => e.is_retryable(),
            AnnounceError::Registration(_) => false,
            AnnounceError::Notify(e) => e.is_retryable(),
        }
    }
}
