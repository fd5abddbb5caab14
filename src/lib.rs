//! Club calendar digests and registration deadline reminders.
//!
//! Hand-typed calendar titles are read into typed events
//! (`calendar::extract`), grouped and ordered (`calendar::group`) and
//! composed into chat messages (`message`). `announcer` runs the scheduled
//! jobs against the calendar, registration and chat collaborators.

pub mod announcer;
pub mod calendar;
pub mod classes;
pub mod error;
pub mod helpers;
pub mod message;
pub mod notification;
pub mod registration;
pub mod state;
pub mod types;
pub mod util;
