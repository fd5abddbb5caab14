//! Match registration rows per class.
//!
//! The sheet export itself is produced elsewhere; this module only defines the
//! port and a JSON-backed adapter (`{ "A": [Registration, ...], ... }`).

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::types::{ClassTable, Registration};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Registration source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies per-class registrations whose deadline falls in a window.
pub trait RegistrationSource {
    /// Rows with `from <= deadline <= to`, for every class that has any.
    fn registrations(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ClassTable<Vec<Registration>>, RegistrationError>;
}

/// In-memory registrations, typically loaded from a JSON export.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistrations {
    table: ClassTable<Vec<Registration>>,
}

impl StaticRegistrations {
    pub fn new(table: ClassTable<Vec<Registration>>) -> Self {
        Self { table }
    }

    pub fn load(path: &Path) -> Result<Self, RegistrationError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&content)?))
    }
}

impl RegistrationSource for StaticRegistrations {
    fn registrations(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ClassTable<Vec<Registration>>, RegistrationError> {
        let mut out = ClassTable::new();
        for (class, rows) in &self.table {
            let due: Vec<Registration> = rows
                .iter()
                .filter(|r| r.deadline >= from && r.deadline <= to)
                .cloned()
                .collect();
            if !due.is_empty() {
                out.insert(*class, due);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::OrdinalClass;
    use std::io::Write;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    const EXPORT: &str = r#"{
        "B": [
            { "title": "府中大会", "eventDate": "2025-10-12", "deadline": "2025-09-20" },
            { "title": "全国選手権", "eventDate": "2025-11-01", "deadline": "2025-10-01" }
        ],
        "E": [
            { "title": "府中大会", "eventDate": "2025-10-12", "deadline": "2025-09-18",
              "participants": { "undecided": ["伊藤"] } }
        ]
    }"#;

    #[test]
    fn test_deadline_window_is_inclusive() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();
        let source = StaticRegistrations::load(file.path()).unwrap();

        let due = source.registrations(date(9, 18), date(9, 20)).unwrap();
        assert_eq!(due.len(), 2);
        assert_eq!(due[&OrdinalClass::B].len(), 1);
        assert_eq!(due[&OrdinalClass::B][0].title, "府中大会");
        assert_eq!(due[&OrdinalClass::E][0].participants.undecided, vec!["伊藤"]);
    }

    #[test]
    fn test_classes_without_rows_are_omitted() {
        let source = StaticRegistrations::new(serde_json::from_str(EXPORT).unwrap());
        let due = source.registrations(date(9, 25), date(10, 5)).unwrap();
        assert_eq!(due.keys().copied().collect::<Vec<_>>(), vec![OrdinalClass::B]);
    }

    #[test]
    fn test_invalid_export() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"Z\": []}").unwrap();
        assert!(matches!(
            StaticRegistrations::load(file.path()),
            Err(RegistrationError::Json(_))
        ));
    }
}
