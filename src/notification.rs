//! Chat delivery.
//!
//! The messaging service is an external collaborator; announcement jobs only
//! see the [`TextSink`] trait. [`ConsoleSink`] prints to stdout for the CLI.

use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Messaging service unavailable: {0}")]
    Unavailable(String),
    #[error("Message rejected: {0}")]
    Rejected(String),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

impl NotifyError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotifyError::Unavailable(_))
    }
}

pub trait TextSink {
    fn push_text(&self, recipient: &str, text: &str) -> Result<(), NotifyError>;

    /// Push an image by URL (full size, then preview).
    fn push_image(
        &self,
        recipient: &str,
        original_url: &str,
        preview_url: &str,
    ) -> Result<(), NotifyError>;
}

/// Send `text` unless it is empty. Returns whether anything was sent.
pub fn send_if_any(sink: &dyn TextSink, recipient: &str, text: &str) -> Result<bool, NotifyError> {
    if text.trim().is_empty() {
        log::info!("Nothing to send to {}", recipient);
        return Ok(false);
    }
    sink.push_text(recipient, text)?;
    log::info!("Sent {} lines to {}", text.lines().count(), recipient);
    Ok(true)
}

/// Writes messages to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl TextSink for ConsoleSink {
    fn push_text(&self, recipient: &str, text: &str) -> Result<(), NotifyError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "--- to {} ---", recipient)?;
        writeln!(out, "{}", text)?;
        Ok(())
    }

    fn push_image(
        &self,
        recipient: &str,
        original_url: &str,
        _preview_url: &str,
    ) -> Result<(), NotifyError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "--- image to {} ---", recipient)?;
        writeln!(out, "{}", original_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<(String, String)>>,
    }

    impl TextSink for Recorder {
        fn push_text(&self, recipient: &str, text: &str) -> Result<(), NotifyError> {
            self.sent
                .borrow_mut()
                .push((recipient.to_string(), text.to_string()));
            Ok(())
        }

        fn push_image(&self, _: &str, _: &str, _: &str) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    #[test]
    fn test_send_if_any_skips_blank() {
        let sink = Recorder::default();
        assert!(!send_if_any(&sink, "group", "").unwrap());
        assert!(!send_if_any(&sink, "group", "  \n").unwrap());
        assert!(sink.sent.borrow().is_empty());
    }

    #[test]
    fn test_send_if_any_sends() {
        let sink = Recorder::default();
        assert!(send_if_any(&sink, "group", "🔵練習のお知らせ🔵").unwrap());
        assert_eq!(sink.sent.borrow()[0].0, "group");
    }

    #[test]
    fn test_retryable() {
        assert!(NotifyError::Unavailable("503".into()).is_retryable());
        assert!(!NotifyError::Rejected("too long".into()).is_retryable());
    }
}
