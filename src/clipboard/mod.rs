use arboard::Clipboard;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::errors::{ListingError, Result};
use crate::wire::{ListingOutputs, OutputField};

/// How long a field shows as "copied" after a successful copy.
pub const COPY_FEEDBACK: Duration = Duration::from_millis(1500);

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard backed by arboard.
pub struct ArboardClipboard {
    clipboard: Clipboard,
}

impl ArboardClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().map_err(|e| ListingError::Clipboard(e.to_string()))?;
        Ok(Self { clipboard })
    }
}

impl ClipboardWriter for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text)
            .map_err(|e| ListingError::Clipboard(e.to_string()))
    }
}

/// Per-field "copied" flags that expire on their own.
#[derive(Debug, Default)]
pub struct CopyIndicator {
    copied_at: HashMap<OutputField, Instant>,
}

impl CopyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, field: OutputField, now: Instant) {
        self.copied_at.insert(field, now);
    }

    pub fn is_active(&self, field: OutputField, now: Instant) -> bool {
        self.copied_at
            .get(&field)
            .is_some_and(|at| now.saturating_duration_since(*at) < COPY_FEEDBACK)
    }

    /// Drops expired flags.
    pub fn sweep(&mut self, now: Instant) {
        self.copied_at
            .retain(|_, at| now.saturating_duration_since(*at) < COPY_FEEDBACK);
    }
}

/// Copies one output field and lights its indicator on success.
pub fn copy_field<W: ClipboardWriter + ?Sized>(
    writer: &mut W,
    indicator: &mut CopyIndicator,
    outputs: &ListingOutputs,
    field: OutputField,
) -> Result<()> {
    writer.write_text(outputs.get(field))?;
    indicator.mark(field, Instant::now());
    tracing::debug!(field = field.as_str(), "copied to clipboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingClipboard {
        last: Option<String>,
        fail: bool,
    }

    impl ClipboardWriter for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                return Err(ListingError::Clipboard("denied".into()));
            }
            self.last = Some(text.to_string());
            Ok(())
        }
    }

    fn outputs() -> ListingOutputs {
        ListingOutputs { social: "Just listed!".into(), ..Default::default() }
    }

    #[test]
    fn copy_marks_indicator_for_that_field_only() {
        let mut clip = RecordingClipboard::default();
        let mut ind = CopyIndicator::new();
        copy_field(&mut clip, &mut ind, &outputs(), OutputField::Social).unwrap();
        assert_eq!(clip.last.as_deref(), Some("Just listed!"));
        let now = Instant::now();
        assert!(ind.is_active(OutputField::Social, now));
        assert!(!ind.is_active(OutputField::Mls, now));
    }

    #[test]
    fn indicator_clears_after_feedback_window() {
        let mut ind = CopyIndicator::new();
        let t0 = Instant::now();
        ind.mark(OutputField::Email, t0);
        assert!(ind.is_active(OutputField::Email, t0 + Duration::from_millis(1499)));
        assert!(!ind.is_active(OutputField::Email, t0 + COPY_FEEDBACK));
        ind.sweep(t0 + Duration::from_secs(2));
        assert!(ind.copied_at.is_empty());
    }

    #[test]
    fn failed_copy_reports_error_and_stays_dark() {
        let mut clip = RecordingClipboard { fail: true, ..Default::default() };
        let mut ind = CopyIndicator::new();
        let err = copy_field(&mut clip, &mut ind, &outputs(), OutputField::Social).unwrap_err();
        assert_eq!(err, ListingError::Clipboard("denied".into()));
        assert!(!ind.is_active(OutputField::Social, Instant::now()));
    }
}
