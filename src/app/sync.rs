use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{
    domain::{Component, EnvelopeValidator},
    io::{DocumentFormat, parse_document_str, serialize_value},
};

/// Why a text draft could not replace the working copy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("draft is not valid {format}: {message}")]
    Syntax {
        format: DocumentFormat,
        message: String,
    },
    #[error("draft is not a component: {}", .0.join("; "))]
    Shape(Vec<String>),
    #[error("draft could not be decoded: {0}")]
    Decode(String),
}

/// Text view of the working copy with a debounced write-back.
///
/// The buffer is authoritative for display while text mode is on. Edits only
/// reach the working copy once the debounce deadline passes (or on flush), and
/// only if the whole draft parses into a component.
#[derive(Debug, Clone)]
pub struct TextSync {
    format: DocumentFormat,
    active_format: DocumentFormat,
    debounce: Duration,
    buffer: String,
    deadline: Option<Instant>,
    last_error: Option<DraftError>,
}

impl TextSync {
    pub fn new(format: DocumentFormat, debounce: Duration) -> Self {
        Self {
            format,
            active_format: format,
            debounce,
            buffer: String::new(),
            deadline: None,
            last_error: None,
        }
    }

    /// Re-render the buffer from `component`, dropping any pending draft.
    ///
    /// Falls back to JSON when the configured format cannot represent the
    /// component (TOML has no `null`).
    pub fn reset(&mut self, component: &Component) {
        self.deadline = None;
        self.last_error = None;
        match render(component, self.format) {
            Ok(text) => {
                self.active_format = self.format;
                self.buffer = text;
            }
            Err(err) => {
                warn!(format = %self.format, error = %err, "falling back to JSON text view");
                self.active_format = DocumentFormat::Json;
                self.buffer = render(component, DocumentFormat::Json).unwrap_or_default();
            }
        }
    }

    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        self.buffer = text.into();
        self.deadline = Some(now + self.debounce);
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn format(&self) -> DocumentFormat {
        self.active_format
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    pub fn last_error(&self) -> Option<&DraftError> {
        self.last_error.as_ref()
    }

    /// Parse the pending draft, if any. `None` means nothing was pending.
    ///
    /// A failure is recorded as the last draft error and logged; the buffer
    /// is kept so the user can keep typing.
    pub fn take_pending(&mut self) -> Option<Result<Component, DraftError>> {
        self.deadline.take()?;
        let parsed = parse_draft(&self.buffer, self.active_format);
        match &parsed {
            Ok(_) => {
                debug!("text draft accepted");
                self.last_error = None;
            }
            Err(err) => {
                warn!(error = %err, "text draft rejected");
                self.last_error = Some(err.clone());
            }
        }
        Some(parsed)
    }
}

/// Pretty text rendering of `component` in `format`.
pub fn render(component: &Component, format: DocumentFormat) -> anyhow::Result<String> {
    let value = serde_json::to_value(component)?;
    serialize_value(&value, format, true)
}

/// Parse, check against the envelope schema, then decode.
pub fn parse_draft(text: &str, format: DocumentFormat) -> Result<Component, DraftError> {
    let value = parse_document_str(text, format).map_err(|err| DraftError::Syntax {
        format,
        message: format!("{err:#}"),
    })?;
    decode_component(value)
}

/// Check an already parsed document against the envelope schema and decode it.
pub fn decode_component(value: Value) -> Result<Component, DraftError> {
    if let Some(validator) = EnvelopeValidator::shared()
        && !validator.is_valid(&value)
    {
        return Err(DraftError::Shape(validator.violations(&value)));
    }
    serde_json::from_value(value).map_err(|err| DraftError::Decode(err.to_string()))
}
