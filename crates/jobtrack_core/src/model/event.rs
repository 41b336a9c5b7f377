//! Event domain model.
//!
//! # Responsibility
//! - Define the dated interaction record owned by a company.
//!
//! # Invariants
//! - `company_id` references an existing company at creation time.
//! - `content` is non-empty.
//! - Events are created only through the status service, never directly
//!   by callers.

use crate::model::company::CompanyId;
use crate::model::{format_created_day, now_epoch_ms};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an event.
pub type EventId = Uuid;

/// Validation failure for an event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Content is empty or whitespace-only.
    EmptyContent,
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "event content cannot be empty"),
        }
    }
}

impl Error for EventValidationError {}

/// A dated interaction with one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable global ID, preserved across backup export/import.
    pub id: EventId,
    /// Owning company; every event belongs to exactly one.
    pub company_id: CompanyId,
    pub content: String,
    /// True when the event originated from the company, not the applicant.
    pub is_response: bool,
    /// True for a future appointment; cleared automatically on rejection.
    pub is_scheduled: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Event {
    /// Creates a new event with a generated stable ID and now-timestamps.
    pub fn new(company_id: CompanyId, content: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            company_id,
            content: content.into(),
            is_response: false,
            is_scheduled: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks store-independent invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.content.trim().is_empty() {
            return Err(EventValidationError::EmptyContent);
        }
        Ok(())
    }

    /// One-line human summary including the owning company's name.
    pub fn summary(&self, company_name: &str) -> String {
        let mut line = format!("{company_name} event #{}", self.id);
        if self.is_response {
            line.push_str(" - response");
        }
        if self.is_scheduled {
            line.push_str(" - scheduled");
        }
        line.push(' ');
        line.push_str(self.content.trim_end());
        line.push_str(" - ");
        line.push_str(&format_created_day(self.created_at));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, EventValidationError};
    use uuid::Uuid;

    #[test]
    fn validate_rejects_blank_content() {
        let event = Event::new(Uuid::new_v4(), "\n  ");
        assert_eq!(event.validate(), Err(EventValidationError::EmptyContent));
    }

    #[test]
    fn summary_includes_flag_markers_only_when_set() {
        let mut event = Event::new(Uuid::new_v4(), "phone screen");
        assert!(!event.summary("Acme").contains("- response"));
        event.is_response = true;
        event.is_scheduled = true;
        let line = event.summary("Acme");
        assert!(line.starts_with("Acme event #"));
        assert!(line.contains("- response"));
        assert!(line.contains("- scheduled"));
        assert!(line.contains("phone screen"));
    }
}
