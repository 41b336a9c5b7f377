//! Company domain model.
//!
//! # Responsibility
//! - Define the employer record tracked through the application process.
//! - Provide name validation and human summary rendering.
//!
//! # Invariants
//! - `name` is non-empty and unique case-insensitively (uniqueness is
//!   enforced by the repository, which has store access).
//! - `rejected`/`responded` are monotonic: status recording only ever
//!   sets them to `true`.

use crate::model::{format_created_day, now_epoch_ms};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a company.
pub type CompanyId = Uuid;

/// Validation failure for a company record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyValidationError {
    /// Name is empty or whitespace-only.
    EmptyName,
    /// Another company already uses this name (case-insensitively).
    DuplicateName(String),
}

impl Display for CompanyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "company name cannot be empty"),
            Self::DuplicateName(name) => {
                write!(f, "a company named `{name}` already exists")
            }
        }
    }
}

impl Error for CompanyValidationError {}

/// An employer being tracked through the application process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Stable global ID, preserved across backup export/import.
    pub id: CompanyId,
    pub name: String,
    /// Set once a rejection is recorded; never reset by status recording.
    pub rejected: bool,
    /// Set once a response event is recorded; never reset by status recording.
    pub responded: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Company {
    /// Creates a new company with a generated stable ID and now-timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rejected: false,
            responded: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks store-independent invariants.
    pub fn validate(&self) -> Result<(), CompanyValidationError> {
        if self.name.trim().is_empty() {
            return Err(CompanyValidationError::EmptyName);
        }
        Ok(())
    }

    /// One-line human summary, e.g. `Acme - rejected - Jan 05 (Monday)`.
    ///
    /// Flag markers are omitted when the flag is unset.
    pub fn summary(&self) -> String {
        let mut line = self.name.clone();
        if self.rejected {
            line.push_str(" - rejected");
        }
        if self.responded {
            line.push_str(" - responded");
        }
        line.push_str(" - ");
        line.push_str(&format_created_day(self.created_at));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::{Company, CompanyValidationError};

    #[test]
    fn new_company_starts_with_clear_flags() {
        let company = Company::new("Acme");
        assert!(!company.rejected);
        assert!(!company.responded);
        assert_eq!(company.created_at, company.updated_at);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let company = Company::new("   ");
        assert_eq!(
            company.validate(),
            Err(CompanyValidationError::EmptyName)
        );
    }

    #[test]
    fn summary_omits_unset_flag_markers() {
        let mut company = Company::new("Acme");
        assert!(!company.summary().contains("rejected"));
        company.rejected = true;
        assert!(company.summary().contains("- rejected"));
        assert!(!company.summary().contains("responded"));
    }
}
