//! Backup export/import subsystem.
//!
//! # Responsibility
//! - Serialize the full company/event dataset to a snapshot file.
//! - Merge a verbose snapshot back into the store idempotently.
//!
//! # Invariants
//! - Verbose snapshots carry every persisted field plus a `record_class`
//!   tag and the original identifier; they round-trip faithfully.
//! - Compact snapshots are human-readable summaries only and are not
//!   valid import sources.
//! - Import processes each record independently: one bad record is
//!   reported and skipped, never aborting the batch. Only a missing
//!   schema aborts, since no later record can succeed either.
//! - Importing the same snapshot twice creates no duplicates; records
//!   whose identifier already exists are skipped and reported.

use crate::repo::company_repo::{CompanyFilter, CompanyRepository};
use crate::repo::event_repo::EventRepository;
use crate::repo::RepoError;
use crate::{Company, Event};
use log::info;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Tag key marking each verbose snapshot record's entity kind.
pub const RECORD_CLASS_KEY: &str = "record_class";

/// Failure while exporting or importing a snapshot.
#[derive(Debug)]
pub enum BackupError {
    /// Persistence failure outside any single record.
    Repo(RepoError),
    /// Snapshot file could not be read or written.
    Io(std::io::Error),
    /// The snapshot as a whole is not a sequence of mappings.
    Snapshot(String),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "snapshot file error: {err}"),
            Self::Snapshot(message) => write!(f, "malformed snapshot: {message}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Snapshot(_) => None,
        }
    }
}

impl From<RepoError> for BackupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<std::io::Error> for BackupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(value: serde_json::Error) -> Self {
        Self::Snapshot(value.to_string())
    }
}

/// Result of a snapshot export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSummary {
    pub path: PathBuf,
    pub records: usize,
    pub verbose: bool,
}

/// Per-run accounting for a snapshot import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created_companies: usize,
    pub created_events: usize,
    /// Records whose identifier already existed in the store.
    pub skipped_existing: usize,
    /// Human-readable notes for records that could not be processed.
    pub malformed: Vec<String>,
    /// Company total after the run.
    pub company_count: i64,
    /// Event total after the run.
    pub event_count: i64,
}

/// Use-case service for snapshot export and idempotent import.
pub struct BackupService<C: CompanyRepository, E: EventRepository> {
    companies: C,
    events: E,
}

impl<C: CompanyRepository, E: EventRepository> BackupService<C, E> {
    pub fn new(companies: C, events: E) -> Self {
        Self { companies, events }
    }

    /// Writes a snapshot of every company and event to `path`.
    ///
    /// Verbose mode serializes full field sets plus `record_class` tags;
    /// compact mode writes human summary lines, omitting empty fields.
    pub fn export(&self, path: &Path, verbose: bool) -> Result<BackupSummary, BackupError> {
        let companies = self.companies.list(CompanyFilter::default())?;
        let mut records: Vec<Value> = Vec::new();

        if verbose {
            for company in &companies {
                records.push(tagged_record(company, "company")?);
            }
            for event in self.events.list_all()? {
                records.push(tagged_record(&event, "event")?);
            }
        } else {
            for company in &companies {
                let events = self.events.list_for_company(company.id)?;
                let mut map = Map::new();
                map.insert("company".to_string(), Value::String(company.summary()));
                if !events.is_empty() {
                    map.insert(
                        format!("{} events", company.name),
                        Value::Array(
                            events
                                .iter()
                                .map(|event| Value::String(event.summary(&company.name)))
                                .collect(),
                        ),
                    );
                }
                records.push(Value::Object(map));
            }
        }

        let text = serde_json::to_string_pretty(&records)?;
        fs::write(path, text)?;
        info!(
            "event=backup module=backup status=ok verbose={verbose} records={}",
            records.len()
        );
        Ok(BackupSummary {
            path: path.to_path_buf(),
            records: records.len(),
            verbose,
        })
    }

    /// Merges a verbose snapshot file into the store.
    ///
    /// See the module invariants for the per-record failure policy.
    pub fn import(&self, path: &Path) -> Result<ImportReport, BackupError> {
        let text = fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&text)
            .map_err(|err| BackupError::Snapshot(format!("not valid JSON: {err}")))?;
        let Value::Array(records) = document else {
            return Err(BackupError::Snapshot(
                "snapshot is not a sequence of records".to_string(),
            ));
        };

        let mut report = ImportReport::default();
        for (index, record) in records.iter().enumerate() {
            let Some(map) = record.as_object() else {
                report
                    .malformed
                    .push(format!("record {index}: not a mapping"));
                continue;
            };
            if !map.contains_key("id") {
                report
                    .malformed
                    .push(format!("record {index}: missing `id` field"));
                continue;
            }
            match map.get(RECORD_CLASS_KEY).and_then(Value::as_str) {
                Some("company") => self.import_company(index, map, &mut report)?,
                Some("event") => self.import_event(index, map, &mut report)?,
                // Unknown record classes are ignored silently.
                _ => {}
            }
        }

        report.company_count = self.companies.count(CompanyFilter::default())?;
        report.event_count = self.events.count()?;
        info!(
            "event=import_backup module=backup status=ok companies={} events={} skipped={} malformed={}",
            report.created_companies,
            report.created_events,
            report.skipped_existing,
            report.malformed.len()
        );
        Ok(report)
    }

    fn import_company(
        &self,
        index: usize,
        map: &Map<String, Value>,
        report: &mut ImportReport,
    ) -> Result<(), BackupError> {
        let company: Company = match serde_json::from_value(untagged(map)) {
            Ok(company) => company,
            Err(err) => {
                report.malformed.push(format!("record {index}: {err}"));
                return Ok(());
            }
        };
        if self.companies.exists(company.id)? {
            report.skipped_existing += 1;
            return Ok(());
        }
        match self.companies.create(&company) {
            Ok(_) => report.created_companies += 1,
            Err(RepoError::StoreUnavailable) => return Err(RepoError::StoreUnavailable.into()),
            Err(err) => report.malformed.push(format!("record {index}: {err}")),
        }
        Ok(())
    }

    fn import_event(
        &self,
        index: usize,
        map: &Map<String, Value>,
        report: &mut ImportReport,
    ) -> Result<(), BackupError> {
        let event: Event = match serde_json::from_value(untagged(map)) {
            Ok(event) => event,
            Err(err) => {
                report.malformed.push(format!("record {index}: {err}"));
                return Ok(());
            }
        };
        if self.events.exists(event.id)? {
            report.skipped_existing += 1;
            return Ok(());
        }
        match self.events.create(&event) {
            Ok(_) => report.created_events += 1,
            Err(RepoError::StoreUnavailable) => return Err(RepoError::StoreUnavailable.into()),
            Err(err) => report.malformed.push(format!("record {index}: {err}")),
        }
        Ok(())
    }
}

fn tagged_record<T: serde::Serialize>(entity: &T, class: &str) -> Result<Value, BackupError> {
    let mut value = serde_json::to_value(entity)?;
    let Some(map) = value.as_object_mut() else {
        return Err(BackupError::Snapshot(
            "entity did not serialize to a mapping".to_string(),
        ));
    };
    map.insert(
        RECORD_CLASS_KEY.to_string(),
        Value::String(class.to_string()),
    );
    Ok(value)
}

/// Drops exactly the `record_class` key, passing every other field
/// through unchanged.
fn untagged(map: &Map<String, Value>) -> Value {
    let mut cleaned = map.clone();
    cleaned.remove(RECORD_CLASS_KEY);
    Value::Object(cleaned)
}

#[cfg(test)]
mod tests {
    use super::{tagged_record, untagged, RECORD_CLASS_KEY};
    use crate::Company;
    use serde_json::Value;

    #[test]
    fn tagged_record_adds_only_the_class_key() {
        let company = Company::new("Acme");
        let value = tagged_record(&company, "company").unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.get(RECORD_CLASS_KEY), Some(&Value::String("company".into())));
        assert_eq!(map.get("name"), Some(&Value::String("Acme".into())));
        assert!(map.contains_key("id"));
    }

    #[test]
    fn untagged_drops_exactly_the_class_key() {
        let company = Company::new("Acme");
        let tagged = tagged_record(&company, "company").unwrap();
        let cleaned = untagged(tagged.as_object().unwrap());
        let map = cleaned.as_object().unwrap();
        assert!(!map.contains_key(RECORD_CLASS_KEY));
        assert_eq!(map.len(), tagged.as_object().unwrap().len() - 1);
    }
}
