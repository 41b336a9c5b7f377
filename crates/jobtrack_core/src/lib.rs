//! Core domain logic for the job application tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod dispatch;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use dispatch::{known_commands, Command, CommandError, Dispatcher, Outcome, ParseError, Prompter};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::company::{Company, CompanyId, CompanyValidationError};
pub use model::event::{Event, EventId, EventValidationError};
pub use model::todo::{Todo, TodoId};
pub use repo::company_repo::{CompanyFilter, CompanyRepository, SqliteCompanyRepository};
pub use repo::event_repo::{EventFilter, EventRecord, EventRepository, SqliteEventRepository};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use repo::{RepoError, RepoResult};
pub use service::backup_service::{BackupError, BackupService, BackupSummary, ImportReport};
pub use service::report_service::ReportService;
pub use service::status_service::{EventAnswers, StatusService};
pub use service::todo_service::TodoService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
