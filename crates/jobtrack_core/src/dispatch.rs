//! Command dispatcher: textual command names to core operations.
//!
//! # Responsibility
//! - Maintain the closed mapping from command string to operation.
//! - Collect missing interactive answers through a caller-supplied
//!   `Prompter` during parsing, so execution stays free of I/O.
//! - Classify failures so the shell can render them and keep running.
//!
//! # Invariants
//! - An unrecognized command name is a value (`ParseError::UnknownCommand`),
//!   never a crash; the session must survive it.
//! - `remigrate` is destructive and requires an explicit confirmation
//!   collected at parse time.

use crate::db::migrations::{apply_migrations, reset_schema, MigrateOutcome};
use crate::db::DbError;
use crate::model::company::Company;
use crate::model::event::EventId;
use crate::model::todo::{Todo, TodoId};
use crate::repo::company_repo::SqliteCompanyRepository;
use crate::repo::event_repo::{EventRecord, SqliteEventRepository};
use crate::repo::todo_repo::SqliteTodoRepository;
use crate::repo::RepoError;
use crate::service::backup_service::{BackupError, BackupService, BackupSummary, ImportReport};
use crate::service::report_service::ReportService;
use crate::service::status_service::{EventAnswers, StatusService};
use crate::service::todo_service::TodoService;
use log::debug;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

/// Shell-supplied source of interactive answers.
///
/// Parsing calls these only for commands that need input beyond their
/// positional arguments; tests supply canned implementations.
pub trait Prompter {
    /// Reads one line of free text.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
    /// Reads a multi-line block, terminated by the shell's convention.
    fn read_block(&mut self, prompt: &str) -> io::Result<String>;
    /// Asks a yes/no question; `y`/`yes` (any case) means yes.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Failure to turn a command line into a `Command`.
#[derive(Debug)]
pub enum ParseError {
    UnknownCommand(String),
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    /// Argument that should have been a UUID.
    InvalidId(String),
    Io(io::Error),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "method not found: {name}"),
            Self::MissingArgument { command, argument } => {
                write!(f, "{command} requires a {argument} argument")
            }
            Self::InvalidId(value) => write!(f, "not a valid id: {value}"),
            Self::Io(err) => write!(f, "input error: {err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A fully collected command, ready to execute without further input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Migrate,
    Remigrate { confirmed: bool },
    AddCompany { name: String },
    Find { fragment: String },
    AllCompanies,
    Rejected,
    NonRejected,
    Responded,
    NonResponded,
    RespondedNonRejected,
    AddEvent { company: String, answers: EventAnswers },
    AddRejection { company: String },
    Events { company: String },
    Responses,
    Scheduled,
    MarkScheduled { event_id: EventId },
    MarkUnscheduled { event_id: EventId },
    AppliedCount,
    LastDayAppliedCount,
    RespondedPercentage,
    RejectedPercentage,
    RespondedRejectedPercentage,
    AddTodo { content: String },
    Todos,
    DeleteTodo { todo_id: TodoId },
    Backup { verbose: bool },
    ImportBackup,
    ReadBackup,
    Quit,
}

/// The stable command surface, for `help`-style listings.
pub fn known_commands() -> &'static [&'static str] {
    &[
        "migrate",
        "remigrate",
        "add_company",
        "find",
        "all_companies",
        "rejected",
        "non_rejected",
        "responded",
        "non_responded",
        "responded_non_rejected",
        "add_event",
        "add_rejection",
        "events",
        "responses",
        "scheduled",
        "mark_scheduled",
        "mark_unscheduled",
        "applied_count",
        "last_day_applied_count",
        "responded_percentage",
        "rejected_percentage",
        "responded_rejected_percentage",
        "add_todo",
        "todos",
        "delete_todo",
        "backup",
        "import_backup",
        "read_backup",
        "quit",
    ]
}

impl Command {
    /// Maps a command name and arguments to an executable command,
    /// collecting any interactive answers through `prompter`.
    pub fn parse(
        name: &str,
        args: &[&str],
        prompter: &mut dyn Prompter,
    ) -> Result<Self, ParseError> {
        match name {
            "migrate" => Ok(Self::Migrate),
            "remigrate" => {
                let confirmed = prompter
                    .confirm("are you sure? database contents will be deleted (y to continue)")?;
                Ok(Self::Remigrate { confirmed })
            }
            "add_company" => Ok(Self::AddCompany {
                name: require_arg("add_company", "name", args)?.to_string(),
            }),
            "find" => Ok(Self::Find {
                fragment: args.first().copied().unwrap_or("").to_string(),
            }),
            "all_companies" => Ok(Self::AllCompanies),
            "rejected" => Ok(Self::Rejected),
            "non_rejected" => Ok(Self::NonRejected),
            "responded" => Ok(Self::Responded),
            "non_responded" => Ok(Self::NonResponded),
            "responded_non_rejected" => Ok(Self::RespondedNonRejected),
            "add_event" => {
                let company = require_arg("add_event", "company name", args)?.to_string();
                let content =
                    prompter.read_block("enter content (finish with an empty line or ctrl+d)")?;
                let is_response =
                    prompter.confirm("is the event a response from the company? (y for yes)")?;
                let is_rejection = prompter.confirm("is the event a rejection? (y for yes)")?;
                let is_scheduled = if is_rejection {
                    // A rejection cannot also be a future appointment.
                    false
                } else {
                    prompter.confirm(
                        "is the event scheduled for some time in the future? (y for yes)",
                    )?
                };
                Ok(Self::AddEvent {
                    company,
                    answers: EventAnswers {
                        content,
                        is_response,
                        is_rejection,
                        is_scheduled,
                    },
                })
            }
            "add_rejection" => Ok(Self::AddRejection {
                company: require_arg("add_rejection", "company name", args)?.to_string(),
            }),
            "events" => Ok(Self::Events {
                company: require_arg("events", "company name", args)?.to_string(),
            }),
            "responses" => Ok(Self::Responses),
            "scheduled" => Ok(Self::Scheduled),
            "mark_scheduled" => Ok(Self::MarkScheduled {
                event_id: parse_id(require_arg("mark_scheduled", "event id", args)?)?,
            }),
            "mark_unscheduled" => Ok(Self::MarkUnscheduled {
                event_id: parse_id(require_arg("mark_unscheduled", "event id", args)?)?,
            }),
            "applied_count" => Ok(Self::AppliedCount),
            "last_day_applied_count" => Ok(Self::LastDayAppliedCount),
            "responded_percentage" => Ok(Self::RespondedPercentage),
            "rejected_percentage" => Ok(Self::RejectedPercentage),
            "responded_rejected_percentage" => Ok(Self::RespondedRejectedPercentage),
            "add_todo" => Ok(Self::AddTodo {
                content: prompter.read_line("enter todo content (one line)")?,
            }),
            "todos" => Ok(Self::Todos),
            "delete_todo" => Ok(Self::DeleteTodo {
                todo_id: parse_id(require_arg("delete_todo", "todo id", args)?)?,
            }),
            "backup" => Ok(Self::Backup {
                verbose: matches!(args.first().copied(), Some("verbose" | "true" | "v")),
            }),
            "import_backup" => Ok(Self::ImportBackup),
            "read_backup" => Ok(Self::ReadBackup),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn require_arg<'a>(
    command: &'static str,
    argument: &'static str,
    args: &[&'a str],
) -> Result<&'a str, ParseError> {
    args.first()
        .copied()
        .ok_or(ParseError::MissingArgument { command, argument })
}

fn parse_id(value: &str) -> Result<Uuid, ParseError> {
    Uuid::parse_str(value).map_err(|_| ParseError::InvalidId(value.to_string()))
}

/// Structured result of executing one command.
#[derive(Debug)]
pub enum Outcome {
    Companies(Vec<Company>),
    Company(Company),
    Events(Vec<EventRecord>),
    Event(EventRecord),
    Todos(Vec<Todo>),
    Todo(Todo),
    Count(i64),
    Percentage(String),
    Migrated(MigrateOutcome),
    RemigrateCancelled,
    BackupWritten(BackupSummary),
    Imported(ImportReport),
    /// Raw text of the snapshot file, for inspection.
    SnapshotContents(String),
    Done,
    Quit,
}

/// Failure while executing a command, classified for display.
#[derive(Debug)]
pub enum CommandError {
    Repo(RepoError),
    Db(DbError),
    Backup(BackupError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Backup(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Backup(err) => Some(err),
        }
    }
}

impl From<RepoError> for CommandError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for CommandError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<BackupError> for CommandError {
    fn from(value: BackupError) -> Self {
        Self::Backup(value)
    }
}

impl CommandError {
    /// True when the failure is "schema not initialized"; the shell adds
    /// run-`migrate` guidance for these.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Repo(RepoError::StoreUnavailable)
                | Self::Backup(BackupError::Repo(RepoError::StoreUnavailable))
        )
    }
}

type SqliteStatusService<'c> =
    StatusService<SqliteCompanyRepository<'c>, SqliteEventRepository<'c>>;
type SqliteReportService<'c> =
    ReportService<SqliteCompanyRepository<'c>, SqliteEventRepository<'c>>;
type SqliteBackupService<'c> =
    BackupService<SqliteCompanyRepository<'c>, SqliteEventRepository<'c>>;

/// Executes parsed commands against the store.
///
/// Owns the services; created once at startup with the connection and
/// released at shutdown.
pub struct Dispatcher<'conn> {
    conn: &'conn Connection,
    status: SqliteStatusService<'conn>,
    reports: SqliteReportService<'conn>,
    todos: TodoService<SqliteTodoRepository<'conn>>,
    backup: SqliteBackupService<'conn>,
    backup_path: PathBuf,
}

impl<'conn> Dispatcher<'conn> {
    pub fn new(conn: &'conn Connection, backup_path: PathBuf) -> Self {
        Self {
            conn,
            status: StatusService::new(
                SqliteCompanyRepository::new(conn),
                SqliteEventRepository::new(conn),
            ),
            reports: ReportService::new(
                SqliteCompanyRepository::new(conn),
                SqliteEventRepository::new(conn),
            ),
            todos: TodoService::new(SqliteTodoRepository::new(conn)),
            backup: BackupService::new(
                SqliteCompanyRepository::new(conn),
                SqliteEventRepository::new(conn),
            ),
            backup_path,
        }
    }

    /// Path the `backup`/`import_backup` commands operate on.
    pub fn backup_path(&self) -> &PathBuf {
        &self.backup_path
    }

    pub fn dispatch(&self, command: &Command) -> Result<Outcome, CommandError> {
        debug!("event=dispatch module=dispatch command={command:?}");
        match command {
            Command::Migrate => Ok(Outcome::Migrated(apply_migrations(self.conn)?)),
            Command::Remigrate { confirmed: false } => Ok(Outcome::RemigrateCancelled),
            Command::Remigrate { confirmed: true } => {
                Ok(Outcome::Migrated(reset_schema(self.conn)?))
            }
            Command::AddCompany { name } => {
                Ok(Outcome::Company(self.status.add_company(name)?))
            }
            Command::Find { fragment } => Ok(Outcome::Companies(self.reports.find(fragment)?)),
            Command::AllCompanies => Ok(Outcome::Companies(self.reports.find("")?)),
            Command::Rejected => Ok(Outcome::Companies(self.reports.rejected()?)),
            Command::NonRejected => Ok(Outcome::Companies(self.reports.non_rejected()?)),
            Command::Responded => Ok(Outcome::Companies(self.reports.responded()?)),
            Command::NonResponded => Ok(Outcome::Companies(self.reports.non_responded()?)),
            Command::RespondedNonRejected => {
                Ok(Outcome::Companies(self.reports.responded_non_rejected()?))
            }
            Command::AddEvent { company, answers } => {
                Ok(Outcome::Event(self.status.record_event(company, answers)?))
            }
            Command::AddRejection { company } => {
                Ok(Outcome::Event(self.status.record_rejection(company)?))
            }
            Command::Events { company } => {
                Ok(Outcome::Events(self.reports.company_events(company)?))
            }
            Command::Responses => Ok(Outcome::Events(self.reports.responses()?)),
            Command::Scheduled => Ok(Outcome::Events(self.reports.scheduled()?)),
            Command::MarkScheduled { event_id } => {
                self.status.mark_scheduled(*event_id)?;
                Ok(Outcome::Done)
            }
            Command::MarkUnscheduled { event_id } => {
                self.status.mark_unscheduled(*event_id)?;
                Ok(Outcome::Done)
            }
            Command::AppliedCount => Ok(Outcome::Count(self.reports.applied_count()?)),
            Command::LastDayAppliedCount => {
                Ok(Outcome::Count(self.reports.last_day_applied_count()?))
            }
            Command::RespondedPercentage => {
                Ok(Outcome::Percentage(self.reports.responded_percentage()?))
            }
            Command::RejectedPercentage => {
                Ok(Outcome::Percentage(self.reports.rejected_percentage()?))
            }
            Command::RespondedRejectedPercentage => Ok(Outcome::Percentage(
                self.reports.responded_rejected_percentage()?,
            )),
            Command::AddTodo { content } => Ok(Outcome::Todo(self.todos.add(content)?)),
            Command::Todos => Ok(Outcome::Todos(self.todos.list()?)),
            Command::DeleteTodo { todo_id } => {
                self.todos.delete(*todo_id)?;
                Ok(Outcome::Done)
            }
            Command::Backup { verbose } => Ok(Outcome::BackupWritten(
                self.backup.export(&self.backup_path, *verbose)?,
            )),
            Command::ImportBackup => {
                Ok(Outcome::Imported(self.backup.import(&self.backup_path)?))
            }
            Command::ReadBackup => {
                let text = fs::read_to_string(&self.backup_path).map_err(BackupError::from)?;
                Ok(Outcome::SnapshotContents(text))
            }
            Command::Quit => Ok(Outcome::Quit),
        }
    }
}
