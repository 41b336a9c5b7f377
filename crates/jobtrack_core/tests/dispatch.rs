use jobtrack_core::db::open_db_in_memory;
use jobtrack_core::{
    BackupError, Command, CommandError, Dispatcher, Outcome, ParseError, Prompter, RepoError,
};
use std::collections::VecDeque;
use std::io;

/// Prompter with canned answers; panics when a command asks for more
/// input than the test scripted.
#[derive(Default)]
struct StubPrompter {
    lines: VecDeque<String>,
    blocks: VecDeque<String>,
    confirms: VecDeque<bool>,
}

impl StubPrompter {
    fn with_confirms(confirms: &[bool]) -> Self {
        Self {
            confirms: confirms.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn assert_drained(&self) {
        assert!(self.lines.is_empty(), "unread scripted lines");
        assert!(self.blocks.is_empty(), "unread scripted blocks");
        assert!(self.confirms.is_empty(), "unread scripted confirms");
    }
}

impl Prompter for StubPrompter {
    fn read_line(&mut self, _prompt: &str) -> io::Result<String> {
        self.lines
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted line"))
    }

    fn read_block(&mut self, _prompt: &str) -> io::Result<String> {
        self.blocks
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted block"))
    }

    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        self.confirms
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted confirm"))
    }
}

#[test]
fn unknown_command_is_a_parse_error_not_a_crash() {
    let mut prompter = StubPrompter::default();
    let err = Command::parse("frobnicate", &[], &mut prompter).unwrap_err();
    assert!(matches!(err, ParseError::UnknownCommand(name) if name == "frobnicate"));
}

#[test]
fn missing_argument_names_command_and_argument() {
    let mut prompter = StubPrompter::default();
    let err = Command::parse("add_company", &[], &mut prompter).unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingArgument {
            command: "add_company",
            argument: "name",
        }
    ));
}

#[test]
fn malformed_event_id_is_rejected_at_parse_time() {
    let mut prompter = StubPrompter::default();
    let err = Command::parse("mark_scheduled", &["not-a-uuid"], &mut prompter).unwrap_err();
    assert!(matches!(err, ParseError::InvalidId(value) if value == "not-a-uuid"));
}

#[test]
fn remigrate_collects_confirmation_during_parse() {
    let mut prompter = StubPrompter::with_confirms(&[false]);
    let command = Command::parse("remigrate", &[], &mut prompter).unwrap();
    assert_eq!(command, Command::Remigrate { confirmed: false });
    prompter.assert_drained();
}

#[test]
fn add_event_rejection_skips_the_scheduled_question() {
    let mut prompter = StubPrompter {
        blocks: VecDeque::from(["form letter".to_string()]),
        // response? no; rejection? yes; scheduled is never asked.
        confirms: VecDeque::from([false, true]),
        ..StubPrompter::default()
    };
    let command = Command::parse("add_event", &["Acme"], &mut prompter).unwrap();
    prompter.assert_drained();

    match command {
        Command::AddEvent { company, answers } => {
            assert_eq!(company, "Acme");
            assert!(answers.is_rejection);
            assert!(!answers.is_scheduled);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn add_event_asks_the_scheduled_question_for_non_rejections() {
    let mut prompter = StubPrompter {
        blocks: VecDeque::from(["onsite Tuesday".to_string()]),
        confirms: VecDeque::from([true, false, true]),
        ..StubPrompter::default()
    };
    let command = Command::parse("add_event", &["Acme"], &mut prompter).unwrap();
    prompter.assert_drained();

    match command {
        Command::AddEvent { answers, .. } => {
            assert!(answers.is_response);
            assert!(answers.is_scheduled);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn backup_verbose_flag_comes_from_the_first_argument() {
    let mut prompter = StubPrompter::default();
    assert_eq!(
        Command::parse("backup", &["verbose"], &mut prompter).unwrap(),
        Command::Backup { verbose: true }
    );
    assert_eq!(
        Command::parse("backup", &[], &mut prompter).unwrap(),
        Command::Backup { verbose: false }
    );
}

#[test]
fn quit_and_exit_both_end_the_session() {
    let mut prompter = StubPrompter::default();
    assert_eq!(
        Command::parse("quit", &[], &mut prompter).unwrap(),
        Command::Quit
    );
    assert_eq!(
        Command::parse("exit", &[], &mut prompter).unwrap(),
        Command::Quit
    );
}

#[test]
fn dispatch_before_migrate_reports_store_unavailable() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&conn, dir.path().join("backup.json"));

    let err = dispatcher
        .dispatch(&Command::AddCompany {
            name: "Acme".to_string(),
        })
        .unwrap_err();
    assert!(err.is_store_unavailable());
    assert!(matches!(err, CommandError::Repo(RepoError::StoreUnavailable)));
}

#[test]
fn unconfirmed_remigrate_leaves_data_alone() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&conn, dir.path().join("backup.json"));

    dispatcher.dispatch(&Command::Migrate).unwrap();
    dispatcher
        .dispatch(&Command::AddCompany {
            name: "Acme".to_string(),
        })
        .unwrap();

    let outcome = dispatcher
        .dispatch(&Command::Remigrate { confirmed: false })
        .unwrap();
    assert!(matches!(outcome, Outcome::RemigrateCancelled));
    assert!(matches!(
        dispatcher.dispatch(&Command::AppliedCount).unwrap(),
        Outcome::Count(1)
    ));
}

#[test]
fn confirmed_remigrate_wipes_the_store() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&conn, dir.path().join("backup.json"));

    dispatcher.dispatch(&Command::Migrate).unwrap();
    dispatcher
        .dispatch(&Command::AddCompany {
            name: "Acme".to_string(),
        })
        .unwrap();

    dispatcher
        .dispatch(&Command::Remigrate { confirmed: true })
        .unwrap();
    assert!(matches!(
        dispatcher.dispatch(&Command::AppliedCount).unwrap(),
        Outcome::Count(0)
    ));
}

#[test]
fn full_session_from_migrate_to_rejection_percentage() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&conn, dir.path().join("backup.json"));

    dispatcher.dispatch(&Command::Migrate).unwrap();
    for name in ["Acme", "Globex"] {
        dispatcher
            .dispatch(&Command::AddCompany {
                name: name.to_string(),
            })
            .unwrap();
    }

    match dispatcher.dispatch(&Command::RejectedPercentage).unwrap() {
        Outcome::Percentage(text) => assert_eq!(text, "0.0%"),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let outcome = dispatcher
        .dispatch(&Command::AddRejection {
            company: "Acme".to_string(),
        })
        .unwrap();
    match outcome {
        Outcome::Event(record) => {
            assert_eq!(record.event.content, "rejected");
            assert_eq!(record.company_name, "Acme");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    match dispatcher.dispatch(&Command::RejectedPercentage).unwrap() {
        Outcome::Percentage(text) => assert_eq!(text, "50.0%"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn backup_command_writes_to_the_configured_path() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&conn, dir.path().join("backup.json"));

    dispatcher.dispatch(&Command::Migrate).unwrap();
    dispatcher
        .dispatch(&Command::AddCompany {
            name: "Acme".to_string(),
        })
        .unwrap();

    let outcome = dispatcher
        .dispatch(&Command::Backup { verbose: true })
        .unwrap();
    match outcome {
        Outcome::BackupWritten(summary) => {
            assert_eq!(&summary.path, dispatcher.backup_path());
            assert_eq!(summary.records, 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(dispatcher.backup_path().is_file());

    match dispatcher.dispatch(&Command::ImportBackup).unwrap() {
        Outcome::Imported(report) => {
            assert_eq!(report.created_companies, 0);
            assert_eq!(report.skipped_existing, 1);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn read_backup_returns_the_snapshot_text() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&conn, dir.path().join("backup.json"));

    dispatcher.dispatch(&Command::Migrate).unwrap();
    dispatcher
        .dispatch(&Command::AddCompany {
            name: "Acme".to_string(),
        })
        .unwrap();
    dispatcher
        .dispatch(&Command::Backup { verbose: true })
        .unwrap();

    match dispatcher.dispatch(&Command::ReadBackup).unwrap() {
        Outcome::SnapshotContents(text) => {
            assert!(text.contains("Acme"));
            assert!(text.contains("record_class"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn read_backup_without_a_snapshot_file_fails() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = Dispatcher::new(&conn, dir.path().join("backup.json"));

    let err = dispatcher.dispatch(&Command::ReadBackup).unwrap_err();
    assert!(matches!(err, CommandError::Backup(BackupError::Io(_))));
}

#[test]
fn every_listed_command_parses_or_asks_for_input() {
    for name in jobtrack_core::known_commands() {
        let mut prompter = StubPrompter {
            lines: VecDeque::from(["content".to_string()]),
            blocks: VecDeque::from(["content".to_string()]),
            confirms: VecDeque::from([false, false, false]),
        };
        let args = ["11111111-2222-3333-4444-555555555555"];
        let parsed = Command::parse(name, &args, &mut prompter);
        assert!(parsed.is_ok(), "command {name} failed to parse: {parsed:?}");
    }
}
