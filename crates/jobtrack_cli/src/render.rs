//! Renders structured command outcomes as terminal lines.

use jobtrack_core::db::migrations::MigrateOutcome;
use jobtrack_core::Outcome;

pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Companies(companies) => {
            if companies.is_empty() {
                println!("no companies");
            }
            for company in companies {
                println!("{}", company.summary());
            }
        }
        Outcome::Company(company) => println!("{}", company.summary()),
        Outcome::Events(records) => {
            if records.is_empty() {
                println!("no events");
            }
            for record in records {
                println!("{}", record.summary());
            }
        }
        Outcome::Event(record) => println!("{}", record.summary()),
        Outcome::Todos(todos) => {
            if todos.is_empty() {
                println!("no todos");
            }
            for todo in todos {
                println!("{} {}", todo.id, todo.content);
            }
        }
        Outcome::Todo(todo) => println!("{} {}", todo.id, todo.content),
        Outcome::Count(count) => println!("{count}"),
        Outcome::Percentage(text) => println!("{text}"),
        Outcome::Migrated(MigrateOutcome::Applied { version }) => {
            println!("schema migrated to version {version}");
        }
        Outcome::Migrated(MigrateOutcome::AlreadyInitialized { version }) => {
            println!("schema already initialized (version {version})");
        }
        Outcome::RemigrateCancelled => println!("cancelled"),
        Outcome::BackupWritten(summary) => {
            let mode = if summary.verbose { "verbose" } else { "compact" };
            println!(
                "wrote {} {mode} records to {}",
                summary.records,
                summary.path.display()
            );
        }
        Outcome::Imported(report) => {
            for note in &report.malformed {
                println!("error - badly formatted record ({note})");
            }
            println!(
                "created {} companies and {} events; skipped {} existing",
                report.created_companies, report.created_events, report.skipped_existing
            );
            println!("-------------");
            println!("finished");
            println!("now {} companies", report.company_count);
            println!("now {} events", report.event_count);
        }
        Outcome::SnapshotContents(text) => println!("{text}"),
        Outcome::Done => {}
        Outcome::Quit => {}
    }
}
