//! Interactive shell for the job application tracker.
//!
//! # Responsibility
//! - Resolve data/log locations, initialize logging, open the store.
//! - Hand the REPL a dispatcher wired to the single connection.

mod render;
mod repl;

use clap::Parser;
use jobtrack_core::db::open_db;
use jobtrack_core::{default_log_level, init_logging, Dispatcher};
use log::info;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "jobtrack", about = "Track job applications from a REPL")]
struct Args {
    /// Database file; defaults to `<data-dir>/jobtrack.db`.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Data directory for database, snapshot, logs, and history.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fatal: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => dirs::data_local_dir()
            .map(|dir| dir.join("jobtrack"))
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    fs::create_dir_all(&data_dir)?;
    let data_dir = fs::canonicalize(&data_dir)?;

    let level = args
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = data_dir.join("logs");
    if let Some(log_dir) = log_dir.to_str() {
        // Logging is best-effort; the tracker stays usable without it.
        if let Err(err) = init_logging(&level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let db_path = args.db.unwrap_or_else(|| data_dir.join("jobtrack.db"));
    let conn = open_db(&db_path)?;
    info!(
        "event=startup module=cli status=ok db={} data_dir={}",
        db_path.display(),
        data_dir.display()
    );
    let dispatcher = Dispatcher::new(&conn, data_dir.join("backup.json"));

    let mut repl = repl::Repl::new(dispatcher, data_dir.join("repl_history.txt"))?;
    repl.run()?;
    Ok(())
}
