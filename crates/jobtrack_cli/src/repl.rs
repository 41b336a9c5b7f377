//! Line-oriented REPL over the core dispatcher.
//!
//! # Responsibility
//! - Read command lines, collect interactive answers, render outcomes.
//! - Keep the session alive across every recoverable error; only `quit`,
//!   EOF, or a broken terminal end it.

use jobtrack_core::{known_commands, Command, Dispatcher, Outcome, ParseError, Prompter};
use log::warn;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, Result as RlResult};
use std::io;
use std::path::PathBuf;

use crate::render;

pub struct Repl<'conn> {
    editor: Editor<(), DefaultHistory>,
    dispatcher: Dispatcher<'conn>,
    history_path: PathBuf,
}

impl<'conn> Repl<'conn> {
    pub fn new(dispatcher: Dispatcher<'conn>, history_path: PathBuf) -> RlResult<Self> {
        let mut editor = Editor::new()?;
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }
        Ok(Self {
            editor,
            dispatcher,
            history_path,
        })
    }

    pub fn run(&mut self) -> RlResult<()> {
        println!("Job Application Tracker v{}", jobtrack_core::core_version());
        println!("type help to see commands, quit to exit");

        loop {
            match self.editor.readline("> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(&line)?;
                    if self.handle_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("error: {err}");
                    break;
                }
            }
        }

        let _ = self.editor.save_history(&self.history_path);
        println!("bye");
        Ok(())
    }

    /// Handles one command line. Returns true when the session should end.
    fn handle_line(&mut self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return false;
        };
        let args: Vec<&str> = parts.collect();

        if name == "help" {
            for command in known_commands() {
                println!("  {command}");
            }
            return false;
        }

        let mut prompter = EditorPrompter {
            editor: &mut self.editor,
        };
        let command = match Command::parse(name, &args, &mut prompter) {
            Ok(command) => command,
            Err(ParseError::UnknownCommand(_)) => {
                println!("method not found (type help to see commands)");
                return false;
            }
            Err(err) => {
                println!("error: {err}");
                return false;
            }
        };
        let offers_first_event = matches!(command, Command::AddCompany { .. });

        match self.dispatcher.dispatch(&command) {
            Ok(Outcome::Quit) => return true,
            Ok(outcome) => {
                render::print_outcome(&outcome);
                println!("ok");
                if offers_first_event {
                    if let Outcome::Company(company) = &outcome {
                        let company_name = company.name.clone();
                        self.offer_first_event(&company_name);
                    }
                }
            }
            Err(err) => {
                warn!("event=command module=cli status=error error={err}");
                println!("error: {err}");
                if err.is_store_unavailable() {
                    println!("run `migrate` to initialize the database (or `remigrate` to reset it)");
                }
            }
        }
        false
    }

    /// After `add_company`, offers to record the submission event.
    fn offer_first_event(&mut self, company_name: &str) {
        let mut prompter = EditorPrompter {
            editor: &mut self.editor,
        };
        let wants_event = prompter
            .confirm("create an event for this company? (y for yes)")
            .unwrap_or(false);
        if !wants_event {
            return;
        }
        let command = match Command::parse("add_event", &[company_name], &mut prompter) {
            Ok(command) => command,
            Err(err) => {
                println!("error: {err}");
                return;
            }
        };
        match self.dispatcher.dispatch(&command) {
            Ok(outcome) => {
                render::print_outcome(&outcome);
                println!("ok");
            }
            Err(err) => {
                warn!("event=command module=cli status=error error={err}");
                println!("error: {err}");
            }
        }
    }
}

/// Collects interactive answers through the line editor.
struct EditorPrompter<'a> {
    editor: &'a mut Editor<(), DefaultHistory>,
}

impl Prompter for EditorPrompter<'_> {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        println!("{prompt}");
        match self.editor.readline("> ") {
            Ok(line) => Ok(line),
            Err(ReadlineError::Eof) => Ok(String::new()),
            Err(ReadlineError::Interrupted) => {
                Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"))
            }
            Err(err) => Err(io::Error::other(err.to_string())),
        }
    }

    fn read_block(&mut self, prompt: &str) -> io::Result<String> {
        println!("{prompt}");
        let mut lines = Vec::new();
        loop {
            match self.editor.readline("| ") {
                Ok(line) if line.trim().is_empty() => break,
                Ok(line) => lines.push(line),
                Err(ReadlineError::Eof) => break,
                Err(ReadlineError::Interrupted) => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"))
                }
                Err(err) => return Err(io::Error::other(err.to_string())),
            }
        }
        Ok(lines.join("\n"))
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.read_line(prompt)?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
