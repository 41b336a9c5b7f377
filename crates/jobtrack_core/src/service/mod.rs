//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the shell/dispatch layers decoupled from storage details.

pub mod backup_service;
pub mod report_service;
pub mod status_service;
pub mod todo_service;
