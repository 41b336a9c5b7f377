//! Todo domain model.
//!
//! Free-text reminders, independent of companies and events. No status
//! semantics; created, listed and deleted directly.

use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a todo.
pub type TodoId = Uuid;

/// An independent free-text reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Todo {
    /// Creates a new todo with a generated stable ID and now-timestamps.
    pub fn new(content: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
