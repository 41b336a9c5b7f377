//! Todo use-case service.
//!
//! Thin wrapper over the todo repository; todos carry no status
//! semantics.

use crate::model::todo::{Todo, TodoId};
use crate::repo::todo_repo::TodoRepository;
use crate::repo::RepoResult;

/// Use-case service for free-text reminders.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one todo from a line of text.
    pub fn add(&self, content: &str) -> RepoResult<Todo> {
        let todo = Todo::new(content);
        self.repo.create(&todo)?;
        Ok(todo)
    }

    /// All todos, oldest-modified first.
    pub fn list(&self) -> RepoResult<Vec<Todo>> {
        self.repo.list()
    }

    /// Deletes one todo; `TodoNotFound` on a missing id.
    pub fn delete(&self, id: TodoId) -> RepoResult<()> {
        self.repo.delete(id)
    }
}
