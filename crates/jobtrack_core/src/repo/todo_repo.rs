//! Todo repository contract and SQLite implementation.

use crate::model::todo::{Todo, TodoId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT id, content, created_at, updated_at FROM todos";

/// Repository interface for todo persistence.
pub trait TodoRepository {
    fn create(&self, todo: &Todo) -> RepoResult<TodoId>;
    /// All todos, ordered by `updated_at` ascending.
    fn list(&self) -> RepoResult<Vec<Todo>>;
    /// Hard delete; `TodoNotFound` on a missing id.
    fn delete(&self, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create(&self, todo: &Todo) -> RepoResult<TodoId> {
        self.conn.execute(
            "INSERT INTO todos (id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                todo.id.to_string(),
                todo.content.as_str(),
                todo.created_at,
                todo.updated_at,
            ],
        )?;
        Ok(todo.id)
    }

    fn list(&self) -> RepoResult<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY updated_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::TodoNotFound(id));
        }
        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in todos.id"))
    })?;

    Ok(Todo {
        id,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
