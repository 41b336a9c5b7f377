//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence and query APIs over the `events` table.
//! - Join the owning company name into the `EventRecord` read model for
//!   listings that cross companies.
//!
//! # Invariants
//! - Listings are ordered by `updated_at` ascending.
//! - Scheduling updates bump `updated_at`.

use crate::model::company::CompanyId;
use crate::model::event::{Event, EventId};
use crate::model::now_epoch_ms;
use crate::repo::{bool_to_int, int_to_bool, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    company_id,
    content,
    is_response,
    is_scheduled,
    created_at,
    updated_at
FROM events";

const EVENT_RECORD_SELECT_SQL: &str = "SELECT
    events.id,
    events.company_id,
    events.content,
    events.is_response,
    events.is_scheduled,
    events.created_at,
    events.updated_at,
    companies.name AS company_name
FROM events
JOIN companies ON companies.id = events.company_id";

/// Read model pairing an event with its owning company's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub event: Event,
    pub company_name: String,
}

impl EventRecord {
    /// One-line human summary of the underlying event.
    pub fn summary(&self) -> String {
        self.event.summary(&self.company_name)
    }
}

/// Boolean-flag filter for cross-company event listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub is_response: Option<bool>,
    pub is_scheduled: Option<bool>,
}

/// Repository interface for event persistence.
pub trait EventRepository {
    /// Creates one event; fails validation on blank content.
    fn create(&self, event: &Event) -> RepoResult<EventId>;
    fn get(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn exists(&self, id: EventId) -> RepoResult<bool>;
    /// Events of one company, ordered by `updated_at` ascending.
    fn list_for_company(&self, company_id: CompanyId) -> RepoResult<Vec<Event>>;
    /// Flag-filtered events across companies, with company names joined in.
    fn list(&self, filter: EventFilter) -> RepoResult<Vec<EventRecord>>;
    /// Every event, for backup export.
    fn list_all(&self) -> RepoResult<Vec<Event>>;
    /// Sets one event's `is_scheduled` flag; `EventNotFound` on a missing id.
    fn set_scheduled(&self, id: EventId, scheduled: bool) -> RepoResult<()>;
    /// Clears `is_scheduled` on every scheduled event of one company.
    ///
    /// Returns the number of events unscheduled.
    fn unschedule_all(&self, company_id: CompanyId) -> RepoResult<usize>;
    fn count(&self) -> RepoResult<i64>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create(&self, event: &Event) -> RepoResult<EventId> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO events (
                id, company_id, content, is_response, is_scheduled, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                event.id.to_string(),
                event.company_id.to_string(),
                event.content.as_str(),
                bool_to_int(event.is_response),
                bool_to_int(event.is_scheduled),
                event.created_at,
                event.updated_at,
            ],
        )?;

        Ok(event.id)
    }

    fn get(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn exists(&self, id: EventId) -> RepoResult<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(found == 1)
    }

    fn list_for_company(&self, company_id: CompanyId) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE company_id = ?1
             ORDER BY updated_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([company_id.to_string()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn list(&self, filter: EventFilter) -> RepoResult<Vec<EventRecord>> {
        let mut sql = format!("{EVENT_RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(is_response) = filter.is_response {
            sql.push_str(" AND events.is_response = ?");
            bind_values.push(Value::Integer(bool_to_int(is_response)));
        }
        if let Some(is_scheduled) = filter.is_scheduled {
            sql.push_str(" AND events.is_scheduled = ?");
            bind_values.push(Value::Integer(bool_to_int(is_scheduled)));
        }
        sql.push_str(" ORDER BY events.updated_at ASC, events.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(EventRecord {
                event: parse_event_row(row)?,
                company_name: row.get("company_name")?,
            });
        }
        Ok(records)
    }

    fn list_all(&self) -> RepoResult<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn set_scheduled(&self, id: EventId, scheduled: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE events SET is_scheduled = ?2, updated_at = ?3 WHERE id = ?1;",
            params![id.to_string(), bool_to_int(scheduled), now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::EventNotFound(id));
        }
        Ok(())
    }

    fn unschedule_all(&self, company_id: CompanyId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE events
             SET is_scheduled = 0, updated_at = ?2
             WHERE company_id = ?1 AND is_scheduled = 1;",
            params![company_id.to_string(), now_epoch_ms()],
        )?;
        Ok(changed)
    }

    fn count(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM events;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in events.id"))
    })?;

    let company_text: String = row.get("company_id")?;
    let company_id = Uuid::parse_str(&company_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{company_text}` in events.company_id"
        ))
    })?;

    Ok(Event {
        id,
        company_id,
        content: row.get("content")?,
        is_response: int_to_bool(row.get("is_response")?, "events.is_response")?,
        is_scheduled: int_to_bool(row.get("is_scheduled")?, "events.is_scheduled")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
