//! Company repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and query APIs over the `companies` table.
//! - Enforce case-insensitive name uniqueness as a validation failure,
//!   not a constraint crash.
//!
//! # Invariants
//! - Listings are ordered by `updated_at` ascending.
//! - Flag updates are monotonic (set to true only) and bump `updated_at`.

use crate::model::company::{Company, CompanyId, CompanyValidationError};
use crate::model::now_epoch_ms;
use crate::repo::{bool_to_int, int_to_bool, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const COMPANY_SELECT_SQL: &str = "SELECT
    id,
    name,
    rejected,
    responded,
    created_at,
    updated_at
FROM companies";

/// Boolean-flag filter for company listings and counts.
///
/// `None` leaves the flag unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanyFilter {
    pub rejected: Option<bool>,
    pub responded: Option<bool>,
}

/// Repository interface for company persistence.
pub trait CompanyRepository {
    /// Creates one company; fails validation on blank or duplicate name.
    fn create(&self, company: &Company) -> RepoResult<CompanyId>;
    fn get(&self, id: CompanyId) -> RepoResult<Option<Company>>;
    /// Exact-name lookup.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Company>>;
    /// Case-insensitive substring search; empty fragment matches all.
    fn search(&self, fragment: &str) -> RepoResult<Vec<Company>>;
    fn list(&self, filter: CompanyFilter) -> RepoResult<Vec<Company>>;
    fn exists(&self, id: CompanyId) -> RepoResult<bool>;
    /// Sets `responded = true`; monotonic.
    fn mark_responded(&self, id: CompanyId) -> RepoResult<()>;
    /// Sets `rejected = true`; monotonic.
    fn mark_rejected(&self, id: CompanyId) -> RepoResult<()>;
    fn count(&self, filter: CompanyFilter) -> RepoResult<i64>;
    /// Counts companies with `created_at` in `[start_ms, end_ms]`.
    fn count_created_between(&self, start_ms: i64, end_ms: i64) -> RepoResult<i64>;
}

/// SQLite-backed company repository.
pub struct SqliteCompanyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompanyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn name_taken(&self, name: &str) -> RepoResult<bool> {
        let taken: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM companies WHERE name = ?1 COLLATE NOCASE
            );",
            [name],
            |row| row.get(0),
        )?;
        Ok(taken == 1)
    }
}

impl CompanyRepository for SqliteCompanyRepository<'_> {
    fn create(&self, company: &Company) -> RepoResult<CompanyId> {
        company.validate()?;
        if self.name_taken(&company.name)? {
            return Err(CompanyValidationError::DuplicateName(company.name.clone()).into());
        }

        self.conn.execute(
            "INSERT INTO companies (
                id, name, rejected, responded, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                company.id.to_string(),
                company.name.as_str(),
                bool_to_int(company.rejected),
                bool_to_int(company.responded),
                company.created_at,
                company.updated_at,
            ],
        )?;

        Ok(company.id)
    }

    fn get(&self, id: CompanyId) -> RepoResult<Option<Company>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPANY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_company_row(row)?));
        }
        Ok(None)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Company>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPANY_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_company_row(row)?));
        }
        Ok(None)
    }

    fn search(&self, fragment: &str) -> RepoResult<Vec<Company>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COMPANY_SELECT_SQL}
             WHERE name LIKE '%' || ?1 || '%'
             ORDER BY updated_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([fragment])?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }
        Ok(companies)
    }

    fn list(&self, filter: CompanyFilter) -> RepoResult<Vec<Company>> {
        let (clause, bind_values) = filter_clause(filter);
        let mut stmt = self.conn.prepare(&format!(
            "{COMPANY_SELECT_SQL}{clause} ORDER BY updated_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }
        Ok(companies)
    }

    fn exists(&self, id: CompanyId) -> RepoResult<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM companies WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(found == 1)
    }

    fn mark_responded(&self, id: CompanyId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE companies SET responded = 1, updated_at = ?2 WHERE id = ?1;",
            params![id.to_string(), now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::CompanyNotFound(id.to_string()));
        }
        Ok(())
    }

    fn mark_rejected(&self, id: CompanyId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE companies SET rejected = 1, updated_at = ?2 WHERE id = ?1;",
            params![id.to_string(), now_epoch_ms()],
        )?;
        if changed == 0 {
            return Err(RepoError::CompanyNotFound(id.to_string()));
        }
        Ok(())
    }

    fn count(&self, filter: CompanyFilter) -> RepoResult<i64> {
        let (clause, bind_values) = filter_clause(filter);
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM companies{clause};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn count_created_between(&self, start_ms: i64, end_ms: i64) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM companies WHERE created_at >= ?1 AND created_at <= ?2;",
            params![start_ms, end_ms],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn filter_clause(filter: CompanyFilter) -> (String, Vec<Value>) {
    let mut clause = String::new();
    let mut bind_values = Vec::new();
    let mut add = |column: &str, flag: bool| {
        clause.push_str(if clause.is_empty() { " WHERE " } else { " AND " });
        clause.push_str(column);
        clause.push_str(" = ?");
        bind_values.push(Value::Integer(bool_to_int(flag)));
    };
    if let Some(rejected) = filter.rejected {
        add("rejected", rejected);
    }
    if let Some(responded) = filter.responded {
        add("responded", responded);
    }
    (clause, bind_values)
}

fn parse_company_row(row: &Row<'_>) -> RepoResult<Company> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in companies.id"))
    })?;

    Ok(Company {
        id,
        name: row.get("name")?,
        rejected: int_to_bool(row.get("rejected")?, "companies.rejected")?,
        responded: int_to_bool(row.get("responded")?, "companies.responded")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
