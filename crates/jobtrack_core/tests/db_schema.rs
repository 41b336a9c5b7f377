use jobtrack_core::db::migrations::{apply_migrations, latest_version, reset_schema, MigrateOutcome};
use jobtrack_core::db::{open_db, open_db_in_memory, DbError};
use jobtrack_core::{Company, CompanyRepository, RepoError, SqliteCompanyRepository};
use rusqlite::Connection;

#[test]
fn migrate_creates_all_tables() {
    let conn = open_db_in_memory().unwrap();
    let outcome = apply_migrations(&conn).unwrap();

    assert_eq!(
        outcome,
        MigrateOutcome::Applied {
            version: latest_version()
        }
    );
    assert_table_exists(&conn, "companies");
    assert_table_exists(&conn, "events");
    assert_table_exists(&conn, "todos");
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn migrate_twice_reports_already_initialized() {
    let conn = open_db_in_memory().unwrap();
    apply_migrations(&conn).unwrap();

    let outcome = apply_migrations(&conn).unwrap();
    assert_eq!(
        outcome,
        MigrateOutcome::AlreadyInitialized {
            version: latest_version()
        }
    );
}

#[test]
fn repository_before_migrate_reports_store_unavailable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCompanyRepository::new(&conn);

    let err = repo.create(&Company::new("Acme")).unwrap_err();
    assert!(matches!(err, RepoError::StoreUnavailable));
}

#[test]
fn reset_schema_wipes_existing_data() {
    let conn = open_db_in_memory().unwrap();
    apply_migrations(&conn).unwrap();

    let repo = SqliteCompanyRepository::new(&conn);
    repo.create(&Company::new("Acme")).unwrap();
    assert_eq!(repo.count(Default::default()).unwrap(), 1);

    let outcome = reset_schema(&conn).unwrap();
    assert_eq!(
        outcome,
        MigrateOutcome::Applied {
            version: latest_version()
        }
    );
    assert_eq!(repo.count(Default::default()).unwrap(), 0);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let err = apply_migrations(&conn).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn migrating_same_file_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobtrack.db");

    let conn_first = open_db(&path).unwrap();
    apply_migrations(&conn_first).unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(
        apply_migrations(&conn_second).unwrap(),
        MigrateOutcome::AlreadyInitialized {
            version: latest_version()
        }
    );
    assert_table_exists(&conn_second, "companies");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
