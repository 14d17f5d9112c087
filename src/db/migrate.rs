use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Staging tables, modern schema.
fn create_staging_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id                     INTEGER PRIMARY KEY,
            name                   TEXT NOT NULL UNIQUE,
            address                TEXT NOT NULL DEFAULT '',
            latitude               REAL,
            longitude              REAL,
            phone                  TEXT NOT NULL DEFAULT '',
            email                  TEXT NOT NULL DEFAULT '',
            price                  TEXT NOT NULL DEFAULT '0',
            clean_frequency        TEXT NOT NULL DEFAULT 'one-off',
            notes                  TEXT NOT NULL DEFAULT '',
            target_time_minutes    INTEGER,
            average_wage_ratio     REAL,
            is_friends_family      INTEGER NOT NULL DEFAULT 0,
            friends_family_minutes INTEGER,
            active                 INTEGER NOT NULL DEFAULT 1,
            created_at             TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS jobs (
            id                       INTEGER PRIMARY KEY,
            customer_id              INTEGER NOT NULL REFERENCES customers(id),
            team_id                  INTEGER NOT NULL,
            status                   TEXT NOT NULL,
            created_at               TEXT NOT NULL,
            price                    TEXT NOT NULL DEFAULT '0',
            team_members_at_creation TEXT NOT NULL DEFAULT '[]',
            additional_staff         TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS time_entries (
            id                  INTEGER PRIMARY KEY,
            user_id             INTEGER,
            staff               TEXT NOT NULL,
            job_id              INTEGER NOT NULL REFERENCES jobs(id),
            clock_in_time       TEXT NOT NULL,
            clock_out_time      TEXT,
            lunch_break         INTEGER NOT NULL DEFAULT 0,
            geofence_override   INTEGER NOT NULL DEFAULT 0,
            auto_lunch_deducted INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS team_memberships (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            team_id       INTEGER NOT NULL,
            name          TEXT NOT NULL,
            original_team TEXT NOT NULL,
            start_date    TEXT NOT NULL,
            end_date      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_jobs_customer ON jobs(customer_id);
        CREATE INDEX IF NOT EXISTS idx_time_entries_job ON time_entries(job_id);
        CREATE INDEX IF NOT EXISTS idx_memberships_team ON team_memberships(team_id, start_date);
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Older staging databases have a `jobs` table without the team snapshot
/// columns.
fn migrate_add_team_snapshot_columns(conn: &Connection) -> Result<()> {
    let version = "20250610_0002_add_team_snapshot_columns";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    let mut added = Vec::new();
    for column in ["team_members_at_creation", "additional_staff"] {
        if !column_exists(conn, "jobs", column)? {
            conn.execute(
                &format!("ALTER TABLE jobs ADD COLUMN {column} TEXT NOT NULL DEFAULT '[]';"),
                [],
            )?;
            added.push(column);
        }
    }

    mark_applied(conn, version, "Team snapshot columns on jobs")?;

    if !added.is_empty() {
        success(format!(
            "Migration applied: {} → added {} to jobs table",
            version,
            added.join(", ")
        ));
    }

    Ok(())
}

/// Public entry point: run all pending migrations. Safe to call on every
/// start.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;
    create_staging_tables(conn)?;
    migrate_add_team_snapshot_columns(conn)?;
    Ok(())
}
