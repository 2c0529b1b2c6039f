use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

pub const NIGHTS_TABLE: &str = "daily_sleep_quality_table";

const QUALITY_MIGRATION: &str = "20250310_0002_add_quality_rating";

/// Ensure that the `log` table exists with the modern schema.
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

/// Check if the nights table exists.
fn nights_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt
        .query_row([NIGHTS_TABLE], |row| row.get(0))
        .optional()?;
    Ok(exists.is_some())
}

/// Check if the nights table already carries the `quality_rating` column.
fn nights_has_quality_column(conn: &Connection) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{NIGHTS_TABLE}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == "quality_rating" {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the nights table with the modern schema.
fn create_nights_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {NIGHTS_TABLE} (
            nightId          INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time_milli INTEGER NOT NULL,
            end_time_milli   INTEGER NOT NULL,
            quality_rating   INTEGER NOT NULL DEFAULT -1
        );
        "#
    ))?;
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

/// Early databases stored only start/end; ratings came later.
fn migrate_add_quality_column(conn: &Connection) -> Result<()> {
    if migration_applied(conn, QUALITY_MIGRATION)? || nights_has_quality_column(conn)? {
        return Ok(());
    }

    conn.execute(
        &format!("ALTER TABLE {NIGHTS_TABLE} ADD COLUMN quality_rating INTEGER NOT NULL DEFAULT -1;"),
        [],
    )?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Added quality_rating to nights')",
        [QUALITY_MIGRATION],
    )?;

    info!(version = QUALITY_MIGRATION, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Called by `db::initialize::init_db()`.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    if nights_table_exists(conn)? {
        migrate_add_quality_column(conn)?;
    } else {
        create_nights_table(conn)?;
        info!(table = NIGHTS_TABLE, "created nights table");
    }

    Ok(())
}
