//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied by [`Database::new`](crate::Database::new). sqlx records each one
//! in `_sqlx_migrations`, so a second run only picks up files it has not
//! seen.
//!
//! ```text
//! migrations/sqlite/
//! └── 0001_initial_schema.sql   products, customers, sales_records, deliveries
//! ```
//!
//! Applied files are never edited. Schema changes go in a new
//! `NNNN_description.sql` with the next number.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded in the database.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying migrations");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}

/// Versions recorded as applied, oldest first.
pub async fn applied_versions(pool: &SqlitePool) -> DbResult<Vec<i64>> {
    let versions = sqlx::query_scalar("SELECT version FROM _sqlx_migrations ORDER BY version")
        .fetch_all(pool)
        .await?;
    Ok(versions)
}

/// Versions compiled into this build.
pub fn embedded_versions() -> Vec<i64> {
    MIGRATOR.iter().map(|m| m.version).collect()
}
