//! Database layer — migrations and snapshot queries.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::Result;
use crate::snapshot::{SnapshotRecord, SummarySnapshot};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    connect(database_url, 5).await
}

/// Like [`init_pool`] with an explicit pool size.
///
/// `sqlite::memory:` databases are per-connection, so callers using one must
/// pass `max_connections = 1`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Snapshot writes
// ─────────────────────────────────────────────────────────

/// Persist one snapshot and return its row id.
pub async fn insert_snapshot(pool: &SqlitePool, snap: &SummarySnapshot) -> Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO summary_snapshots
            (account, author, is_active, total_invested, periods_passed, income_rate,
             outgoing_rate, project_id, stream_started, refill_period_secs, observed_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&snap.account)
    .bind(&snap.author)
    .bind(snap.is_active)
    .bind(&snap.total_invested)
    .bind(snap.periods_passed)
    .bind(&snap.income_rate)
    .bind(&snap.outgoing_rate)
    .bind(snap.project_id)
    .bind(snap.stream_started)
    .bind(snap.refill_period_secs)
    .bind(snap.observed_at)
    .execute(pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

// ─────────────────────────────────────────────────────────
// Snapshot reads
// ─────────────────────────────────────────────────────────

/// The most recent snapshot for `account`, if any.
pub async fn latest_snapshot(pool: &SqlitePool, account: &str) -> Result<Option<SnapshotRecord>> {
    let row = sqlx::query_as::<_, SnapshotRecord>(
        r#"
        SELECT id, account, author, is_active, total_invested, periods_passed, income_rate,
               outgoing_rate, project_id, stream_started, refill_period_secs, observed_at,
               created_at
        FROM   summary_snapshots
        WHERE  account = ?1
        ORDER  BY observed_at DESC, id DESC
        LIMIT  1
        "#,
    )
    .bind(account)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Up to `limit` snapshots for `account`, newest first.
pub async fn snapshot_history(
    pool: &SqlitePool,
    account: &str,
    limit: u32,
) -> Result<Vec<SnapshotRecord>> {
    let rows = sqlx::query_as::<_, SnapshotRecord>(
        r#"
        SELECT id, account, author, is_active, total_invested, periods_passed, income_rate,
               outgoing_rate, project_id, stream_started, refill_period_secs, observed_at,
               created_at
        FROM   summary_snapshots
        WHERE  account = ?1
        ORDER  BY observed_at DESC, id DESC
        LIMIT  ?2
        "#,
    )
    .bind(account)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every account with at least one snapshot, sorted.
pub async fn tracked_accounts(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT account FROM summary_snapshots ORDER BY account ASC")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(a,)| a).collect())
}
