//! Long-running background task that reads each watched subscription from
//! PeriodPapaya, recomputes its investment summary and stores a snapshot.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use paynvest_rates::{compute_investment_summary, refill_period_from_days, SECONDS_PER_DAY};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db;
use crate::errors::{Result, TrackerError};
use crate::session::ContractReader;
use crate::snapshot::SummarySnapshot;

pub struct PollerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub reader: Arc<dyn ContractReader>,
}

/// Run the poller until `shutdown` is cancelled.
pub async fn run(state: Arc<PollerState>, shutdown: CancellationToken) {
    info!(
        "Poller starting — {} watched account(s), author {}",
        state.config.watch_accounts.len(),
        state.config.paynvest_address
    );

    loop {
        match poll_once(&state).await {
            Ok(stored) => debug!("Poll round stored {stored} snapshot(s)"),
            Err(e) => error!("Poll round failed: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Poller stopping");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
}

/// Perform a single round over every watched account.
///
/// A failing account is logged and skipped. Returns the number of snapshots stored.
pub async fn poll_once(state: &PollerState) -> Result<usize> {
    if state.config.watch_accounts.is_empty() {
        return Ok(0);
    }

    let refill_period_secs =
        resolve_refill_period(state.reader.as_ref(), state.config.refill_days_fallback).await?;
    let now = unix_now();

    let mut stored = 0usize;
    for account in &state.config.watch_accounts {
        match refresh_account(
            &state.pool,
            state.reader.as_ref(),
            *account,
            state.config.paynvest_address,
            refill_period_secs,
            now,
        )
        .await
        {
            Ok(snap) => {
                info!(
                    "{} total_invested={} periods_passed={}",
                    snap.account, snap.total_invested, snap.periods_passed
                );
                stored += 1;
            }
            Err(e) => warn!("Skipping {account}: {e}"),
        }
    }
    Ok(stored)
}

/// Read, compute and store the summary of one subscription.
pub async fn refresh_account(
    pool: &SqlitePool,
    reader: &dyn ContractReader,
    account: Address,
    author: Address,
    refill_period_secs: u64,
    now: u64,
) -> Result<SummarySnapshot> {
    let record = reader.subscription(account, author).await?;
    let summary = compute_investment_summary(&record, refill_period_secs, now)?;
    let snap = SummarySnapshot::new(account, author, &record, &summary, refill_period_secs, now);
    db::insert_snapshot(pool, &snap).await?;
    Ok(snap)
}

/// The contract's refill period in seconds, or `fallback_days` when the
/// contract cannot be read or reports zero.
pub async fn resolve_refill_period(reader: &dyn ContractReader, fallback_days: u64) -> Result<u64> {
    let from_contract = match reader.refill_days().await {
        Ok(days) => refill_period_from_days(days).map_err(Into::into),
        Err(e) => Err(e),
    };

    match from_contract {
        Ok(secs) => Ok(secs),
        Err(e) => {
            warn!("Using REFILL_DAYS fallback of {fallback_days} day(s): {e}");
            fallback_days
                .checked_mul(SECONDS_PER_DAY)
                .ok_or_else(|| {
                    TrackerError::Config(format!("REFILL_DAYS_FALLBACK {fallback_days} overflows"))
                })
        }
    }
}

/// Wall-clock Unix seconds; a clock before the epoch reads as `0`.
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
