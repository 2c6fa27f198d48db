//! Axum REST API handlers.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use paynvest_rates::{decode, format_units, parse_encoded};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::warn;

use crate::config::Config;
use crate::db;
use crate::errors::TrackerError;
use crate::poller;
use crate::session::ContractReader;
use crate::snapshot::{account_key, SnapshotRecord};

const DEFAULT_HISTORY_LIMIT: u32 = 100;
const MAX_HISTORY_LIMIT: u32 = 1_000;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub config: Config,
    pub reader: Arc<dyn ContractReader>,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SummaryResponse {
    pub account: String,
    pub author: String,
    pub is_active: bool,
    pub total_invested: String,
    pub total_invested_formatted: String,
    pub periods_passed: i64,
    pub income_rate: String,
    pub income_rate_formatted: String,
    pub outgoing_rate: String,
    pub project_id: i64,
    pub stream_started: i64,
    pub refill_period_secs: i64,
    pub observed_at: i64,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub account: String,
    pub count: usize,
    pub snapshots: Vec<SummaryResponse>,
}

#[derive(Serialize)]
pub struct AccountsResponse {
    pub count: usize,
    pub accounts: Vec<String>,
}

#[derive(Serialize)]
pub struct LiveResponse {
    #[serde(flatten)]
    pub summary: SummaryResponse,
    pub papaya_balance: String,
    pub papaya_balance_formatted: String,
    pub paynvest_balance: String,
    pub paynvest_balance_formatted: String,
}

#[derive(Serialize)]
pub struct DecodeResponse {
    pub encoded: String,
    pub income_amount: String,
    pub outgoing_amount: String,
    pub project_id: u32,
    pub timestamp: u32,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /accounts`
pub async fn list_accounts(State(state): State<Arc<ApiState>>) -> Response {
    match db::tracked_accounts(&state.pool).await {
        Ok(accounts) => Json(AccountsResponse {
            count: accounts.len(),
            accounts,
        })
        .into_response(),
        Err(e) => failure(&e),
    }
}

/// `GET /accounts/:address/summary`
///
/// Returns the most recent stored summary for the account.
pub async fn get_summary(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Response {
    let account = match parse_account(&address) {
        Ok(a) => a,
        Err(e) => return failure(&e),
    };

    match db::latest_snapshot(&state.pool, &account_key(&account)).await {
        Ok(Some(record)) => Json(to_response(record, state.config.token_decimals)).into_response(),
        Ok(None) => error_json(
            StatusCode::NOT_FOUND,
            format!("No summary recorded for {address}"),
        ),
        Err(e) => failure(&e),
    }
}

/// `GET /accounts/:address/history?limit=N`
///
/// Returns stored summaries for the account, newest first.
pub async fn get_history(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let account = match parse_account(&address) {
        Ok(a) => a,
        Err(e) => return failure(&e),
    };
    let key = account_key(&account);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    match db::snapshot_history(&state.pool, &key, limit).await {
        Ok(records) => {
            let snapshots: Vec<_> = records
                .into_iter()
                .map(|r| to_response(r, state.config.token_decimals))
                .collect();
            Json(HistoryResponse {
                account: key,
                count: snapshots.len(),
                snapshots,
            })
            .into_response()
        }
        Err(e) => failure(&e),
    }
}

/// `GET /accounts/:address/live`
///
/// Reads the subscription and both balances from the chain now, stores the
/// resulting summary and returns it. Nothing is stored unless every read
/// succeeded.
pub async fn get_live(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Response {
    let account = match parse_account(&address) {
        Ok(a) => a,
        Err(e) => return failure(&e),
    };
    let reader = state.reader.as_ref();

    let refill_period_secs =
        match poller::resolve_refill_period(reader, state.config.refill_days_fallback).await {
            Ok(secs) => secs,
            Err(e) => return failure(&e),
        };

    let papaya_balance = match reader.balance_of(account).await {
        Ok(b) => b,
        Err(e) => return failure(&e),
    };
    let paynvest_balance = match reader.paynvest_balance_of(account).await {
        Ok(b) => b,
        Err(e) => return failure(&e),
    };

    let snap = match poller::refresh_account(
        &state.pool,
        reader,
        account,
        state.config.paynvest_address,
        refill_period_secs,
        poller::unix_now(),
    )
    .await
    {
        Ok(snap) => snap,
        Err(e) => return failure(&e),
    };

    let decimals = state.config.token_decimals;
    let summary = SummaryResponse {
        total_invested_formatted: format_decimal_string(&snap.total_invested, decimals),
        income_rate_formatted: format_decimal_string(&snap.income_rate, decimals),
        account: snap.account,
        author: snap.author,
        is_active: snap.is_active,
        total_invested: snap.total_invested,
        periods_passed: snap.periods_passed,
        income_rate: snap.income_rate,
        outgoing_rate: snap.outgoing_rate,
        project_id: snap.project_id,
        stream_started: snap.stream_started,
        refill_period_secs: snap.refill_period_secs,
        observed_at: snap.observed_at,
    };

    Json(LiveResponse {
        summary,
        papaya_balance: papaya_balance.to_string(),
        papaya_balance_formatted: format_units(papaya_balance, decimals),
        paynvest_balance: paynvest_balance.to_string(),
        paynvest_balance_formatted: format_units(
            paynvest_balance,
            state.config.paynvest_decimals,
        ),
    })
    .into_response()
}

/// `GET /decode/:encoded`
///
/// Unpacks a hex (`0x…`) or decimal encoded rate.
pub async fn decode_rates(Path(raw): Path<String>) -> Response {
    match parse_encoded(&raw) {
        Ok(encoded) => {
            let rates = decode(encoded);
            Json(DecodeResponse {
                encoded: format!("{encoded:#x}"),
                income_amount: rates.income_amount.to_string(),
                outgoing_amount: rates.outgoing_amount.to_string(),
                project_id: rates.project_id,
                timestamp: rates.timestamp,
            })
            .into_response()
        }
        Err(e) => error_json(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

// ─────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────

fn parse_account(raw: &str) -> Result<Address, TrackerError> {
    raw.parse()
        .map_err(|_| TrackerError::InvalidInput(format!("Invalid address: {raw}")))
}

fn to_response(record: SnapshotRecord, decimals: u8) -> SummaryResponse {
    SummaryResponse {
        total_invested_formatted: format_decimal_string(&record.total_invested, decimals),
        income_rate_formatted: format_decimal_string(&record.income_rate, decimals),
        account: record.account,
        author: record.author,
        is_active: record.is_active,
        total_invested: record.total_invested,
        periods_passed: record.periods_passed,
        income_rate: record.income_rate,
        outgoing_rate: record.outgoing_rate,
        project_id: record.project_id,
        stream_started: record.stream_started,
        refill_period_secs: record.refill_period_secs,
        observed_at: record.observed_at,
    }
}

/// Format a stored decimal amount; unparsable text is passed through.
fn format_decimal_string(amount: &str, decimals: u8) -> String {
    U256::from_str_radix(amount, 10)
        .map(|v| format_units(v, decimals))
        .unwrap_or_else(|_| amount.to_string())
}

fn status_for(err: &TrackerError) -> StatusCode {
    match err {
        TrackerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TrackerError::Communication(_) | TrackerError::Http(_) | TrackerError::Abi(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(err: &TrackerError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        warn!("Request failed: {err}");
    }
    error_json(status, err.to_string())
}

fn error_json(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
