//! Stored investment summaries.

use alloy_primitives::Address;
use paynvest_rates::{decode, InvestmentSummary, SubscriptionRecord};
use serde::{Deserialize, Serialize};

/// A freshly computed summary, ready to be stored in the database.
#[derive(Debug, Clone, Serialize)]
pub struct SummarySnapshot {
    pub account: String,
    pub author: String,
    pub is_active: bool,
    pub total_invested: String,
    pub periods_passed: i64,
    pub income_rate: String,
    pub outgoing_rate: String,
    pub project_id: i64,
    pub stream_started: i64,
    pub refill_period_secs: i64,
    pub observed_at: i64,
}

impl SummarySnapshot {
    pub fn new(
        account: Address,
        author: Address,
        record: &SubscriptionRecord,
        summary: &InvestmentSummary,
        refill_period_secs: u64,
        observed_at: u64,
    ) -> Self {
        // Inactive subscriptions report no rate data at all, matching the summary.
        let (outgoing_rate, project_id) = if record.is_active {
            let rates = decode(record.encoded_rates);
            (rates.outgoing_amount.to_string(), i64::from(rates.project_id))
        } else {
            ("0".to_string(), 0)
        };

        Self {
            account: account_key(&account),
            author: account_key(&author),
            is_active: record.is_active,
            total_invested: summary.total_invested.to_string(),
            periods_passed: clamp_i64(summary.periods_passed),
            income_rate: summary.income_rate.to_string(),
            outgoing_rate,
            project_id,
            stream_started: clamp_i64(summary.stream_started),
            refill_period_secs: clamp_i64(refill_period_secs),
            observed_at: clamp_i64(observed_at),
        }
    }
}

/// A snapshot as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SnapshotRecord {
    pub id: i64,
    pub account: String,
    pub author: String,
    pub is_active: bool,
    pub total_invested: String,
    pub periods_passed: i64,
    pub income_rate: String,
    pub outgoing_rate: String,
    pub project_id: i64,
    pub stream_started: i64,
    pub refill_period_secs: i64,
    pub observed_at: i64,
    pub created_at: i64,
}

/// Canonical (lower-case, 0x-prefixed) form used as the storage key.
pub fn account_key(address: &Address) -> String {
    format!("{address:#x}")
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
