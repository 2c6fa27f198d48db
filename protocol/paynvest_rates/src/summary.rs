//! # Summary
//!
//! Derives "total invested" for a subscription from its encoded rate, the
//! contract's refill period and the wall clock.
//!
//! A subscription accrues one `income_amount` per elapsed refill period,
//! counted from the stream start stored in the encoded rate:
//!
//! ```text
//! periods_passed = floor((now - stream_started) / refill_period)   (0 if now < stream_started)
//! total_invested = periods_passed * income_amount
//! ```

use alloy_primitives::U256;

use crate::errors::{RatesError, Result};
use crate::rates::decode;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Subscription state as returned by `subscriptions(user, author)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SubscriptionRecord {
    pub is_active: bool,
    pub encoded_rates: U256,
}

/// Investment activity of one subscription at a point in time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InvestmentSummary {
    pub total_invested: U256,
    pub periods_passed: u64,
    pub income_rate: U256,
    /// Unix seconds; `0` for an inactive subscription.
    pub stream_started: u64,
}

/// Compute the summary of `record` as of `now` (Unix seconds).
///
/// Fails with [`RatesError::InvalidConfiguration`] when `refill_period_secs`
/// is zero, whatever the record holds.
pub fn compute_investment_summary(
    record: &SubscriptionRecord,
    refill_period_secs: u64,
    now: u64,
) -> Result<InvestmentSummary> {
    if refill_period_secs == 0 {
        return Err(RatesError::InvalidConfiguration(
            "refill period must be greater than zero".to_string(),
        ));
    }

    if !record.is_active {
        return Ok(InvestmentSummary::default());
    }

    let rates = decode(record.encoded_rates);
    let stream_started = u64::from(rates.timestamp);
    let periods_passed = now.saturating_sub(stream_started) / refill_period_secs;

    // income < 2^96 and periods < 2^64, so the product fits in 160 bits.
    let total_invested = U256::from(periods_passed) * rates.income_amount;

    Ok(InvestmentSummary {
        total_invested,
        periods_passed,
        income_rate: rates.income_amount,
        stream_started,
    })
}

/// Convert the contract's `REFILL_DAYS` value into seconds.
pub fn refill_period_from_days(days: U256) -> Result<u64> {
    if days.is_zero() {
        return Err(RatesError::InvalidConfiguration(
            "REFILL_DAYS is zero".to_string(),
        ));
    }

    days.checked_mul(U256::from(SECONDS_PER_DAY))
        .and_then(|secs| u64::try_from(secs).ok())
        .ok_or_else(|| {
            RatesError::InvalidConfiguration(format!("REFILL_DAYS {days} does not fit in seconds"))
        })
}
