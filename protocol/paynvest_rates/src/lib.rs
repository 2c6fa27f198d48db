//! # Paynvest rates
//!
//! Pure helpers behind the Paynvest dashboard's "total invested" figure.
//!
//! | Concern       | Entry point(s)                                      |
//! |---------------|-----------------------------------------------------|
//! | Unpacking     | [`decode`], [`encode`], [`parse_encoded`]           |
//! | Accrual       | [`compute_investment_summary`]                      |
//! | Refill period | [`refill_period_from_days`]                         |
//! | Display       | [`format_units`]                                    |
//!
//! Nothing here performs I/O or holds state; every function may be called
//! from any thread. Reading the subscription from the chain is the caller's
//! job (see the `tracker` crate).

mod errors;
pub mod rates;
pub mod summary;
mod units;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_rates;
#[cfg(test)]
mod test_summary;

pub use alloy_primitives::U256;
pub use errors::{RatesError, Result};
pub use rates::{decode, encode, parse_encoded, DecodedRates};
pub use summary::{
    compute_investment_summary, refill_period_from_days, InvestmentSummary, SubscriptionRecord,
    SECONDS_PER_DAY,
};
pub use units::format_units;
