//! # Rates
//!
//! PeriodPapaya stores the billing state of a subscription as one `uint256`,
//! four fields packed low to high:
//!
//! ```text
//!  255        224 223        192 191                  96 95                    0
//! ┌────────────┬──────────────┬──────────────────────┬──────────────────────┐
//! │ timestamp  │  project_id  │   outgoing_amount    │    income_amount     │
//! │  32 bits   │   32 bits    │       96 bits        │       96 bits        │
//! └────────────┴──────────────┴──────────────────────┴──────────────────────┘
//! ```
//!
//! Extraction is shift-then-mask, so [`decode`] is total over `U256`.

use alloy_primitives::U256;

use crate::errors::{RatesError, Result};

/// Bit offset of `income_amount`.
pub const INCOME_SHIFT: usize = 0;
/// Bit offset of `outgoing_amount`.
pub const OUTGOING_SHIFT: usize = 96;
/// Bit offset of `project_id`.
pub const PROJECT_ID_SHIFT: usize = 192;
/// Bit offset of `timestamp`.
pub const TIMESTAMP_SHIFT: usize = 224;

/// `(1 << 96) - 1`
pub const AMOUNT_MASK: U256 = U256::from_limbs([u64::MAX, 0xFFFF_FFFF, 0, 0]);
/// `(1 << 32) - 1`
pub const WORD_MASK: U256 = U256::from_limbs([0xFFFF_FFFF, 0, 0, 0]);

/// The four fields unpacked from an encoded rate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DecodedRates {
    /// Amount credited to the author each period, in token base units.
    pub income_amount: U256,
    /// Amount debited from the subscriber each period, in token base units.
    pub outgoing_amount: U256,
    pub project_id: u32,
    /// Unix seconds at which the stream started.
    pub timestamp: u32,
}

/// Unpack an encoded rate.
pub fn decode(encoded: U256) -> DecodedRates {
    let income_amount = (encoded >> INCOME_SHIFT) & AMOUNT_MASK;
    let outgoing_amount = (encoded >> OUTGOING_SHIFT) & AMOUNT_MASK;
    let project_id = ((encoded >> PROJECT_ID_SHIFT) & WORD_MASK).wrapping_to::<u32>();
    let timestamp = ((encoded >> TIMESTAMP_SHIFT) & WORD_MASK).wrapping_to::<u32>();

    DecodedRates {
        income_amount,
        outgoing_amount,
        project_id,
        timestamp,
    }
}

/// Pack four fields the way the contract does.
///
/// Amounts wider than 96 bits are truncated to their slot.
pub fn encode(rates: &DecodedRates) -> U256 {
    ((rates.income_amount & AMOUNT_MASK) << INCOME_SHIFT)
        | ((rates.outgoing_amount & AMOUNT_MASK) << OUTGOING_SHIFT)
        | (U256::from(rates.project_id) << PROJECT_ID_SHIFT)
        | (U256::from(rates.timestamp) << TIMESTAMP_SHIFT)
}

/// Parse an encoded rate from `0x`-prefixed hex or from decimal.
pub fn parse_encoded(raw: &str) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("0x") {
        return Err(RatesError::InvalidEncoding("empty value".to_string()));
    }

    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(trimmed, 10),
    };

    parsed.map_err(|e| RatesError::InvalidEncoding(format!("{trimmed}: {e}")))
}
