#![allow(dead_code)]

use alloy_primitives::U256;

use crate::rates::{
    decode, DecodedRates, AMOUNT_MASK, INCOME_SHIFT, OUTGOING_SHIFT, PROJECT_ID_SHIFT,
    TIMESTAMP_SHIFT, WORD_MASK,
};
use crate::summary::InvestmentSummary;

/// Every field mask moved into its slot.
pub fn positioned_masks() -> [U256; 4] {
    [
        AMOUNT_MASK << INCOME_SHIFT,
        AMOUNT_MASK << OUTGOING_SHIFT,
        WORD_MASK << PROJECT_ID_SHIFT,
        WORD_MASK << TIMESTAMP_SHIFT,
    ]
}

/// INV-1: positioned masks never share a bit.
pub fn assert_masks_disjoint() {
    let masks = positioned_masks();
    for (i, a) in masks.iter().enumerate() {
        for (j, b) in masks.iter().enumerate().skip(i + 1) {
            assert_eq!(
                *a & *b,
                U256::ZERO,
                "INV-1 violated: masks {i} and {j} overlap"
            );
        }
    }
}

/// INV-2: positioned masks cover the whole word.
pub fn assert_masks_cover_word() {
    let union = positioned_masks()
        .iter()
        .fold(U256::ZERO, |acc, mask| acc | *mask);
    assert_eq!(union, U256::MAX, "INV-2 violated: masks leave bits uncovered");
}

/// INV-3: decoding reproduces the fields that were packed.
pub fn assert_round_trip(original: &DecodedRates, encoded: U256) {
    let decoded = decode(encoded);
    assert_eq!(
        &decoded, original,
        "INV-3 violated: {encoded:#x} decoded to {decoded:?}, expected {original:?}"
    );
}

/// INV-4: total invested is exactly periods × rate.
pub fn assert_summary_consistent(summary: &InvestmentSummary) {
    assert_eq!(
        summary.total_invested,
        U256::from(summary.periods_passed) * summary.income_rate,
        "INV-4 violated: {summary:?}"
    );
}

/// INV-5: an inactive subscription reports nothing at all.
pub fn assert_inactive_summary(summary: &InvestmentSummary) {
    assert_eq!(
        *summary,
        InvestmentSummary::default(),
        "INV-5 violated: inactive subscription produced {summary:?}"
    );
}
