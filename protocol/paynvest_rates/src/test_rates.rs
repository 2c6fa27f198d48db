use alloy_primitives::U256;
use proptest::prelude::*;

use crate::invariants::{assert_masks_cover_word, assert_masks_disjoint, assert_round_trip};
use crate::rates::{decode, encode, DecodedRates, AMOUNT_MASK};

fn amount_from_parts(hi: u32, lo: u64) -> U256 {
    (U256::from(hi) << 64) | U256::from(lo)
}

#[test]
fn test_masks_are_mutually_exclusive() {
    assert_masks_disjoint();
}

#[test]
fn test_masks_cover_all_bits() {
    assert_masks_cover_word();
}

#[test]
fn test_round_trip_at_field_limits() {
    let rates = DecodedRates {
        income_amount: AMOUNT_MASK,
        outgoing_amount: AMOUNT_MASK,
        project_id: u32::MAX,
        timestamp: u32::MAX,
    };
    let encoded = encode(&rates);
    assert_eq!(encoded, U256::MAX);
    assert_round_trip(&rates, encoded);
}

#[test]
fn test_fields_do_not_bleed_into_neighbours() {
    // Only the income slot is populated; every other field must stay zero.
    let rates = DecodedRates {
        income_amount: AMOUNT_MASK,
        ..DecodedRates::default()
    };
    let decoded = decode(encode(&rates));
    assert_eq!(decoded.outgoing_amount, U256::ZERO);
    assert_eq!(decoded.project_id, 0);
    assert_eq!(decoded.timestamp, 0);
}

#[test]
fn test_known_subscription_value() {
    // subscribe(author, 1 USDC/period, project 3) opened at 2024-01-01T00:00:00Z
    let encoded = U256::from_str_radix(
        "65920080000000030000000000000000000f42400000000000000000000f4240",
        16,
    )
    .unwrap();

    let decoded = decode(encoded);
    assert_eq!(decoded.income_amount, U256::from(1_000_000u64));
    assert_eq!(decoded.outgoing_amount, U256::from(1_000_000u64));
    assert_eq!(decoded.project_id, 3);
    assert_eq!(decoded.timestamp, 1_704_067_200);
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(
        income_hi in 0u32..=u32::MAX,
        income_lo in any::<u64>(),
        outgoing_hi in 0u32..=u32::MAX,
        outgoing_lo in any::<u64>(),
        project_id in any::<u32>(),
        timestamp in any::<u32>(),
    ) {
        let rates = DecodedRates {
            income_amount: amount_from_parts(income_hi, income_lo),
            outgoing_amount: amount_from_parts(outgoing_hi, outgoing_lo),
            project_id,
            timestamp,
        };
        let encoded = encode(&rates);
        prop_assert_eq!(decode(encoded), rates);
    }
}
