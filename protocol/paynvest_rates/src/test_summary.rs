use alloy_primitives::U256;

use crate::errors::RatesError;
use crate::invariants::{assert_inactive_summary, assert_summary_consistent};
use crate::rates::{encode, DecodedRates};
use crate::summary::{
    compute_investment_summary, refill_period_from_days, InvestmentSummary, SubscriptionRecord,
    SECONDS_PER_DAY,
};

const NOW: u64 = 1_720_000_000;

fn active(income: u64, outgoing: u64, started: u32) -> SubscriptionRecord {
    SubscriptionRecord {
        is_active: true,
        encoded_rates: encode(&DecodedRates {
            income_amount: U256::from(income),
            outgoing_amount: U256::from(outgoing),
            project_id: 1,
            timestamp: started,
        }),
    }
}

#[test]
fn test_inactive_subscription_is_all_zero() {
    for encoded in [U256::ZERO, U256::from(12345u64), U256::MAX] {
        for now in [0, NOW, u64::MAX] {
            let record = SubscriptionRecord {
                is_active: false,
                encoded_rates: encoded,
            };
            let summary = compute_investment_summary(&record, 30 * SECONDS_PER_DAY, now).unwrap();
            assert_inactive_summary(&summary);
        }
    }
}

#[test]
fn test_stream_started_now_has_zero_periods() {
    let record = active(1_000, 1_000, NOW as u32);
    let summary = compute_investment_summary(&record, SECONDS_PER_DAY, NOW).unwrap();
    assert_eq!(summary.periods_passed, 0);
    assert_eq!(summary.total_invested, U256::ZERO);
    assert_eq!(summary.stream_started, NOW);
}

#[test]
fn test_one_full_period() {
    let record = active(1_000, 4_000, (NOW - SECONDS_PER_DAY) as u32);
    let summary = compute_investment_summary(&record, SECONDS_PER_DAY, NOW).unwrap();
    assert_eq!(
        summary,
        InvestmentSummary {
            total_invested: U256::from(1_000u64),
            periods_passed: 1,
            income_rate: U256::from(1_000u64),
            stream_started: NOW - SECONDS_PER_DAY,
        }
    );
}

#[test]
fn test_partial_period_rounds_down() {
    let record = active(250, 250, (NOW - 2 * SECONDS_PER_DAY + 1) as u32);
    let summary = compute_investment_summary(&record, SECONDS_PER_DAY, NOW).unwrap();
    assert_eq!(summary.periods_passed, 1);
    assert_eq!(summary.total_invested, U256::from(250u64));
    assert_summary_consistent(&summary);
}

#[test]
fn test_zero_refill_period_is_rejected() {
    let records = [
        active(1_000, 1_000, 0),
        SubscriptionRecord::default(),
    ];
    for record in records {
        let err = compute_investment_summary(&record, 0, NOW).unwrap_err();
        assert!(matches!(err, RatesError::InvalidConfiguration(_)));
    }
}

#[test]
fn test_clock_skew_clamps_to_zero_periods() {
    let record = active(1_000, 1_000, (NOW + 3_600) as u32);
    let summary = compute_investment_summary(&record, SECONDS_PER_DAY, NOW).unwrap();
    assert_eq!(summary.periods_passed, 0);
    assert_eq!(summary.total_invested, U256::ZERO);
    assert_eq!(summary.stream_started, NOW + 3_600);
}

#[test]
fn test_large_rate_keeps_full_precision() {
    let max_rate = (U256::from(1u8) << 96) - U256::from(1u8);
    let record = SubscriptionRecord {
        is_active: true,
        encoded_rates: encode(&DecodedRates {
            income_amount: max_rate,
            outgoing_amount: U256::ZERO,
            project_id: 0,
            timestamp: 0,
        }),
    };

    let summary = compute_investment_summary(&record, 1, u64::MAX).unwrap();
    assert_eq!(summary.periods_passed, u64::MAX);
    assert_eq!(summary.total_invested, U256::from(u64::MAX) * max_rate);
    assert_summary_consistent(&summary);
}

#[test]
fn test_outgoing_amount_does_not_affect_total() {
    let a = active(1_000, 1, 0);
    let b = active(1_000, 999_999, 0);
    let sa = compute_investment_summary(&a, SECONDS_PER_DAY, NOW).unwrap();
    let sb = compute_investment_summary(&b, SECONDS_PER_DAY, NOW).unwrap();
    assert_eq!(sa, sb);
}

#[test]
fn test_refill_days_conversion() {
    assert_eq!(refill_period_from_days(U256::from(7u8)).unwrap(), 7 * SECONDS_PER_DAY);
    assert_eq!(refill_period_from_days(U256::from(30u8)).unwrap(), 2_592_000);
}

#[test]
fn test_refill_days_rejects_zero_and_overflow() {
    assert!(matches!(
        refill_period_from_days(U256::ZERO),
        Err(RatesError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        refill_period_from_days(U256::from(u64::MAX)),
        Err(RatesError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        refill_period_from_days(U256::MAX),
        Err(RatesError::InvalidConfiguration(_))
    ));
}
