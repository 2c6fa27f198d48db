//! PeriodPapaya and Paynvest view bindings.
//!
//! Uses alloy's `sol!` macro to generate the ABI encoders/decoders for the
//! read-only calls the tracker makes. `balanceOf` has the ERC-20 signature, so
//! the same encoder serves both the Papaya balance and the Paynvest token.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use paynvest_rates::SubscriptionRecord;

use crate::errors::Result;

sol! {
    interface IPeriodPapaya {
        function subscriptions(address user, address author) external view returns (bool isActive, uint256 encodedRates);
        function REFILL_DAYS() external view returns (uint256 refillDays);
        function balanceOf(address account) external view returns (uint256 balance);
    }
}

pub fn subscriptions_calldata(user: Address, author: Address) -> Vec<u8> {
    IPeriodPapaya::subscriptionsCall { user, author }.abi_encode()
}

pub fn decode_subscription(data: &[u8]) -> Result<SubscriptionRecord> {
    let ret = IPeriodPapaya::subscriptionsCall::abi_decode_returns(data, true)?;
    Ok(SubscriptionRecord {
        is_active: ret.isActive,
        encoded_rates: ret.encodedRates,
    })
}

pub fn refill_days_calldata() -> Vec<u8> {
    IPeriodPapaya::REFILL_DAYSCall {}.abi_encode()
}

pub fn decode_refill_days(data: &[u8]) -> Result<U256> {
    Ok(IPeriodPapaya::REFILL_DAYSCall::abi_decode_returns(data, true)?.refillDays)
}

/// `balanceOf(account)`; valid against PeriodPapaya and any ERC-20.
pub fn balance_of_calldata(account: Address) -> Vec<u8> {
    IPeriodPapaya::balanceOfCall { account }.abi_encode()
}

pub fn decode_balance(data: &[u8]) -> Result<U256> {
    Ok(IPeriodPapaya::balanceOfCall::abi_decode_returns(data, true)?.balance)
}
