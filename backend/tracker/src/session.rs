//! Chain session — the explicitly owned handle for contract reads.
//!
//! One [`ChainSession`] is built in `main` and shared (behind an `Arc`) by the
//! poller and the API. Pointing the tracker at another node means building a
//! new session, never mutating a global.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use paynvest_rates::SubscriptionRecord;
use reqwest::Client;

use crate::config::Config;
use crate::contract;
use crate::errors::Result;
use crate::rpc;

/// Read access to the PeriodPapaya contract.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// `subscriptions(user, author)`
    async fn subscription(&self, user: Address, author: Address) -> Result<SubscriptionRecord>;

    /// `REFILL_DAYS()`
    async fn refill_days(&self) -> Result<U256>;

    /// `balanceOf(account)` on PeriodPapaya, the account's internal Papaya balance.
    async fn balance_of(&self, account: Address) -> Result<U256>;

    /// `balanceOf(account)` on the Paynvest token, the shares bought so far.
    async fn paynvest_balance_of(&self, account: Address) -> Result<U256>;
}

#[derive(Debug, Clone)]
pub struct ChainSession {
    client: Client,
    rpc_url: String,
    papaya: Address,
    paynvest: Address,
    max_attempts: u32,
}

impl ChainSession {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            rpc_url: config.rpc_url.clone(),
            papaya: config.period_papaya_address,
            paynvest: config.paynvest_address,
            max_attempts: config.rpc_max_retries,
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call(&self, to: Address, calldata: Vec<u8>) -> Result<Vec<u8>> {
        rpc::eth_call(
            &self.client,
            &self.rpc_url,
            to,
            &calldata,
            self.max_attempts,
        )
        .await
    }
}

#[async_trait]
impl ContractReader for ChainSession {
    async fn subscription(&self, user: Address, author: Address) -> Result<SubscriptionRecord> {
        let data = self
            .call(self.papaya, contract::subscriptions_calldata(user, author))
            .await?;
        contract::decode_subscription(&data)
    }

    async fn refill_days(&self) -> Result<U256> {
        let data = self.call(self.papaya, contract::refill_days_calldata()).await?;
        contract::decode_refill_days(&data)
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        let data = self
            .call(self.papaya, contract::balance_of_calldata(account))
            .await?;
        contract::decode_balance(&data)
    }

    async fn paynvest_balance_of(&self, account: Address) -> Result<U256> {
        let data = self
            .call(self.paynvest, contract::balance_of_calldata(account))
            .await?;
        contract::decode_balance(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_takes_endpoint_and_contract_from_config() {
        let config = Config {
            rpc_url: "http://node-a".to_string(),
            period_papaya_address: Address::with_last_byte(1),
            paynvest_address: Address::with_last_byte(2),
            watch_accounts: vec![],
            database_url: "sqlite::memory:".to_string(),
            api_port: 0,
            poll_interval_secs: 60,
            refill_days_fallback: 7,
            token_decimals: 18,
            paynvest_decimals: 18,
            rpc_max_retries: 3,
        };
        let session = ChainSession::new(Client::new(), &config);

        assert_eq!(session.rpc_url(), "http://node-a");
        assert_eq!(session.papaya, Address::with_last_byte(1));
        assert_eq!(session.paynvest, Address::with_last_byte(2));
        assert_eq!(session.max_attempts, 3);
    }
}
