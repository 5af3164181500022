use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
    time::Duration,
};

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use tokio::time::sleep;
use tracing::debug;

use crate::rpc::{errors::RpcError, rpc_connection::RpcConnection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolanaRpcUrl {
    Testnet,
    Devnet,
    Localnet,
    Custom(String),
}

impl SolanaRpcUrl {
    /// Value of the explorer `cluster` query parameter for this endpoint.
    pub fn explorer_cluster(&self) -> String {
        match self {
            SolanaRpcUrl::Testnet => "testnet".to_string(),
            SolanaRpcUrl::Devnet => "devnet".to_string(),
            SolanaRpcUrl::Localnet => {
                format!("custom&customUrl={}", SolanaRpcUrl::Localnet)
            }
            SolanaRpcUrl::Custom(url) => format!("custom&customUrl={}", url),
        }
    }
}

impl Display for SolanaRpcUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SolanaRpcUrl::Testnet => "https://api.testnet.solana.com".to_string(),
            SolanaRpcUrl::Devnet => "https://api.devnet.solana.com".to_string(),
            SolanaRpcUrl::Localnet => "http://localhost:8899".to_string(),
            SolanaRpcUrl::Custom(url) => url.clone(),
        };
        write!(f, "{}", str)
    }
}

impl FromStr for SolanaRpcUrl {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "testnet" => SolanaRpcUrl::Testnet,
            "devnet" => SolanaRpcUrl::Devnet,
            "localnet" | "localhost" => SolanaRpcUrl::Localnet,
            url => SolanaRpcUrl::Custom(url.to_string()),
        })
    }
}

#[derive(Clone, Debug, Copy)]
pub struct ConfirmConfig {
    /// Request timeout handed to the underlying RPC client.
    pub timeout: Duration,
    /// Poll interval while waiting for an airdrop to confirm.
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        ConfirmConfig {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            max_polls: 60,
        }
    }
}

pub struct SolanaRpcConnection {
    pub client: RpcClient,
    pub confirm_config: ConfirmConfig,
}

impl Debug for SolanaRpcConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolanaRpcConnection {{ client: {:?} }}",
            self.client.url()
        )
    }
}

impl SolanaRpcConnection {
    pub fn new<U: ToString>(url: U, commitment_config: Option<CommitmentConfig>) -> Self {
        Self::new_with_config(url, commitment_config, ConfirmConfig::default())
    }

    pub fn new_with_config<U: ToString>(
        url: U,
        commitment_config: Option<CommitmentConfig>,
        confirm_config: ConfirmConfig,
    ) -> Self {
        let commitment_config = commitment_config.unwrap_or(CommitmentConfig::confirmed());
        let client = RpcClient::new_with_timeout_and_commitment(
            url.to_string(),
            confirm_config.timeout,
            commitment_config,
        );
        Self {
            client,
            confirm_config,
        }
    }

    async fn wait_for_confirmation(&self, signature: &Signature) -> Result<(), RpcError> {
        for attempt in 0..self.confirm_config.max_polls {
            let confirmed = self
                .client
                .confirm_transaction_with_commitment(signature, self.client.commitment())
                .await?
                .value;
            if confirmed {
                return Ok(());
            }
            debug!(
                "Signature {} not confirmed yet (poll {}/{})",
                signature,
                attempt + 1,
                self.confirm_config.max_polls
            );
            sleep(self.confirm_config.poll_interval).await;
        }
        Err(RpcError::CustomError(format!(
            "Transaction {} not confirmed",
            signature
        )))
    }
}

#[async_trait]
impl RpcConnection for SolanaRpcConnection {
    fn get_url(&self) -> String {
        self.client.url()
    }

    async fn get_minimum_balance_for_rent_exemption(
        &mut self,
        data_len: usize,
    ) -> Result<u64, RpcError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(RpcError::from)
    }

    async fn get_latest_blockhash(&mut self) -> Result<Hash, RpcError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(RpcError::from)
    }

    async fn process_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, RpcError> {
        self.client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(RpcError::from)
    }

    async fn get_account(&mut self, address: Pubkey) -> Result<Option<Account>, RpcError> {
        self.client
            .get_account_with_commitment(&address, self.client.commitment())
            .await
            .map(|response| response.value)
            .map_err(RpcError::from)
    }

    async fn get_balance(&mut self, pubkey: &Pubkey) -> Result<u64, RpcError> {
        self.client
            .get_balance(pubkey)
            .await
            .map_err(RpcError::from)
    }

    async fn airdrop_lamports(
        &mut self,
        to: &Pubkey,
        lamports: u64,
    ) -> Result<Signature, RpcError> {
        let signature = self.client.request_airdrop(to, lamports).await?;
        self.wait_for_confirmation(&signature).await?;
        Ok(signature)
    }
}
