
use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use nft_mint_client::rpc::{RpcConnection, RpcError};
use solana_sdk::{
    account::Account,
    hash::Hash,
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};

pub const MOCK_RENT_LAMPORTS: u64 = 1_461_600;

/// Records every call the workflow makes and fails on request.
#[derive(Debug, Default)]
pub struct MockRpcConnection {
    pub fail_rent_query: bool,
    pub rent_delay: Option<Duration>,
    /// Zero-based index of the submission to reject.
    pub reject_submission: Option<usize>,
    pub rent_queries: usize,
    pub submitted: Vec<Transaction>,
}

impl MockRpcConnection {
    pub fn failing_rent_query() -> Self {
        Self {
            fail_rent_query: true,
            ..Default::default()
        }
    }

    pub fn rejecting_submission(index: usize) -> Self {
        Self {
            reject_submission: Some(index),
            ..Default::default()
        }
    }

    pub fn slow_rent_query(delay: Duration) -> Self {
        Self {
            rent_delay: Some(delay),
            ..Default::default()
        }
    }
}

#[async_trait]
impl RpcConnection for MockRpcConnection {
    fn get_url(&self) -> String {
        "mock".to_string()
    }

    async fn get_minimum_balance_for_rent_exemption(
        &mut self,
        _data_len: usize,
    ) -> Result<u64, RpcError> {
        self.rent_queries += 1;
        if let Some(delay) = self.rent_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_rent_query {
            return Err(RpcError::CustomError("connection refused".to_string()));
        }
        Ok(MOCK_RENT_LAMPORTS)
    }

    async fn get_latest_blockhash(&mut self) -> Result<Hash, RpcError> {
        Ok(Hash::new_unique())
    }

    async fn process_transaction(
        &mut self,
        transaction: Transaction,
    ) -> Result<Signature, RpcError> {
        let index = self.submitted.len();
        let signature = transaction.signatures[0];
        self.submitted.push(transaction);
        if self.reject_submission == Some(index) {
            return Err(RpcError::TransactionError(
                TransactionError::InstructionError(0, InstructionError::Custom(1)),
            ));
        }
        Ok(signature)
    }

    async fn get_account(&mut self, _address: Pubkey) -> Result<Option<Account>, RpcError> {
        Ok(None)
    }

    async fn get_balance(&mut self, _pubkey: &Pubkey) -> Result<u64, RpcError> {
        Ok(0)
    }

    async fn airdrop_lamports(
        &mut self,
        _to: &Pubkey,
        _lamports: u64,
    ) -> Result<Signature, RpcError> {
        Ok(Signature::default())
    }
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!(
            "nft-minter-test-{}-{}",
            std::process::id(),
            Pubkey::new_unique()
        ))
        .join(name)
}
