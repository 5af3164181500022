#[cfg(feature = "program-test")]
use solana_banks_client::BanksClientError;
use solana_client::client_error::ClientError;
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[cfg(feature = "program-test")]
    #[error("BanksError: {0}")]
    BanksError(#[from] BanksClientError),

    #[error("TransactionError: {0}")]
    TransactionError(#[from] TransactionError),

    #[error("ClientError: {0}")]
    ClientError(#[from] ClientError),

    #[error("Error: `{0}`")]
    CustomError(String),
}

impl RpcError {
    /// Returns the transaction error the cluster rejected a transaction
    /// with, if this error carries one.
    pub fn transaction_error(&self) -> Option<TransactionError> {
        match self {
            RpcError::TransactionError(e) => Some(e.clone()),
            RpcError::ClientError(e) => e.get_transaction_error(),
            #[cfg(feature = "program-test")]
            RpcError::BanksError(BanksClientError::TransactionError(e))
            | RpcError::BanksError(BanksClientError::SimulationError { err: e, .. }) => {
                Some(e.clone())
            }
            _ => None,
        }
    }
}
