use std::{path::PathBuf, time::Duration};

use nft_mint_client::rpc::RpcError;
use solana_sdk::{program_error::ProgramError, pubkey::Pubkey};
use thiserror::Error;

use crate::workflow::MintStep;

/// Exit status reported for any failed run.
pub const FAILURE_EXIT_CODE: i32 = -1;

#[derive(Error, Debug)]
pub enum MinterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Step {step} failed: {source}")]
    Step {
        step: MintStep,
        #[source]
        source: RpcError,
    },

    #[error("Step {step} did not complete within {timeout:?}")]
    Timeout { step: MintStep, timeout: Duration },

    #[error("Failed to build instruction: {0}")]
    Instruction(#[from] ProgramError),

    #[error("Failed to write mint keypair to {path}: {error}")]
    KeypairPersist { path: PathBuf, error: String },

    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

impl MinterError {
    /// Step the run aborted at, if the failure came from a workflow step.
    pub fn step(&self) -> Option<MintStep> {
        match self {
            MinterError::Step { step, .. } | MinterError::Timeout { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid keypair data: {0}")]
    InvalidKeypair(String),

    #[error("Invalid pubkey: {field} - {error}")]
    InvalidPubkey { field: &'static str, error: String },

    #[error("Invalid value for {field}: {error}")]
    InvalidValue { field: &'static str, error: String },

    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Account {address} not found")]
    AccountNotFound { address: Pubkey },

    #[error("Account {address} is owned by {owner}, expected {expected}")]
    WrongProgramOwner {
        address: Pubkey,
        owner: Pubkey,
        expected: Pubkey,
    },

    #[error("Failed to unpack {address}: {error}")]
    Unpack { address: Pubkey, error: String },

    #[error("Mint {mint} has {decimals} decimals, expected 0")]
    Decimals { mint: Pubkey, decimals: u8 },

    #[error("Mint {mint} supply is {supply}, expected {expected}")]
    Supply {
        mint: Pubkey,
        supply: u64,
        expected: u64,
    },

    #[error("Mint {mint} authority is {actual:?}, expected {expected}")]
    MintAuthority {
        mint: Pubkey,
        actual: Option<Pubkey>,
        expected: Pubkey,
    },

    #[error("Mint {mint} freeze authority is {actual:?}, expected {expected}")]
    FreezeAuthority {
        mint: Pubkey,
        actual: Option<Pubkey>,
        expected: Pubkey,
    },

    #[error("Token account {address} holds {amount} units, expected {expected}")]
    Amount {
        address: Pubkey,
        amount: u64,
        expected: u64,
    },

    #[error("Token account {address} belongs to mint {actual}, owner {owner}")]
    TokenAccountMismatch {
        address: Pubkey,
        actual: Pubkey,
        owner: Pubkey,
    },
}
