use std::{
    fmt::{Debug, Formatter},
    path::PathBuf,
    time::Duration,
};

use nft_mint_client::SolanaRpcUrl;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use crate::{
    constants::{
        DEFAULT_METADATA_TITLE, DEFAULT_METADATA_URI, DEFAULT_STEP_TIMEOUT_SECONDS,
        MINT_NFT_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
    },
    errors::ConfigError,
};

/// Content attached to the minted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftDescriptor {
    pub uri: String,
    pub title: String,
}

impl Default for NftDescriptor {
    fn default() -> Self {
        Self {
            uri: DEFAULT_METADATA_URI.to_string(),
            title: DEFAULT_METADATA_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramIds {
    pub mint_nft_program: Pubkey,
    pub token_metadata_program: Pubkey,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            mint_nft_program: MINT_NFT_PROGRAM_ID,
            token_metadata_program: TOKEN_METADATA_PROGRAM_ID,
        }
    }
}

/// Settings of a single workflow run.
pub struct WorkflowConfig {
    pub payer: Keypair,
    pub descriptor: NftDescriptor,
    pub program_ids: ProgramIds,
    /// Deadline applied to each network step.
    pub step_timeout: Duration,
    /// Where to write the generated mint keypair before it is used on-chain.
    pub mint_keypair_out: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn new(payer: Keypair) -> Self {
        Self {
            payer,
            descriptor: NftDescriptor::default(),
            program_ids: ProgramIds::default(),
            step_timeout: Duration::from_secs(DEFAULT_STEP_TIMEOUT_SECONDS),
            mint_keypair_out: None,
        }
    }
}

impl Debug for WorkflowConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowConfig")
            .field("payer", &self.payer.pubkey())
            .field("descriptor", &self.descriptor)
            .field("program_ids", &self.program_ids)
            .field("step_timeout", &self.step_timeout)
            .field("mint_keypair_out", &self.mint_keypair_out)
            .finish()
    }
}

/// Everything loaded from defaults, config file, environment and CLI flags.
pub struct MinterConfig {
    pub rpc_url: SolanaRpcUrl,
    pub commitment: CommitmentConfig,
    pub payer: Option<Keypair>,
    pub descriptor: NftDescriptor,
    pub program_ids: ProgramIds,
    pub step_timeout: Duration,
    pub mint_keypair_out: Option<PathBuf>,
}

impl MinterConfig {
    pub fn payer_pubkey(&self) -> Option<Pubkey> {
        self.payer.as_ref().map(|payer| payer.pubkey())
    }

    pub fn into_workflow_config(self) -> Result<WorkflowConfig, ConfigError> {
        let payer = self.payer.ok_or(ConfigError::MissingField { field: "payer" })?;
        Ok(WorkflowConfig {
            payer,
            descriptor: self.descriptor,
            program_ids: self.program_ids,
            step_timeout: self.step_timeout,
            mint_keypair_out: self.mint_keypair_out,
        })
    }
}

impl Debug for MinterConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinterConfig")
            .field("rpc_url", &self.rpc_url)
            .field("commitment", &self.commitment)
            .field("payer", &self.payer_pubkey())
            .field("descriptor", &self.descriptor)
            .field("program_ids", &self.program_ids)
            .field("step_timeout", &self.step_timeout)
            .field("mint_keypair_out", &self.mint_keypair_out)
            .finish()
    }
}
