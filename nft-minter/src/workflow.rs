use std::{
    fmt::{Display, Formatter},
    future::Future,
    path::Path,
    time::Duration,
};

use nft_mint_client::rpc::{RpcConnection, RpcError};
use solana_sdk::{
    program_pack::Pack,
    signature::{write_keypair_file, Keypair, Signature, Signer},
};
use spl_token::state::Mint;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::{
    config::WorkflowConfig,
    errors::MinterError,
    instructions::{create_mint_accounts_instructions, create_mint_nft_instruction},
    pda::{
        get_master_edition_address, get_metadata_address, get_token_account_address,
        NftAddresses,
    },
};

/// Steps of a mint run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MintStep {
    GenerateMint,
    DeriveTokenAccount,
    QueryRent,
    CreateMintAccounts,
    DeriveMetadata,
    DeriveMasterEdition,
    MintNft,
}

impl MintStep {
    pub const ALL: [MintStep; 7] = [
        MintStep::GenerateMint,
        MintStep::DeriveTokenAccount,
        MintStep::QueryRent,
        MintStep::CreateMintAccounts,
        MintStep::DeriveMetadata,
        MintStep::DeriveMasterEdition,
        MintStep::MintNft,
    ];

    /// Whether the step talks to the cluster.
    pub fn is_network_step(&self) -> bool {
        matches!(
            self,
            MintStep::QueryRent | MintStep::CreateMintAccounts | MintStep::MintNft
        )
    }
}

impl Display for MintStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MintStep::GenerateMint => "generate-mint",
            MintStep::DeriveTokenAccount => "derive-token-account",
            MintStep::QueryRent => "query-rent",
            MintStep::CreateMintAccounts => "create-mint-accounts",
            MintStep::DeriveMetadata => "derive-metadata",
            MintStep::DeriveMasterEdition => "derive-master-edition",
            MintStep::MintNft => "mint-nft",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub addresses: NftAddresses,
    pub rent_lamports: u64,
    pub create_accounts_signature: Signature,
    pub mint_nft_signature: Signature,
}

/// Runs the mint steps strictly in order against `rpc` and stops at the first
/// failure. Every run generates a new mint.
#[derive(Debug)]
pub struct MintWorkflow<R: RpcConnection> {
    rpc: R,
    config: WorkflowConfig,
}

impl<R: RpcConnection> MintWorkflow<R> {
    pub fn new(rpc: R, config: WorkflowConfig) -> Self {
        Self { rpc, config }
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn rpc_mut(&mut self) -> &mut R {
        &mut self.rpc
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn into_rpc(self) -> R {
        self.rpc
    }

    pub async fn run(&mut self) -> Result<MintOutcome, MinterError> {
        let payer = self.config.payer.pubkey();
        let step_timeout = self.config.step_timeout;
        let program_ids = self.config.program_ids;

        let mint_keypair = Keypair::new();
        let mint = mint_keypair.pubkey();
        debug!(step = %MintStep::GenerateMint, %mint, "Generated mint keypair");
        if let Some(path) = self.config.mint_keypair_out.as_deref() {
            persist_mint_keypair(&mint_keypair, path)?;
        }

        let token_account = get_token_account_address(&payer, &mint);
        debug!(step = %MintStep::DeriveTokenAccount, %token_account);

        let rent_lamports = with_deadline(
            MintStep::QueryRent,
            step_timeout,
            self.rpc.get_minimum_balance_for_rent_exemption(Mint::LEN),
        )
        .await?;
        debug!(step = %MintStep::QueryRent, rent_lamports);

        let instructions = create_mint_accounts_instructions(&payer, &mint, rent_lamports)?;
        let create_accounts_signature = with_deadline(
            MintStep::CreateMintAccounts,
            step_timeout,
            self.rpc.create_and_send_transaction(
                &instructions,
                &payer,
                &[&self.config.payer, &mint_keypair],
            ),
        )
        .await?;
        info!(
            step = %MintStep::CreateMintAccounts,
            %mint,
            %token_account,
            signature = %create_accounts_signature,
            "Created mint and token account"
        );

        let metadata = get_metadata_address(&mint, &program_ids.token_metadata_program);
        debug!(step = %MintStep::DeriveMetadata, %metadata);
        let master_edition =
            get_master_edition_address(&mint, &program_ids.token_metadata_program);
        debug!(step = %MintStep::DeriveMasterEdition, %master_edition);

        let addresses = NftAddresses {
            mint,
            token_account,
            metadata,
            master_edition,
        };
        let mint_nft_ix = create_mint_nft_instruction(
            &program_ids.mint_nft_program,
            &program_ids.token_metadata_program,
            &payer,
            &addresses,
            &self.config.descriptor.uri,
            &self.config.descriptor.title,
        )?;
        let mint_nft_signature = with_deadline(
            MintStep::MintNft,
            step_timeout,
            self.rpc
                .create_and_send_transaction(&[mint_nft_ix], &payer, &[&self.config.payer]),
        )
        .await?;
        info!(
            step = %MintStep::MintNft,
            %mint,
            %metadata,
            %master_edition,
            signature = %mint_nft_signature,
            "Minted NFT"
        );

        Ok(MintOutcome {
            addresses,
            rent_lamports,
            create_accounts_signature,
            mint_nft_signature,
        })
    }
}

async fn with_deadline<T, F>(
    step: MintStep,
    deadline: Duration,
    future: F,
) -> Result<T, MinterError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    match timeout(deadline, future).await {
        Ok(result) => result.map_err(|source| MinterError::Step { step, source }),
        Err(_) => Err(MinterError::Timeout {
            step,
            timeout: deadline,
        }),
    }
}

fn persist_mint_keypair(keypair: &Keypair, path: &Path) -> Result<(), MinterError> {
    write_keypair_file(keypair, path).map_err(|e| MinterError::KeypairPersist {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    info!(mint = %keypair.pubkey(), path = %path.display(), "Wrote mint keypair");
    Ok(())
}
