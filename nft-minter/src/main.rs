use std::{path::Path, str::FromStr};

use anyhow::Context;
use clap::Parser;
use nft_mint_client::{rpc::ConfirmConfig, RpcConnection, SolanaRpcConnection};
use nft_minter::{
    cli::{AddressesArgs, Cli, Commands, MintArgs, SettingsArgs, VerifyArgs},
    errors::FAILURE_EXIT_CODE,
    init_config,
    telemetry::{setup_telemetry, LOG_DIR},
    utils::{explorer_address_url, explorer_tx_url},
    verify_mint, ConfigError, MinterConfig, MintWorkflow, NftAddresses,
};
use solana_sdk::{pubkey::Pubkey, signature::Signer};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let log_guard = setup_telemetry(Path::new(LOG_DIR));
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Mint(args) => run_mint(args).await,
        Commands::Verify(args) => run_verify(args).await,
        Commands::Addresses(args) => run_addresses(args),
    };

    if let Err(e) = result {
        error!("{:?}", e);
        drop(log_guard);
        std::process::exit(FAILURE_EXIT_CODE);
    }
}

fn load_config(settings: &SettingsArgs) -> anyhow::Result<MinterConfig> {
    let config = init_config(settings).context("Failed to load configuration")?;
    debug!(?config, "Loaded configuration");
    Ok(config)
}

fn connect(config: &MinterConfig) -> SolanaRpcConnection {
    SolanaRpcConnection::new_with_config(
        config.rpc_url.to_string(),
        Some(config.commitment),
        ConfirmConfig {
            timeout: config.step_timeout,
            ..Default::default()
        },
    )
}

fn parse_pubkey(value: &str, field: &'static str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value).map_err(|e| ConfigError::InvalidPubkey {
        field,
        error: e.to_string(),
    })
}

fn resolve_owner(owner: Option<&str>, config: &MinterConfig) -> Result<Pubkey, ConfigError> {
    match owner {
        Some(owner) => parse_pubkey(owner, "owner"),
        None => config
            .payer_pubkey()
            .ok_or(ConfigError::MissingField { field: "owner" }),
    }
}

async fn run_mint(args: MintArgs) -> anyhow::Result<()> {
    let config = load_config(&args.settings)?;
    let rpc_url = config.rpc_url.clone();
    let mut rpc = connect(&config);
    let workflow_config = config.into_workflow_config()?;
    let payer = workflow_config.payer.pubkey();

    if let Some(lamports) = args.airdrop {
        let signature = rpc.airdrop_lamports(&payer, lamports).await?;
        info!(%payer, lamports, %signature, "Airdrop confirmed");
    }
    let balance = rpc.get_balance(&payer).await?;
    info!(
        %payer,
        balance,
        rpc_url = %rpc.get_url(),
        uri = %workflow_config.descriptor.uri,
        title = %workflow_config.descriptor.title,
        "Minting NFT"
    );

    let mut workflow = MintWorkflow::new(rpc, workflow_config);
    let outcome = workflow.run().await?;

    info!(
        "NFT minted: {}",
        explorer_address_url(&outcome.addresses.mint, &rpc_url)
    );
    info!(
        "Token account {}, metadata {}, master edition {}",
        outcome.addresses.token_account,
        outcome.addresses.metadata,
        outcome.addresses.master_edition
    );
    info!(
        "Create accounts transaction: {}",
        explorer_tx_url(&outcome.create_accounts_signature, &rpc_url)
    );
    info!(
        "Mint NFT transaction: {}",
        explorer_tx_url(&outcome.mint_nft_signature, &rpc_url)
    );
    Ok(())
}

async fn run_verify(args: VerifyArgs) -> anyhow::Result<()> {
    let config = load_config(&args.settings)?;
    let mint = parse_pubkey(&args.mint, "mint")?;
    let owner = resolve_owner(args.owner.as_deref(), &config)?;
    let mut rpc = connect(&config);

    let verification = verify_mint(
        &mut rpc,
        &mint,
        &owner,
        &config.program_ids.token_metadata_program,
    )
    .await?;
    info!(
        mint = %verification.addresses.mint,
        token_account = %verification.addresses.token_account,
        master_edition = %verification.addresses.master_edition,
        decimals = verification.decimals,
        supply = verification.supply,
        amount = verification.amount,
        "NFT verified"
    );
    Ok(())
}

fn run_addresses(args: AddressesArgs) -> anyhow::Result<()> {
    let config = load_config(&args.settings)?;
    let mint = parse_pubkey(&args.mint, "mint")?;
    let owner = resolve_owner(args.owner.as_deref(), &config)?;

    let addresses =
        NftAddresses::derive(&mint, &owner, &config.program_ids.token_metadata_program);
    println!("mint:           {}", addresses.mint);
    println!("token account:  {}", addresses.token_account);
    println!("metadata:       {}", addresses.metadata);
    println!("master edition: {}", addresses.master_edition);
    Ok(())
}
