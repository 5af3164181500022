use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a mint and its token account, then mint one NFT into it.
    Mint(MintArgs),
    /// Check that a mint holds exactly one unit in the owner's token account.
    Verify(VerifyArgs),
    /// Print the addresses derived from a mint without touching the network.
    Addresses(AddressesArgs),
}

/// Flags overriding `nft-minter.toml` and `NFT_MINTER_*` environment values.
#[derive(Args, Clone, Debug, Default)]
pub struct SettingsArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub rpc_url: Option<String>,

    #[arg(long)]
    pub keypair_path: Option<PathBuf>,

    #[arg(long)]
    pub commitment: Option<String>,

    #[arg(long)]
    pub metadata_uri: Option<String>,

    #[arg(long)]
    pub metadata_title: Option<String>,

    #[arg(long)]
    pub mint_nft_program_id: Option<String>,

    #[arg(long)]
    pub token_metadata_program_id: Option<String>,

    #[arg(long)]
    pub step_timeout_seconds: Option<u64>,

    #[arg(long)]
    pub mint_keypair_out: Option<PathBuf>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct MintArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Lamports to airdrop to the payer before minting.
    #[arg(long)]
    pub airdrop: Option<u64>,
}

#[derive(Args, Clone, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[arg(long)]
    pub mint: String,

    /// Defaults to the configured payer.
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct AddressesArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[arg(long)]
    pub mint: String,

    /// Defaults to the configured payer.
    #[arg(long)]
    pub owner: Option<String>,
}
