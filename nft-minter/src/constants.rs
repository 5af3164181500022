use solana_sdk::{pubkey, pubkey::Pubkey};

/// Program exposing the `mint_nft` instruction.
pub const MINT_NFT_PROGRAM_ID: Pubkey = pubkey!("EKWmd8gcme68CteJFfXXYtm4vCcPHGGLBtuUnp7DWHJM");

/// Metaplex token metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

pub const METADATA_SEED: &[u8] = b"metadata";
pub const EDITION_SEED: &[u8] = b"edition";

/// Anchor sighash preimage of the `mint_nft` instruction.
pub const MINT_NFT_SIGHASH_PREIMAGE: &str = "global:mint_nft";

pub const NFT_DECIMALS: u8 = 0;
pub const NFT_SUPPLY: u64 = 1;

pub const DEFAULT_METADATA_URI: &str = "https://example.com/nft-example.json";
pub const DEFAULT_METADATA_TITLE: &str = "Artist NFT";
pub const DEFAULT_STEP_TIMEOUT_SECONDS: u64 = 60;

pub const CONFIG_FILE_NAME: &str = "nft-minter.toml";
pub const ENV_PREFIX: &str = "NFT_MINTER";
