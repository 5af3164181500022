use std::{
    env,
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use config::{Config, Environment, File};
use nft_mint_client::SolanaRpcUrl;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};

use crate::{
    cli::SettingsArgs,
    config::{MinterConfig, NftDescriptor, ProgramIds},
    constants::{
        CONFIG_FILE_NAME, DEFAULT_METADATA_TITLE, DEFAULT_METADATA_URI,
        DEFAULT_STEP_TIMEOUT_SECONDS, ENV_PREFIX, MINT_NFT_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
    },
    errors::ConfigError,
};

/// Wallet and cluster variables set by `anchor test` / `anchor run`.
const ANCHOR_WALLET: &str = "ANCHOR_WALLET";
const ANCHOR_PROVIDER_URL: &str = "ANCHOR_PROVIDER_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKey {
    RpcUrl,
    Payer,
    KeypairPath,
    Commitment,
    MetadataUri,
    MetadataTitle,
    MintNftProgramId,
    TokenMetadataProgramId,
    StepTimeoutSeconds,
    MintKeypairOut,
}

impl Display for SettingsKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SettingsKey::RpcUrl => "rpc_url",
                SettingsKey::Payer => "payer",
                SettingsKey::KeypairPath => "keypair_path",
                SettingsKey::Commitment => "commitment",
                SettingsKey::MetadataUri => "metadata_uri",
                SettingsKey::MetadataTitle => "metadata_title",
                SettingsKey::MintNftProgramId => "mint_nft_program_id",
                SettingsKey::TokenMetadataProgramId => "token_metadata_program_id",
                SettingsKey::StepTimeoutSeconds => "step_timeout_seconds",
                SettingsKey::MintKeypairOut => "mint_keypair_out",
            }
        )
    }
}

fn locate_config_file() -> PathBuf {
    if let Some(exe_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        let config_path = exe_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return config_path;
        }
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

fn convert(json: &str) -> serde_json::Result<Vec<u8>> {
    serde_json::from_str(json)
}

/// Loads settings with precedence defaults < config file < environment < CLI.
pub fn init_config(args: &SettingsArgs) -> Result<MinterConfig, ConfigError> {
    let _ = dotenvy::dotenv();
    let settings = load_settings(args)?;
    minter_config_from_settings(&settings)
}

pub fn load_settings(args: &SettingsArgs) -> Result<Config, ConfigError> {
    let (config_path, required) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (locate_config_file(), false),
    };

    let mut builder = Config::builder()
        .set_default(SettingsKey::MetadataUri.to_string(), DEFAULT_METADATA_URI)?
        .set_default(SettingsKey::MetadataTitle.to_string(), DEFAULT_METADATA_TITLE)?
        .set_default(SettingsKey::Commitment.to_string(), "confirmed")?
        .set_default(
            SettingsKey::StepTimeoutSeconds.to_string(),
            DEFAULT_STEP_TIMEOUT_SECONDS,
        )?
        .set_default(
            SettingsKey::MintNftProgramId.to_string(),
            MINT_NFT_PROGRAM_ID.to_string(),
        )?
        .set_default(
            SettingsKey::TokenMetadataProgramId.to_string(),
            TOKEN_METADATA_PROGRAM_ID.to_string(),
        )?
        .set_default(
            SettingsKey::RpcUrl.to_string(),
            env::var(ANCHOR_PROVIDER_URL).unwrap_or_else(|_| "localnet".to_string()),
        )?;
    if let Ok(wallet) = env::var(ANCHOR_WALLET) {
        builder = builder.set_default(SettingsKey::KeypairPath.to_string(), wallet)?;
    }

    let path_override = |path: &Option<PathBuf>| path.as_ref().map(|p| p.display().to_string());
    let builder = builder
        .add_source(File::from(config_path.as_path()).required(required))
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .set_override_option(SettingsKey::RpcUrl.to_string(), args.rpc_url.clone())?
        .set_override_option(
            SettingsKey::KeypairPath.to_string(),
            path_override(&args.keypair_path),
        )?
        .set_override_option(SettingsKey::Commitment.to_string(), args.commitment.clone())?
        .set_override_option(
            SettingsKey::MetadataUri.to_string(),
            args.metadata_uri.clone(),
        )?
        .set_override_option(
            SettingsKey::MetadataTitle.to_string(),
            args.metadata_title.clone(),
        )?
        .set_override_option(
            SettingsKey::MintNftProgramId.to_string(),
            args.mint_nft_program_id.clone(),
        )?
        .set_override_option(
            SettingsKey::TokenMetadataProgramId.to_string(),
            args.token_metadata_program_id.clone(),
        )?
        .set_override_option(
            SettingsKey::StepTimeoutSeconds.to_string(),
            args.step_timeout_seconds,
        )?
        .set_override_option(
            SettingsKey::MintKeypairOut.to_string(),
            path_override(&args.mint_keypair_out),
        )?;

    Ok(builder.build()?)
}

pub fn minter_config_from_settings(settings: &Config) -> Result<MinterConfig, ConfigError> {
    let rpc_url = settings
        .get_string(&SettingsKey::RpcUrl.to_string())
        .map_err(|_| ConfigError::MissingField { field: "rpc_url" })?;
    if rpc_url.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "rpc_url",
            error: "empty url".to_string(),
        });
    }
    let rpc_url =
        SolanaRpcUrl::from_str(&rpc_url).unwrap_or(SolanaRpcUrl::Custom(rpc_url.clone()));

    let commitment = settings.get_string(&SettingsKey::Commitment.to_string())?;
    let commitment = CommitmentLevel::from_str(&commitment)
        .map(|commitment| CommitmentConfig { commitment })
        .map_err(|e| ConfigError::InvalidValue {
            field: "commitment",
            error: e.to_string(),
        })?;

    let payer = load_payer(settings)?;

    let descriptor = NftDescriptor {
        uri: settings.get_string(&SettingsKey::MetadataUri.to_string())?,
        title: settings.get_string(&SettingsKey::MetadataTitle.to_string())?,
    };

    let program_ids = ProgramIds {
        mint_nft_program: parse_pubkey(
            settings,
            SettingsKey::MintNftProgramId,
            "mint_nft_program_id",
        )?,
        token_metadata_program: parse_pubkey(
            settings,
            SettingsKey::TokenMetadataProgramId,
            "token_metadata_program_id",
        )?,
    };

    let step_timeout = settings.get_int(&SettingsKey::StepTimeoutSeconds.to_string())?;
    if step_timeout <= 0 {
        return Err(ConfigError::InvalidValue {
            field: "step_timeout_seconds",
            error: format!("{} is not a positive number of seconds", step_timeout),
        });
    }

    let mint_keypair_out = settings
        .get_string(&SettingsKey::MintKeypairOut.to_string())
        .ok()
        .map(PathBuf::from);

    Ok(MinterConfig {
        rpc_url,
        commitment,
        payer,
        descriptor,
        program_ids,
        step_timeout: Duration::from_secs(step_timeout as u64),
        mint_keypair_out,
    })
}

/// `payer` (JSON byte array) wins over `keypair_path`.
fn load_payer(settings: &Config) -> Result<Option<Keypair>, ConfigError> {
    if let Ok(payer) = settings.get_string(&SettingsKey::Payer.to_string()) {
        let bytes = convert(&payer).map_err(|e| ConfigError::InvalidKeypair(e.to_string()))?;
        let keypair =
            Keypair::from_bytes(&bytes).map_err(|e| ConfigError::InvalidKeypair(e.to_string()))?;
        return Ok(Some(keypair));
    }
    match settings.get_string(&SettingsKey::KeypairPath.to_string()) {
        Ok(path) => read_keypair_file(&path)
            .map(Some)
            .map_err(|e| ConfigError::InvalidKeypair(format!("{}: {}", path, e))),
        Err(_) => Ok(None),
    }
}

fn parse_pubkey(
    settings: &Config,
    key: SettingsKey,
    field: &'static str,
) -> Result<Pubkey, ConfigError> {
    let value = settings.get_string(&key.to_string())?;
    Pubkey::from_str(&value).map_err(|e| ConfigError::InvalidPubkey {
        field,
        error: e.to_string(),
    })
}
