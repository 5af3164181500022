use nft_mint_client::rpc::RpcConnection;
use solana_sdk::{account::Account, program_option::COption, program_pack::Pack, pubkey::Pubkey};
use spl_token::state::{Account as TokenAccount, Mint};
use tracing::{debug, info};

use crate::{
    constants::{NFT_DECIMALS, NFT_SUPPLY},
    errors::{MinterError, VerificationError},
    pda::NftAddresses,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintVerification {
    pub addresses: NftAddresses,
    pub decimals: u8,
    pub supply: u64,
    pub amount: u64,
}

/// Checks the on-chain state a completed mint leaves behind:
///
/// - `mint` is a zero-decimal mint with supply 1 whose mint and freeze
///   authority moved to the master-edition account;
/// - the owner's associated token account holds that single unit;
/// - the metadata and master-edition accounts exist and are owned by
///   `token_metadata_program_id`.
pub async fn verify_mint<R: RpcConnection>(
    rpc: &mut R,
    mint: &Pubkey,
    owner: &Pubkey,
    token_metadata_program_id: &Pubkey,
) -> Result<MintVerification, MinterError> {
    let addresses = NftAddresses::derive(mint, owner, token_metadata_program_id);

    let mint_account = fetch_account(rpc, mint, &spl_token::id()).await?;
    let mint_state = Mint::unpack(&mint_account.data).map_err(|e| VerificationError::Unpack {
        address: *mint,
        error: e.to_string(),
    })?;
    check_mint(mint, &mint_state, &addresses.master_edition)?;

    let holding = fetch_account(rpc, &addresses.token_account, &spl_token::id()).await?;
    let holding_state =
        TokenAccount::unpack(&holding.data).map_err(|e| VerificationError::Unpack {
            address: addresses.token_account,
            error: e.to_string(),
        })?;
    check_token_account(&addresses.token_account, &holding_state, mint, owner)?;

    fetch_account(rpc, &addresses.metadata, token_metadata_program_id).await?;
    fetch_account(rpc, &addresses.master_edition, token_metadata_program_id).await?;

    info!(
        %mint,
        token_account = %addresses.token_account,
        metadata = %addresses.metadata,
        master_edition = %addresses.master_edition,
        "Verified NFT mint"
    );
    Ok(MintVerification {
        addresses,
        decimals: mint_state.decimals,
        supply: mint_state.supply,
        amount: holding_state.amount,
    })
}

async fn fetch_account<R: RpcConnection>(
    rpc: &mut R,
    address: &Pubkey,
    expected_owner: &Pubkey,
) -> Result<Account, MinterError> {
    let account = rpc.get_account(*address).await?;
    debug!(%address, found = account.is_some(), "Fetched account");
    Ok(check_account_owner(address, account, expected_owner)?)
}

/// Requires `account` to exist and belong to `expected_owner`.
pub fn check_account_owner(
    address: &Pubkey,
    account: Option<Account>,
    expected_owner: &Pubkey,
) -> Result<Account, VerificationError> {
    let account = account.ok_or(VerificationError::AccountNotFound { address: *address })?;
    if account.owner != *expected_owner {
        return Err(VerificationError::WrongProgramOwner {
            address: *address,
            owner: account.owner,
            expected: *expected_owner,
        });
    }
    Ok(account)
}

fn to_option(authority: COption<Pubkey>) -> Option<Pubkey> {
    match authority {
        COption::Some(authority) => Some(authority),
        COption::None => None,
    }
}

/// `master_edition` is the expected holder of both mint and freeze authority.
pub fn check_mint(
    mint: &Pubkey,
    state: &Mint,
    master_edition: &Pubkey,
) -> Result<(), VerificationError> {
    if state.decimals != NFT_DECIMALS {
        return Err(VerificationError::Decimals {
            mint: *mint,
            decimals: state.decimals,
        });
    }
    if state.supply != NFT_SUPPLY {
        return Err(VerificationError::Supply {
            mint: *mint,
            supply: state.supply,
            expected: NFT_SUPPLY,
        });
    }
    let mint_authority = to_option(state.mint_authority);
    if mint_authority != Some(*master_edition) {
        return Err(VerificationError::MintAuthority {
            mint: *mint,
            actual: mint_authority,
            expected: *master_edition,
        });
    }
    let freeze_authority = to_option(state.freeze_authority);
    if freeze_authority != Some(*master_edition) {
        return Err(VerificationError::FreezeAuthority {
            mint: *mint,
            actual: freeze_authority,
            expected: *master_edition,
        });
    }
    Ok(())
}

pub fn check_token_account(
    address: &Pubkey,
    state: &TokenAccount,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<(), VerificationError> {
    if state.mint != *mint || state.owner != *owner {
        return Err(VerificationError::TokenAccountMismatch {
            address: *address,
            actual: state.mint,
            owner: state.owner,
        });
    }
    if state.amount != NFT_SUPPLY {
        return Err(VerificationError::Amount {
            address: *address,
            amount: state.amount,
            expected: NFT_SUPPLY,
        });
    }
    Ok(())
}
