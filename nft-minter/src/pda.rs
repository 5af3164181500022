use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address_with_program_id;

use crate::constants::{EDITION_SEED, METADATA_SEED};

/// Associated token account holding units of `mint` for `owner`.
pub fn get_token_account_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &spl_token::id())
}

pub fn get_metadata_address(mint: &Pubkey, token_metadata_program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            token_metadata_program_id.as_ref(),
            mint.as_ref(),
        ],
        token_metadata_program_id,
    )
    .0
}

pub fn get_master_edition_address(mint: &Pubkey, token_metadata_program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            token_metadata_program_id.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        token_metadata_program_id,
    )
    .0
}

/// Every address the workflow derives from a mint and its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NftAddresses {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
}

impl NftAddresses {
    pub fn derive(mint: &Pubkey, owner: &Pubkey, token_metadata_program_id: &Pubkey) -> Self {
        Self {
            mint: *mint,
            token_account: get_token_account_address(owner, mint),
            metadata: get_metadata_address(mint, token_metadata_program_id),
            master_edition: get_master_edition_address(mint, token_metadata_program_id),
        }
    }
}
