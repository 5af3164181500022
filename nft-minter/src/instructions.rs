use borsh::BorshSerialize;
use solana_sdk::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction, system_program, sysvar,
};
use spl_associated_token_account::instruction::create_associated_token_account;
use spl_token::state::Mint;

use crate::{
    constants::{MINT_NFT_SIGHASH_PREIMAGE, NFT_DECIMALS},
    pda::NftAddresses,
};

/// Instructions that create the mint account, initialize it with `payer` as
/// mint and freeze authority, and create the payer's associated token account.
/// Must be signed by `payer` and the mint keypair.
pub fn create_mint_accounts_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    rent_lamports: u64,
) -> Result<Vec<Instruction>, ProgramError> {
    let create_account_ix = system_instruction::create_account(
        payer,
        mint,
        rent_lamports,
        Mint::LEN as u64,
        &spl_token::id(),
    );
    let initialize_mint_ix = spl_token::instruction::initialize_mint(
        &spl_token::id(),
        mint,
        payer,
        Some(payer),
        NFT_DECIMALS,
    )?;
    let create_token_account_ix =
        create_associated_token_account(payer, payer, mint, &spl_token::id());
    Ok(vec![
        create_account_ix,
        initialize_mint_ix,
        create_token_account_ix,
    ])
}

/// Arguments of `mint_nft`, serialized after the discriminator.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct MintNftInstructionData {
    pub collection_key: [u8; 32],
    pub metadata_uri: String,
    pub metadata_title: String,
}

pub fn mint_nft_discriminator() -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(MINT_NFT_SIGHASH_PREIMAGE.as_bytes()).to_bytes()[..8]);
    discriminator
}

impl MintNftInstructionData {
    pub fn data(&self) -> Result<Vec<u8>, ProgramError> {
        let mut data = mint_nft_discriminator().to_vec();
        self.serialize(&mut data)
            .map_err(|_| ProgramError::BorshIoError("mint_nft arguments".to_string()))?;
        Ok(data)
    }
}

/// Builds the `mint_nft` instruction. `authority` is both payer and mint
/// authority and is the only signer.
pub fn create_mint_nft_instruction(
    program_id: &Pubkey,
    token_metadata_program_id: &Pubkey,
    authority: &Pubkey,
    addresses: &NftAddresses,
    metadata_uri: &str,
    metadata_title: &str,
) -> Result<Instruction, ProgramError> {
    let instruction_data = MintNftInstructionData {
        collection_key: addresses.mint.to_bytes(),
        metadata_uri: metadata_uri.to_string(),
        metadata_title: metadata_title.to_string(),
    };
    let accounts = vec![
        AccountMeta::new(addresses.master_edition, false),
        AccountMeta::new(addresses.metadata, false),
        AccountMeta::new(addresses.mint, false),
        AccountMeta::new(*authority, true),
        AccountMeta::new(*authority, false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new(addresses.token_account, false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(*token_metadata_program_id, false),
    ];
    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: instruction_data.data()?,
    })
}

#[cfg(test)]
mod tests {
    use solana_sdk::{
        program_option::COption,
        signature::{Keypair, Signer},
    };

    use super::*;
    use crate::constants::{MINT_NFT_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID};

    fn addresses(owner: &Pubkey) -> NftAddresses {
        NftAddresses::derive(&Keypair::new().pubkey(), owner, &TOKEN_METADATA_PROGRAM_ID)
    }

    #[test]
    fn create_mint_accounts_bundles_three_instructions() {
        let payer = Keypair::new().pubkey();
        let mint = Keypair::new().pubkey();
        let instructions = create_mint_accounts_instructions(&payer, &mint, 1_461_600).unwrap();

        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[0].program_id, system_program::id());
        assert_eq!(instructions[1].program_id, spl_token::id());
        assert_eq!(instructions[2].program_id, spl_associated_token_account::id());

        let signers: Vec<Pubkey> = instructions
            .iter()
            .flat_map(|ix| ix.accounts.iter())
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.pubkey)
            .collect();
        assert!(signers.contains(&payer));
        assert!(signers.contains(&mint));
    }

    #[test]
    fn initialize_mint_uses_zero_decimals_and_payer_authorities() {
        let payer = Keypair::new().pubkey();
        let mint = Keypair::new().pubkey();
        let instructions = create_mint_accounts_instructions(&payer, &mint, 0).unwrap();

        match spl_token::instruction::TokenInstruction::unpack(&instructions[1].data).unwrap() {
            spl_token::instruction::TokenInstruction::InitializeMint {
                decimals,
                mint_authority,
                freeze_authority,
            } => {
                assert_eq!(decimals, 0);
                assert_eq!(mint_authority, payer);
                assert_eq!(freeze_authority, COption::Some(payer));
            }
            other => panic!("unexpected instruction {:?}", other),
        }
    }

    #[test]
    fn mint_nft_data_layout() {
        let payer = Keypair::new().pubkey();
        let addresses = addresses(&payer);
        let ix = create_mint_nft_instruction(
            &MINT_NFT_PROGRAM_ID,
            &TOKEN_METADATA_PROGRAM_ID,
            &payer,
            &addresses,
            "https://example.com/nft-example.json",
            "Artist NFT",
        )
        .unwrap();

        assert_eq!(&ix.data[..8], &mint_nft_discriminator());
        assert_eq!(&ix.data[8..40], addresses.mint.as_ref());

        let uri = b"https://example.com/nft-example.json";
        let uri_len = u32::from_le_bytes(ix.data[40..44].try_into().unwrap()) as usize;
        assert_eq!(uri_len, uri.len());
        assert_eq!(&ix.data[44..44 + uri_len], uri);

        let title_start = 44 + uri_len;
        let title_len =
            u32::from_le_bytes(ix.data[title_start..title_start + 4].try_into().unwrap()) as usize;
        assert_eq!(&ix.data[title_start + 4..], b"Artist NFT");
        assert_eq!(title_len, 10);
    }

    #[test]
    fn mint_nft_account_order() {
        let payer = Keypair::new().pubkey();
        let addresses = addresses(&payer);
        let ix = create_mint_nft_instruction(
            &MINT_NFT_PROGRAM_ID,
            &TOKEN_METADATA_PROGRAM_ID,
            &payer,
            &addresses,
            "uri",
            "title",
        )
        .unwrap();

        let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(
            keys,
            vec![
                addresses.master_edition,
                addresses.metadata,
                addresses.mint,
                payer,
                payer,
                sysvar::rent::id(),
                system_program::id(),
                addresses.token_account,
                spl_token::id(),
                TOKEN_METADATA_PROGRAM_ID,
            ]
        );
        let signers: Vec<&AccountMeta> = ix.accounts.iter().filter(|m| m.is_signer).collect();
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].pubkey, payer);
    }

    #[test]
    fn discriminator_is_stable() {
        assert_eq!(mint_nft_discriminator(), mint_nft_discriminator());
        assert_ne!(mint_nft_discriminator(), [0u8; 8]);
    }
}
