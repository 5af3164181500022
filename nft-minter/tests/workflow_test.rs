mod test_utils;

use std::time::Duration;

use nft_minter::{
    constants::MINT_NFT_PROGRAM_ID, instructions::mint_nft_discriminator, MintStep,
    MintWorkflow, MinterError, NftAddresses, WorkflowConfig,
};
use solana_sdk::signature::{read_keypair_file, Keypair, Signer};
use test_utils::{temp_path, MockRpcConnection, MOCK_RENT_LAMPORTS};

fn workflow(rpc: MockRpcConnection) -> MintWorkflow<MockRpcConnection> {
    MintWorkflow::new(rpc, WorkflowConfig::new(Keypair::new()))
}

#[tokio::test]
async fn submits_create_then_mint_transactions() {
    let mut workflow = workflow(MockRpcConnection::default());
    let payer = workflow.config().payer.pubkey();

    let outcome = workflow.run().await.unwrap();
    let rpc = workflow.rpc();

    assert_eq!(rpc.rent_queries, 1);
    assert_eq!(rpc.submitted.len(), 2);
    assert_eq!(outcome.rent_lamports, MOCK_RENT_LAMPORTS);
    assert_eq!(
        outcome.addresses,
        NftAddresses::derive(
            &outcome.addresses.mint,
            &payer,
            &workflow.config().program_ids.token_metadata_program
        )
    );

    // Creating the mint needs the payer and the mint keypair.
    let create = &rpc.submitted[0];
    assert!(create.verify().is_ok());
    assert_eq!(create.signatures.len(), 2);
    assert_eq!(create.message.account_keys[0], payer);
    assert!(create.message.account_keys.contains(&outcome.addresses.mint));
    assert_eq!(create.message.instructions.len(), 3);
    assert_eq!(create.signatures[0], outcome.create_accounts_signature);

    // Minting is signed by the payer only.
    let mint_nft = &rpc.submitted[1];
    assert!(mint_nft.verify().is_ok());
    assert_eq!(mint_nft.signatures.len(), 1);
    assert_eq!(mint_nft.message.account_keys[0], payer);
    assert_eq!(mint_nft.message.instructions.len(), 1);
    let ix = &mint_nft.message.instructions[0];
    assert_eq!(
        mint_nft.message.account_keys[ix.program_id_index as usize],
        MINT_NFT_PROGRAM_ID
    );
    assert_eq!(&ix.data[..8], &mint_nft_discriminator());
    assert_eq!(mint_nft.signatures[0], outcome.mint_nft_signature);
}

#[tokio::test]
async fn rent_query_failure_submits_nothing() {
    let mut workflow = workflow(MockRpcConnection::failing_rent_query());

    let err = workflow.run().await.unwrap_err();

    assert_eq!(err.step(), Some(MintStep::QueryRent));
    assert!(matches!(err, MinterError::Step { .. }));
    assert_eq!(err.exit_code(), -1);
    assert!(workflow.rpc().submitted.is_empty());
}

#[tokio::test]
async fn create_accounts_failure_never_mints() {
    let mut workflow = workflow(MockRpcConnection::rejecting_submission(0));

    let err = workflow.run().await.unwrap_err();

    assert_eq!(err.step(), Some(MintStep::CreateMintAccounts));
    assert_eq!(workflow.rpc().submitted.len(), 1);
    assert_eq!(workflow.rpc().submitted[0].signatures.len(), 2);
}

#[tokio::test]
async fn mint_nft_failure_is_reported_unchanged() {
    let mut workflow = workflow(MockRpcConnection::rejecting_submission(1));

    let err = workflow.run().await.unwrap_err();

    assert_eq!(err.step(), Some(MintStep::MintNft));
    match err {
        MinterError::Step { source, .. } => assert_eq!(
            source.transaction_error(),
            Some(solana_sdk::transaction::TransactionError::InstructionError(
                0,
                solana_sdk::instruction::InstructionError::Custom(1)
            ))
        ),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(workflow.rpc().submitted.len(), 2);
}

#[tokio::test]
async fn step_deadline_aborts_run() {
    let mut config = WorkflowConfig::new(Keypair::new());
    config.step_timeout = Duration::from_millis(50);
    let mut workflow = MintWorkflow::new(
        MockRpcConnection::slow_rent_query(Duration::from_secs(5)),
        config,
    );

    let err = workflow.run().await.unwrap_err();

    match err {
        MinterError::Timeout { step, timeout } => {
            assert_eq!(step, MintStep::QueryRent);
            assert_eq!(timeout, Duration::from_millis(50));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(workflow.rpc().submitted.is_empty());
}

#[tokio::test]
async fn every_run_uses_a_new_mint() {
    let mut workflow = workflow(MockRpcConnection::default());

    let first = workflow.run().await.unwrap();
    let second = workflow.run().await.unwrap();

    assert_ne!(first.addresses.mint, second.addresses.mint);
    assert_ne!(first.addresses.token_account, second.addresses.token_account);
    assert_ne!(first.addresses.metadata, second.addresses.metadata);
    assert_eq!(workflow.rpc().submitted.len(), 4);
}

#[tokio::test]
async fn writes_mint_keypair_before_creating_accounts() {
    let path = temp_path("mint.json");
    let mut config = WorkflowConfig::new(Keypair::new());
    config.mint_keypair_out = Some(path.clone());
    let mut workflow = MintWorkflow::new(MockRpcConnection::rejecting_submission(0), config);

    let err = workflow.run().await.unwrap_err();
    assert_eq!(err.step(), Some(MintStep::CreateMintAccounts));

    let mint_keypair = read_keypair_file(&path).unwrap();
    let create = &workflow.rpc().submitted[0];
    assert!(create
        .message
        .account_keys
        .contains(&mint_keypair.pubkey()));
    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[tokio::test]
async fn unwritable_keypair_path_stops_before_network() {
    let blocker = temp_path("blocker");
    std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut config = WorkflowConfig::new(Keypair::new());
    config.mint_keypair_out = Some(blocker.join("mint.json"));
    let mut workflow = MintWorkflow::new(MockRpcConnection::default(), config);

    let err = workflow.run().await.unwrap_err();

    assert!(matches!(err, MinterError::KeypairPersist { .. }));
    assert_eq!(err.step(), None);
    assert_eq!(workflow.rpc().rent_queries, 0);
    assert!(workflow.rpc().submitted.is_empty());
    std::fs::remove_dir_all(blocker.parent().unwrap()).unwrap();
}
