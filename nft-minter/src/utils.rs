use nft_mint_client::SolanaRpcUrl;

pub fn explorer_address_url(address: &impl ToString, rpc_url: &SolanaRpcUrl) -> String {
    format!(
        "https://explorer.solana.com/address/{}?cluster={}",
        address.to_string(),
        rpc_url.explorer_cluster()
    )
}

pub fn explorer_tx_url(signature: &impl ToString, rpc_url: &SolanaRpcUrl) -> String {
    format!(
        "https://explorer.solana.com/tx/{}?cluster={}",
        signature.to_string(),
        rpc_url.explorer_cluster()
    )
}
