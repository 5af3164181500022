pub mod rpc;

pub use rpc::{RpcConnection, RpcError, SolanaRpcConnection, SolanaRpcUrl};
