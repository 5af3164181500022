pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod instructions;
pub mod pda;
pub mod settings;
pub mod telemetry;
pub mod utils;
pub mod verify;
pub mod workflow;

pub use config::{MinterConfig, NftDescriptor, ProgramIds, WorkflowConfig};
pub use errors::{ConfigError, MinterError, VerificationError};
pub use pda::NftAddresses;
pub use settings::init_config;
pub use verify::{verify_mint, MintVerification};
pub use workflow::{MintOutcome, MintStep, MintWorkflow};
