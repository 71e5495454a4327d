pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{accounts::AccountsFile, CliConfig};
pub use core::{
    auth::AuthSession, budget::RetryBudget, catalog::CatalogFetcher, claim::CartFlow,
    engine::ClaimEngine, orders::OrderHistoryFetcher,
};
pub use domain::model::{
    Account, AuthOutcome, ChallengeMode, ChallengeOutcome, ClaimSummary, ClaimedOrder,
    Credentials, Ownership, Promotion,
};
pub use domain::ports::{Browser, ChallengeSolver, StoreConfig, StorePage};
pub use utils::error::{ClaimerError, Result};
