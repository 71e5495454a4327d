pub mod auth;
pub mod budget;
pub mod catalog;
pub mod claim;
pub mod engine;
pub mod orders;

pub use crate::domain::model::{
    Account, AuthOutcome, ChallengeMode, ChallengeOutcome, ClaimSummary, ClaimedOrder,
    Credentials, Ownership, Promotion,
};
pub use crate::domain::ports::{Browser, ChallengeSolver, StoreConfig, StorePage};
pub use crate::utils::error::Result;
