use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether the account already owns a catalog item. Starts out unknown and
/// is resolved by cross-referencing the order history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    Unknown,
    Owned,
    NotOwned,
}

/// One storefront item currently given away free of charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub url: String,
    /// Opaque 32-character catalog identifier.
    pub namespace: String,
    pub title: String,
    pub thumbnail: String,
    pub ownership: Ownership,
}

/// One historical purchase line item, filtered down to real catalog entries
/// (32-character namespace) by the order-history fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimedOrder {
    pub offer_id: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A registered account: login credentials plus whatever session cookies the
/// caller has for it. Cookies feed the order-history read; they are never
/// persisted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub credentials: Credentials,
    #[serde(default)]
    pub cookies: HashMap<String, String>,
}

/// Result of one login attempt, before and after the challenge probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Challenge,
    FailTerminal,
}

/// Closed set of outcomes the challenge solver can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Success,
    /// The solver reloaded the challenge; retrying is cheap.
    Refresh,
    /// The solver asked to be called again; retrying is cheaper still.
    Backcall,
    /// The solver or page state is likely corrupted; retrying is expensive.
    Crash,
}

/// Which gate the solver is being pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeMode {
    Login,
    Claim,
}

/// What one engine run accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSummary {
    /// Giveaways currently listed in the catalog.
    pub discovered: usize,
    /// Giveaways the account already owned before this run.
    pub already_owned: usize,
    /// Giveaways pushed through the cart flow this run.
    pub queued: usize,
    pub authenticated: bool,
}
