use crate::domain::model::{ChallengeMode, ChallengeOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Storefront endpoints and URLs the orchestration drives. Concrete configs
/// (CLI, tests) implement this.
pub trait StoreConfig: Send + Sync {
    fn promotions_endpoint(&self) -> &str;
    fn order_history_endpoint(&self) -> &str;
    fn locale(&self) -> &str;
    fn claim_url(&self) -> &str;
    fn login_url(&self) -> &str;
    fn product_page_base(&self) -> &str;
    fn cart_url(&self) -> &str;
    fn cart_success_url(&self) -> &str;
}

/// One open browser page. Every waiting verb takes an explicit timeout and
/// reports expiry as `ClaimerError::TimeoutError`, so callers can decide
/// whether a missing element is optional or a contract violation.
#[async_trait]
pub trait StorePage: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;
    async fn click(&self, selector: &str, timeout: Duration) -> Result<()>;
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;
    async fn text_content(&self, selector: &str, timeout: Duration) -> Result<String>;
    async fn locator_count(&self, selector: &str) -> Result<usize>;
    async fn is_enabled(&self, selector: &str) -> Result<bool>;
    async fn wait_for_url(&self, url: &str, timeout: Duration) -> Result<()>;
    async fn wait_for_text(&self, selector: &str, expected: &str, timeout: Duration)
        -> Result<()>;
    async fn click_in_frame(
        &self,
        frame_selector: &str,
        selector: &str,
        timeout: Duration,
    ) -> Result<()>;
}

/// A browser context scoped to one account. Pages are opened per operation
/// and never shared across runs.
#[async_trait]
pub trait Browser: Send + Sync {
    type Page: StorePage;

    async fn new_page(&self) -> Result<Self::Page>;

    /// Snapshot of the context's current session cookies, used for the
    /// authenticated order-history read.
    async fn cookies(&self) -> Result<HashMap<String, String>>;
}

/// Opaque anti-bot challenge capability.
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Probe whether the page currently shows a challenge gate.
    async fn challenge_present(&self, page: &dyn StorePage) -> Result<bool>;

    /// Attempt to resolve the challenge shown on `page`.
    async fn solve(&self, page: &dyn StorePage, mode: ChallengeMode) -> Result<ChallengeOutcome>;
}
