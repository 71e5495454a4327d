use crate::core::auth::AuthSession;
use crate::core::catalog::CatalogFetcher;
use crate::core::claim::CartFlow;
use crate::core::orders::OrderHistoryFetcher;
use crate::domain::model::{Account, ClaimSummary, ClaimedOrder, Ownership, Promotion};
use crate::domain::ports::{Browser, ChallengeSolver, StoreConfig};
use crate::utils::error::{ClaimerError, Result};
use std::collections::HashSet;
use tokio::sync::OnceCell;

/// Splits a promotion snapshot against the claimed-order set: flags
/// ownership on every promotion and returns the ones still worth claiming.
pub fn unclaimed(promotions: &mut [Promotion], claimed: &[ClaimedOrder]) -> Vec<Promotion> {
    let owned_namespaces: HashSet<&str> = claimed
        .iter()
        .map(|order| order.namespace.as_str())
        .collect();

    let mut worklist = Vec::new();
    for promotion in promotions.iter_mut() {
        promotion.ownership = if owned_namespaces.contains(promotion.namespace.as_str()) {
            Ownership::Owned
        } else {
            Ownership::NotOwned
        };
        if promotion.ownership == Ownership::NotOwned {
            worklist.push(promotion.clone());
        }
    }
    worklist
}

/// One account's claim cycle: discover the weekly giveaways, authenticate
/// through the challenge gate, drop already-owned items, drive the cart.
///
/// Owns one browser context; the login and claim flows each get a dedicated
/// page. Promotions are fetched lazily and at most once per engine lifetime.
pub struct ClaimEngine<B, V, C>
where
    B: Browser,
    V: ChallengeSolver,
    C: StoreConfig,
{
    browser: B,
    solver: V,
    config: C,
    account: Account,
    promotions: OnceCell<Vec<Promotion>>,
}

impl<B, V, C> ClaimEngine<B, V, C>
where
    B: Browser,
    V: ChallengeSolver,
    C: StoreConfig + Clone,
{
    pub fn new(browser: B, solver: V, config: C, account: Account) -> Self {
        Self {
            browser,
            solver,
            config,
            account,
            promotions: OnceCell::new(),
        }
    }

    /// Current giveaways, fetched once and cached for the engine lifetime.
    pub async fn promotions(&self) -> Result<&Vec<Promotion>> {
        self.promotions
            .get_or_try_init(|| async {
                let fetcher = CatalogFetcher::new(self.config.clone());
                fetcher.fetch_current_promotions().await
            })
            .await
    }

    pub async fn run(&self) -> Result<ClaimSummary> {
        let mut summary = ClaimSummary::default();

        let mut promotions = self.promotions().await?.clone();
        summary.discovered = promotions.len();
        if promotions.is_empty() {
            tracing::info!("no giveaways in the catalog this week, nothing to do");
            return Ok(summary);
        }
        tracing::info!(count = promotions.len(), "giveaways discovered");

        let login_page = self.browser.new_page().await?;
        let session = AuthSession::new(
            login_page,
            &self.solver,
            &self.config,
            &self.account.credentials,
        );
        if !session.authorize().await? {
            tracing::error!(
                account = %self.account.credentials.email,
                "authentication failed terminally, skipping claim flow"
            );
            return Ok(summary);
        }
        summary.authenticated = true;

        let claimed = self.claimed_orders().await?;
        let worklist = unclaimed(&mut promotions, &claimed);
        summary.already_owned = promotions.len() - worklist.len();
        if worklist.is_empty() {
            tracing::info!("all current giveaways already claimed");
            return Ok(summary);
        }

        let claim_page = self.browser.new_page().await?;
        let flow = CartFlow::new(claim_page, &self.solver, &self.config);
        flow.claim(&worklist).await?;
        summary.queued = worklist.len();

        tracing::info!(
            queued = summary.queued,
            already_owned = summary.already_owned,
            "claim cycle finished"
        );
        Ok(summary)
    }

    /// Best-effort dedup source. A rejected session here only costs
    /// deduplication accuracy (the cart CTA check stays idempotent), so it
    /// degrades to an empty set instead of aborting the run.
    async fn claimed_orders(&self) -> Result<Vec<ClaimedOrder>> {
        let mut cookies = self.browser.cookies().await?;
        if cookies.is_empty() {
            cookies = self.account.cookies.clone();
        }

        let fetcher = OrderHistoryFetcher::new(self.config.clone());
        match fetcher.fetch_claimed(&cookies, None, None).await {
            Ok(claimed) => Ok(claimed),
            Err(ClaimerError::SessionError { status }) => {
                tracing::warn!(status, "order history rejected the session, dedup degraded");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
