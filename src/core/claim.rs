use crate::domain::model::{ChallengeMode, ChallengeOutcome, Promotion};
use crate::domain::ports::{ChallengeSolver, StoreConfig, StorePage};
use crate::utils::error::{ClaimerError, Result};
use std::time::Duration;

const CONTINUE_BUTTON: &str = "//button//span[text()='Continue']";
const CTA_BUTTON: &str = "//aside//button[@data-testid='add-to-cart-cta-button']";
const CHECKOUT_BUTTON: &str = "//button//span[text()='Check Out']";
const AGREE_CHECKBOX: &str = "//label[@for='agree']";
const ACCEPT_BUTTON: &str = "//button//span[text()='Accept']";
const PURCHASE_FRAME: &str = "//iframe[@class='']";
const ORDER_CONFIRM_BUTTON: &str = "//div[@class='payment-order-confirm']";

const ADD_TO_CART_LABEL: &str = "Add To Cart";
const VIEW_IN_CART_LABEL: &str = "View In Cart";

/// Interstitials and the license step are optional; give them a short window
/// and move on when they never show.
const OPTIONAL_STEP_TIMEOUT: Duration = Duration::from_secs(2);
const REQUIRED_STEP_TIMEOUT: Duration = Duration::from_secs(30);
const SUCCESS_URL_TIMEOUT: Duration = Duration::from_secs(60);

/// Drives the add-to-cart and checkout steps for a batch of promotions.
///
/// Only runs against an authenticated session. Items already queued in the
/// cart are skipped, so re-running a partially completed batch is safe.
/// Success is only known at the batch level, once the browser lands on the
/// checkout success URL. The purchase gate can raise a challenge of its own,
/// so the flow carries the solver alongside the page.
pub struct CartFlow<'a, P, V, C>
where
    P: StorePage,
    V: ChallengeSolver,
    C: StoreConfig,
{
    page: P,
    solver: &'a V,
    config: &'a C,
}

impl<'a, P, V, C> CartFlow<'a, P, V, C>
where
    P: StorePage,
    V: ChallengeSolver,
    C: StoreConfig,
{
    pub fn new(page: P, solver: &'a V, config: &'a C) -> Self {
        Self {
            page,
            solver,
            config,
        }
    }

    pub async fn claim(&self, promotions: &[Promotion]) -> Result<()> {
        for promotion in promotions {
            self.add_to_cart(promotion).await?;
        }
        self.check_out().await
    }

    async fn add_to_cart(&self, promotion: &Promotion) -> Result<()> {
        tracing::info!(url = %promotion.url, title = %promotion.title, "opening product page");
        self.page.goto(&promotion.url).await?;

        // Some product pages front-load a content warning.
        self.optional(
            self.page
                .click(CONTINUE_BUTTON, OPTIONAL_STEP_TIMEOUT)
                .await,
        )?;

        let label = self
            .page
            .text_content(CTA_BUTTON, REQUIRED_STEP_TIMEOUT)
            .await?;
        match label.trim() {
            VIEW_IN_CART_LABEL => {
                tracing::info!(title = %promotion.title, "already in cart, skipping");
                Ok(())
            }
            ADD_TO_CART_LABEL => {
                self.page.click(CTA_BUTTON, REQUIRED_STEP_TIMEOUT).await?;
                // The label flipping over is the postcondition of the add
                // step; not flipping within the window is a hard failure.
                self.page
                    .wait_for_text(CTA_BUTTON, VIEW_IN_CART_LABEL, REQUIRED_STEP_TIMEOUT)
                    .await?;
                tracing::info!(title = %promotion.title, "added to cart");
                Ok(())
            }
            other => Err(ClaimerError::UiContractError {
                message: format!(
                    "unexpected cart button label `{}` on {}",
                    other, promotion.url
                ),
            }),
        }
    }

    async fn check_out(&self) -> Result<()> {
        tracing::info!("checking out the cart");
        self.page.goto(self.config.cart_url()).await?;
        self.page
            .click(CHECKOUT_BUTTON, REQUIRED_STEP_TIMEOUT)
            .await?;

        // A license agreement shows up for some titles.
        match self
            .page
            .click(AGREE_CHECKBOX, OPTIONAL_STEP_TIMEOUT)
            .await
        {
            Ok(()) => {
                if self.page.is_enabled(ACCEPT_BUTTON).await? {
                    self.page
                        .click(ACCEPT_BUTTON, OPTIONAL_STEP_TIMEOUT)
                        .await?;
                }
            }
            Err(err) if err.is_timeout() => {}
            Err(err) => return Err(err),
        }

        // The payment confirmation lives in an embedded frame.
        self.page
            .click_in_frame(PURCHASE_FRAME, ORDER_CONFIRM_BUTTON, REQUIRED_STEP_TIMEOUT)
            .await?;
        match self
            .page
            .wait_for_url(self.config.cart_success_url(), SUCCESS_URL_TIMEOUT)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                // The purchase confirmation can raise its own challenge gate.
                if !self.solver.challenge_present(&self.page).await? {
                    return Err(err);
                }
                tracing::info!("challenge gate raised on checkout");
                match self.solver.solve(&self.page, ChallengeMode::Claim).await? {
                    ChallengeOutcome::Success => {
                        self.page
                            .wait_for_url(self.config.cart_success_url(), SUCCESS_URL_TIMEOUT)
                            .await?;
                    }
                    other => {
                        return Err(ClaimerError::UiContractError {
                            message: format!("checkout challenge not resolved ({other:?})"),
                        });
                    }
                }
            }
            Err(err) => return Err(err),
        }
        tracing::info!("checkout confirmed");
        Ok(())
    }

    fn optional(&self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.is_timeout() => Ok(()),
            Err(err) => Err(err),
        }
    }
}
