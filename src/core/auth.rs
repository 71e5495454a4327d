use crate::core::budget::RetryBudget;
use crate::domain::model::{AuthOutcome, ChallengeMode, ChallengeOutcome, Credentials};
use crate::domain::ports::{ChallengeSolver, StoreConfig, StorePage};
use crate::utils::error::{ClaimerError, Result};
use std::time::Duration;

const SIGN_IN_LINK: &str = r#"a[role="button"]:has-text("Sign In")"#;
const LOGIN_PROVIDER_BUTTON: &str = "#login-with-epic";
const EMAIL_INPUT: &str = "#email";
const PASSWORD_INPUT: &str = "#password";
const SIGN_IN_BUTTON: &str = "#sign-in";

const LOGIN_STEP_TIMEOUT: Duration = Duration::from_secs(30);
const REDIRECT_TIMEOUT: Duration = Duration::from_secs(60);

/// The storefront sometimes bounces a fresh session back to the login form
/// (for example after an intermediate security prompt), so the login step
/// loops until the redirect lands on the claim page. The loop is capped so a
/// persistently broken page cannot spin forever.
const MAX_LOGIN_BOUNCES: usize = 5;

/// Drives the login form and the challenge gate until the session is
/// authenticated or the retry budget runs out.
pub struct AuthSession<'a, P, V, C>
where
    P: StorePage,
    V: ChallengeSolver,
    C: StoreConfig,
{
    page: P,
    solver: &'a V,
    config: &'a C,
    credentials: &'a Credentials,
}

impl<'a, P, V, C> AuthSession<'a, P, V, C>
where
    P: StorePage,
    V: ChallengeSolver,
    C: StoreConfig,
{
    pub fn new(page: P, solver: &'a V, config: &'a C, credentials: &'a Credentials) -> Self {
        Self {
            page,
            solver,
            config,
            credentials,
        }
    }

    /// Runs the weighted retry loop. `Ok(true)` means authenticated;
    /// `Ok(false)` means the budget was exhausted and the caller should give
    /// up on this account without tearing down the whole run.
    pub async fn authorize(&self) -> Result<bool> {
        let mut budget = RetryBudget::new();

        while budget.has_remaining() {
            budget.charge_attempt();

            let mut outcome = self.login_once().await?;
            if outcome == AuthOutcome::FailTerminal {
                // The login form kept reappearing; charge a full cycle and
                // start over.
                continue;
            }
            if outcome != AuthOutcome::Success {
                outcome = if self.solver.challenge_present(&self.page).await? {
                    AuthOutcome::Challenge
                } else {
                    AuthOutcome::Success
                };
            }

            match outcome {
                AuthOutcome::Success => return Ok(true),
                AuthOutcome::FailTerminal => continue,
                AuthOutcome::Challenge => {
                    tracing::info!(spent = budget.spent(), "challenge gate raised on login");
                    match self.solver.solve(&self.page, ChallengeMode::Login).await? {
                        ChallengeOutcome::Success => return Ok(true),
                        other => {
                            tracing::debug!(outcome = ?other, "challenge not resolved this pass");
                            budget.absorb(other);
                        }
                    }
                }
            }
        }

        tracing::error!(
            account = %self.credentials.email,
            "login retry budget exhausted, giving up on this account"
        );
        Ok(false)
    }

    /// One login pass. Returns `Success` once the claim page no longer shows
    /// the sign-in control, `Challenge` when the redirect never lands (the
    /// probe decides whether a gate is actually showing), `FailTerminal`
    /// when the form keeps bouncing past the cap.
    async fn login_once(&self) -> Result<AuthOutcome> {
        self.page.goto(self.config.claim_url()).await?;

        let mut bounces = 0;
        while self.page.locator_count(SIGN_IN_LINK).await? > 0 {
            if bounces == MAX_LOGIN_BOUNCES {
                tracing::warn!("login form keeps reappearing, abandoning this attempt");
                return Ok(AuthOutcome::FailTerminal);
            }
            bounces += 1;

            tracing::info!(account = %self.credentials.email, "signing in");
            self.page.goto(self.config.login_url()).await?;
            self.page
                .click(LOGIN_PROVIDER_BUTTON, LOGIN_STEP_TIMEOUT)
                .await?;
            self.page.fill(EMAIL_INPUT, &self.credentials.email).await?;
            self.page
                .fill(PASSWORD_INPUT, &self.credentials.password)
                .await?;
            self.page.click(SIGN_IN_BUTTON, LOGIN_STEP_TIMEOUT).await?;

            match self
                .page
                .wait_for_url(self.config.claim_url(), REDIRECT_TIMEOUT)
                .await
            {
                Ok(()) => {}
                Err(ClaimerError::TimeoutError { .. }) => {
                    // Redirect never landed; a challenge gate is probably
                    // interposed. Let the probe confirm.
                    return Ok(AuthOutcome::Challenge);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(AuthOutcome::Success)
    }
}
