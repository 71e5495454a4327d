use async_trait::async_trait;
use epic_claimer::{
    Account, Browser, ChallengeMode, ChallengeOutcome, ChallengeSolver, ClaimEngine, ClaimerError,
    CliConfig, Credentials, Result, StorePage,
};
use httpmock::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// UI hooks the fake page reacts to, mirroring the storefront markup.
const SIGN_IN_LINK: &str = r#"a[role="button"]:has-text("Sign In")"#;
const CTA_BUTTON: &str = "//aside//button[@data-testid='add-to-cart-cta-button']";
const ORDER_CONFIRM_BUTTON: &str = "//div[@class='payment-order-confirm']";

const ADD_TO_CART_LABEL: &str = "Add To Cart";
const VIEW_IN_CART_LABEL: &str = "View In Cart";

fn timeout_err(subject: &str) -> ClaimerError {
    ClaimerError::TimeoutError {
        subject: subject.to_string(),
        timeout_ms: 2000,
    }
}

/// Shared scripted browser state. Both the login page and the claim page see
/// the same storefront.
#[derive(Default)]
struct StoreState {
    /// How many more times the sign-in control shows before login sticks.
    sign_in_left: Mutex<usize>,
    /// When set, sign-in never sticks and the redirect never lands.
    gated: bool,
    /// CTA label per product URL.
    labels: Mutex<HashMap<String, String>>,
    cta_clicks: Mutex<Vec<String>>,
    confirm_clicks: AtomicUsize,
    cookies: HashMap<String, String>,
}

struct FakePage {
    state: Arc<StoreState>,
    current_url: Mutex<String>,
}

#[async_trait]
impl StorePage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        *self.current_url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn click(&self, selector: &str, _timeout: Duration) -> Result<()> {
        if selector == CTA_BUTTON {
            let url = self.current_url.lock().unwrap().clone();
            self.state.cta_clicks.lock().unwrap().push(url.clone());
            self.state
                .labels
                .lock()
                .unwrap()
                .insert(url, VIEW_IN_CART_LABEL.to_string());
            return Ok(());
        }
        if selector.contains("Continue") || selector.contains("agree") {
            // Neither the interstitial nor the license step shows here.
            return Err(timeout_err(selector));
        }
        Ok(())
    }

    async fn fill(&self, _selector: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    async fn text_content(&self, selector: &str, _timeout: Duration) -> Result<String> {
        let url = self.current_url.lock().unwrap().clone();
        self.state
            .labels
            .lock()
            .unwrap()
            .get(&url)
            .cloned()
            .ok_or_else(|| timeout_err(selector))
    }

    async fn locator_count(&self, selector: &str) -> Result<usize> {
        if selector == SIGN_IN_LINK {
            if self.state.gated {
                return Ok(1);
            }
            let mut left = self.state.sign_in_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn is_enabled(&self, _selector: &str) -> Result<bool> {
        Ok(true)
    }

    async fn wait_for_url(&self, url: &str, _timeout: Duration) -> Result<()> {
        if self.state.gated {
            return Err(timeout_err(url));
        }
        Ok(())
    }

    async fn wait_for_text(&self, selector: &str, expected: &str, _timeout: Duration) -> Result<()> {
        let url = self.current_url.lock().unwrap().clone();
        let labels = self.state.labels.lock().unwrap();
        if labels.get(&url).map(String::as_str) == Some(expected) {
            Ok(())
        } else {
            Err(timeout_err(selector))
        }
    }

    async fn click_in_frame(
        &self,
        _frame_selector: &str,
        selector: &str,
        _timeout: Duration,
    ) -> Result<()> {
        if selector == ORDER_CONFIRM_BUTTON {
            self.state.confirm_clicks.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

struct FakeBrowser {
    state: Arc<StoreState>,
}

#[async_trait]
impl Browser for FakeBrowser {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage> {
        Ok(FakePage {
            state: Arc::clone(&self.state),
            current_url: Mutex::new(String::new()),
        })
    }

    async fn cookies(&self) -> Result<HashMap<String, String>> {
        Ok(self.state.cookies.clone())
    }
}

struct FixedSolver {
    outcome: ChallengeOutcome,
}

#[async_trait]
impl ChallengeSolver for FixedSolver {
    async fn challenge_present(&self, _page: &dyn StorePage) -> Result<bool> {
        Ok(true)
    }

    async fn solve(&self, _page: &dyn StorePage, _mode: ChallengeMode) -> Result<ChallengeOutcome> {
        Ok(self.outcome)
    }
}

fn catalog_element(title: &str, slug: &str, namespace: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "namespace": namespace,
        "productSlug": slug,
        "catalogNs": { "mappings": [ { "pageSlug": slug } ] },
        "keyImages": [ { "type": "Wide", "url": "https://cdn.example/img.jpg" } ],
        "promotions": {
            "promotionalOffers": [
                { "promotionalOffers": [ { "discountSetting": { "discountPercentage": 0 } } ] }
            ]
        }
    })
}

fn test_config(server: &MockServer) -> CliConfig {
    let mut config = CliConfig::default();
    config.promotions_endpoint = server.url("/freeGamesPromotions");
    config.order_history_endpoint = server.url("/ajaxGetOrderHistory");
    config.product_page_base = "https://store.example/p/".to_string();
    config
}

fn account() -> Account {
    Account {
        credentials: Credentials {
            email: "player@example.com".to_string(),
            password: "hunter2".to_string(),
        },
        cookies: HashMap::new(),
    }
}

#[tokio::test]
async fn test_full_cycle_claims_only_the_unowned_giveaway() {
    let server = MockServer::start();
    let owned_ns = "a".repeat(32);
    let fresh_ns = "b".repeat(32);

    server.mock(|when, then| {
        when.method(GET).path("/freeGamesPromotions");
        then.status(200).json_body(serde_json::json!({
            "data": { "Catalog": { "searchStore": { "elements": [
                catalog_element("Owned Game", "owned-game", &owned_ns),
                catalog_element("Fresh Game", "fresh-game", &fresh_ns),
            ] } } }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/ajaxGetOrderHistory");
        then.status(200).json_body(serde_json::json!({
            "orders": [ {
                "orderType": "PURCHASE",
                "items": [ { "offerId": "offer-1", "namespace": owned_ns } ]
            } ]
        }));
    });

    let state = Arc::new(StoreState {
        // One login bounce before the session sticks.
        sign_in_left: Mutex::new(1),
        labels: Mutex::new(HashMap::from([
            (
                "https://store.example/p/owned-game".to_string(),
                ADD_TO_CART_LABEL.to_string(),
            ),
            (
                "https://store.example/p/fresh-game".to_string(),
                ADD_TO_CART_LABEL.to_string(),
            ),
        ])),
        cookies: HashMap::from([("EPIC_SSO".to_string(), "token".to_string())]),
        ..Default::default()
    });

    let engine = ClaimEngine::new(
        FakeBrowser {
            state: Arc::clone(&state),
        },
        FixedSolver {
            outcome: ChallengeOutcome::Success,
        },
        test_config(&server),
        account(),
    );

    let summary = engine.run().await.unwrap();

    assert!(summary.authenticated);
    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.already_owned, 1);
    assert_eq!(summary.queued, 1);

    // Only the unowned giveaway went through the add step, and the batch was
    // confirmed exactly once.
    assert_eq!(
        state.cta_clicks.lock().unwrap().clone(),
        vec!["https://store.example/p/fresh-game".to_string()]
    );
    assert_eq!(state.confirm_clicks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_auth_exhaustion_finishes_cleanly_without_claiming() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/freeGamesPromotions");
        then.status(200).json_body(serde_json::json!({
            "data": { "Catalog": { "searchStore": { "elements": [
                catalog_element("Fresh Game", "fresh-game", &"c".repeat(32)),
            ] } } }
        }));
    });

    let state = Arc::new(StoreState {
        gated: true,
        ..Default::default()
    });

    let engine = ClaimEngine::new(
        FakeBrowser {
            state: Arc::clone(&state),
        },
        FixedSolver {
            outcome: ChallengeOutcome::Crash,
        },
        test_config(&server),
        account(),
    );

    let summary = engine.run().await.unwrap();

    assert!(!summary.authenticated);
    assert_eq!(summary.discovered, 1);
    assert_eq!(summary.queued, 0);
    assert!(state.cta_clicks.lock().unwrap().is_empty());
}
