pub mod accounts;

use crate::domain::ports::StoreConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const URL_CLAIM: &str = "https://store.epicgames.com/en-US/free-games";
pub const URL_LOGIN: &str =
    "https://www.epicgames.com/id/login?lang=en-US&noHostRedirect=true&redirectUrl=https://store.epicgames.com/en-US/free-games";
pub const URL_PROMOTIONS: &str =
    "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions";
pub const URL_PRODUCT_PAGE: &str = "https://store.epicgames.com/en-US/p/";
pub const URL_ORDER_HISTORY: &str =
    "https://www.epicgames.com/account/v2/payment/ajaxGetOrderHistory";
pub const URL_CART: &str = "https://store.epicgames.com/en-US/cart";
pub const URL_CART_SUCCESS: &str = "https://store.epicgames.com/en-US/cart/success";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "epic-claimer")]
#[command(about = "Claims the weekly free storefront promotions for registered accounts")]
pub struct CliConfig {
    #[arg(long, default_value = URL_PROMOTIONS)]
    pub promotions_endpoint: String,

    #[arg(long, default_value = URL_ORDER_HISTORY)]
    pub order_history_endpoint: String,

    #[arg(long, default_value = "en-US")]
    pub locale: String,

    #[arg(long, default_value = URL_CLAIM)]
    pub claim_url: String,

    #[arg(long, default_value = URL_LOGIN)]
    pub login_url: String,

    #[arg(long, default_value = URL_PRODUCT_PAGE)]
    pub product_page_base: String,

    #[arg(long, default_value = URL_CART)]
    pub cart_url: String,

    #[arg(long, default_value = URL_CART_SUCCESS)]
    pub cart_success_url: String,

    /// Account email, for single-account use without an accounts file.
    #[arg(long, env = "CLAIMER_EMAIL")]
    pub email: Option<String>,

    /// Account password, for single-account use without an accounts file.
    #[arg(long, env = "CLAIMER_PASSWORD")]
    pub password: Option<String>,

    /// TOML file describing the accounts to process.
    #[arg(long)]
    pub accounts: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            promotions_endpoint: URL_PROMOTIONS.to_string(),
            order_history_endpoint: URL_ORDER_HISTORY.to_string(),
            locale: "en-US".to_string(),
            claim_url: URL_CLAIM.to_string(),
            login_url: URL_LOGIN.to_string(),
            product_page_base: URL_PRODUCT_PAGE.to_string(),
            cart_url: URL_CART.to_string(),
            cart_success_url: URL_CART_SUCCESS.to_string(),
            email: None,
            password: None,
            accounts: None,
            verbose: false,
        }
    }
}

impl CliConfig {
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::default()
    }
}

impl StoreConfig for CliConfig {
    fn promotions_endpoint(&self) -> &str {
        &self.promotions_endpoint
    }

    fn order_history_endpoint(&self) -> &str {
        &self.order_history_endpoint
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn claim_url(&self) -> &str {
        &self.claim_url
    }

    fn login_url(&self) -> &str {
        &self.login_url
    }

    fn product_page_base(&self) -> &str {
        &self.product_page_base
    }

    fn cart_url(&self) -> &str {
        &self.cart_url
    }

    fn cart_success_url(&self) -> &str {
        &self.cart_success_url
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("promotions_endpoint", &self.promotions_endpoint)?;
        validate_url("order_history_endpoint", &self.order_history_endpoint)?;
        validate_url("claim_url", &self.claim_url)?;
        validate_url("login_url", &self.login_url)?;
        validate_url("product_page_base", &self.product_page_base)?;
        validate_url("cart_url", &self.cart_url)?;
        validate_url("cart_success_url", &self.cart_success_url)?;
        validate_non_empty("locale", &self.locale)?;
        if let Some(email) = &self.email {
            validate_non_empty("email", email)?;
        }
        if let Some(password) = &self.password {
            validate_non_empty("password", password)?;
        }
        Ok(())
    }
}
