use crate::domain::model::ClaimedOrder;
use crate::domain::ports::StoreConfig;
use crate::utils::error::{ClaimerError, Result};
use reqwest::header::{COOKIE, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// Only orders with this type count towards ownership.
const ORDER_TYPE_PURCHASE: &str = "PURCHASE";
/// Real catalog namespaces are exactly this long; anything else is an
/// incidental internal SKU.
const CATALOG_NAMESPACE_LEN: usize = 32;

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct OrderHistoryPage {
    #[serde(default)]
    orders: Vec<OrderRecord>,
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
    #[serde(rename = "orderType", default)]
    order_type: String,
    #[serde(default)]
    items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
struct OrderItem {
    #[serde(rename = "offerId", default)]
    offer_id: String,
    #[serde(default)]
    namespace: String,
}

/// Reads one page of the account's purchase history to find the catalog
/// items it already claimed.
///
/// A non-200 response is raised as a session error because an expired cookie
/// is something the caller has to repair, not a "no history" condition. A
/// body that fails to parse only degrades deduplication, so it is logged and
/// swallowed.
pub struct OrderHistoryFetcher<C: StoreConfig> {
    config: C,
    client: Client,
}

impl<C: StoreConfig> OrderHistoryFetcher<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub async fn fetch_claimed(
        &self,
        cookies: &HashMap<String, String>,
        page: Option<&str>,
        last_create_at: Option<&str>,
    ) -> Result<Vec<ClaimedOrder>> {
        let cookie_header = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        tracing::debug!(
            endpoint = self.config.order_history_endpoint(),
            page = page.unwrap_or("0"),
            "requesting order history"
        );
        let response = self
            .client
            .get(self.config.order_history_endpoint())
            .header(USER_AGENT, DESKTOP_USER_AGENT)
            .header(COOKIE, cookie_header)
            .query(&[
                ("locale", self.config.locale()),
                ("page", page.unwrap_or("0")),
                ("lastCreatedAt", last_create_at.unwrap_or("")),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(ClaimerError::SessionError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let mut claimed = Vec::new();
        match serde_json::from_str::<OrderHistoryPage>(&body) {
            Ok(history) => {
                for order in history.orders {
                    if order.order_type != ORDER_TYPE_PURCHASE {
                        continue;
                    }
                    for item in order.items {
                        if item.namespace.len() != CATALOG_NAMESPACE_LEN {
                            continue;
                        }
                        claimed.push(ClaimedOrder {
                            offer_id: item.offer_id,
                            namespace: item.namespace,
                        });
                    }
                }
            }
            Err(err) => {
                tracing::warn!(%err, "order history body did not parse, deduplication degraded");
            }
        }
        Ok(claimed)
    }
}
