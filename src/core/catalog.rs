use crate::domain::model::{Ownership, Promotion};
use crate::domain::ports::StoreConfig;
use crate::utils::error::Result;
use reqwest::Client;
use serde_json::Value;

/// Reads the weekly giveaways out of the storefront promotions feed.
///
/// The feed is advisory: a transient parse failure degrades to an empty list
/// instead of failing the run, and a malformed element is skipped without
/// aborting the collection.
pub struct CatalogFetcher<C: StoreConfig> {
    config: C,
    client: Client,
}

impl<C: StoreConfig> CatalogFetcher<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub async fn fetch_current_promotions(&self) -> Result<Vec<Promotion>> {
        let mut promotions = Vec::new();

        tracing::debug!(
            endpoint = self.config.promotions_endpoint(),
            locale = self.config.locale(),
            "requesting promotions feed"
        );
        let response = self
            .client
            .get(self.config.promotions_endpoint())
            .query(&[("locale", self.config.locale())])
            .send()
            .await?;

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(%err, "promotions feed is not valid JSON, treating as empty");
                return Ok(promotions);
            }
        };

        let Some(elements) = data
            .pointer("/data/Catalog/searchStore/elements")
            .and_then(Value::as_array)
        else {
            tracing::warn!("promotions feed has no catalog elements, treating as empty");
            return Ok(promotions);
        };

        for element in elements {
            let Some(offers) = element
                .pointer("/promotions/promotionalOffers")
                .and_then(Value::as_array)
            else {
                continue;
            };
            if offers.is_empty() {
                // Upcoming promotion, not free this week.
                continue;
            }

            // A non-zero discounted price percentage is a bare price cut, not
            // a giveaway. The feed encodes it as an integer or a float
            // depending on the offer; a missing field is tolerated.
            if let Some(percentage) = offers[0]
                .pointer("/promotionalOffers/0/discountSetting/discountPercentage")
                .and_then(Value::as_f64)
            {
                if percentage != 0.0 {
                    continue;
                }
            }

            match self.build_promotion(element) {
                Some(promotion) => promotions.push(promotion),
                None => {
                    let title = element
                        .get("title")
                        .and_then(|v| v.as_str())
                        .unwrap_or("<untitled>");
                    tracing::debug!(title, "skipping malformed catalog element");
                }
            }
        }

        Ok(promotions)
    }

    fn build_promotion(&self, element: &Value) -> Option<Promotion> {
        let title = element.get("title")?.as_str()?.to_string();
        let namespace = element.get("namespace")?.as_str()?.to_string();

        // Page slug mapping first; fall back to the product slug whenever the
        // mapping lookup fails.
        let slug = element
            .pointer("/catalogNs/mappings/0/pageSlug")
            .and_then(Value::as_str)
            .or_else(|| element.get("productSlug").and_then(Value::as_str))?;
        let url = format!("{}{}", self.config.product_page_base(), slug);

        // The most representative image is listed last by convention.
        let thumbnail = element
            .get("keyImages")
            .and_then(Value::as_array)
            .and_then(|images| images.last())
            .and_then(|image| image.get("url"))
            .and_then(Value::as_str)?
            .to_string();

        Some(Promotion {
            url,
            namespace,
            title,
            thumbnail,
            ownership: Ownership::Unknown,
        })
    }
}
