use anyhow::{Context, Result, bail};

use stride_core::models::FoodRecord;
use stride_core::nutrition::{NutritionResponse, item_to_record};

const NUTRITION_URL: &str = "https://api.calorieninjas.com/v1/nutrition";

pub struct NutritionClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl NutritionClient {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "stride-cli/{} (fitness tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, api_key }
    }

    /// Query the nutrition API and normalize the items into food records.
    ///
    /// Errors here (no key, network failure, bad status) are the signal
    /// for callers to fall back to the sample table.
    pub async fn search_async(&self, query: &str, stamp_ms: i64) -> Result<Vec<FoodRecord>> {
        let Some(ref key) = self.api_key else {
            bail!("No nutrition API key configured (set CALORIE_API_KEY)");
        };

        let resp = self
            .client
            .get(NUTRITION_URL)
            .query(&[("query", query)])
            .header("X-Api-Key", key)
            .send()
            .await
            .context("Failed to reach nutrition API")?;

        if !resp.status().is_success() {
            bail!("Nutrition API returned status {}", resp.status());
        }

        let data: NutritionResponse = resp
            .json()
            .await
            .context("Failed to parse nutrition API response")?;

        Ok(data
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| item_to_record(item, stamp_ms, i))
            .collect())
    }
}
