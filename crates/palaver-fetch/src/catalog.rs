//! Provider catalog: model listing with pricing, and the account's
//! remaining credit balance.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{FetchError, Result};
use crate::Fetcher;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub pricing: ModelPricing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelPricing {
    pub prompt: String,
    pub completion: String,
}

impl Fetcher {
    /// The provider's model catalog as raw JSON (the `data` array).
    pub async fn models(&self) -> Result<Value> {
        let url = format!("{}/api/v1/models", self.provider().base_url);
        let body: Value = self
            .client()
            .get(&url)
            .bearer_auth(&self.provider().api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        body.get("data")
            .cloned()
            .ok_or_else(|| FetchError::Shape("model catalog has no data array".into()))
    }

    /// Remaining credit balance, verbatim.
    pub async fn credits(&self) -> Result<String> {
        let url = format!("{}/api/v1/credits", self.provider().base_url);
        Ok(self
            .client()
            .get(&url)
            .bearer_auth(&self.provider().api_key)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}

/// Filter the catalog by id substring and render one line per model,
/// optionally with per-million-token prices.
pub fn format_models(catalog: &Value, filter: &str, with_price: bool) -> Result<String> {
    let models: Vec<ModelInfo> = serde_json::from_value(catalog.clone())
        .map_err(|e| FetchError::Shape(format!("model catalog: {e}")))?;
    Ok(models
        .iter()
        .filter(|m| m.id.contains(filter))
        .map(|m| {
            if with_price {
                [
                    m.id.clone(),
                    format!("🤔 ${}/M", per_million(&m.pricing.prompt)),
                    format!("🤖 ${}/M", per_million(&m.pricing.completion)),
                ]
                .join("\n")
            } else {
                m.id.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Per-token price scaled to one million tokens, 3 significant digits.
fn per_million(price: &str) -> String {
    let scaled = price.parse::<f64>().unwrap_or(0.0) * 1_000_000.0;
    if scaled == 0.0 {
        return "0.00".to_string();
    }
    let magnitude = scaled.abs().log10().floor() as i32;
    let decimals = (2 - magnitude).max(0) as usize;
    format!("{scaled:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Value {
        serde_json::json!([
            {"id": "acme/small", "pricing": {"prompt": "0.000002", "completion": "0.000015"}},
            {"id": "acme/large", "pricing": {"prompt": "0.00001", "completion": "0.00003"}},
            {"id": "other/tiny", "pricing": {"prompt": "0", "completion": "0"}}
        ])
    }

    #[test]
    fn filter_matches_substring() {
        let out = format_models(&catalog(), "acme", false).unwrap();
        assert_eq!(out, "acme/small\nacme/large");
    }

    #[test]
    fn price_lines_scale_to_millions() {
        let out = format_models(&catalog(), "small", true).unwrap();
        assert_eq!(out, "acme/small\n🤔 $2.00/M\n🤖 $15.0/M");
    }

    #[test]
    fn empty_filter_lists_everything() {
        let out = format_models(&catalog(), "", false).unwrap();
        assert_eq!(out.lines().count(), 3);
    }
}
