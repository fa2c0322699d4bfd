//! Textual location lookup for a literal IP address.

use std::net::IpAddr;

use serde::Deserialize;

use crate::error::{FetchError, Result};
use crate::Fetcher;

const LOOKUP_URL: &str = "https://ip.zxinc.org/api.php";

#[derive(Debug, Deserialize)]
struct LookupBody {
    data: LookupData,
}

#[derive(Debug, Deserialize)]
struct LookupData {
    location: String,
}

impl Fetcher {
    /// Location string for an address already validated as a literal IP.
    pub async fn ip_location(&self, address: IpAddr) -> Result<String> {
        let body: LookupBody = self
            .client()
            .get(LOOKUP_URL)
            .query(&[("type", "json"), ("ip", &address.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| FetchError::Shape(format!("ip lookup: {e}")))?;
        Ok(body.data.location)
    }
}
