//! GitHub API: latest pull request of the watched repository and the
//! raw manual document attached by the `help` command.

use serde::Deserialize;

use crate::error::{FetchError, Result};
use crate::Fetcher;

const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("palaver/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
pub struct Pull {
    pub title: String,
    pub html_url: String,
}

impl Fetcher {
    fn github_request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client()
            .get(url)
            .header("user-agent", USER_AGENT)
            .header("x-github-api-version", API_VERSION);
        if let Some(token) = &self.config().github_token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// The most recently updated pull request of the watched repo.
    pub async fn latest_pull(&self) -> Result<Pull> {
        let url = format!("{API_BASE}/repos/{}/pulls", self.config().pulls_repo);
        let pulls: Vec<Pull> = self
            .github_request(&url)
            .query(&[("state", "all"), ("sort", "updated"), ("direction", "desc")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        pulls
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Shape("pull listing is empty".into()))
    }

    /// The manual document, fetched raw from the configured repo path.
    pub async fn manual(&self) -> Result<String> {
        let url = format!(
            "{API_BASE}/repos/{}/contents/{}",
            self.config().manual_repo,
            self.config().manual_path
        );
        Ok(self
            .github_request(&url)
            .header("accept", "application/vnd.github.raw")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}
