//! Syndicated page fetches attached verbatim as model content.

use crate::error::Result;
use crate::Fetcher;

const HACKER_NEWS_URL: &str = "https://news.ycombinator.com";
const TRENDING_URL: &str = "https://github.com/trending";
const SMART_QUESTIONS_URL: &str = "http://www.catb.org/~esr/faqs/smart-questions.html";

impl Fetcher {
    pub async fn hacker_news(&self) -> Result<String> {
        Ok(self
            .client()
            .get(HACKER_NEWS_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    pub async fn github_trending(&self) -> Result<String> {
        Ok(self
            .client()
            .get(TRENDING_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    /// The questions essay; callers cache this in the store.
    pub async fn smart_questions(&self) -> Result<String> {
        Ok(self
            .client()
            .get(SMART_QUESTIONS_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}
