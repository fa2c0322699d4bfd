//! Comic metadata scraping — the image URL comes from the page's
//! `og:image` meta tag, not an API.

use crate::error::Result;
use crate::Fetcher;

const BASE_URL: &str = "https://xkcd.com";
const RANDOM_URL: &str = "https://c.xkcd.com/random/comic";

/// Which comic page to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComicPick<'a> {
    Current,
    Random,
    Numbered(&'a str),
}

impl Fetcher {
    /// The comic page HTML for the given pick.
    pub async fn comic_page(&self, pick: ComicPick<'_>) -> Result<String> {
        let url = match pick {
            ComicPick::Current => BASE_URL.to_string(),
            ComicPick::Random => RANDOM_URL.to_string(),
            ComicPick::Numbered(n) => format!("{BASE_URL}/{n}"),
        };
        Ok(self.client().get(&url).send().await?.text().await?)
    }
}

/// Extract the `og:image` content URL from a comic page.
pub fn og_image(html: &str) -> Option<&str> {
    let marker = "<meta property=\"og:image\" content=\"";
    let start = html.find(marker)? + marker.len();
    let rest = &html[start..];
    let end = rest.find('"')?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn og_image_extracts_content() {
        let html = r#"<head><meta property="og:image" content="https://imgs.xkcd.com/comics/x.png"></head>"#;
        assert_eq!(
            og_image(html),
            Some("https://imgs.xkcd.com/comics/x.png")
        );
    }

    #[test]
    fn missing_meta_yields_none() {
        assert_eq!(og_image("<head></head>"), None);
        assert_eq!(
            og_image(r#"<meta property="og:image" content="">"#),
            None
        );
    }
}
