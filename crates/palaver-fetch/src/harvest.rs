//! Link harvesting: URL extraction from free text, body fetching and
//! visible-text reduction.

use crate::error::Result;
use crate::Fetcher;

/// Scan texts for `http(s)://` runs (terminated by whitespace or a
/// backtick), deduplicated in discovery order.
pub fn extract_links<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for text in texts {
        let mut rest = text;
        while let Some(at) = rest.find("http") {
            let candidate = &rest[at..];
            let scheme_len = if candidate.starts_with("https://") {
                8
            } else if candidate.starts_with("http://") {
                7
            } else {
                rest = &rest[at + 4..];
                continue;
            };
            let end = candidate
                .find(|c: char| c.is_whitespace() || c == '`')
                .unwrap_or(candidate.len());
            if end > scheme_len {
                let url = &candidate[..end];
                if !links.iter().any(|l| l == url) {
                    links.push(url.to_string());
                }
            }
            rest = &candidate[end..];
        }
    }
    links
}

/// Reduce an HTML body to its visible text.
pub fn to_visible_text(html: &str) -> String {
    nanohtml2text::html2text(html)
}

/// Wrap a fetched body in the delimited block appended to model content.
pub fn resource_block(url: &str, body: &str) -> String {
    format!("<resource uri=\"{url}\">\n{body}\n</resource>")
}

impl Fetcher {
    /// Fetch one harvested link's body as text.
    pub async fn link_body(&self, url: &str) -> Result<String> {
        tracing::debug!(url = %url, "fetching harvested link");
        Ok(self.client().get(url).send().await?.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_discovery_order() {
        let links = extract_links([
            "see https://a.example/x and http://b.example/y",
            "again https://a.example/x plus https://c.example",
        ]);
        assert_eq!(
            links,
            vec![
                "https://a.example/x",
                "http://b.example/y",
                "https://c.example"
            ]
        );
    }

    #[test]
    fn stops_at_whitespace_and_backticks() {
        let links = extract_links(["`https://a.example/code` https://b.example/path\nrest"]);
        assert_eq!(links, vec!["https://a.example/code", "https://b.example/path"]);
    }

    #[test]
    fn bare_scheme_is_not_a_link() {
        assert!(extract_links(["http:// and https:// alone"]).is_empty());
        assert!(extract_links(["httpx://nope"]).is_empty());
    }

    #[test]
    fn resource_block_carries_uri() {
        let block = resource_block("https://a.example", "body");
        assert_eq!(block, "<resource uri=\"https://a.example\">\nbody\n</resource>");
    }

    #[test]
    fn visible_text_drops_markup() {
        let text = to_visible_text("<html><body><p>hello <b>world</b></p></body></html>");
        assert!(text.contains("hello"));
        assert!(text.contains("world"));
        assert!(!text.contains("<p>"));
    }
}
