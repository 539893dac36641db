use super::CandidateProducer;
use crate::model::{CandidateSource, RawCandidate};
use async_trait::async_trait;
use regex::Regex;
use relink_scanner::{PoliteClient, ScanError, domain_key};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

const SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml"];
const SCHEMES: &[&str] = &["https", "http"];
const MAX_CHILD_SITEMAPS: usize = 5;

static LOC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<loc>\s*(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?\s*</loc>").expect("valid loc regex")
});

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// `<loc>` values in document order, trimmed and entity-decoded.
pub fn parse_sitemap_locs(xml: &str) -> Vec<String> {
    LOC_RE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|loc| !loc.is_empty())
        .collect()
}

fn is_sitemap_index(xml: &str) -> bool {
    xml.to_ascii_lowercase().contains("<sitemapindex")
}

/// URLs listed in the site's sitemap.
///
/// `/sitemap.xml` then `/sitemap_index.xml`, HTTPS before HTTP for each; the
/// first document with any entries wins. A sitemap index is followed one
/// level down.
pub struct SitemapSource {
    max_entries: usize,
}

impl SitemapSource {
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    async fn fetch_locs(client: &PoliteClient, url: &str) -> Option<(String, Vec<String>)> {
        match client.get(url).await {
            Ok(response) if response.status == 200 && !response.body.is_empty() => {
                let locs = parse_sitemap_locs(&response.body);
                (!locs.is_empty()).then_some((response.body, locs))
            }
            Ok(response) => {
                debug!("No sitemap at {} (status {})", url, response.status);
                None
            }
            Err(e) => {
                debug!("Sitemap fetch failed for {}: {}", url, e);
                None
            }
        }
    }

    async fn expand_index(&self, client: &PoliteClient, children: Vec<String>) -> Vec<String> {
        let mut locs = Vec::new();
        for child in children.iter().take(MAX_CHILD_SITEMAPS) {
            if let Some((_, child_locs)) = Self::fetch_locs(client, child).await {
                locs.extend(child_locs);
            }
            if locs.len() >= self.max_entries {
                break;
            }
        }
        locs
    }
}

#[async_trait]
impl CandidateProducer for SitemapSource {
    fn source(&self) -> CandidateSource {
        CandidateSource::Sitemap
    }

    async fn produce(
        &self,
        original: &Url,
        client: &PoliteClient,
    ) -> Result<Vec<RawCandidate>, ScanError> {
        let host = domain_key(original)
            .ok_or_else(|| ScanError::InvalidUrl(format!("URL has no host: {}", original)))?;

        for path in SITEMAP_PATHS {
            for scheme in SCHEMES {
                let sitemap_url = format!("{}://{}{}", scheme, host, path);
                let Some((body, mut locs)) = Self::fetch_locs(client, &sitemap_url).await else {
                    continue;
                };

                if is_sitemap_index(&body) {
                    locs = self.expand_index(client, locs).await;
                    if locs.is_empty() {
                        continue;
                    }
                }

                locs.truncate(self.max_entries);
                debug!("{} entries from {}", locs.len(), sitemap_url);
                return Ok(locs
                    .into_iter()
                    .map(|loc| {
                        RawCandidate::new(loc).with_reason(format!("listed in {}", sitemap_url))
                    })
                    .collect());
            }
        }

        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locs() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
              <url><loc>https://example.com/</loc></url>
              <url><LOC>
                  https://example.com/blog/post-1-updated
              </LOC></url>
              <url><loc><![CDATA[https://example.com/search?q=a&b=c]]></loc></url>
              <url><loc>https://example.com/a?x=1&amp;y=2</loc></url>
              <url><loc>   </loc></url>
            </urlset>"#;

        assert_eq!(
            parse_sitemap_locs(xml),
            vec![
                "https://example.com/",
                "https://example.com/blog/post-1-updated",
                "https://example.com/search?q=a&b=c",
                "https://example.com/a?x=1&y=2",
            ]
        );
    }

    #[test]
    fn test_detects_index() {
        assert!(is_sitemap_index(
            "<SitemapIndex><sitemap><loc>https://e.com/s1.xml</loc></sitemap></SitemapIndex>"
        ));
        assert!(!is_sitemap_index("<urlset></urlset>"));
    }
}
