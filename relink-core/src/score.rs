//! Lexical relevance scoring.
//!
//! Additive and capped: +20 per base token in the candidate URL, +15 per base
//! token in the fetched page text, +5 for directory-style URLs, clamped to 100.

use url::Url;

pub const URL_TOKEN_POINTS: u32 = 20;
pub const TEXT_TOKEN_POINTS: u32 = 15;
pub const DIRECTORY_BONUS: u32 = 5;
pub const MAX_SCORE: u32 = 100;

const PATH_SEGMENTS: usize = 3;
const HOST_TOKENS: usize = 2;

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c.is_whitespace()
}

/// Identity tokens of the original URL: words from the last three path
/// segments, then up to two host labels. Deduplicated, first occurrence wins.
pub fn base_tokens(url: &Url) -> Vec<String> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let tail = &segments[segments.len().saturating_sub(PATH_SEGMENTS)..];

    let path_tokens = tail
        .iter()
        .flat_map(|segment| segment.split(is_separator))
        .filter(|token| token.chars().count() > 1)
        .map(str::to_lowercase);

    let host = url.host_str().unwrap_or_default().to_lowercase();
    let host_tokens: Vec<String> = host
        .split(['.', '-'])
        .filter(|label| label.len() > 1 && *label != "www")
        .take(HOST_TOKENS)
        .map(str::to_string)
        .collect();

    let mut tokens: Vec<String> = Vec::new();
    for token in path_tokens.chain(host_tokens) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

pub fn score(base_tokens: &[String], candidate_url: &str, page_text: Option<&str>) -> u8 {
    let url_lower = candidate_url.to_lowercase();
    let text_lower = page_text.filter(|t| !t.is_empty()).map(str::to_lowercase);

    let mut total: u32 = 0;
    for token in base_tokens {
        if url_lower.contains(token.as_str()) {
            total += URL_TOKEN_POINTS;
        }
        if let Some(text) = &text_lower
            && text.contains(token.as_str())
        {
            total += TEXT_TOKEN_POINTS;
        }
    }
    if candidate_url.ends_with('/') {
        total += DIRECTORY_BONUS;
    }

    total.min(MAX_SCORE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(url: &str) -> Vec<String> {
        base_tokens(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_base_tokens_from_path_and_host() {
        assert_eq!(
            tokens("http://example.com/blog/post-1"),
            vec!["blog", "post", "example", "com"]
        );
    }

    #[test]
    fn test_base_tokens_use_last_three_segments() {
        assert_eq!(
            tokens("https://www.shop.example.com/a1/b2/c3_x/d4-e5/"),
            vec!["b2", "c3", "d4", "e5", "shop", "example"]
        );
    }

    #[test]
    fn test_base_tokens_dedupe_preserving_order() {
        assert_eq!(
            tokens("https://docs.rs/docs/docs-guide"),
            vec!["docs", "guide", "rs"]
        );
    }

    #[test]
    fn test_score_url_tokens() {
        let base = tokens("http://example.com/blog/post-1");
        assert_eq!(
            score(&base, "https://example.com/blog/post-1-updated", None),
            80
        );
        assert_eq!(score(&base, "http://example.com/blog/", None), 65);
        assert_eq!(score(&base, "http://example.com/", None), 45);
    }

    #[test]
    fn test_score_page_text_tokens() {
        let base = tokens("http://example.com/blog/post-1");
        let text = "Read the Blog. Latest POST below.";
        // example, com in the URL (40) + blog, post in the text (30)
        assert_eq!(score(&base, "http://example.com/news", Some(text)), 70);
    }

    #[test]
    fn test_score_is_capped() {
        let base = tokens("http://example.com/blog/post-1");
        let text = "example.com blog post";
        assert_eq!(
            score(&base, "http://example.com/blog/post/", Some(text)),
            100
        );
    }

    #[test]
    fn test_score_without_tokens() {
        assert_eq!(score(&[], "http://x.org/a", Some("anything")), 0);
        assert_eq!(score(&[], "http://x.org/", None), 5);
    }
}
