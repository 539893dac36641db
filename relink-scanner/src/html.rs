//! HTML helpers: link extraction, visible text and "this page moved" signals.

use crate::politeness::domain_key;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

const MOVED_PHRASES: &[&str] = &[
    "has moved",
    "have moved",
    "moved to",
    "been moved",
    "new location",
    "new address",
    "now located at",
    "now lives at",
    "has been updated",
    "updated version",
    "has been replaced",
    "redirected to",
];

/// Where an on-page signal says the content went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSignal {
    MetaRefresh(Url),
    Canonical(Url),
    MovedLink(Url),
}

impl PageSignal {
    pub fn url(&self) -> &Url {
        match self {
            PageSignal::MetaRefresh(url) | PageSignal::Canonical(url) | PageSignal::MovedLink(url) => url,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            PageSignal::MetaRefresh(_) => "meta refresh target",
            PageSignal::Canonical(_) => "canonical link",
            PageSignal::MovedLink(_) => "\"page moved\" link",
        }
    }
}

/// Resolve an href against the page it appeared on. Non-navigational hrefs
/// are dropped and fragments stripped.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    if href.is_empty()
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

/// Same host and explicit port.
pub fn is_same_site(url: &Url, base: &Url) -> bool {
    match (domain_key(url), domain_key(base)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Links on the page, absolute, fragment-free, deduplicated in document order.
pub fn extract_links(html: &str, current_url: &Url) -> Vec<Url> {
    let Ok(link_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&link_selector) {
        let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_href(current_url, href))
        else {
            continue;
        };
        if seen.insert(url.to_string()) {
            links.push(url);
        }
    }
    links
}

/// Text whose parent is a script/style-like element is never shown to readers.
fn is_hidden_parent(parent: Option<&Node>) -> bool {
    parent
        .and_then(Node::as_element)
        .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
}

/// Text a reader would see: tags stripped, script/style skipped, whitespace collapsed.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();
    for node in document.root_element().descendants() {
        if let Some(chunk) = node.value().as_text()
            && !is_hidden_parent(node.parent().map(|p| p.value()))
        {
            text.push_str(chunk);
            text.push(' ');
        }
    }
    collapse_whitespace(&text)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Checks, in order: meta refresh, canonical link, then the first link that
/// follows "moved"/"updated" wording.
pub fn find_redirect_signal(html: &str, page_url: &Url) -> Option<PageSignal> {
    let document = Html::parse_document(html);

    if let Some(url) = meta_refresh_target(&document, page_url) {
        return Some(PageSignal::MetaRefresh(url));
    }
    if let Some(url) = canonical_target(&document, page_url) {
        return Some(PageSignal::Canonical(url));
    }
    moved_link_target(&document, page_url).map(PageSignal::MovedLink)
}

fn meta_refresh_target(document: &Html, page_url: &Url) -> Option<Url> {
    let selector = Selector::parse("meta[http-equiv][content]").ok()?;
    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"))
        })
        .filter_map(|el| el.value().attr("content"))
        .filter_map(refresh_url)
        .find_map(|target| resolve_href(page_url, target))
}

/// Pulls the target out of `content="5; url='/new'"`.
fn refresh_url(content: &str) -> Option<&str> {
    let lower = content.to_ascii_lowercase();
    let idx = lower.find("url")?;
    let rest = content[idx + 3..].trim_start().strip_prefix('=')?;
    let target = rest.trim().trim_matches(|c| c == '\'' || c == '"').trim();
    (!target.is_empty()).then_some(target)
}

fn canonical_target(document: &Html, page_url: &Url) -> Option<Url> {
    let selector = Selector::parse("link[rel][href]").ok()?;
    document
        .select(&selector)
        .filter(|el| {
            el.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .filter_map(|el| el.value().attr("href"))
        .find_map(|href| resolve_href(page_url, href))
}

fn moved_link_target(document: &Html, page_url: &Url) -> Option<Url> {
    let mut armed = false;
    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            if is_hidden_parent(node.parent().map(|p| p.value())) {
                continue;
            }
            let lower = text.to_lowercase();
            if MOVED_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
                armed = true;
            }
        } else if armed
            && let Some(element) = ElementRef::wrap(node)
            && element.value().name() == "a"
            && let Some(url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_href(page_url, href))
        {
            return Some(url);
        }
    }
    None
}
