use crate::error::{ResolveError, Result};
use url::Url;

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Trim and default the scheme to `http`. Blank input yields an empty string.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Normalize and parse, rejecting anything that could not be fetched.
pub fn parse_normalized(raw: &str) -> Result<Url> {
    let normalized = normalize_url(raw);
    if normalized.is_empty() {
        return Err(ResolveError::InvalidInput("empty URL".to_string()));
    }

    let url = Url::parse(&normalized)
        .map_err(|e| ResolveError::InvalidInput(format!("'{}': {}", raw.trim(), e)))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ResolveError::InvalidInput(format!(
            "'{}' has no host",
            raw.trim()
        ))),
    }
}
