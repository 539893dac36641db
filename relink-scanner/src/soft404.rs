//! Soft-404 detection: a 200 response whose content says the page is gone.
//!
//! Heuristic only. Short pages are treated as placeholders, which misfires on
//! legitimately terse pages; that trade-off is accepted.

use crate::html::visible_text;

pub const MIN_VISIBLE_CHARS: usize = 60;

const NOT_FOUND_PHRASES: &[&str] = &[
    "page not found",
    "404 not found",
    "the page you requested could not be found",
    "does not exist",
    "not found on this server",
    "we could not find",
    "no results found",
    "sorry, we couldn't find",
    "requested url was not found",
];

pub fn is_soft_404(body: &str) -> bool {
    let lower = body.to_lowercase();
    if NOT_FOUND_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        return true;
    }
    visible_text(body).chars().count() < MIN_VISIBLE_CHARS
}
