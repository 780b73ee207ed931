//! Splitting user input into a base URL and its query parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::query::parse_query_string;

/// A URL (or bare query string) split into its parts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedUrl {
    /// The input as a complete URL; `?query` for a bare query string.
    pub full_url: String,
    /// Everything before the first `?`.
    pub base_url: String,
    /// Everything after the first `?`, undecoded.
    pub query_string: String,
    /// The decoded query parameters.
    pub query_params: Map<String, Value>,
}

/// Split a full URL, a bare query string, or a plain URL without a query.
///
/// - `https://x.io/p?a=1` -> base `https://x.io/p`, query `a=1`
/// - `a=1&b=2` or `&a=1` -> no base, query `a=1&b=2` / `a=1`
/// - `https://x.io/p` -> base only
///
/// Surrounding whitespace is ignored.
pub fn extract_query_from_url(input: &str) -> ParsedUrl {
    let input = input.trim();

    let (full_url, base_url, query_string) = if let Some((base, query)) = input.split_once('?') {
        (input.to_string(), base.to_string(), query.to_string())
    } else if input.starts_with('&') || looks_like_query(input) {
        let query = input.strip_prefix('&').unwrap_or(input);
        let full = if query.is_empty() {
            String::new()
        } else {
            format!("?{query}")
        };
        (full, String::new(), query.to_string())
    } else {
        (input.to_string(), input.to_string(), String::new())
    };

    let query_params = parse_query_string(&query_string);
    ParsedUrl {
        full_url,
        base_url,
        query_string,
        query_params,
    }
}

/// Returns `true` for input starting with `name=` where `name` is an
/// identifier (`[A-Za-z_][A-Za-z0-9_]*`).
fn looks_like_query(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    for c in chars {
        if c == '=' {
            return true;
        }
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
    }
    false
}

/// Loose URL check: an absolute URL, or anything that looks like a query,
/// a path, or a host name.
pub fn is_valid_url(input: &str) -> bool {
    if Url::parse(input).is_ok() {
        return true;
    }
    input.contains(|c: char| matches!(c, '=' | '?' | '&')) || input.starts_with('/') || input.contains('.')
}

/// Prefix a non-empty query string with `?` if it lacks one.
pub fn format_query_string(query: &str) -> String {
    if query.is_empty() || query.starts_with('?') {
        query.to_string()
    } else {
        format!("?{query}")
    }
}
