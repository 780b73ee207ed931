//! URL parameters <-> JSON conversion for jsonkit.
//!
//! Turns a URL or bare query string into a JSON object of its parameters,
//! and a JSON object back into a query string. Repeated keys map to arrays
//! and `parent[child]` keys map to one level of nested objects.
//!
//! # Key Types
//!
//! - [`ParsedUrl`] -- A URL split into base, raw query, and decoded params
//! - [`ParamsError`] -- Errors from JSON to query string conversion

pub mod error;
pub mod query;
pub mod url_input;

pub use error::{ParamsError, Result};
pub use query::{
    encode_value, is_serializable_for_url, object_to_query_string, parse_query_string,
};
pub use url_input::{extract_query_from_url, format_query_string, is_valid_url, ParsedUrl};
