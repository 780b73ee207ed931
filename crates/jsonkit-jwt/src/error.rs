//! Error types for JWT decoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The JSON-bearing sections of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Header,
    Payload,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Payload => f.write_str("payload"),
        }
    }
}

/// Errors produced while decoding a token.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("token must be a non-empty string")]
    Empty,

    #[error("invalid JWT structure: expected header, payload and signature separated by dots, got {parts} part(s)")]
    PartCount { parts: usize },

    #[error("all JWT parts (header, payload, signature) must be non-empty")]
    EmptyPart,

    #[error("invalid base64url encoding in {section} section")]
    Encoding { section: Section },

    #[error("invalid JSON in {section} section")]
    Json { section: Section },
}

/// Convenience type alias for JWT operations.
pub type Result<T> = std::result::Result<T, JwtError>;
