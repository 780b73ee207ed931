//! JWT inspection for jsonkit.
//!
//! Decodes the header and payload of a compact-serialized JSON Web Token
//! and reports on its time claims. Signatures are carried through as raw
//! text and never verified.
//!
//! # Key Types
//!
//! - [`DecodedJwt`] -- Parsed header and payload plus the raw token parts
//! - [`TimestampStatus`] -- Expiry / not-before evaluation
//! - [`JwtError`] / [`Section`] -- Structure, encoding and JSON failures

pub mod claims;
pub mod error;
pub mod token;

pub use claims::{
    format_timestamp, is_expired, timestamp_status, with_formatted_timestamps, TimestampStatus,
    TIME_CLAIMS,
};
pub use error::{JwtError, Result, Section};
pub use token::{decode, DecodedJwt};
