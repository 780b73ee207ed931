//! Registered time claims: `exp`, `nbf` and `iat`.
//!
//! Claim values are NumericDate seconds. A missing, non-numeric or zero
//! claim counts as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3600.0;
const DAY: f64 = 86400.0;

/// Time claims that get a human-readable companion field.
pub const TIME_CLAIMS: [&str; 3] = ["exp", "iat", "nbf"];

/// Validity of a token's time window relative to a given instant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampStatus {
    /// `exp` is at or before now.
    pub is_expired: bool,
    /// `nbf` is after now.
    pub is_not_yet_valid: bool,
    /// Remaining lifetime, only for tokens with `exp` that are not expired.
    pub time_to_expiry: Option<String>,
}

fn numeric_claim(payload: &Value, name: &str) -> Option<f64> {
    payload
        .get(name)
        .and_then(Value::as_f64)
        .filter(|secs| *secs != 0.0)
}

fn epoch_seconds(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}

/// Returns `true` if the token has an `exp` claim at or before `now`.
pub fn is_expired(payload: &Value, now: DateTime<Utc>) -> bool {
    numeric_claim(payload, "exp").is_some_and(|exp| epoch_seconds(now) >= exp)
}

/// Evaluate `exp` and `nbf` against `now`.
pub fn timestamp_status(payload: &Value, now: DateTime<Utc>) -> TimestampStatus {
    let now_secs = epoch_seconds(now);
    let exp = numeric_claim(payload, "exp");
    let expired = is_expired(payload, now);
    let is_not_yet_valid = numeric_claim(payload, "nbf").is_some_and(|nbf| now_secs < nbf);

    let time_to_expiry = match exp {
        Some(exp) if !expired => Some(format_remaining(exp - now_secs)),
        _ => None,
    };

    TimestampStatus {
        is_expired: expired,
        is_not_yet_valid,
        time_to_expiry,
    }
}

/// `"{m}m {s}s"` under an hour, `"{h}h {m}m"` under a day, else `"{d}d {h}h"`.
fn format_remaining(secs: f64) -> String {
    let whole = |v: f64| v.floor() as u64;
    if secs < HOUR {
        format!("{}m {}s", whole(secs / MINUTE), whole(secs % MINUTE))
    } else if secs < DAY {
        format!("{}h {}m", whole(secs / HOUR), whole((secs % HOUR) / MINUTE))
    } else {
        format!("{}d {}h", whole(secs / DAY), whole((secs % DAY) / HOUR))
    }
}

/// Render NumericDate seconds as a UTC date and time.
pub fn format_timestamp(secs: f64) -> String {
    if !secs.is_finite() {
        return "Invalid timestamp".to_string();
    }
    DateTime::from_timestamp_millis((secs * 1000.0) as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Invalid timestamp".to_string())
}

/// Copy of `payload` with `<claim>_formatted` fields added next to the
/// numeric time claims. Non-object payloads are returned unchanged.
pub fn with_formatted_timestamps(payload: &Value) -> Value {
    let mut formatted = payload.clone();
    if let Value::Object(fields) = &mut formatted {
        for claim in TIME_CLAIMS {
            if let Some(secs) = numeric_claim(payload, claim) {
                fields.insert(
                    format!("{claim}_formatted"),
                    Value::String(format_timestamp(secs)),
                );
            }
        }
    }
    formatted
}
