//! Entry Codec
//!
//! Converts cache entries to and from the JSON document stored in the
//! backing store:
//!
//! ```text
//! {"version":1,"key":"k","value":<any JSON>,"expireAt":"2024-05-01T10:00:00.5Z"}
//! ```
//!
//! Entries that never expire carry the zero time `0001-01-01T00:00:00Z`.
//! On read, an integer `expireAt` is taken as Unix seconds, and the zero
//! time, the Unix epoch, `0`, `null` or a missing field all mean "never".

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::entry::{CacheEntry, Expiry};

/// Schema version written into every stored entry.
pub const ENTRY_VERSION: u32 = 1;

/// Text written for entries that never expire.
pub const NEVER_EXPIRES: &str = "0001-01-01T00:00:00Z";

/// Unix seconds of `0001-01-01T00:00:00Z`.
const ZERO_TIME_SECS: i64 = -62_135_596_800;

// == Codec Error ==
#[derive(Error, Debug)]
pub enum CodecError {
    /// Value could not be serialized
    #[error("cannot encode entry: {0}")]
    Encode(String),

    /// Bytes are not a well-formed entry
    #[error("cannot decode entry: {0}")]
    Decode(String),
}

// == Wire Types ==
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryOut<'a> {
    version: u32,
    key: &'a str,
    value: &'a Value,
    expire_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryIn {
    #[serde(default)]
    version: Option<u32>,
    key: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    expire_at: Option<ExpireAtIn>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExpireAtIn {
    Epoch(i64),
    Text(String),
}

// == Encode ==
/// Serializes an entry for storage.
pub fn encode(entry: &CacheEntry) -> Result<Vec<u8>, CodecError> {
    let expire_at = match entry.expire_at {
        Expiry::Never => NEVER_EXPIRES.to_string(),
        Expiry::At(at) => at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    };

    let out = EntryOut {
        version: ENTRY_VERSION,
        key: &entry.key,
        value: &entry.value,
        expire_at,
    };

    serde_json::to_vec(&out).map_err(|e| CodecError::Encode(e.to_string()))
}

// == Decode ==
/// Parses stored bytes back into an entry.
pub fn decode(bytes: &[u8]) -> Result<CacheEntry, CodecError> {
    let raw: EntryIn =
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;

    let version = raw.version.unwrap_or(ENTRY_VERSION);
    if version != ENTRY_VERSION {
        return Err(CodecError::Decode(format!(
            "unsupported entry version {}",
            version
        )));
    }

    let expire_at = match raw.expire_at {
        None => Expiry::Never,
        Some(ExpireAtIn::Epoch(secs)) => expiry_from_epoch(secs)?,
        Some(ExpireAtIn::Text(text)) => expiry_from_text(&text)?,
    };

    Ok(CacheEntry {
        key: raw.key,
        value: raw.value,
        expire_at,
    })
}

/// Converts a request body into a JSON value; an empty body is `null`.
pub fn value_from_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

fn expiry_from_epoch(secs: i64) -> Result<Expiry, CodecError> {
    if secs == 0 {
        return Ok(Expiry::Never);
    }
    DateTime::from_timestamp(secs, 0)
        .map(Expiry::At)
        .ok_or_else(|| CodecError::Decode(format!("expireAt {} out of range", secs)))
}

fn expiry_from_text(text: &str) -> Result<Expiry, CodecError> {
    let at = DateTime::parse_from_rfc3339(text)
        .map_err(|e| CodecError::Decode(format!("invalid expireAt {:?}: {}", text, e)))?
        .with_timezone(&Utc);

    if is_never_sentinel(at) {
        Ok(Expiry::Never)
    } else {
        Ok(Expiry::At(at))
    }
}

fn is_never_sentinel(at: DateTime<Utc>) -> bool {
    at.timestamp_subsec_nanos() == 0 && matches!(at.timestamp(), 0 | ZERO_TIME_SECS)
}
