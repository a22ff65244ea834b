//! Steganography records as reported by the backend.
//!
//! A record is created by the backend for every successful hide operation and
//! anchors the SHA-256 digest of the hidden text on chain. The client never
//! mutates a record; it only displays what it fetched.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of characters kept on each side by [`shorten_hash`].
pub const DEFAULT_HASH_DISPLAY: usize = 10;

/// Status string written by the backend once the hash is anchored.
const COMPLETED: &str = "COMPLETED";

/// Anchoring status of a record.
///
/// Only `COMPLETED` counts as success; every other value is kept verbatim
/// so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    /// Hash anchored on chain.
    Completed,
    /// Any other backend status (pending, failed, ...).
    Other(String),
}

impl RecordStatus {
    /// Returns true only for `COMPLETED`.
    pub fn is_completed(&self) -> bool {
        matches!(self, RecordStatus::Completed)
    }

    /// The status string as sent by the backend.
    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Completed => COMPLETED,
            RecordStatus::Other(s) => s,
        }
    }
}

impl From<String> for RecordStatus {
    fn from(value: String) -> Self {
        if value == COMPLETED {
            RecordStatus::Completed
        } else {
            RecordStatus::Other(value)
        }
    }
}

impl From<RecordStatus> for String {
    fn from(value: RecordStatus) -> Self {
        match value {
            RecordStatus::Completed => COMPLETED.to_string(),
            RecordStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single hide operation recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SteganographyRecord {
    /// Backend identifier.
    pub id: String,
    /// Name of the stored steganographic image.
    #[serde(default)]
    pub file_name: String,
    /// Name of the uploaded image.
    #[serde(default)]
    pub original_file_name: String,
    /// Hex SHA-256 digest of the hidden text.
    #[serde(default)]
    pub text_hash: String,
    /// Identifier of the anchoring transaction; the lookup key.
    pub transaction_hash: String,
    /// Address the hash was anchored to.
    #[serde(default)]
    pub blockchain_address: String,
    /// Anchoring status.
    pub status: RecordStatus,
    /// Creation timestamp, as sent by the backend.
    #[serde(default)]
    pub created_at: String,
}

impl SteganographyRecord {
    /// Parses `created_at` into local time.
    ///
    /// Accepts RFC 3339 timestamps and zone-less ISO-8601 date-times; the
    /// latter are interpreted in the local time zone.
    pub fn created_at_local(&self) -> Option<DateTime<Local>> {
        parse_timestamp(&self.created_at)
    }

    /// `created_at` rendered for display, or the raw string if unparseable.
    pub fn format_created_at(&self) -> String {
        match self.created_at_local() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.created_at.clone(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Truncates a hash for display as `head...tail`, keeping `n` characters on
/// each side. Strings of at most `2 * n` characters are returned unchanged.
pub fn shorten_hash(hash: &str, n: usize) -> String {
    let len = hash.chars().count();
    if len <= n * 2 {
        return hash.to_string();
    }
    let head: String = hash.chars().take(n).collect();
    let tail: String = hash.chars().skip(len - n).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": "65f1c0",
            "fileName": "stego_a.png",
            "originalFileName": "a.png",
            "textHash": "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
            "transactionHash": "0xabc",
            "blockchainAddress": "0x1111",
            "createdAt": "2024-03-01T10:15:30.123",
            "status": "COMPLETED"
        }"#
    }

    #[test]
    fn test_deserialize_camel_case() {
        let record: SteganographyRecord = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(record.transaction_hash, "0xabc");
        assert_eq!(record.original_file_name, "a.png");
        assert!(record.status.is_completed());
    }

    #[test]
    fn test_unknown_status_is_not_completed() {
        let status = RecordStatus::from("PENDING".to_string());
        assert!(!status.is_completed());
        assert_eq!(status.to_string(), "PENDING");
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        let json = serde_json::to_string(&RecordStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
    }

    #[test]
    fn test_shorten_hash_keeps_short_strings() {
        assert_eq!(shorten_hash("0xabc", 10), "0xabc");
        let twenty = "a".repeat(20);
        assert_eq!(shorten_hash(&twenty, 10), twenty);
        assert_eq!(shorten_hash(&shorten_hash("0xabc", 2), 2), "0xabc");
    }

    #[test]
    fn test_shorten_hash_truncates_long_strings() {
        let hash = "0123456789abcdefghijklmnop";
        assert_eq!(shorten_hash(hash, 4), "0123...mnop");
    }

    #[test]
    fn test_created_at_parses_naive_and_rfc3339() {
        let record: SteganographyRecord = serde_json::from_str(sample_json()).unwrap();
        let ts = record.created_at_local().unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-01 10:15:30");

        assert!(parse_timestamp("2024-03-01T10:15:30Z").is_some());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_unparseable_created_at_displays_raw() {
        let mut record: SteganographyRecord = serde_json::from_str(sample_json()).unwrap();
        record.created_at = "yesterday".to_string();
        assert_eq!(record.format_created_at(), "yesterday");
    }
}
