//! The uniform response envelope every backend endpoint returns.

use serde::{Deserialize, Serialize};

use crate::record::SteganographyRecord;

/// Response body shared by all endpoints.
///
/// Which optional fields are present depends on the endpoint; `success` and
/// `message` are the only ones the error path relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub record: Option<SteganographyRecord>,
    #[serde(default)]
    pub records: Option<Vec<SteganographyRecord>>,
    #[serde(default)]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl ApiResponse {
    /// The message, if the backend sent a non-blank one.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Boolean verification result.
    ///
    /// `/verify` documents the flag under `data`, but the backend writes it
    /// under `verified`; both are accepted, `data` first.
    pub fn verification_flag(&self) -> Option<bool> {
        self.data
            .as_ref()
            .and_then(serde_json::Value::as_bool)
            .or(self.verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let env: ApiResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(env.success);
        assert!(env.message().is_none());
        assert!(env.records.is_none());
    }

    #[test]
    fn test_blank_message_is_none() {
        let env: ApiResponse =
            serde_json::from_str(r#"{"success": false, "message": "  "}"#).unwrap();
        assert!(env.message().is_none());
    }

    #[test]
    fn test_verification_flag_prefers_data() {
        let env: ApiResponse =
            serde_json::from_str(r#"{"success": true, "data": false, "verified": true}"#).unwrap();
        assert_eq!(env.verification_flag(), Some(false));

        let env: ApiResponse =
            serde_json::from_str(r#"{"success": true, "verified": true}"#).unwrap();
        assert_eq!(env.verification_flag(), Some(true));
    }

    #[test]
    fn test_extract_fields() {
        let env: ApiResponse = serde_json::from_str(
            r#"{"success": true, "extractedText": "secret", "verified": false}"#,
        )
        .unwrap();
        assert_eq!(env.extracted_text.as_deref(), Some("secret"));
        assert_eq!(env.verified, Some(false));
    }
}
