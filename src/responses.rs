// ABOUTME: Outcome shapes returned to callers of the intake pipeline and session bridge.
// ABOUTME: Serialized in camelCase with `error`/`attachments` omitted when absent.

use serde::{Deserialize, Serialize};

use crate::attachments::PersistedAttachment;
use crate::session::ModelPreference;

/// Result of a send request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<PersistedAttachment>>,
}

impl SendMessageResponse {
    pub fn ok(attachments: Vec<PersistedAttachment>) -> Self {
        Self {
            success: true,
            error: None,
            attachments: Some(attachments),
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            attachments: None,
        }
    }
}

/// Generic success/failure outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPreferenceResponse {
    pub preference: ModelPreference,
}

/// Outcome of a preference change. `preference` is whatever is in effect afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetModelPreferenceResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub preference: ModelPreference,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_omits_attachments() {
        let json = serde_json::to_value(SendMessageResponse::err("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }

    #[test]
    fn success_omits_error() {
        let json = serde_json::to_value(SendMessageResponse::ok(Vec::new())).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "attachments": []}));
    }

    #[test]
    fn success_response_shapes() {
        assert_eq!(
            serde_json::to_value(SuccessResponse::ok()).unwrap(),
            serde_json::json!({"success": true})
        );
        assert_eq!(
            serde_json::to_value(SuccessResponse::err("boom")).unwrap(),
            serde_json::json!({"success": false, "error": "boom"})
        );
    }

    #[test]
    fn set_preference_response_carries_preference() {
        let resp = SetModelPreferenceResponse {
            success: false,
            error: Some("disk full".to_string()),
            preference: ModelPreference::Fast,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["preference"], "fast");
        assert_eq!(json["success"], false);
    }
}
