// src/backend/types.rs
// Wire types and error definitions for the transcription backend

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /api/start-session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub client_label: String,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Response of `POST /api/start-session`. `session_id` is required by
/// contract; it is modeled as optional so a missing field maps to
/// `BackendError::MissingSessionId` instead of a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionResponse {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// The `metadata_json` multipart field of `POST /api/upload-chunk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub session_id: String,
    pub language_code: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Response of `POST /api/upload-chunk`.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentResponse {
    pub segment_id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
}

/// Body of `POST /api/end-session`.
#[derive(Debug, Clone, Serialize)]
pub struct EndSessionRequest {
    pub session_id: String,
}

/// Response of `POST /api/end-session` (best-effort; may carry the
/// aggregated transcript).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndSessionResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub ok: bool,
}

/// Backend error types
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("start-session response missing session_id")]
    MissingSessionId,

    #[error("invalid response payload: {0}")]
    InvalidResponse(String),

    #[error("client error: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_metadata_uses_contract_field_names() {
        let meta = ChunkMetadata {
            session_id: "abc".to_string(),
            language_code: "zh".to_string(),
            start_ms: 3000,
            end_ms: 5000,
        };

        let json = serde_json::to_value(&meta).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "session_id": "abc",
                "language_code": "zh",
                "start_ms": 3000,
                "end_ms": 5000,
            })
        );
    }

    #[test]
    fn start_session_request_omits_absent_note() {
        let req = StartSessionRequest {
            client_label: "cli".to_string(),
            user_agent: "bilingual-recorder/0.1.0".to_string(),
            note: None,
        };
        let json = serde_json::to_string(&req).expect("serialize");
        assert!(!json.contains("note"));
    }

    #[test]
    fn start_session_response_tolerates_missing_id() {
        let resp: StartSessionResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(resp.session_id.is_none());

        let resp: StartSessionResponse =
            serde_json::from_str(r#"{"session_id":"s1"}"#).expect("deserialize");
        assert_eq!(resp.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn segment_response_text_and_path_are_optional() {
        let resp: SegmentResponse =
            serde_json::from_str(r#"{"segment_id":"seg-1"}"#).expect("deserialize");
        assert_eq!(resp.segment_id, "seg-1");
        assert!(resp.text.is_none());
        assert!(resp.audio_path.is_none());

        let resp: SegmentResponse = serde_json::from_str(
            r#"{"segment_id":"seg-2","text":"你好","audio_path":"sessions/s1/x.wav"}"#,
        )
        .expect("deserialize");
        assert_eq!(resp.text.as_deref(), Some("你好"));
        assert_eq!(resp.audio_path.as_deref(), Some("sessions/s1/x.wav"));
    }

    #[test]
    fn end_session_response_defaults_empty() {
        let resp: EndSessionResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(resp.transcript.is_none());
    }
}
