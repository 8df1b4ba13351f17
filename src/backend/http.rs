// src/backend/http.rs
// HTTP client for the transcription backend REST contract

use super::{
    BackendError, ChunkMetadata, EndSessionRequest, EndSessionResponse, HealthResponse,
    SegmentResponse, StartSessionRequest, StartSessionResponse, TranscriptionBackend,
};
use crate::audio::wav;
use async_trait::async_trait;
use reqwest::multipart;
use std::time::Duration;
use tracing::info;

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        info!("Backend client initialized: {}", base_url);

        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }

    fn map_send_error(e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl TranscriptionBackend for HttpBackend {
    async fn start_session(&self, req: &StartSessionRequest) -> Result<String, BackendError> {
        let resp = self
            .client
            .post(self.url("/api/start-session"))
            .json(req)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let resp = Self::check_status(resp).await?;
        let parsed: StartSessionResponse = resp
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        parsed.session_id.ok_or(BackendError::MissingSessionId)
    }

    async fn upload_segment(
        &self,
        meta: &ChunkMetadata,
        audio: Vec<u8>,
    ) -> Result<SegmentResponse, BackendError> {
        let metadata_json =
            serde_json::to_string(meta).map_err(|e| BackendError::Client(e.to_string()))?;

        let file_name = format!(
            "segment-{}-{}.{}",
            meta.start_ms,
            meta.end_ms,
            wav::EXTENSION
        );
        let file_part = multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| BackendError::Client(e.to_string()))?;

        let form = multipart::Form::new()
            .text("metadata_json", metadata_json)
            .part("file", file_part);

        info!(
            "Uploading segment: lang={} [{}ms, {}ms)",
            meta.language_code, meta.start_ms, meta.end_ms
        );

        let resp = self
            .client
            .post(self.url("/api/upload-chunk"))
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let resp = Self::check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse, BackendError> {
        let req = EndSessionRequest {
            session_id: session_id.to_string(),
        };

        let resp = self
            .client
            .post(self.url("/api/end-session"))
            .json(&req)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let resp = Self::check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn health(&self) -> Result<bool, BackendError> {
        let resp = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let resp = Self::check_status(resp).await?;
        let parsed: HealthResponse = resp
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        Ok(parsed.ok)
    }

    fn name(&self) -> &str {
        "http backend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let backend = HttpBackend::new("http://localhost:8000/", 5).expect("client");
        assert_eq!(
            backend.url("/api/start-session"),
            "http://localhost:8000/api/start-session"
        );
    }
}
