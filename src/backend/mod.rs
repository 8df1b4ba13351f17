// src/backend/mod.rs
// Transcription backend seam

mod http;
mod types;

pub use http::HttpBackend;
pub use types::{
    BackendError, ChunkMetadata, EndSessionRequest, EndSessionResponse, HealthResponse,
    SegmentResponse, StartSessionRequest, StartSessionResponse,
};

use async_trait::async_trait;

/// Interface to the remote transcription service.
///
/// The service owns sessions, ASR inference, and audio storage; the
/// client only speaks this three-endpoint contract (plus a health probe).
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Create a session; returns the backend-issued session id.
    async fn start_session(&self, req: &StartSessionRequest) -> Result<String, BackendError>;

    /// Upload one encoded segment with its metadata.
    async fn upload_segment(
        &self,
        meta: &ChunkMetadata,
        audio: Vec<u8>,
    ) -> Result<SegmentResponse, BackendError>;

    /// Signal that a session is over. Best-effort from the caller's view.
    async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse, BackendError>;

    /// Reachability probe.
    async fn health(&self) -> Result<bool, BackendError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
