use crate::audio::{wav, CaptureSource};
use crate::backend::{BackendError, ChunkMetadata, StartSessionRequest, TranscriptionBackend};
use chrono::Utc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

pub mod segment;

pub use segment::{Language, Segment};

/// Segments shorter than this are discarded instead of uploaded; rapid
/// toggling would otherwise produce degenerate zero-length artifacts.
pub const DEFAULT_MIN_SEGMENT_MS: u64 = 200;

/// Controller state. `Flushing` makes the single-flight discipline
/// explicit: a second boundary trigger while a flush is pending is
/// rejected by the transition guards instead of by disabled UI controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Flushing,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a recording session is already active")]
    AlreadyRecording,

    #[error("no active recording session")]
    NotRecording,

    #[error("failed to start session: {0}")]
    SessionStart(#[source] BackendError),

    #[error("microphone error: {0}")]
    Capture(String),
}

#[derive(Debug, Clone)]
pub struct RecorderOptions {
    pub client_label: String,
    pub note: Option<String>,
    pub min_segment_ms: u64,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            client_label: "cli".to_string(),
            note: None,
            min_segment_ms: DEFAULT_MIN_SEGMENT_MS,
        }
    }
}

/// The recording/session controller.
///
/// Owns the capture handle, the backend client, the segment list, and the
/// elapsed-time counter. Single-threaded and event-driven: every operation
/// runs to completion on the caller's task, so only one flush can ever be
/// in flight per session.
pub struct Recorder {
    capture: Box<dyn CaptureSource>,
    backend: Box<dyn TranscriptionBackend>,
    options: RecorderOptions,

    state: RecorderState,
    session_id: Option<String>,
    language: Language,
    session_start: Option<Instant>,
    segment_start_ms: u64,
    segments: Vec<Segment>,
    last_error: Option<String>,
}

impl Recorder {
    pub fn new(
        capture: Box<dyn CaptureSource>,
        backend: Box<dyn TranscriptionBackend>,
        options: RecorderOptions,
    ) -> Self {
        Self {
            capture,
            backend,
            options,
            state: RecorderState::Idle,
            session_id: None,
            language: Language::En,
            session_start: None,
            segment_start_ms: 0,
            segments: Vec::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn current_language(&self) -> Language {
        self.language
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a new session: backend first, then the microphone. Either
    /// failure resets all local state back to not-recording.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.state != RecorderState::Idle {
            return Err(SessionError::AlreadyRecording);
        }

        self.segments.clear();
        self.last_error = None;
        self.language = Language::En;

        let req = StartSessionRequest {
            client_label: self.options.client_label.clone(),
            user_agent: user_agent(),
            note: self.options.note.clone(),
        };

        let session_id = match self.backend.start_session(&req).await {
            Ok(id) => id,
            Err(e) => {
                self.reset();
                return Err(SessionError::SessionStart(e));
            }
        };

        if let Err(e) = self.capture.start() {
            self.reset();
            return Err(SessionError::Capture(e));
        }

        info!("Session started: {}", session_id);
        self.session_id = Some(session_id);
        self.session_start = Some(Instant::now());
        self.segment_start_ms = 0;
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Finalize the current segment under the active language tag, then
    /// switch the tag for subsequent capture. No-op unless recording with
    /// a live session; returns whether a toggle actually happened.
    pub async fn toggle_language(&mut self) -> Result<bool, SessionError> {
        if self.state != RecorderState::Recording || self.session_id.is_none() {
            return Ok(false);
        }

        let current = self.language;
        self.flush(current, true).await?;
        self.language = current.toggled();
        info!("Language switched to {}", self.language.label());
        Ok(true)
    }

    /// Flush the final segment, release the microphone, and best-effort
    /// notify the backend. Returns the backend's aggregate transcript when
    /// it sends one. Infallible: late failures are logged and surfaced via
    /// `last_error`, never aborting teardown.
    pub async fn stop(&mut self) -> Option<String> {
        if self.state == RecorderState::Idle {
            self.release_capture();
            // A capture failure mid-flush can leave a session id behind;
            // release it best-effort too.
            if let Some(session_id) = self.session_id.take() {
                if let Err(e) = self.backend.end_session(&session_id).await {
                    warn!("end-session failed (ignored): {}", e);
                }
            }
            return None;
        }

        let language = self.language;
        if let Err(e) = self.flush(language, false).await {
            warn!("Flush during stop failed: {}", e);
            self.last_error = Some(e.to_string());
        }

        self.release_capture();
        self.state = RecorderState::Idle;
        self.session_start = None;

        let session_id = self.session_id.take()?;
        match self.backend.end_session(&session_id).await {
            Ok(resp) => {
                info!("Session ended: {}", session_id);
                resp.transcript
            }
            Err(e) => {
                // Best-effort: the session is over from our side regardless.
                warn!("end-session failed (ignored): {}", e);
                None
            }
        }
    }

    /// Accumulated transcript, one tagged line per segment.
    pub fn transcript_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| {
                format!("{} {}", s.language.tag(), s.text.as_deref().unwrap_or(""))
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn elapsed_ms(&self) -> u64 {
        self.session_start
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Finalize the buffered audio as one segment and upload it.
    ///
    /// The capture handle is stopped first so the segment is a complete,
    /// playable unit; sub-threshold or empty segments are discarded without
    /// an upload. Either way the next segment starts where this one ended.
    async fn flush(&mut self, language: Language, restart_after: bool) -> Result<(), SessionError> {
        let session_id = self
            .session_id
            .clone()
            .ok_or(SessionError::NotRecording)?;

        self.state = RecorderState::Flushing;
        self.last_error = None;

        let start_ms = self.segment_start_ms;
        let end_ms = self.elapsed_ms();

        let buffer = match self.capture.stop() {
            Ok(buf) => buf,
            Err(e) => {
                self.state = RecorderState::Idle;
                return Err(SessionError::Capture(e));
            }
        };

        let duration_ms = end_ms.saturating_sub(start_ms);
        if buffer.is_empty() || duration_ms < self.options.min_segment_ms {
            info!(
                "Discarding {}ms segment ({} samples): below {}ms threshold",
                duration_ms,
                buffer.samples.len(),
                self.options.min_segment_ms
            );
            self.segment_start_ms = end_ms;
            return self.resume(restart_after);
        }

        let meta = ChunkMetadata {
            session_id,
            language_code: language.code().to_string(),
            start_ms,
            end_ms,
        };

        let upload = match wav::encode(&buffer) {
            Ok(bytes) => self.backend.upload_segment(&meta, bytes).await,
            Err(e) => Err(BackendError::Client(format!("wav encode failed: {}", e))),
        };

        match upload {
            Ok(resp) => {
                info!(
                    "Segment uploaded: {} lang={} [{}ms, {}ms)",
                    resp.segment_id, language, start_ms, end_ms
                );
                self.segments.push(Segment {
                    id: Some(resp.segment_id),
                    language,
                    start_ms,
                    end_ms,
                    text: resp.text,
                    audio_path: resp.audio_path,
                    received_at: Utc::now().to_rfc3339(),
                });
            }
            Err(e) => {
                // Recovered locally: keep the segment visible without text
                // and keep recording.
                error!("Segment upload failed: {}", e);
                self.last_error = Some(format!("segment upload failed: {}", e));
                self.segments.push(Segment {
                    id: None,
                    language,
                    start_ms,
                    end_ms,
                    text: None,
                    audio_path: None,
                    received_at: Utc::now().to_rfc3339(),
                });
            }
        }

        self.segment_start_ms = end_ms;
        self.resume(restart_after)
    }

    /// Leave the `Flushing` state, restarting capture for the next segment
    /// when recording continues.
    fn resume(&mut self, restart_after: bool) -> Result<(), SessionError> {
        if restart_after {
            if let Err(e) = self.capture.start() {
                self.state = RecorderState::Idle;
                return Err(SessionError::Capture(e));
            }
            self.state = RecorderState::Recording;
        } else {
            self.state = RecorderState::Idle;
        }
        Ok(())
    }

    fn release_capture(&mut self) {
        if self.capture.is_capturing() {
            if let Err(e) = self.capture.stop() {
                warn!("Failed to release {}: {}", self.capture.name(), e);
            }
        }
    }

    fn reset(&mut self) {
        self.release_capture();
        self.state = RecorderState::Idle;
        self.session_id = None;
        self.session_start = None;
        self.segment_start_ms = 0;
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.release_capture();
    }
}

fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
