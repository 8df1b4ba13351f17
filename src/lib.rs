pub mod audio;
pub mod backend;
pub mod config;
pub mod session;

pub use audio::{AudioBuffer, CaptureSource, MicCapture};
pub use backend::{BackendError, HttpBackend, TranscriptionBackend};
pub use config::Config;
pub use session::{Language, Recorder, RecorderOptions, RecorderState, Segment, SessionError};
