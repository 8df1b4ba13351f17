pub mod buffer;
pub mod capture;
pub mod wav;

pub use buffer::AudioBuffer;
pub use capture::MicCapture;

/// Audio capture seam.
///
/// One live capture handle per segment: `start()` opens it, `stop()`
/// finalizes the buffered audio for the segment that just ended. The
/// recording controller owns exactly one source and never overlaps
/// start/stop calls.
pub trait CaptureSource {
    /// Begin accumulating audio into a fresh buffer.
    fn start(&mut self) -> Result<(), String>;

    /// Stop the handle and return everything buffered since `start()`.
    fn stop(&mut self) -> Result<AudioBuffer, String>;

    /// Whether a capture handle is currently open.
    fn is_capturing(&self) -> bool;

    /// Source name for logging
    fn name(&self) -> &str;
}
