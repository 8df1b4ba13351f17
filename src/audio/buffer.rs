use serde::{Deserialize, Serialize};

/// Accumulated PCM audio for one segment (i16, interleaved).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Cached duration in seconds
    #[serde(skip)]
    pub duration_secs: f32,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels,
            duration_secs: 0.0,
        }
    }

    /// Recalculate and update duration_secs
    pub fn update_duration(&mut self) {
        if self.sample_rate == 0 {
            self.duration_secs = 0.0;
        } else {
            let channels = self.channels.max(1) as f32;
            self.duration_secs = self.samples.len() as f32 / (self.sample_rate as f32 * channels);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.duration_secs = 0.0;
    }

    pub fn append(&mut self, data: &[i16]) {
        self.samples.extend_from_slice(data);
        self.update_duration();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_tracks_appended_samples() {
        let mut buf = AudioBuffer::new(16_000, 1);
        assert!(buf.is_empty());

        buf.append(&vec![0i16; 16_000]);
        assert!((buf.duration_secs - 1.0).abs() < 1e-6);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.duration_secs, 0.0);
    }

    #[test]
    fn duration_accounts_for_channels() {
        let mut buf = AudioBuffer::new(16_000, 2);
        buf.append(&vec![0i16; 32_000]);
        assert!((buf.duration_secs - 1.0).abs() < 1e-6);
    }
}
