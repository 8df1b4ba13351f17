use crate::audio::{AudioBuffer, CaptureSource};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Microphone capture backed by a cpal input stream.
///
/// Samples are appended to a shared buffer from the stream callback;
/// `stop()` drops the stream and hands the accumulated buffer back.
pub struct MicCapture {
    stream: Option<cpal::Stream>,
    is_capturing: bool,
    buffer: Arc<Mutex<AudioBuffer>>,
    selected_input_device: Option<String>,
}

impl MicCapture {
    pub fn new(selected_input_device: Option<String>) -> Self {
        Self {
            stream: None,
            is_capturing: false,
            buffer: Arc::new(Mutex::new(AudioBuffer::new(16_000, 1))),
            selected_input_device: selected_input_device
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }

    pub fn selected_input_device(&self) -> Option<String> {
        self.selected_input_device.clone()
    }

    pub fn list_input_devices() -> Result<Vec<String>, String> {
        let host = cpal::default_host();
        let mut devices = host
            .input_devices()
            .map_err(|e| e.to_string())?
            .map(|device| Self::device_display_name(&device))
            .collect::<Vec<_>>();
        devices.sort();
        devices.dedup();
        Ok(devices)
    }

    fn pick_input_device(host: &cpal::Host, preferred_name: Option<&str>) -> Option<cpal::Device> {
        if let Some(name) = preferred_name {
            if let Ok(mut devices) = host.input_devices() {
                if let Some(device) = devices.find(|d| Self::device_display_name(d) == name) {
                    return Some(device);
                }
            }
            warn!(
                "Preferred input device '{}' not found, falling back to default",
                name
            );
        }

        let default_device = host.default_input_device()?;
        let default_name = Self::device_display_name(&default_device);
        if !Self::looks_like_loopback(&default_name) {
            return Some(default_device);
        }

        warn!(
            "Default device '{}' looks like loopback, trying to pick a microphone input",
            default_name
        );

        if let Ok(mut devices) = host.input_devices() {
            if let Some(alternative) =
                devices.find(|d| !Self::looks_like_loopback(&Self::device_display_name(d)))
            {
                return Some(alternative);
            }
        }

        Some(default_device)
    }

    fn device_display_name(device: &cpal::Device) -> String {
        device
            .name()
            .or_else(|_| device.description().map(|d| d.name().to_string()))
            .unwrap_or_else(|_| "Unknown input".to_string())
    }

    fn looks_like_loopback(name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        let patterns = [
            "stereo mix",
            "what u hear",
            "wave out",
            "loopback",
            "monitor",
        ];
        patterns.iter().any(|p| lower.contains(p))
    }
}

impl CaptureSource for MicCapture {
    fn start(&mut self) -> Result<(), String> {
        if self.is_capturing {
            return Err("Already capturing".into());
        }

        let host = cpal::default_host();
        let device = Self::pick_input_device(&host, self.selected_input_device.as_deref())
            .ok_or("No input device available")?;

        let device_name = Self::device_display_name(&device);
        info!("Input device: {}", device_name);

        let config = device.default_input_config().map_err(|e| e.to_string())?;
        if let Ok(mut guard) = self.buffer.lock() {
            guard.sample_rate = config.sample_rate();
            guard.channels = config.channels();
            guard.clear();
        }

        let buffer_clone = self.buffer.clone();
        let err_fn = |err| error!("an error occurred on stream: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config.into(),
                move |data: &[i16], _: &_| write_input_data(data, &buffer_clone),
                err_fn,
                None,
            ),
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config.into(),
                move |data: &[f32], _: &_| write_input_data_f32(data, &buffer_clone),
                err_fn,
                None,
            ),
            _ => return Err("Unsupported sample format".into()),
        }
        .map_err(|e| e.to_string())?;

        stream.play().map_err(|e| e.to_string())?;
        self.stream = Some(stream);
        self.is_capturing = true;

        Ok(())
    }

    fn stop(&mut self) -> Result<AudioBuffer, String> {
        if !self.is_capturing {
            return Err("Not capturing".into());
        }

        self.stream.take();
        self.is_capturing = false;

        let mut guard = self.buffer.lock().map_err(|e| e.to_string())?;
        let out = guard.clone();
        guard.clear();
        Ok(out)
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing
    }

    fn name(&self) -> &str {
        "cpal microphone"
    }
}

fn write_input_data(input: &[i16], buffer: &Arc<Mutex<AudioBuffer>>) {
    if let Ok(mut guard) = buffer.lock() {
        guard.append(input);
    }
}

fn write_input_data_f32(input: &[f32], buffer: &Arc<Mutex<AudioBuffer>>) {
    let samples: Vec<i16> = input
        .iter()
        .map(|&x| (x.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    if let Ok(mut guard) = buffer.lock() {
        guard.append(&samples);
    }
}
