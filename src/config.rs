use std::env;

use crate::session::DEFAULT_MIN_SEGMENT_MS;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_CLIENT_LABEL: &str = "cli";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, environment-driven with CLI overrides applied
/// by the binary. A `.env` file is honored via dotenvy at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_base_url: String,
    pub client_label: String,
    pub note: Option<String>,
    pub input_device_name: Option<String>,
    pub min_segment_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_BACKEND_URL.to_string(),
            client_label: DEFAULT_CLIENT_LABEL.to_string(),
            note: None,
            input_device_name: None,
            min_segment_ms: DEFAULT_MIN_SEGMENT_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            backend_base_url: normalize_base_url(
                env::var("BACKEND_URL").ok().as_deref().unwrap_or(""),
            ),
            client_label: normalize_label(env::var("CLIENT_LABEL").ok().as_deref().unwrap_or("")),
            note: non_empty(env::var("SESSION_NOTE").ok()),
            input_device_name: non_empty(env::var("INPUT_DEVICE").ok()),
            min_segment_ms: parse_u64_or(env::var("MIN_SEGMENT_MS").ok(), DEFAULT_MIN_SEGMENT_MS),
            request_timeout_secs: parse_u64_or(
                env::var("REQUEST_TIMEOUT_SECS").ok(),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
        }
    }
}

pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BACKEND_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn normalize_label(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_CLIENT_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_u64_or(value: Option<String>, default: u64) -> u64 {
    value
        .as_deref()
        .map(str::trim)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_and_strips_trailing_slash() {
        assert_eq!(normalize_base_url(""), DEFAULT_BACKEND_URL);
        assert_eq!(normalize_base_url("   "), DEFAULT_BACKEND_URL);
        assert_eq!(
            normalize_base_url("http://asr.example.com/"),
            "http://asr.example.com"
        );
        assert_eq!(
            normalize_base_url(" http://localhost:9000 "),
            "http://localhost:9000"
        );
    }

    #[test]
    fn label_falls_back_to_default() {
        assert_eq!(normalize_label(""), DEFAULT_CLIENT_LABEL);
        assert_eq!(normalize_label(" kiosk-3 "), "kiosk-3");
    }

    #[test]
    fn u64_parsing_falls_back_on_garbage() {
        assert_eq!(parse_u64_or(Some("250".to_string()), 200), 250);
        assert_eq!(parse_u64_or(Some(" 250 ".to_string()), 200), 250);
        assert_eq!(parse_u64_or(Some("fast".to_string()), 200), 200);
        assert_eq!(parse_u64_or(None, 200), 200);
    }

    #[test]
    fn empty_optionals_become_none() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(" mic ".to_string())), Some("mic".to_string()));
    }
}
