//! ElevenLabs text-to-speech client.
//!
//! Configuration resolves per request with layered precedence: explicit
//! argument > `REACHY_ELEVENLABS_*` env var > `ELEVENLABS_*` env var >
//! built-in default. The API key has no default; its absence is a hard
//! error before any network contact.

use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

pub const API_BASE_URL: &str = "https://api.elevenlabs.io/v1";
/// Premade "George" voice: available on the free tier, so TTS works out of
/// the box with just an API key.
pub const DEFAULT_VOICE_ID: &str = "JBFqnCBsd6RMkjVDRZzb";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";
/// `wav_44100` requires a Pro+ plan; the mp3 format works on Free.
pub const DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("missing ElevenLabs API key: set REACHY_ELEVENLABS_API_KEY or ELEVENLABS_API_KEY")]
    MissingApiKey,
    #[error("invalid ElevenLabs voice id {0:?}: allowed characters are A-Z a-z 0-9 _ - (1-128 chars)")]
    InvalidVoiceId(String),
    #[error("text must be non-empty")]
    EmptyText,
    #[error("ElevenLabs API error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("ElevenLabs request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("temp audio file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolved, validated TTS configuration. Constructed once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub voice_id: String,
    pub model_id: String,
    pub output_format: String,
    pub base_url: String,
}

/// Per-field explicit overrides, taking precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    pub output_format: Option<String>,
}

/// Optional voice-tuning parameters; each is sent only when set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VoiceSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_speaker_boost: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl VoiceSettings {
    pub fn is_empty(&self) -> bool {
        self.stability.is_none()
            && self.similarity_boost.is_none()
            && self.style.is_none()
            && self.use_speaker_boost.is_none()
            && self.speed.is_none()
    }
}

#[derive(Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_settings: Option<&'a VoiceSettings>,
}

fn voice_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[A-Za-z0-9_-]{1,128}$").expect("valid pattern"))
}

/// The voice id is interpolated into a URL path; keep it strict to prevent
/// path traversal if a caller passes a crafted value.
fn validate_voice_id(voice_id: &str) -> Result<String, TtsError> {
    let v = voice_id.trim();
    if !voice_id_pattern().is_match(v) {
        return Err(TtsError::InvalidVoiceId(voice_id.to_string()));
    }
    Ok(v.to_string())
}

/// Accept header for the configured output format.
pub fn accept_header_for(output_format: &str) -> &'static str {
    if output_format.to_lowercase().starts_with("wav") {
        "audio/wav"
    } else {
        "audio/mpeg"
    }
}

/// Temp-file suffix for the configured output format.
pub fn suffix_for(output_format: &str) -> &'static str {
    if output_format.to_lowercase().starts_with("wav") {
        ".wav"
    } else {
        ".mp3"
    }
}

/// Resolve configuration from explicit overrides and the process
/// environment.
pub fn load_config(overrides: &ConfigOverrides) -> Result<ElevenLabsConfig, TtsError> {
    load_config_with(overrides, |name| std::env::var(name).ok())
}

/// Resolution core with an injected environment lookup, so tests never
/// mutate process state.
pub fn load_config_with(
    overrides: &ConfigOverrides,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ElevenLabsConfig, TtsError> {
    let layered = |explicit: &Option<String>, prefixed: &str, generic: &str| {
        explicit
            .clone()
            .or_else(|| lookup(prefixed))
            .or_else(|| lookup(generic))
    };

    let api_key = layered(
        &overrides.api_key,
        "REACHY_ELEVENLABS_API_KEY",
        "ELEVENLABS_API_KEY",
    )
    .ok_or(TtsError::MissingApiKey)?;

    let voice_id = layered(
        &overrides.voice_id,
        "REACHY_ELEVENLABS_VOICE_ID",
        "ELEVENLABS_VOICE_ID",
    )
    .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string());

    Ok(ElevenLabsConfig {
        api_key,
        voice_id: validate_voice_id(&voice_id)?,
        model_id: layered(
            &overrides.model_id,
            "REACHY_ELEVENLABS_MODEL_ID",
            "ELEVENLABS_MODEL_ID",
        )
        .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        output_format: layered(
            &overrides.output_format,
            "REACHY_ELEVENLABS_OUTPUT_FORMAT",
            "ELEVENLABS_OUTPUT_FORMAT",
        )
        .unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_string()),
        base_url: API_BASE_URL.to_string(),
    })
}

fn http_client() -> Result<reqwest::Client, TtsError> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Synthesize `text` into raw audio bytes.
///
/// Validation errors (empty text) are detected before any network contact.
/// Non-success responses surface status and body; they are never retried
/// here.
pub async fn synthesize(
    text: &str,
    config: &ElevenLabsConfig,
    voice_settings: Option<&VoiceSettings>,
) -> Result<Vec<u8>, TtsError> {
    if text.trim().is_empty() {
        return Err(TtsError::EmptyText);
    }

    let payload = TtsRequest {
        text,
        model_id: &config.model_id,
        voice_settings: voice_settings.filter(|s| !s.is_empty()),
    };

    let url = format!("{}/text-to-speech/{}", config.base_url, config.voice_id);
    let response = http_client()?
        .post(&url)
        .query(&[("output_format", config.output_format.as_str())])
        .header("xi-api-key", &config.api_key)
        .header("Accept", accept_header_for(&config.output_format))
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());
        return Err(TtsError::Api { status, body });
    }

    Ok(response.bytes().await?.to_vec())
}

/// Synthesize `text` and write the audio to a fresh temp file whose suffix
/// matches the output format. The caller owns deleting the file; use
/// [`remove_temp_audio`] for idempotent cleanup.
pub async fn synthesize_to_temp_file(
    text: &str,
    config: &ElevenLabsConfig,
    voice_settings: Option<&VoiceSettings>,
) -> Result<PathBuf, TtsError> {
    let audio = synthesize(text, config, voice_settings).await?;

    let file = tempfile::Builder::new()
        .prefix("reachy_elevenlabs_")
        .suffix(suffix_for(&config.output_format))
        .tempfile()?;
    std::fs::write(file.path(), &audio)?;
    // Detach: the path outlives this call; cleanup is the caller's.
    let (_, path) = file.keep().map_err(|e| TtsError::Io(e.error))?;
    Ok(path)
}

/// Delete a temp audio file; an already-deleted file is not an error.
pub fn remove_temp_audio(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
