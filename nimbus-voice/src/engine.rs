//! Speech synthesis engines.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Default Coqui TTS server.
pub const DEFAULT_COQUI_URL: &str = "http://localhost:5002";

/// Errors from speech synthesis.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// TTS server returned a non-success status.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Request failed before a response arrived.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Spawning or feeding the audio player failed.
    #[error("Audio output error: {0}")]
    Io(#[from] std::io::Error),

    /// The audio player exited unsuccessfully.
    #[error("Audio player exited with status {status:?}")]
    Player {
        /// Exit code, when the process was not killed by a signal.
        status: Option<i32>,
    },

    /// The speech worker has shut down.
    #[error("Speech queue closed")]
    QueueClosed,
}

/// Turns text into audio bytes.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Synthesize one utterance.
    async fn speak(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Client for a Coqui-compatible TTS server.
pub struct CoquiEngine {
    client: reqwest::Client,
    base_url: String,
    speaker: String,
}

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    speaker_id: &'a str,
}

impl CoquiEngine {
    /// Create an engine for a server.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, speaker: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            speaker: speaker.into(),
        }
    }

    /// Create an engine from the environment.
    ///
    /// Reads `COQUI_URL` (default `http://localhost:5002`) and `SPEAKER`
    /// (default `default`).
    #[must_use]
    pub fn from_env(client: reqwest::Client) -> Self {
        let base_url =
            std::env::var("COQUI_URL").unwrap_or_else(|_| DEFAULT_COQUI_URL.to_string());
        let speaker = std::env::var("SPEAKER").unwrap_or_else(|_| "default".to_string());
        Self::new(client, base_url, speaker)
    }
}

#[async_trait]
impl SpeechEngine for CoquiEngine {
    async fn speak(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        debug!(chars = text.len(), speaker = %self.speaker, "synthesizing speech");
        let response = self
            .client
            .post(format!("{}/api/tts", self.base_url))
            .json(&TtsRequest {
                text,
                speaker_id: &self.speaker,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
