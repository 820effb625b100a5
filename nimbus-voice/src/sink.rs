//! Audio output sinks.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::engine::SpeechError;

/// Default playback command, fed WAV bytes on stdin.
pub const DEFAULT_PLAYER: &str = "aplay";

/// Consumes synthesized audio.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Deliver one utterance worth of WAV bytes.
    async fn play(&self, audio: &[u8]) -> Result<(), SpeechError>;
}

/// Sink that pipes audio into an external player process.
///
/// One player process per utterance: spawn, write the WAV to stdin, close
/// the pipe and wait for exit. A non-zero exit is an error.
pub struct PlayerSink {
    command: String,
}

impl PlayerSink {
    /// Create a sink around a playback command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Create a sink from the environment.
    ///
    /// Reads `AUDIO_PLAYER` (default `aplay`).
    #[must_use]
    pub fn from_env() -> Self {
        let command =
            std::env::var("AUDIO_PLAYER").unwrap_or_else(|_| DEFAULT_PLAYER.to_string());
        Self::new(command)
    }
}

#[async_trait]
impl AudioSink for PlayerSink {
    async fn play(&self, audio: &[u8]) -> Result<(), SpeechError> {
        debug!(bytes = audio.len(), player = %self.command, "playing utterance");
        let mut child = Command::new(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A player that exits early closes the pipe; its exit status
            // is the verdict, not the broken pipe.
            let _ = stdin.write_all(audio).await;
            let _ = stdin.shutdown().await;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(SpeechError::Player {
                status: status.code(),
            });
        }
        Ok(())
    }
}
