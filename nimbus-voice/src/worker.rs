//! Background speech worker.
//!
//! A producer/consumer queue of utterances with a sentinel shutdown:
//! callers enqueue replies as they arrive, the worker synthesizes each one
//! and feeds the audio to the output sink in order, and `shutdown` enqueues
//! the stop sentinel so everything queued before it still gets spoken.

use crate::engine::{SpeechEngine, SpeechError};
use crate::sink::AudioSink;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

enum Utterance {
    Say(String),
    Stop,
}

/// Handle to the background speech worker.
pub struct SpeechWorker {
    tx: mpsc::Sender<Utterance>,
    handle: JoinHandle<()>,
}

impl SpeechWorker {
    /// Spawn a worker synthesizing queued utterances through `engine` and
    /// playing the audio through `sink`.
    #[must_use]
    pub fn spawn(engine: Arc<dyn SpeechEngine>, sink: Arc<dyn AudioSink>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Utterance>(8);
        let handle = tokio::spawn(async move {
            while let Some(utterance) = rx.recv().await {
                match utterance {
                    Utterance::Say(text) => match engine.speak(&text).await {
                        Ok(audio) => {
                            // A failed playback skips the utterance; the
                            // conversation goes on.
                            if let Err(e) = sink.play(&audio).await {
                                warn!(error = %e, "audio playback failed");
                            }
                        }
                        Err(e) => warn!(error = %e, "speech synthesis failed"),
                    },
                    Utterance::Stop => break,
                }
            }
        });
        Self { tx, handle }
    }

    /// Enqueue an utterance.
    pub async fn say(&self, text: impl Into<String>) -> Result<(), SpeechError> {
        self.tx
            .send(Utterance::Say(text.into()))
            .await
            .map_err(|_| SpeechError::QueueClosed)
    }

    /// Enqueue the stop sentinel and wait for the worker to drain and exit.
    pub async fn shutdown(self) {
        let _ = self.tx.send(Utterance::Stop).await;
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Synthesizes each utterance into its own UTF-8 bytes.
    struct EchoEngine;

    #[async_trait]
    impl SpeechEngine for EchoEngine {
        async fn speak(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
            // Simulate synthesis latency so ordering bugs would surface.
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(text.as_bytes().to_vec())
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl SpeechEngine for FailingEngine {
        async fn speak(&self, _text: &str) -> Result<Vec<u8>, SpeechError> {
            Err(SpeechError::QueueClosed)
        }
    }

    struct RecordingSink {
        played: Mutex<Vec<Vec<u8>>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                played: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AudioSink for RecordingSink {
        async fn play(&self, audio: &[u8]) -> Result<(), SpeechError> {
            self.played.lock().unwrap().push(audio.to_vec());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl AudioSink for FailingSink {
        async fn play(&self, _audio: &[u8]) -> Result<(), SpeechError> {
            Err(SpeechError::Player { status: Some(1) })
        }
    }

    #[tokio::test]
    async fn test_synthesized_audio_reaches_sink_in_order() {
        let sink = Arc::new(RecordingSink::new());
        let worker = SpeechWorker::spawn(Arc::new(EchoEngine), sink.clone());

        worker.say("first").await.unwrap();
        worker.say("second").await.unwrap();
        worker.say("third").await.unwrap();
        worker.shutdown().await;

        let played = sink.played.lock().unwrap();
        assert_eq!(
            *played,
            vec![b"first".to_vec(), b"second".to_vec(), b"third".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_engine_failure_skips_sink_and_keeps_worker_alive() {
        let sink = Arc::new(RecordingSink::new());
        let worker = SpeechWorker::spawn(Arc::new(FailingEngine), sink.clone());

        worker.say("one").await.unwrap();
        worker.say("two").await.unwrap();
        worker.shutdown().await;

        assert!(sink.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_kill_worker() {
        let worker = SpeechWorker::spawn(Arc::new(EchoEngine), Arc::new(FailingSink));
        worker.say("one").await.unwrap();
        worker.say("two").await.unwrap();
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_say_after_shutdown_fails() {
        let worker = SpeechWorker::spawn(Arc::new(EchoEngine), Arc::new(RecordingSink::new()));
        let tx = worker.tx.clone();
        worker.shutdown().await;

        let err = tx.send(Utterance::Say("late".into())).await;
        assert!(err.is_err());
    }
}
