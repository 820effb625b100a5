//! Voice front-end support.
//!
//! Replies from the weather agent are enqueued for a background worker
//! that synthesizes them one at a time through a Coqui-compatible TTS
//! server and plays the audio through an [`AudioSink`]. Shutdown is a
//! sentinel on the same queue: the worker drains what was queued first,
//! then exits.

pub mod engine;
pub mod sink;
pub mod worker;

pub use engine::{CoquiEngine, SpeechEngine, SpeechError, DEFAULT_COQUI_URL};
pub use sink::{AudioSink, PlayerSink, DEFAULT_PLAYER};
pub use worker::SpeechWorker;
