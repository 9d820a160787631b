//! Best-effort speech output
//!
//! Responses and alert callouts can optionally be rendered audibly. The
//! core never depends on playback finishing: speaking runs as a spawned
//! side task and a newer utterance cancels the one in flight. The shipped
//! implementation logs instead of synthesizing; a real TTS backend plugs
//! in behind the same trait.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Whether this backend can produce audio at all. Unsupported
    /// backends are never invoked.
    fn is_supported(&self) -> bool;

    async fn speak(&self, text: &str) -> Result<()>;
}

/// Disabled backend for tests and headless deployments
pub struct NullSpeech;

#[async_trait]
impl SpeechOutput for NullSpeech {
    fn is_supported(&self) -> bool {
        false
    }

    async fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Logs utterances and models playback time, so cancellation behaves as
/// it would against a real synthesizer.
pub struct LogSpeech;

/// Rough speaking pace used to model playback duration
const MS_PER_WORD: u64 = 300;

#[async_trait]
impl SpeechOutput for LogSpeech {
    fn is_supported(&self) -> bool {
        true
    }

    async fn speak(&self, text: &str) -> Result<()> {
        debug!(text = %text, "speaking");
        let words = text.split_whitespace().count() as u64;
        tokio::time::sleep(Duration::from_millis(words * MS_PER_WORD)).await;
        debug!("speech_done");
        Ok(())
    }
}

/// Owns the in-flight utterance; a new `say` aborts the previous one
pub struct Speech {
    output: Arc<dyn SpeechOutput>,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl Speech {
    pub fn new(output: Arc<dyn SpeechOutput>) -> Self {
        Self { output, current: Mutex::new(None) }
    }

    /// No-op speech for tests and quiet sessions
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullSpeech))
    }

    /// Speak best-effort. Must be called from within a tokio runtime
    /// when the backend is supported.
    pub fn say(&self, text: &str) {
        if !self.output.is_supported() {
            return;
        }
        let mut current = self.current.lock();
        if let Some(handle) = current.take() {
            handle.abort();
        }
        let output = self.output.clone();
        let text = text.to_string();
        *current = Some(tokio::spawn(async move {
            if let Err(e) = output.speak(&text).await {
                debug!(error = %e, "speech_failed");
            }
        }));
    }

    /// Cancel any in-flight utterance
    pub fn stop(&self) {
        if let Some(handle) = self.current.lock().take() {
            handle.abort();
        }
    }
}
