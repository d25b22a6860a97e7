//! Read-aloud of analysis results.
//!
//! `Speaker` owns the "currently speaking" state and talks to a
//! `SpeechBackend`. Starting a new utterance always stops the previous one.

pub mod espeak;
pub mod voices;

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::OutputLanguage;

pub use espeak::EspeakBackend;
pub use voices::{best_voice, russian_voice, wait_for_voices, DEFAULT_VOICE_WAIT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 tag as reported by the backend, e.g. `de-DE` or `ru`.
    pub lang: String,
    pub local_service: bool,
    pub uri: String,
}

/// A text-to-speech engine.
pub trait SpeechBackend: Send + Sync {
    /// Currently known voices. May be empty while the backend warms up.
    fn voices(&self) -> impl Future<Output = Vec<Voice>> + Send;

    /// Speak `text` and resolve when playback ends or is cancelled.
    /// `None` means the backend's default voice.
    fn speak(
        &self,
        text: &str,
        voice: Option<&Voice>,
    ) -> impl Future<Output = Result<(), SpeechError>> + Send;

    /// Stop any active utterance. A cancelled `speak` resolves `Ok`.
    fn cancel(&self);
}

pub struct Speaker<B: SpeechBackend> {
    backend: B,
    speaking: AtomicBool,
    // Bumped per utterance so a cancelled one can't clear a newer one's flag.
    generation: AtomicU64,
    voice_wait: Duration,
}

impl<B: SpeechBackend> Speaker<B> {
    pub fn new(backend: B) -> Self {
        Self::with_voice_wait(backend, DEFAULT_VOICE_WAIT)
    }

    pub fn with_voice_wait(backend: B, voice_wait: Duration) -> Self {
        Self {
            backend,
            speaking: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            voice_wait,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        if self.speaking.swap(false, Ordering::SeqCst) {
            log::info!("[TTS] Stopping playback");
            self.backend.cancel();
        }
    }

    /// Speak `text` in `language`, stopping anything already playing.
    ///
    /// The utterance counts as speaking from the moment it is requested,
    /// including the voice wait, so a concurrent `stop`/`toggle` cancels it
    /// before it reaches the backend. Russian text never falls back to a
    /// voice whose language is not `ru*`.
    pub async fn speak(&self, text: &str, language: OutputLanguage) -> Result<(), SpeechError> {
        self.stop();

        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.speaking.store(true, Ordering::SeqCst);

        let voices = wait_for_voices(&self.backend, self.voice_wait).await;
        if self.superseded(generation) {
            log::info!("[TTS] Utterance stopped before playback");
            return Ok(());
        }

        let code = language.profile().code;
        let voice = if language == OutputLanguage::Russian {
            match russian_voice(&voices) {
                Some(v) if v.lang.to_lowercase().starts_with("ru") => Some(v),
                other => {
                    log::warn!(
                        "[TTS] No Russian voice among {} voices (closest: {})",
                        voices.len(),
                        other.map(|v| v.lang.as_str()).unwrap_or("none")
                    );
                    self.finish(generation);
                    return Err(SpeechError::NoRussianVoice);
                }
            }
        } else {
            best_voice(&voices, code)
        };

        log::info!(
            "[TTS] Speaking {} chars ({}) with {}",
            text.chars().count(),
            code,
            voice.map(|v| v.name.as_str()).unwrap_or("default voice")
        );

        let result = self.backend.speak(text, voice).await;
        self.finish(generation);

        if let Err(ref e) = result {
            log::error!("[TTS] Playback failed: {}", e);
        }
        result
    }

    /// A newer utterance started, or `stop` ran, since `generation` began.
    fn superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation || !self.is_speaking()
    }

    fn finish(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) == generation {
            self.speaking.store(false, Ordering::SeqCst);
        }
    }

    /// Stop if speaking, otherwise speak. Returns whether playback started.
    pub async fn toggle(&self, text: &str, language: OutputLanguage) -> Result<bool, SpeechError> {
        if self.is_speaking() {
            self.stop();
            return Ok(false);
        }
        self.speak(text, language).await?;
        Ok(true)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("No speech synthesizer available")]
    Unsupported,

    #[error("No Russian voice installed")]
    NoRussianVoice,

    #[error("Speech synthesis failed: {0}")]
    Failed(String),
}

impl SpeechError {
    pub fn message_key(&self) -> &'static str {
        match self {
            SpeechError::Unsupported => "error_speech_unsupported",
            SpeechError::NoRussianVoice => "error_speech_no_russian_voice",
            SpeechError::Failed(_) => "error_speech_failed",
        }
    }
}
