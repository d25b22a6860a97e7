//! Voice discovery and selection.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tokio::time::Instant;

use super::{SpeechBackend, Voice};

pub const DEFAULT_VOICE_WAIT: Duration = Duration::from_millis(4500);
const FIRST_POLL: Duration = Duration::from_millis(50);
const POLL_INTERVAL: Duration = Duration::from_millis(150);

/// Names that identify a Russian voice even when its language tag is wrong.
static RUSSIAN_VOICE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)irina|oksana|russian|русск|yandex|google.*ru").unwrap()
});

/// Some backends populate their voice list lazily. Poll until voices show
/// up or `max_wait` elapses, then return whatever is there.
pub async fn wait_for_voices<B: SpeechBackend>(backend: &B, max_wait: Duration) -> Vec<Voice> {
    let voices = backend.voices().await;
    if !voices.is_empty() {
        return voices;
    }

    let deadline = Instant::now() + max_wait;
    let mut delay = FIRST_POLL;

    loop {
        let now = Instant::now();
        if now >= deadline {
            log::warn!("[TTS] No voices after {}ms", max_wait.as_millis());
            return Vec::new();
        }

        tokio::time::sleep(delay.min(deadline - now)).await;

        let voices = backend.voices().await;
        if !voices.is_empty() {
            log::info!("[TTS] {} voices available", voices.len());
            return voices;
        }
        delay = POLL_INTERVAL;
    }
}

/// Pick the best voice for a BCP-47 language code.
///
/// Exact tag match beats primary-subtag match. Within a tier a Microsoft
/// voice wins, then a local one, then the first candidate.
pub fn best_voice<'a>(voices: &'a [Voice], lang_code: &str) -> Option<&'a Voice> {
    let wanted = lang_code.to_lowercase();
    let primary = wanted.split('-').next().unwrap_or_default().to_string();

    let exact: Vec<&Voice> = voices
        .iter()
        .filter(|v| v.lang.to_lowercase() == wanted)
        .collect();
    if let Some(voice) = pick_preferred(&exact) {
        return Some(voice);
    }

    if primary.is_empty() {
        return None;
    }
    let by_prefix: Vec<&Voice> = voices
        .iter()
        .filter(|v| v.lang.to_lowercase().starts_with(&primary))
        .collect();
    pick_preferred(&by_prefix)
}

/// A Russian voice by language tag, falling back to well-known voice names.
/// A name match with a non-`ru` tag is returned; `Speaker` refuses to use it.
pub fn russian_voice(voices: &[Voice]) -> Option<&Voice> {
    best_voice(voices, "ru-RU").or_else(|| {
        voices
            .iter()
            .find(|v| RUSSIAN_VOICE_NAME.is_match(&format!("{} {}", v.name, v.uri)))
    })
}

fn pick_preferred<'a>(candidates: &[&'a Voice]) -> Option<&'a Voice> {
    candidates
        .iter()
        .find(|v| v.name.to_lowercase().contains("microsoft"))
        .or_else(|| candidates.iter().find(|v| v.local_service))
        .or_else(|| candidates.first())
        .copied()
}
