//! `espeak-ng` (or classic `espeak`) as a speech backend.
//!
//! Text goes in over stdin so lines starting with `-` are never mistaken
//! for flags.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::{watch, OnceCell};

use super::{SpeechBackend, SpeechError, Voice};

const CANDIDATES: &[&str] = &["espeak-ng", "espeak"];

pub struct EspeakBackend {
    binary: PathBuf,
    voices: OnceCell<Vec<Voice>>,
    cancel_tx: watch::Sender<u64>,
}

impl EspeakBackend {
    /// Locate a synthesizer on `PATH`.
    pub fn detect() -> Result<Self, SpeechError> {
        let binary = CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| {
                log::warn!("[TTS] Neither espeak-ng nor espeak found on PATH");
                SpeechError::Unsupported
            })?;

        log::info!("[TTS] Using {}", binary.display());
        Ok(Self::with_binary(binary))
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            voices: OnceCell::new(),
            cancel_tx: watch::channel(0).0,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn list_voices(&self) -> Vec<Voice> {
        let output = match Command::new(&self.binary).arg("--voices").output().await {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                log::error!("[TTS] --voices exited with {}", output.status);
                return Vec::new();
            }
            Err(e) => {
                log::error!("[TTS] Failed to run {}: {}", self.binary.display(), e);
                return Vec::new();
            }
        };
        parse_voice_list(&String::from_utf8_lossy(&output.stdout))
    }
}

impl SpeechBackend for EspeakBackend {
    async fn voices(&self) -> Vec<Voice> {
        // An empty listing is not cached so a later poll can retry.
        if let Some(voices) = self.voices.get() {
            return voices.clone();
        }
        let voices = self.list_voices().await;
        if !voices.is_empty() {
            let _ = self.voices.set(voices.clone());
        }
        voices
    }

    async fn speak(&self, text: &str, voice: Option<&Voice>) -> Result<(), SpeechError> {
        let mut cancel_rx = self.cancel_tx.subscribe();
        cancel_rx.borrow_and_update();

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(voice) = voice {
            cmd.args(["-v", &voice.lang]);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| SpeechError::Failed(format!("spawn {}: {}", self.binary.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| SpeechError::Failed(e.to_string()))?;
            // Dropping stdin closes it; espeak starts speaking at EOF.
        }

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| SpeechError::Failed(e.to_string()))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(SpeechError::Failed(format!("synthesizer exited with {}", status)))
                }
            }
            _ = cancel_rx.changed() => {
                log::info!("[TTS] Utterance cancelled");
                let _ = child.kill().await;
                Ok(())
            }
        }
    }

    fn cancel(&self) {
        self.cancel_tx.send_modify(|n| *n = n.wrapping_add(1));
    }
}

/// Parse the table printed by `espeak-ng --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  de              --/M      German             gmw/de
/// ```
pub fn parse_voice_list(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?;
            let lang = cols.next()?;
            let _age_gender = cols.next()?;
            let name = cols.next()?;
            let file = cols.next().unwrap_or(name);
            Some(Voice {
                name: name.replace('_', " "),
                lang: lang.to_string(),
                local_service: true,
                uri: file.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  de              --/M      German             gmw/de
 2  en-gb           --/M      English_(Great_Britain) gmw/en           (en 2)
 5  ru              --/M      Russian            zle/ru
";

    #[test]
    fn parses_voice_table() {
        let voices = parse_voice_list(LISTING);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].lang, "de");
        assert_eq!(voices[0].name, "German");
        assert_eq!(voices[1].name, "English (Great Britain)");
        assert_eq!(voices[2].uri, "zle/ru");
        assert!(voices.iter().all(|v| v.local_service));
    }

    #[test]
    fn garbage_listing_is_empty() {
        assert!(parse_voice_list("").is_empty());
        assert!(parse_voice_list("command not found").is_empty());
    }

    #[test]
    fn parsed_voices_work_with_selection() {
        let voices = parse_voice_list(LISTING);
        assert_eq!(crate::speech::best_voice(&voices, "de-DE").unwrap().name, "German");
        assert_eq!(crate::speech::russian_voice(&voices).unwrap().name, "Russian");
    }

    #[tokio::test]
    async fn missing_binary_yields_no_voices() {
        let backend = EspeakBackend::with_binary("/definitely/not/espeak");
        assert!(backend.voices().await.is_empty());
    }

    #[tokio::test]
    async fn missing_binary_speak_fails() {
        let backend = EspeakBackend::with_binary("/definitely/not/espeak");
        let err = backend.speak("Hallo", None).await.unwrap_err();
        assert!(matches!(err, SpeechError::Failed(_)));
    }
}
