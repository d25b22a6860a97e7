//! Application state: one owner per concern.
//!
//! Errors leave this layer as localized strings ready for display.

use crate::auth::{CredentialVerifier, SessionStore};
use crate::i18n::{Localizer, UiLanguage};
use crate::image_input::ImageData;
use crate::llm::{self, AnalysisRequest, OutputLanguage, VisionModel};
use crate::speech::{SpeechBackend, Speaker};

pub struct AppState<B: SpeechBackend> {
    localizer: Localizer,
    session: SessionStore,
    speaker: Speaker<B>,
    verifier: CredentialVerifier,
}

impl<B: SpeechBackend> AppState<B> {
    pub fn new(verifier: CredentialVerifier, ui_language: UiLanguage, speaker: Speaker<B>) -> Self {
        Self {
            localizer: Localizer::new(ui_language),
            session: SessionStore::new(),
            speaker,
            verifier,
        }
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn toggle_language(&mut self) -> UiLanguage {
        self.localizer.toggle();
        self.localizer.language()
    }

    pub fn speaker(&self) -> &Speaker<B> {
        &self.speaker
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub async fn login(&mut self, identifier: &str, secret: &str) -> Result<(), String> {
        match self.verifier.verify_async(identifier, secret).await {
            Ok(credential) => {
                self.session.establish(credential);
                Ok(())
            }
            Err(e) => Err(self.localizer.t(e.message_key()).to_string()),
        }
    }

    pub fn logout(&mut self) {
        self.speaker.stop();
        self.session.clear();
    }

    /// Analyze an image. Requires a session; stops any playback first.
    pub async fn analyze<M: VisionModel>(
        &self,
        model: &M,
        image: Option<&ImageData>,
        request: &AnalysisRequest,
    ) -> Result<String, String> {
        self.speaker.stop();

        if !self.session.is_authenticated() {
            log::warn!("[PIPELINE] Analysis requested without a session");
            return Err(self.localizer.t("login_required").to_string());
        }
        let image = image.ok_or_else(|| self.localizer.t("error_no_image").to_string())?;

        llm::analyze(model, image, request).await.map_err(|e| {
            log::error!("[PIPELINE] {}", e);
            self.localizer.t(e.message_key()).to_string()
        })
    }

    /// Read-aloud button: starts playback, or stops it if already playing.
    pub async fn read_aloud(&self, text: &str, language: OutputLanguage) -> Result<bool, String> {
        self.speaker
            .toggle(text, language)
            .await
            .map_err(|e| self.localizer.t(e.message_key()).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate_config;
    use crate::llm::{LlmError, TargetAudience};
    use crate::speech::{SpeechError, Voice};
    use std::time::Duration;

    struct EchoModel;

    impl VisionModel for EchoModel {
        async fn complete(&self, _prompt: &str, _image: &ImageData) -> Result<String, LlmError> {
            Ok("## Ergebnis\n\nDer Vertrag endet im Mai.".to_string())
        }
    }

    struct FailingModel;

    impl VisionModel for FailingModel {
        async fn complete(&self, _prompt: &str, _image: &ImageData) -> Result<String, LlmError> {
            Err(LlmError::Api { status: 500, body: "boom".to_string() })
        }
    }

    struct SilentBackend;

    impl SpeechBackend for SilentBackend {
        async fn voices(&self) -> Vec<Voice> {
            Vec::new()
        }

        async fn speak(&self, _text: &str, _voice: Option<&Voice>) -> Result<(), SpeechError> {
            Ok(())
        }

        fn cancel(&self) {}
    }

    fn state(lang: UiLanguage) -> AppState<SilentBackend> {
        let verifier = CredentialVerifier::new(generate_config("Admin", "geheim", 1000).unwrap());
        let speaker = Speaker::with_voice_wait(SilentBackend, Duration::from_millis(1));
        AppState::new(verifier, lang, speaker)
    }

    fn image() -> ImageData {
        ImageData {
            mime_type: "image/png".to_string(),
            base64: "iVBORw0KGgo=".to_string(),
        }
    }

    fn summary_de() -> AnalysisRequest {
        AnalysisRequest::new(TargetAudience::SimpleSummary, OutputLanguage::German)
    }

    #[tokio::test]
    async fn login_gates_analysis() {
        let mut s = state(UiLanguage::De);
        let err = s.analyze(&EchoModel, Some(&image()), &summary_de()).await.unwrap_err();
        assert_eq!(err, "Bitte melden Sie sich zuerst an.");

        s.login("Admin", "geheim").await.unwrap();
        assert!(s.is_authenticated());

        let out = s.analyze(&EchoModel, Some(&image()), &summary_de()).await.unwrap();
        assert!(out.starts_with("Hier ist eine Einfache Zusammenfassung:\n\n"));
        assert!(out.contains("Der Vertrag endet im Mai."));
    }

    #[tokio::test]
    async fn wrong_login_gives_localized_message() {
        let mut s = state(UiLanguage::Ru);
        let err = s.login("Admin", "falsch").await.unwrap_err();
        assert_eq!(err, "Неверные учетные данные.");
        assert!(!s.is_authenticated());
    }

    #[tokio::test]
    async fn missing_image_and_model_failure_are_localized() {
        let mut s = state(UiLanguage::De);
        s.login("Admin", "geheim").await.unwrap();

        let err = s.analyze(&EchoModel, None, &summary_de()).await.unwrap_err();
        assert_eq!(err, "Bitte wählen Sie zuerst ein Bild aus.");

        let err = s.analyze(&FailingModel, Some(&image()), &summary_de()).await.unwrap_err();
        assert!(err.starts_with("Bei der Analyse des Bildes"));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let mut s = state(UiLanguage::De);
        s.login("Admin", "geheim").await.unwrap();
        s.logout();
        assert!(!s.is_authenticated());
    }

    #[tokio::test]
    async fn russian_read_aloud_without_voice_is_localized() {
        let mut s = state(UiLanguage::De);
        assert_eq!(s.toggle_language(), UiLanguage::Ru);
        // No Russian entry for this key; German text is shown.
        let err = s.read_aloud("Привет.", OutputLanguage::Russian).await.unwrap_err();
        assert!(err.starts_with("Keine russische TTS-Stimme"));
    }
}
