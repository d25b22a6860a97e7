//! User-facing strings, German and Russian UI.
//!
//! Lookup falls back to German, then to the key itself. These strings are
//! for display only; no logic compares against them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiLanguage {
    #[default]
    De,
    Ru,
}

impl UiLanguage {
    pub fn toggle(self) -> Self {
        match self {
            UiLanguage::De => UiLanguage::Ru,
            UiLanguage::Ru => UiLanguage::De,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "de" | "deutsch" => Some(UiLanguage::De),
            "ru" | "русский" => Some(UiLanguage::Ru),
            _ => None,
        }
    }
}

static DE: &[(&str, &str)] = &[
    ("app_title", "Klartext Kamera"),
    ("username", "Benutzername"),
    ("password", "Passwort"),
    ("login_error_invalid", "Ungültige Zugangsdaten."),
    ("login_error_failed", "Anmeldung fehlgeschlagen."),
    ("login_required", "Bitte melden Sie sich zuerst an."),
    ("analyzing", "Analysiere..."),
    ("result_title", "Ergebnis"),
    ("error_api_key_missing", "Kein API-Schlüssel konfiguriert (GROQ_API_KEY)."),
    ("error_no_image", "Bitte wählen Sie zuerst ein Bild aus."),
    ("error_image_process", "Das Bild konnte nicht verarbeitet werden. Bitte versuchen Sie es erneut."),
    ("error_analysis", "Bei der Analyse des Bildes ist ein Fehler aufgetreten. Bitte versuchen Sie es später erneut."),
    ("error_speech_failed", "Sprachausgabe fehlgeschlagen."),
    ("error_speech_unsupported", "Sprachausgabe wird auf diesem System nicht unterstützt."),
    ("error_speech_no_russian_voice", "Keine russische TTS-Stimme gefunden. Bitte installieren Sie eine russische Sprachsynthese und versuchen Sie es erneut."),
];

static RU: &[(&str, &str)] = &[
    ("app_title", "Ясный Текст Камера"),
    ("username", "Имя пользователя"),
    ("password", "Пароль"),
    ("login_error_invalid", "Неверные учетные данные."),
    ("login_error_failed", "Ошибка входа в систему."),
    ("login_required", "Пожалуйста, сначала войдите в систему."),
    ("analyzing", "Анализирую..."),
    ("result_title", "Результат"),
    ("error_api_key_missing", "API-ключ не настроен (GROQ_API_KEY)."),
    ("error_no_image", "Пожалуйста, сначала выберите изображение."),
    ("error_image_process", "Не удалось обработать изображение. Попробуйте еще раз."),
    ("error_analysis", "Произошла ошибка при анализе изображения. Повторите попытку позже."),
    ("error_speech_failed", "Ошибка воспроизведения речи."),
    ("error_speech_unsupported", "Воспроизведение речи не поддерживается в этой системе."),
];

fn table(lang: UiLanguage) -> &'static [(&'static str, &'static str)] {
    match lang {
        UiLanguage::De => DE,
        UiLanguage::Ru => RU,
    }
}

fn lookup(lang: UiLanguage, key: &str) -> Option<&'static str> {
    table(lang).iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Key → string lookup bound to the current UI language.
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    language: UiLanguage,
}

impl Localizer {
    pub fn new(language: UiLanguage) -> Self {
        Self { language }
    }

    pub fn language(&self) -> UiLanguage {
        self.language
    }

    pub fn set_language(&mut self, language: UiLanguage) {
        self.language = language;
    }

    pub fn toggle(&mut self) {
        self.language = self.language.toggle();
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        lookup(self.language, key)
            .or_else(|| lookup(UiLanguage::De, key))
            .unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_german() {
        let l = Localizer::default();
        assert_eq!(l.t("login_error_invalid"), "Ungültige Zugangsdaten.");
    }

    #[test]
    fn toggle_switches_to_russian_and_back() {
        let mut l = Localizer::default();
        l.toggle();
        assert_eq!(l.language(), UiLanguage::Ru);
        assert_eq!(l.t("login_error_failed"), "Ошибка входа в систему.");
        l.toggle();
        assert_eq!(l.language(), UiLanguage::De);
    }

    #[test]
    fn missing_russian_key_falls_back_to_german() {
        let l = Localizer::new(UiLanguage::Ru);
        assert!(l.t("error_speech_no_russian_voice").starts_with("Keine russische"));
    }

    #[test]
    fn unknown_key_returns_key() {
        assert_eq!(Localizer::default().t("no_such_key"), "no_such_key");
    }

    #[test]
    fn every_russian_key_exists_in_german() {
        for (key, _) in RU {
            assert!(lookup(UiLanguage::De, key).is_some(), "{} missing in DE", key);
        }
    }
}
