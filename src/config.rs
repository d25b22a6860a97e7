//! Runtime configuration from the environment (and an optional `.env`).
//!
//! Every login reference value can be overridden on its own; anything not
//! set falls back to the embedded defaults.

use crate::auth::VerifierConfig;
use crate::i18n::UiLanguage;

pub const ENV_ITERATIONS: &str = "KLARTEXT_LOGIN_PBKDF2_ITERATIONS";
pub const ENV_USER_SALT: &str = "KLARTEXT_LOGIN_USER_SALT";
pub const ENV_USER_DK: &str = "KLARTEXT_LOGIN_USER_DK";
pub const ENV_PASS_SALT: &str = "KLARTEXT_LOGIN_PASS_SALT";
pub const ENV_PASS_DK: &str = "KLARTEXT_LOGIN_PASS_DK";
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_MODEL: &str = "KLARTEXT_MODEL";
pub const ENV_UI_LANG: &str = "KLARTEXT_UI_LANG";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub verifier: VerifierConfig,
    /// Held in memory for this process only.
    pub groq_api_key: Option<String>,
    pub model: Option<String>,
    pub ui_language: UiLanguage,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("[CONFIG] Loaded {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("[CONFIG] Ignoring unreadable .env: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut verifier = VerifierConfig::embedded();
        if let Some(raw) = get(ENV_ITERATIONS) {
            verifier.iterations = raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: ENV_ITERATIONS,
                    value: raw.clone(),
                }
            })?;
        }
        if let Some(v) = get(ENV_USER_SALT) {
            verifier.user.salt_b64 = v;
        }
        if let Some(v) = get(ENV_USER_DK) {
            verifier.user.dk_b64 = v;
        }
        if let Some(v) = get(ENV_PASS_SALT) {
            verifier.pass.salt_b64 = v;
        }
        if let Some(v) = get(ENV_PASS_DK) {
            verifier.pass.dk_b64 = v;
        }

        let ui_language = match get(ENV_UI_LANG) {
            Some(raw) => UiLanguage::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_UI_LANG,
                value: raw,
            })?,
            None => UiLanguage::default(),
        };

        let config = Self {
            verifier,
            groq_api_key: get(ENV_GROQ_API_KEY),
            model: get(ENV_MODEL),
            ui_language,
        };

        log::info!(
            "[CONFIG] {} login rounds, API key {}, UI {:?}",
            config.verifier.iterations,
            if config.groq_api_key.is_some() { "set" } else { "missing" },
            config.ui_language
        );
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
