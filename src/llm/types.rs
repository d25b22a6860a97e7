//! Request parameters and per-language profiles for the analysis call.

use serde::{Deserialize, Serialize};

/// Output style selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    /// 3–5 bullet points, no introduction.
    KeyPoints,
    /// Prefixed plain-language narrative.
    SimpleSummary,
}

impl TargetAudience {
    /// The label the model sees in the prompt.
    pub fn label(self) -> &'static str {
        match self {
            TargetAudience::KeyPoints => "Wichtigste Kernaussagen",
            TargetAudience::SimpleSummary => "Einfache Zusammenfassung",
        }
    }

    /// Parse a CLI/UI value. Accepts short names and the prompt labels.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "key-points" | "key_points" | "keypoints" | "wichtigste kernaussagen" => {
                Some(TargetAudience::KeyPoints)
            }
            "summary" | "simple-summary" | "simple_summary" | "einfache zusammenfassung" => {
                Some(TargetAudience::SimpleSummary)
            }
            _ => None,
        }
    }
}

/// Language the result must be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLanguage {
    German,
    English,
    French,
    Spanish,
    Italian,
    Russian,
}

impl OutputLanguage {
    pub const ALL: [OutputLanguage; 6] = [
        OutputLanguage::German,
        OutputLanguage::English,
        OutputLanguage::French,
        OutputLanguage::Spanish,
        OutputLanguage::Italian,
        OutputLanguage::Russian,
    ];

    pub fn profile(self) -> &'static LanguageProfile {
        match self {
            OutputLanguage::German => &PROFILES[0],
            OutputLanguage::English => &PROFILES[1],
            OutputLanguage::French => &PROFILES[2],
            OutputLanguage::Spanish => &PROFILES[3],
            OutputLanguage::Italian => &PROFILES[4],
            OutputLanguage::Russian => &PROFILES[5],
        }
    }

    /// Parse an ISO code, BCP-47 tag, or display name.
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim().to_lowercase();
        OutputLanguage::ALL.into_iter().find(|lang| {
            let p = lang.profile();
            v == p.display_name.to_lowercase()
                || v == p.code.to_lowercase()
                || v == p.code[..2].to_lowercase()
        })
    }

    /// Like `parse`, but unknown values fall back to German.
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or(OutputLanguage::German)
    }
}

/// Everything language-specific about one analysis: speech code, prompt
/// instructions, and the literal prefix of a simple summary.
#[derive(Debug)]
pub struct LanguageProfile {
    /// BCP-47 tag, also used to pick a speech voice.
    pub code: &'static str,
    pub display_name: &'static str,
    pub instructions: &'static str,
    pub summary_style: &'static str,
    pub key_points_style: &'static str,
    pub summary_prefix: &'static str,
}

static PROFILES: [LanguageProfile; 6] = [
    LanguageProfile {
        code: "de-DE",
        display_name: "Deutsch",
        instructions: "Gib den vereinfachten Text ausschließlich auf Deutsch aus. Wenn \"Einfache Zusammenfassung\" gewählt ist, BEGINNE die Ausgabe exakt mit: \"Hier ist eine Einfache Zusammenfassung:\". Wenn \"Wichtigste Kernaussagen\" gewählt ist, BEGINNE SOFORT mit dem ersten Stichpunkt \"- \", ohne Einleitung wie \"Das Bild enthält\". Keine zusätzlichen Kommentare.",
        summary_style: "Erkläre genau, was im Bildtext steht, und fasse alle wichtigen Kernaussagen zusammen. Nutze leicht verständliche Sprache und kurze, klare Sätze. Zitiere markante Schlüsselbegriffe wörtlich. Beginne exakt mit: \"Hier ist eine Einfache Zusammenfassung:\" und füge keine zweite Überschrift hinzu.",
        key_points_style: "Gib NUR 3–5 Stichpunkte aus, ohne Einleitung und ohne Abschluss. Jeder Punkt beginnt mit \"- \" und enthält 1–2 kurze Sätze mit konkreten Fakten aus dem Bild.",
        summary_prefix: "Hier ist eine Einfache Zusammenfassung:",
    },
    LanguageProfile {
        code: "en-US",
        display_name: "English",
        instructions: "Provide the simplified text in English only. If \"Einfache Zusammenfassung\" is chosen, BEGIN the output exactly with: \"Here is a Simple Summary:\". If \"Wichtigste Kernaussagen\" is chosen, START IMMEDIATELY with the first bullet point \"- \", with no introduction like \"The image contains\". No additional comments.",
        summary_style: "Explain exactly what the image text says and summarize all important key points. Use easily understandable English and short, clear sentences. Quote key terms verbatim. Begin exactly with: \"Here is a Simple Summary:\" and add no second heading.",
        key_points_style: "Provide ONLY 3-5 bullet points, without introduction or conclusion. Each point begins with \"- \" and contains 1-2 short sentences with concrete facts from the image.",
        summary_prefix: "Here is a Simple Summary:",
    },
    LanguageProfile {
        code: "fr-FR",
        display_name: "Français",
        instructions: "Provide the simplified text in French only. If \"Einfache Zusammenfassung\" is chosen, BEGIN the output exactly with: \"Voici un résumé simple :\". If \"Wichtigste Kernaussagen\" is chosen, START IMMEDIATELY with the first bullet point \"- \". No additional comments.",
        summary_style: "Explain in plain French what the image text says, in short, clear sentences. Begin exactly with: \"Voici un résumé simple :\".",
        key_points_style: "Provide ONLY 3-5 bullet points in French. Each point begins with \"- \" and contains 1-2 short sentences.",
        summary_prefix: "Voici un résumé simple :",
    },
    LanguageProfile {
        code: "es-ES",
        display_name: "Español",
        instructions: "Provide the simplified text in Spanish only. If \"Einfache Zusammenfassung\" is chosen, BEGIN the output exactly with: \"Aquí tienes un resumen sencillo:\". If \"Wichtigste Kernaussagen\" is chosen, START IMMEDIATELY with the first bullet point \"- \". No additional comments.",
        summary_style: "Explain in plain Spanish what the image text says, in short, clear sentences. Begin exactly with: \"Aquí tienes un resumen sencillo:\".",
        key_points_style: "Provide ONLY 3-5 bullet points in Spanish. Each point begins with \"- \" and contains 1-2 short sentences.",
        summary_prefix: "Aquí tienes un resumen sencillo:",
    },
    LanguageProfile {
        code: "it-IT",
        display_name: "Italiano",
        instructions: "Provide the simplified text in Italian only. If \"Einfache Zusammenfassung\" is chosen, BEGIN the output exactly with: \"Ecco un riassunto semplice:\". If \"Wichtigste Kernaussagen\" is chosen, START IMMEDIATELY with the first bullet point \"- \". No additional comments.",
        summary_style: "Explain in plain Italian what the image text says, in short, clear sentences. Begin exactly with: \"Ecco un riassunto semplice:\".",
        key_points_style: "Provide ONLY 3-5 bullet points in Italian. Each point begins with \"- \" and contains 1-2 short sentences.",
        summary_prefix: "Ecco un riassunto semplice:",
    },
    LanguageProfile {
        code: "ru-RU",
        display_name: "Русский",
        instructions: "КРИТИЧЕСКИ ВАЖНО: весь ответ должен быть ТОЛЬКО на русском языке! Никогда не используйте немецкие фразы. Если выбрано \"Einfache Zusammenfassung\", начните ТОЛЬКО с: \"Вот простое резюме:\". Если выбрано \"Wichtigste Kernaussagen\", дайте только пункты списка без введения.",
        summary_style: "Объясните содержание изображения простым русским языком, короткими понятными предложениями. Начните ТОЛЬКО с \"Вот простое резюме:\" и не добавляйте второго заголовка.",
        key_points_style: "Дайте ТОЛЬКО 3-5 пунктов на русском языке. Каждый пункт начинается с \"- \" и содержит 1-2 информативных предложения. НЕ пишите \"Das Bild enthält\".",
        summary_prefix: "Вот простое резюме:",
    },
];

/// Parameters of one analysis call, fixed for its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub target_audience: TargetAudience,
    pub output_language: OutputLanguage,
}

impl AnalysisRequest {
    pub fn new(target_audience: TargetAudience, output_language: OutputLanguage) -> Self {
        Self {
            target_audience,
            output_language,
        }
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        self.output_language.profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_a_distinct_profile() {
        let mut codes: Vec<_> = OutputLanguage::ALL.iter().map(|l| l.profile().code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), OutputLanguage::ALL.len());
    }

    #[test]
    fn prefixes_end_with_colon() {
        for lang in OutputLanguage::ALL {
            assert!(lang.profile().summary_prefix.ends_with(':'), "{:?}", lang);
        }
    }

    #[test]
    fn parse_accepts_codes_and_names() {
        assert_eq!(OutputLanguage::parse("ru"), Some(OutputLanguage::Russian));
        assert_eq!(OutputLanguage::parse("Русский"), Some(OutputLanguage::Russian));
        assert_eq!(OutputLanguage::parse("en-US"), Some(OutputLanguage::English));
        assert_eq!(OutputLanguage::parse("italiano"), Some(OutputLanguage::Italian));
        assert_eq!(OutputLanguage::parse("klingon"), None);
    }

    #[test]
    fn unknown_language_falls_back_to_german() {
        assert_eq!(OutputLanguage::parse_or_default("xx"), OutputLanguage::German);
    }

    #[test]
    fn audience_parse() {
        assert_eq!(TargetAudience::parse("key-points"), Some(TargetAudience::KeyPoints));
        assert_eq!(
            TargetAudience::parse("Einfache Zusammenfassung"),
            Some(TargetAudience::SimpleSummary)
        );
        assert_eq!(TargetAudience::parse("poem"), None);
    }
}
