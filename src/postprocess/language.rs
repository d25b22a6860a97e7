//! Language-conformance filter — drops lines the model leaked in the wrong
//! language when the requested output is not German.
//!
//! The Russian heuristic keeps lines with Cyrillic, lines without Latin
//! letters, and bullet lines. A short Russian line that happens to contain
//! only Latin words is dropped too; that false positive is accepted.

use regex::Regex;
use std::sync::LazyLock;

use crate::llm::types::OutputLanguage;

/// German boilerplate the model tends to emit regardless of target language.
static WRONG_LANGUAGE_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:-\s*)?(?:Das Bild enthält|Bitte senden Sie|Ich bitte Sie|Sehr geehrte Damen und Herren|Kündigung)",
    )
    .unwrap()
});

static CYRILLIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\x{0400}-\x{04FF}]").unwrap());
static LATIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]").unwrap());
static BULLET_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-•]").unwrap());

/// Filter stray wrong-language lines. Never returns an empty string for
/// non-empty input: if every line would be dropped, the input comes back
/// unchanged.
pub fn enforce_language(text: &str, output_language: OutputLanguage) -> String {
    let russian = match output_language {
        OutputLanguage::Russian => true,
        OutputLanguage::English => false,
        _ => return text.to_string(),
    };

    let kept: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !WRONG_LANGUAGE_LEAD.is_match(line))
        .filter(|line| !russian || looks_russian(line))
        .collect();

    if kept.is_empty() {
        log::warn!("[PIPELINE] Language filter would drop every line, keeping original");
        return text.to_string();
    }

    kept.join("\n")
}

fn looks_russian(line: &str) -> bool {
    CYRILLIC.is_match(line) || !LATIN.is_match(line) || BULLET_LINE.is_match(line)
}
