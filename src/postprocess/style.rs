//! Style contracts for the two output formats.
//!
//! The model is told to start summaries with a fixed prefix and to answer
//! key points with 3–5 bullets, but it drifts. These functions enforce the
//! structure after the fact without inventing content.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum number of bullets in a key-points answer.
pub const MAX_KEY_POINTS: usize = 5;

static SUMMARY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:zusammenfassung|summary|резюме)").unwrap());

static LEADING_BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-•*]\s*").unwrap());

/// Words from the prompt scaffolding (DE/EN/RU) that must never show up
/// as a key point. Substring match so plurals and inflections ("Tasks",
/// "Aufgaben", "Rollen") are caught; only `ocr` is word-bounded.
static PROMPT_ECHO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:texterkennung|\bocr\b|aufgabe|anweisungen|definitionen|inputs|rolle|task|instructions|definitions|role|input|входные|задача|инструкции|определения|роль)",
    )
    .unwrap()
});

/// Guarantee a simple summary starts with exactly one `prefix`.
///
/// A generic heading in the first line ("Summary", "Zusammenfassung",
/// "Резюме") is dropped first. Empty body → prefix only.
pub fn apply_simple_summary(text: &str, prefix: &str) -> String {
    let mut body = text.trim().to_string();

    let first_line = body.lines().next().unwrap_or("").trim();
    if SUMMARY_HEADING.is_match(first_line) {
        body = match body.split_once('\n') {
            Some((_, rest)) => rest.trim().to_string(),
            None => String::new(),
        };
    }

    if body.to_lowercase().starts_with(&prefix.to_lowercase()) {
        return body;
    }
    if body.is_empty() {
        return prefix.to_string();
    }
    format!("{}\n\n{}", prefix, body)
}

/// Normalize a key-points answer to at most five `- ` bullets.
///
/// Echoed prompt lines are dropped. If one line or less survives, the text
/// is re-split into sentences instead. Fewer than three points are kept as
/// they are; nothing is padded.
pub fn apply_key_points(text: &str) -> String {
    let mut points: Vec<String> = text
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .filter(|line| !PROMPT_ECHO.is_match(line))
        .collect();

    if points.len() <= 1 {
        points = text
            .lines()
            .flat_map(split_sentences)
            .map(strip_bullet)
            .filter(|s| !s.is_empty())
            .filter(|s| !PROMPT_ECHO.is_match(s))
            .collect();
    }

    if points.len() > MAX_KEY_POINTS {
        log::info!("[PIPELINE] Truncating {} key points to {}", points.len(), MAX_KEY_POINTS);
        points.truncate(MAX_KEY_POINTS);
    }

    points
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_bullet(line: &str) -> String {
    LEADING_BULLET.replace(line.trim(), "").trim().to_string()
}

/// Split on `.`, `!` or `?` followed by whitespace. The punctuation stays
/// with its sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else {
            break;
        };
        if next.is_whitespace() {
            let end = i + c.len_utf8();
            sentences.push(text[start..end].trim());
            while let Some(&(j, w)) = chars.peek() {
                if !w.is_whitespace() {
                    break;
                }
                chars.next();
                start = j + w.len_utf8();
            }
        }
    }

    sentences.push(text[start..].trim());
    sentences.retain(|s| !s.is_empty());
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "Here is a Simple Summary:";

    #[test]
    fn summary_gets_prefix_and_blank_line() {
        let out = apply_simple_summary("The rent rises in May.", PREFIX);
        assert_eq!(out, "Here is a Simple Summary:\n\nThe rent rises in May.");
    }

    #[test]
    fn summary_heading_dropped() {
        let out = apply_simple_summary("Zusammenfassung\nDie Miete steigt.", PREFIX);
        assert_eq!(out, "Here is a Simple Summary:\n\nDie Miete steigt.");
    }

    #[test]
    fn existing_prefix_not_duplicated() {
        let prefix = "Voici un résumé simple :";
        let text = "VOICI UN RÉSUMÉ SIMPLE : Le loyer augmente.";
        assert_eq!(apply_simple_summary(text, prefix), text);
    }

    #[test]
    fn summary_step_is_stable() {
        let once = apply_simple_summary("Аренда растёт.", "Вот простое резюме:");
        assert_eq!(apply_simple_summary(&once, "Вот простое резюме:"), once);
    }

    #[test]
    fn summary_of_empty_input_is_prefix_only() {
        assert_eq!(apply_simple_summary("", PREFIX), PREFIX);
        assert_eq!(apply_simple_summary("Summary", PREFIX), PREFIX);
    }

    #[test]
    fn key_points_truncated_to_five() {
        let text = (1..=7).map(|i| format!("- Point {}", i)).collect::<Vec<_>>().join("\n");
        let out = apply_key_points(&text);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.starts_with("- ")));
        assert_eq!(lines[4], "- Point 5");
    }

    #[test]
    fn key_points_not_padded() {
        let out = apply_key_points("- Erster Punkt\n- Zweiter Punkt");
        assert_eq!(out, "- Erster Punkt\n- Zweiter Punkt");
    }

    #[test]
    fn mixed_bullet_markers_normalized() {
        let out = apply_key_points("• eins\n* zwei\n-drei\nvier");
        assert_eq!(out, "- eins\n- zwei\n- drei\n- vier");
    }

    #[test]
    fn prompt_echo_lines_dropped() {
        let out = apply_key_points("- Aufgabe: Texterkennung\n- Die Miete steigt.\n- Role: assistant\n- Zahlung bis Mai.");
        assert_eq!(out, "- Die Miete steigt.\n- Zahlung bis Mai.");
    }

    #[test]
    fn inflected_echo_terms_dropped() {
        let out = apply_key_points(
            "- Aufgaben: Texterkennung\n- Tasks: read the image\n- Die Miete steigt.\n- Rollen: Assistent\n- Zahlung bis Mai.",
        );
        assert_eq!(out, "- Die Miete steigt.\n- Zahlung bis Mai.");
    }

    #[test]
    fn ocr_only_matches_as_a_word() {
        let out = apply_key_points("- Die Procrastination kostet Zeit.\n- OCR erkannt\n- Zahlung bis Mai.");
        assert_eq!(out, "- Die Procrastination kostet Zeit.\n- Zahlung bis Mai.");
    }

    #[test]
    fn paragraph_falls_back_to_sentences() {
        let out = apply_key_points("Die Miete steigt. Der Vertrag endet im Mai! Ist eine Kündigung möglich?");
        assert_eq!(
            out,
            "- Die Miete steigt.\n- Der Vertrag endet im Mai!\n- Ist eine Kündigung möglich?"
        );
    }

    #[test]
    fn sentence_fallback_skips_echo() {
        let out = apply_key_points("- Task: OCR\n- Die Miete steigt um 5%. Zahlung bis Mai.");
        assert_eq!(out, "- Die Miete steigt um 5%.\n- Zahlung bis Mai.");
    }

    #[test]
    fn decimal_points_do_not_split() {
        let out = apply_key_points("Preis 3.50 Euro. Fällig am 1.5.");
        assert_eq!(out, "- Preis 3.50 Euro.\n- Fällig am 1.5.");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(apply_key_points(""), "");
        assert_eq!(apply_key_points("\n\n"), "");
    }
}
