//! Model-output cleanup — strips markdown noise, echoed preambles and
//! meta-commentary while leaving the content itself alone.
//!
//! Every rule only ever removes or shortens text, so repeating the pass
//! until nothing changes terminates, and the result is idempotent.

use regex::Regex;
use std::sync::LazyLock;

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}(?:[ \t]+|$)").unwrap());

static SETEXT_UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*={2,}[ \t]*$").unwrap());

/// Two or more bullet characters at line start (`--`, `•*`, `---` rules).
/// Requires trailing whitespace so `**bold**` is left for the span rules.
static MULTI_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-•*]{2,}(?:[ \t]+|$)").unwrap());

/// `**Heading**:` at line start, or a line that is only `**Heading**`.
static BOLD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*\*[^*\n]+\*\*(?::[ \t]*|[ \t]*$)").unwrap());

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").unwrap());

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").unwrap());

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]*)`").unwrap());

static META_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:laut (?:dem )?bild|according to the image|in the image|im bild|на изображении|согласно изображению)\b",
    )
    .unwrap()
});

static PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:hier ist|here is|this is|das ist|based on|according to|basierend auf|вот|на основе)\b[^:\n]*:",
    )
    .unwrap()
});

static ELLIPSIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{3,}").unwrap());
static EXCLAMATIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!{2,}").unwrap());
static QUESTIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?{2,}").unwrap());
static COLONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":{2,}").unwrap());

static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static LINE_EDGE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^ +| +$").unwrap());
static EMPTY_BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[-•*]$").unwrap());
static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Clean raw model output. Total: any input yields some (possibly empty)
/// output, never an error.
pub fn sanitize(raw: &str) -> String {
    let mut current = sanitize_pass(raw);
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_pass(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let text = strip_code_fences(&text);

    let text = strip_markdown(&text);
    let text = META_REFERENCE.replace_all(&text, "");
    let text = strip_preambles(&text);
    let text = collapse_punctuation(text);
    let text = normalize_whitespace(&text);

    text.trim().to_string()
}

/// Strip a surrounding markdown code fence.
///
/// Models wrap plain answers in ``` fences despite being told not to.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let after_open = match trimmed.find('\n') {
            Some(pos) => &trimmed[pos + 1..],
            None => trimmed,
        };
        let stripped = after_open.trim_end();
        if stripped.ends_with("```") {
            stripped[..stripped.len() - 3].trim().to_string()
        } else {
            after_open.trim().to_string()
        }
    } else {
        trimmed.to_string()
    }
}

fn strip_markdown(text: &str) -> String {
    let text = HEADING_MARKER.replace_all(text, "");
    let text = SETEXT_UNDERLINE.replace_all(&text, "");
    let text = MULTI_BULLET.replace_all(&text, "");
    let text = BOLD_HEADING.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    INLINE_CODE.replace_all(&text, "$1").into_owned()
}

/// Remove stacked preambles ("Here is …: Based on …:") from the start.
fn strip_preambles(text: &str) -> &str {
    let mut rest = text;
    while let Some(m) = PREAMBLE.find(rest) {
        rest = &rest[m.end()..];
    }
    rest
}

fn collapse_punctuation(text: &str) -> String {
    let text = ELLIPSIS.replace_all(text, "...");
    let text = EXCLAMATIONS.replace_all(&text, "!");
    let text = QUESTIONS.replace_all(&text, "?");
    COLONS.replace_all(&text, ":").into_owned()
}

fn normalize_whitespace(text: &str) -> String {
    let text = HORIZONTAL_SPACE.replace_all(text, " ");
    let text = LINE_EDGE_SPACE.replace_all(&text, "");
    let text = EMPTY_BULLET.replace_all(&text, "");
    EXCESS_BLANK_LINES.replace_all(&text, "\n\n").into_owned()
}
