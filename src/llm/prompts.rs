//! Analysis prompt — one template, parameterized by the language profile.
//!
//! The section headings (ROLE, TASK, INPUTS, …) are exactly the words the
//! key-points filter strips if the model echoes them back.

use super::types::{AnalysisRequest, TargetAudience};

/// Default multimodal model on Groq.
pub const MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

pub const TEMPERATURE: f64 = 0.3;

pub const MAX_TOKENS: u32 = 1024;

const TEMPLATE: &str = r#"**ROLE:**
You are a brilliant AI assistant that reads and understands text in images. Your main task is to analyze complex information and make it understandable for everyone, bridging complicated technical jargon and everyday language.

**TASK:**
1. **Text Recognition (OCR):** Perform precise text recognition on the attached image.
2. **Analysis & Simplification:** Simplify the recognized text according to the chosen [TARGET_AUDIENCE/STYLE].
3. **Translation & Output:** Provide the result exclusively in the chosen [OUTPUT_LANGUAGE].

**INPUTS:**
1. **[IMAGE]:** attached to this message
2. **[TARGET_AUDIENCE/STYLE]:** {audience}
3. **[OUTPUT_LANGUAGE]:** {language}

**PROCESSING INSTRUCTIONS:**
* Your first priority is accurate capture of the text in the image. Ignore irrelevant image elements.
* Describe precisely what the text says and how it is structured (headings, paragraphs, lists, tables, numbers/units, labels). Quote short, important passages verbatim where helpful.
* Adapt style, tone and complexity exactly to the chosen [TARGET_AUDIENCE/STYLE].
* {instructions}
* Key points may only refer to the text in the image. Content from this prompt (headings like "TASK" or "PROCESSING INSTRUCTIONS", terms like "Text Recognition (OCR)") must NEVER appear in the output.

**TARGET AUDIENCE/STYLE DEFINITION:**
* **{audience}:** {style}
"#;

/// Build the user prompt for one analysis request.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    let profile = request.profile();
    let style = match request.target_audience {
        TargetAudience::SimpleSummary => profile.summary_style,
        TargetAudience::KeyPoints => profile.key_points_style,
    };

    TEMPLATE
        .replace("{audience}", request.target_audience.label())
        .replace("{language}", profile.display_name)
        .replace("{instructions}", profile.instructions)
        .replace("{style}", style)
}
