//! Response post-processing — turns raw model text into the string shown
//! to the user.
//!
//! sanitize → enforce_language → style contract. Every stage is a total
//! function over strings: a successful model call never turns into an
//! error here.

pub mod language;
pub mod sanitize;
pub mod style;

pub use language::enforce_language;
pub use sanitize::sanitize;
pub use style::{apply_key_points, apply_simple_summary};

use crate::llm::types::{AnalysisRequest, TargetAudience};

/// Run the full pipeline for one analysis request.
pub fn process(raw: &str, request: &AnalysisRequest) -> String {
    let cleaned = sanitize(raw.trim());
    let conformant = enforce_language(&cleaned, request.output_language);

    let result = match request.target_audience {
        TargetAudience::SimpleSummary => {
            apply_simple_summary(&conformant, request.profile().summary_prefix)
        }
        TargetAudience::KeyPoints => apply_key_points(&conformant),
    };

    log::info!(
        "[PIPELINE] {} chars raw → {} chars ({:?}, {:?})",
        raw.chars().count(),
        result.chars().count(),
        request.target_audience,
        request.output_language
    );

    result
}
