//! Analysis orchestrator: prompt → model → post-processing pipeline.

use crate::image_input::ImageData;
use crate::postprocess;

use super::groq::{LlmError, VisionModel};
use super::prompts::build_prompt;
use super::types::AnalysisRequest;

/// Analyze one image and return the processed, display-ready result.
pub async fn analyze<M: VisionModel>(
    model: &M,
    image: &ImageData,
    request: &AnalysisRequest,
) -> Result<String, AnalysisError> {
    let start = std::time::Instant::now();
    let prompt = build_prompt(request);

    log::info!(
        "[LLM] Analyzing {} image ({:?}, {:?})",
        image.mime_type,
        request.target_audience,
        request.output_language
    );

    let raw = model.complete(&prompt, image).await?;
    let result = postprocess::process(&raw, request);

    log::info!("[LLM] Analysis finished in {}ms", start.elapsed().as_millis());
    Ok(result)
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),
}

impl AnalysisError {
    pub fn message_key(&self) -> &'static str {
        match self {
            AnalysisError::Model(e) => e.message_key(),
        }
    }
}
