//! Multimodal model integration — request types, prompt, Groq client and
//! the analysis orchestrator.

pub mod analyze;
pub mod groq;
pub mod prompts;
pub mod types;

pub use analyze::{analyze, AnalysisError};
pub use groq::{GroqClient, LlmError, VisionModel};
pub use types::{AnalysisRequest, LanguageProfile, OutputLanguage, TargetAudience};
