//! Conversion orchestrator: prompt construction, one completion call,
//! response normalization.

use std::sync::Arc;

use tracing::{error, info};

use crate::completion::{CompletionBackend, GenerationOptions};
use crate::models::{Conversion, ConversionRequest};

/// Output bound for a single conversion. Large enough for method- and
/// class-sized snippets without being unbounded.
pub const MAX_OUTPUT_TOKENS: u32 = 2000;

/// Low temperature biases the model toward literal translation over
/// creative rewriting.
pub const TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str =
    "You are a code conversion expert. Convert code accurately between different programming languages.";

/// Build the user-turn instruction for a conversion.
///
/// The "only return the converted code" directive suppresses markdown
/// fencing and prose commentary; downstream consumers expect raw code text.
pub fn build_prompt(source_language: &str, target_language: &str, source_code: &str) -> String {
    format!(
        "Convert the following {source_language} code to {target_language}. \
         Only return the converted code without explanations:\n\n{source_code}"
    )
}

/// Turns a validated [`ConversionRequest`] into one completion call and a
/// normalized [`Conversion`].
///
/// Stateless per call; the backend handle is shared across workers. Cheap to
/// clone.
#[derive(Clone)]
pub struct CodeConverter {
    backend: Arc<dyn CompletionBackend>,
}

impl CodeConverter {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Convert `request.source_code` into the target language.
    ///
    /// Every failure path (transport fault, upstream error status, decode
    /// failure, zero completions) terminates in the error variant; no fault
    /// escapes this method. Language labels are echoed back unchanged on
    /// success so callers can correlate responses.
    pub async fn convert(&self, request: &ConversionRequest) -> Conversion {
        info!(
            "converting {} to {}",
            request.source_language, request.target_language
        );

        let prompt = build_prompt(
            &request.source_language,
            &request.target_language,
            &request.source_code,
        );
        let options = GenerationOptions {
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        match self.backend.complete(SYSTEM_PROMPT, &prompt, options).await {
            Ok(converted_code) => {
                info!("code conversion successful");
                Conversion::Success {
                    converted_code,
                    source_language: request.source_language.clone(),
                    target_language: request.target_language.clone(),
                }
            }
            Err(e) => {
                error!("error converting code: {e}");
                Conversion::error(format!("Failed to convert code: {e}"))
            }
        }
    }
}
