use async_trait::async_trait;
use brd_common::gemini::GeminiClient;
use tracing::info;

use crate::error::AppError;
use crate::model::{GenerationRequest, PromptStyle};
use crate::prompt;

/// Seam between the pipeline and the generation service, so the pipeline can
/// be exercised without network access.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce raw BRD content (plain text or HTML) for the request.
    async fn generate(
        &self,
        request: &GenerationRequest,
        headings: &[String],
    ) -> Result<String, AppError>;
}

/// Production generator backed by the Gemini client.
pub struct BrdGenerator {
    client: GeminiClient,
    model: String,
    style: PromptStyle,
}

impl BrdGenerator {
    pub fn new(client: GeminiClient, model: String, style: PromptStyle) -> Self {
        Self { client, model, style }
    }
}

#[async_trait]
impl ContentGenerator for BrdGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        headings: &[String],
    ) -> Result<String, AppError> {
        let prompt = prompt::build_prompt(
            self.style,
            &request.project_name,
            &request.user_input,
            headings,
        );
        let text = self.client.generate_text(&self.model, &prompt, None).await?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(AppError::EmptyGeneration);
        }
        info!(model = %self.model, chars = text.len(), "brd content generated");
        Ok(text)
    }
}
