//! Text-to-image service integration
//!
//! Provides the `ImageGenerationService` seam, the Hugging Face Inference API
//! client behind it, and a scripted mock used by tests and dry runs.

pub mod failure;
pub mod huggingface;
pub mod mime;
pub mod mock;

pub use failure::ServiceFailure;
pub use huggingface::HuggingFaceImageClient;
pub use mock::MockImageGenerationClient;

use async_trait::async_trait;

/// One remote generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, negative_prompt: Option<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt,
        }
    }

    /// The same request with the negative prompt removed.
    pub fn without_negative_prompt(&self) -> Self {
        Self {
            prompt: self.prompt.clone(),
            negative_prompt: None,
        }
    }
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generate one image, returning its encoded bytes.
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> std::result::Result<Vec<u8>, ServiceFailure>;

    /// Model identifier, shown to the user.
    fn model(&self) -> &str;
}
