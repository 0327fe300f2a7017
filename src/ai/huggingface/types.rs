//! Hugging Face Inference API request payloads.

use serde::Serialize;

/// Request body for text-to-image inference.
#[derive(Debug, Serialize)]
pub struct TextToImageRequest {
    pub inputs: String,
    #[serde(skip_serializing_if = "TextToImageParameters::is_empty")]
    pub parameters: TextToImageParameters,
}

/// Optional generation parameters.
#[derive(Debug, Default, Serialize)]
pub struct TextToImageParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

impl TextToImageParameters {
    pub fn is_empty(&self) -> bool {
        self.negative_prompt.is_none()
    }
}
