use super::client::HuggingFaceHttpClient;
use super::types::{TextToImageParameters, TextToImageRequest};
use crate::ai::mime::detect_image_mime;
use crate::ai::{ImageGenerationService, ImageRequest, ServiceFailure};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-schnell";

pub struct HuggingFaceImageClient {
    http: HuggingFaceHttpClient,
    model: String,
}

impl HuggingFaceImageClient {
    pub fn new(token: String, model: String, base_url: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HuggingFaceHttpClient::new(token, base_url, timeout)?,
            model,
        })
    }

    pub fn new_with_client(
        token: String,
        model: String,
        base_url: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: HuggingFaceHttpClient::new_with_client(token, base_url, client),
            model,
        }
    }
}

#[async_trait]
impl ImageGenerationService for HuggingFaceImageClient {
    async fn generate_image(
        &self,
        request: &ImageRequest,
    ) -> std::result::Result<Vec<u8>, ServiceFailure> {
        let negative_supplied = request.negative_prompt.is_some();
        let payload = TextToImageRequest {
            inputs: request.prompt.clone(),
            parameters: TextToImageParameters {
                negative_prompt: request.negative_prompt.clone(),
            },
        };

        tracing::debug!(
            "Sending text-to-image request to {} (negative prompt: {})",
            self.model,
            negative_supplied
        );

        let body = self
            .http
            .post_model(&self.model, &payload)
            .await
            .map_err(|signal| ServiceFailure::classify(&signal, negative_supplied))?;

        match detect_image_mime(&body) {
            Some(mime) => {
                tracing::debug!(
                    "Hugging Face returned {} image ({} bytes)",
                    mime,
                    body.len()
                );
                Ok(body)
            }
            None => Err(ServiceFailure::Unknown(format!(
                "Service returned a non-image payload: {}",
                String::from_utf8_lossy(&body[..body.len().min(200)])
            ))),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
