use crate::Result;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/hf-inference";

/// Lightweight Hugging Face Inference REST client.
///
/// Failures are returned as the raw signal text (`"<status> <body>"` or the
/// transport error) so callers can classify them.
pub struct HuggingFaceHttpClient {
    client: Client,
    token: String,
    base_url: String,
}

impl HuggingFaceHttpClient {
    pub fn new(token: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new_with_client(token, base_url, client))
    }

    pub fn new_with_client(token: String, base_url: String, client: Client) -> Self {
        Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST `request` to `/models/{model}` and return the raw response body.
    pub async fn post_model<Req: Serialize>(
        &self,
        model: &str,
        request: &Req,
    ) -> std::result::Result<Vec<u8>, String> {
        let url = format!("{}/models/{}", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "image/png")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Hugging Face: {}", e);
                e.to_string()
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                "Hugging Face API error (status {}): {}",
                status,
                error_text
            );
            return Err(format!("{} {}", status, error_text));
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read Hugging Face response body: {}", e);
            e.to_string()
        })?;

        Ok(body.to_vec())
    }
}
