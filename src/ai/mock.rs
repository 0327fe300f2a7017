use super::{ImageGenerationService, ImageRequest, ServiceFailure};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

type Response = std::result::Result<Vec<u8>, ServiceFailure>;

/// Scripted image service.
///
/// Queued responses are returned in order; once the queue is drained every
/// call succeeds with a small placeholder PNG derived from the prompt.
#[derive(Clone)]
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<VecDeque<Response>>>,
    requests: Arc<Mutex<Vec<ImageRequest>>>,
    call_count: Arc<Mutex<usize>>,
    model: String,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            model: "mock/placeholder".to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_failure(self, failure: ServiceFailure) -> Self {
        self.responses.lock().unwrap().push_back(Err(failure));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a 64x64 gradient PNG tinted by the prompt text.
pub fn placeholder_png(prompt: &str) -> std::result::Result<Vec<u8>, image::ImageError> {
    let tint = prompt.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
    let img = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, tint]));

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, request: &ImageRequest) -> Response {
        *self.call_count.lock().unwrap() += 1;
        self.requests.lock().unwrap().push(request.clone());

        let scripted = self.responses.lock().unwrap().pop_front();
        match scripted {
            Some(response) => response,
            None => placeholder_png(&request.prompt)
                .map_err(|e| ServiceFailure::Unknown(format!("Placeholder encoding failed: {}", e))),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
