//! Single generation attempt orchestration.
//!
//! Validates input, calls the image service (with one fallback retry when the
//! negative prompt is rejected), and records the result in the session.

use crate::ai::{ImageGenerationService, ImageRequest, ServiceFailure};
use crate::error::GenerationError;
use crate::models::GenerationRecord;
use crate::session::Session;
use chrono::Local;
use std::fmt;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Informational message attached to a successful generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The negative prompt was dropped because the model rejected it.
    NegativePromptUnsupported,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativePromptUnsupported => write!(
                f,
                "Note: Negative prompt feature may not be fully supported by this model."
            ),
        }
    }
}

/// Outcome of the most recent `generate` call, kept on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded {
        record_id: Uuid,
        notice: Option<Notice>,
    },
    Failed(GenerationError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// A successful generation.
#[derive(Debug, Clone)]
pub struct Generation {
    pub record: GenerationRecord,
    pub notice: Option<Notice>,
}

pub struct GenerationWorkflow {
    service: Box<dyn ImageGenerationService>,
}

impl GenerationWorkflow {
    pub fn new(service: Box<dyn ImageGenerationService>) -> Self {
        Self { service }
    }

    pub fn model(&self) -> &str {
        self.service.model()
    }

    /// Run one generation attempt for `session`.
    ///
    /// On success the new record is inserted at the front of the session
    /// history. On failure the history is left untouched. Either way the
    /// session's last outcome is updated.
    ///
    /// A blank prompt fails with [`GenerationError::EmptyPrompt`] before the
    /// service is called; the last outcome is the only session state it
    /// changes.
    pub async fn generate(
        &self,
        session: &mut Session,
        prompt: &str,
        negative_prompt: Option<&str>,
    ) -> Result<Generation, GenerationError> {
        let result = self.attempt(session.id(), prompt, negative_prompt).await;

        match &result {
            Ok(generation) => {
                session.history_mut().insert(generation.record.clone());
                session.set_last_outcome(Outcome::Succeeded {
                    record_id: generation.record.id(),
                    notice: generation.notice,
                });
            }
            Err(e) => session.set_last_outcome(Outcome::Failed(e.clone())),
        }

        result
    }

    async fn attempt(
        &self,
        session_id: Uuid,
        prompt: &str,
        negative_prompt: Option<&str>,
    ) -> Result<Generation, GenerationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            warn!("[{}] Rejected empty prompt", session_id);
            return Err(GenerationError::EmptyPrompt);
        }

        let negative_prompt = negative_prompt
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let request = ImageRequest::new(prompt, negative_prompt);

        info!(
            "[{}] Generating image with {} ({} chars, negative prompt: {})",
            session_id,
            self.service.model(),
            prompt.len(),
            request.negative_prompt.is_some()
        );

        let first = self.service.generate_image(&request).await;
        let (image, applied, notice) = match first {
            Ok(image) => (image, request, None),
            Err(ServiceFailure::UnsupportedParameter) if request.negative_prompt.is_some() => {
                warn!(
                    "[{}] Negative prompt not supported by {}, retrying without it",
                    session_id,
                    self.service.model()
                );
                let fallback = request.without_negative_prompt();
                match self.service.generate_image(&fallback).await {
                    Ok(image) => (image, fallback, Some(Notice::NegativePromptUnsupported)),
                    Err(failure) => return Err(Self::classified(session_id, failure)),
                }
            }
            Err(failure) => return Err(Self::classified(session_id, failure)),
        };

        info!(
            "[{}] Generated image ({} bytes)",
            session_id,
            image.len()
        );

        let record = GenerationRecord::new(
            image,
            applied.prompt,
            applied.negative_prompt,
            Local::now(),
        );
        Ok(Generation { record, notice })
    }

    fn classified(session_id: Uuid, failure: ServiceFailure) -> GenerationError {
        let err = GenerationError::from(failure);
        error!("[{}] Image generation failed: {:?}", session_id, err);
        err
    }
}
