//! Per-user session state.
//!
//! A session owns the current prompt text, its own generation history, and
//! the outcome of the last generate call. Sessions are independent; nothing
//! here is shared between them.

use crate::export::DownloadArtifact;
use crate::history::{HistoryStore, DEFAULT_HISTORY_CAPACITY};
use crate::sampler::PromptSampler;
use crate::workflow::Outcome;
use crate::Result;
use uuid::Uuid;

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    prompt_text: String,
    history: HistoryStore,
    last_outcome: Option<Outcome>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt_text: String::new(),
            history: HistoryStore::new(capacity),
            last_outcome: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn set_prompt_text(&mut self, text: impl Into<String>) {
        self.prompt_text = text.into();
    }

    /// Replace the prompt text with a random suggestion and return it.
    pub fn randomize_prompt(&mut self, sampler: &PromptSampler) -> &str {
        self.prompt_text = sampler.sample();
        &self.prompt_text
    }

    /// Re-seed the prompt text from history record `index` (0 = newest).
    pub fn regenerate_from(&mut self, index: usize) -> Result<&str> {
        let prompt = self.history.get(index)?.prompt().to_string();
        self.prompt_text = prompt;
        Ok(&self.prompt_text)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub fn clear_history(&mut self) {
        tracing::info!("[{}] Cleared {} history record(s)", self.id, self.history.size());
        self.history.clear();
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    pub(crate) fn set_last_outcome(&mut self, outcome: Outcome) {
        self.last_outcome = Some(outcome);
    }

    /// PNG download for history record `index`.
    pub async fn download(&self, index: usize) -> Result<DownloadArtifact> {
        DownloadArtifact::from_record(self.history.get(index)?).await
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
