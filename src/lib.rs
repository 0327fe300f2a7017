//! Interactive text-to-image generator backed by the Hugging Face Inference API
//!
//! Keeps a bounded, most-recent-first history of generated images per session,
//! with random prompt suggestions, regeneration from past prompts, and PNG
//! downloads.

pub mod ai;
pub mod error;
pub mod export;
pub mod history;
pub mod models;
pub mod sampler;
pub mod session;
pub mod shell;
pub mod workflow;

pub use error::{Error, GenerationError, Result};
