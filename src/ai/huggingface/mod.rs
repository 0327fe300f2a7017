pub mod client;
pub mod image;
pub mod types;

pub use client::{HuggingFaceHttpClient, DEFAULT_BASE_URL};
pub use image::{HuggingFaceImageClient, DEFAULT_MODEL};
