//! Error handling and custom error types
//!
//! `Error` covers infrastructure failures (I/O, HTTP, image codecs, config).
//! `GenerationError` is the classified, user-displayable outcome of a single
//! generation attempt.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("History index {index} out of range (history holds {len} image(s))")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Classified failure of one generation attempt.
///
/// The `Display` text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Please enter a description for your image!")]
    EmptyPrompt,

    #[error(
        "Authentication Error: your API token is invalid or expired. \
         Check HUGGINGFACE_TOKEN in your .env file and make sure the token has \
         'Write' permissions (https://huggingface.co/settings/tokens)."
    )]
    Unauthorized,

    #[error(
        "Rate Limit Exceeded: you've made too many requests. \
         Wait a few minutes before trying again."
    )]
    RateLimited,

    #[error(
        "Model Loading: the model is currently loading on the server. \
         Please wait 20-30 seconds and try again."
    )]
    ServiceLoading,

    #[error("The negative prompt parameter is not supported by this model.")]
    UnsupportedParameter,

    #[error("Error Details: {0}")]
    Unknown(String),
}

impl GenerationError {
    /// Whether pressing generate again later may succeed without any change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServiceLoading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_message_is_verbatim() {
        let err = GenerationError::Unknown("boom: connection reset".to_string());
        assert!(err.to_string().contains("boom: connection reset"));
    }

    #[test]
    fn test_retryable_classes() {
        assert!(GenerationError::RateLimited.is_retryable());
        assert!(GenerationError::ServiceLoading.is_retryable());
        assert!(!GenerationError::Unauthorized.is_retryable());
        assert!(!GenerationError::EmptyPrompt.is_retryable());
        assert!(!GenerationError::Unknown(String::new()).is_retryable());
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = Error::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "History index 4 out of range (history holds 2 image(s))"
        );
    }
}
