//! Classification of remote generation failures.
//!
//! The inference service reports errors as free text (an HTTP status line plus
//! a body such as `{"error":"Model ... is currently loading"}`), so the text is
//! inspected here and nowhere else.

use crate::error::GenerationError;

/// Tagged outcome of a failed remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceFailure {
    Unauthorized,
    RateLimited,
    Loading,
    /// The service rejected the negative prompt parameter.
    UnsupportedParameter,
    Unknown(String),
}

const UNSUPPORTED_MARKERS: &[&str] = &[
    "unexpected",
    "not supported",
    "unsupported",
    "unknown",
    "unrecognized",
];

impl ServiceFailure {
    /// Classify a failure signal. `negative_supplied` says whether the failed
    /// request carried a negative prompt; only then can the failure be an
    /// unsupported-parameter rejection.
    pub fn classify(signal: &str, negative_supplied: bool) -> Self {
        let lower = signal.to_lowercase();

        if lower.contains("401") || lower.contains("unauthorized") {
            Self::Unauthorized
        } else if lower.contains("429") || lower.contains("rate limit") {
            Self::RateLimited
        } else if lower.contains("503") || lower.contains("loading") {
            Self::Loading
        } else if negative_supplied
            && lower.contains("negative_prompt")
            && UNSUPPORTED_MARKERS.iter().any(|m| lower.contains(m))
        {
            Self::UnsupportedParameter
        } else {
            Self::Unknown(signal.to_string())
        }
    }
}

impl From<ServiceFailure> for GenerationError {
    fn from(failure: ServiceFailure) -> Self {
        match failure {
            ServiceFailure::Unauthorized => Self::Unauthorized,
            ServiceFailure::RateLimited => Self::RateLimited,
            ServiceFailure::Loading => Self::ServiceLoading,
            ServiceFailure::UnsupportedParameter => Self::UnsupportedParameter,
            ServiceFailure::Unknown(message) => Self::Unknown(message),
        }
    }
}
