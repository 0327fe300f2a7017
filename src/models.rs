//! Data models and configuration
//!
//! Defines the generation record kept in history and the environment-driven
//! application configuration.

use crate::ai::huggingface::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// One completed generation. Immutable once built.
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    id: Uuid,
    image: Arc<[u8]>,
    prompt: String,
    negative_prompt: Option<String>,
    created_at: DateTime<Local>,
}

impl GenerationRecord {
    /// Build a record for a finished generation.
    ///
    /// `prompt` must be the trimmed, non-empty text that was sent to the
    /// service. `GenerationWorkflow::generate` guarantees this; other callers
    /// are checked in debug builds.
    pub fn new(
        image: Vec<u8>,
        prompt: String,
        negative_prompt: Option<String>,
        created_at: DateTime<Local>,
    ) -> Self {
        debug_assert!(
            !prompt.is_empty() && prompt.trim() == prompt,
            "generation record prompt must be trimmed and non-empty"
        );
        Self {
            id: Uuid::new_v4(),
            image: image.into(),
            prompt,
            negative_prompt,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Encoded image bytes as returned by the service.
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn negative_prompt(&self) -> Option<&str> {
        self.negative_prompt.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Short timestamp for gallery captions, e.g. `01/02 03:04 AM`.
    pub fn caption_time(&self) -> String {
        self.created_at.format("%m/%d %I:%M %p").to_string()
    }
}

pub const TOKEN_SETUP_HELP: &str = "Setup Instructions:
  1. Go to https://huggingface.co/settings/tokens
  2. Create a new token with 'Write' permissions
  3. Create a `.env` file in the project directory
  4. Add your token: HUGGINGFACE_TOKEN=your_token_here
  5. Restart the application";

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub huggingface_token: Option<String>,
    pub model: String,
    pub inference_url: String,
    pub timeout: Duration,
    pub dry_run: bool,
    pub download_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Call [`Config::validate`]
    /// once command-line overrides have been applied.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let dry_run = non_empty("DRY_RUN")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let timeout_secs = match non_empty("HF_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    crate::Error::Config(format!(
                        "HF_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => 120,
        };

        Ok(Self {
            huggingface_token: non_empty("HUGGINGFACE_TOKEN"),
            model: non_empty("HF_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            inference_url: non_empty("HF_INFERENCE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            dry_run,
            download_dir: non_empty("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("downloads")),
        })
    }

    /// A token is only needed when talking to the real service.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.dry_run && self.huggingface_token.is_none() {
            return Err(crate::Error::Config(format!(
                "HuggingFace API token not found (HUGGINGFACE_TOKEN)\n{}",
                TOKEN_SETUP_HELP
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults_with_token() {
        let config = Config::from_lookup(lookup_from(&[("HUGGINGFACE_TOKEN", "hf_abc")])).unwrap();

        assert_eq!(config.huggingface_token.as_deref(), Some("hf_abc"));
        assert_eq!(config.model, "black-forest-labs/FLUX.1-schnell");
        assert_eq!(config.inference_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(!config.dry_run);
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn test_config_requires_token_unless_dry_run() {
        let mut config = Config::from_lookup(lookup_from(&[])).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("HUGGINGFACE_TOKEN"));
        assert!(err.to_string().contains("Setup Instructions"));

        config.dry_run = true;
        assert!(config.validate().is_ok());

        let config = Config::from_lookup(lookup_from(&[("DRY_RUN", "true")])).unwrap();
        assert!(config.dry_run);
        assert!(config.huggingface_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_blank_token_counts_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("HUGGINGFACE_TOKEN", "   ")])).unwrap();
        assert!(config.huggingface_token.is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HUGGINGFACE_TOKEN", "hf_abc"),
            ("HF_MODEL", "stabilityai/stable-diffusion-xl-base-1.0"),
            ("HF_INFERENCE_URL", "http://localhost:9000"),
            ("HF_TIMEOUT_SECS", "30"),
            ("DOWNLOAD_DIR", "/tmp/images"),
        ]))
        .unwrap();

        assert_eq!(config.model, "stabilityai/stable-diffusion-xl-base-1.0");
        assert_eq!(config.inference_url, "http://localhost:9000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/images"));
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        for raw in ["zero", "0", "-5"] {
            let err = Config::from_lookup(lookup_from(&[
                ("HUGGINGFACE_TOKEN", "hf_abc"),
                ("HF_TIMEOUT_SECS", raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)));
        }
    }

    #[test]
    fn test_record_accessors_and_caption() {
        let created_at = Local.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();
        let record = GenerationRecord::new(
            vec![1, 2, 3],
            "a cat".to_string(),
            Some("blurry".to_string()),
            created_at,
        );

        assert_eq!(record.image(), &[1, 2, 3]);
        assert_eq!(record.prompt(), "a cat");
        assert_eq!(record.negative_prompt(), Some("blurry"));
        assert_eq!(record.created_at(), created_at);
        assert_eq!(record.caption_time(), "01/02 03:04 PM");
    }

    #[test]
    fn test_records_get_distinct_ids() {
        let now = Local::now();
        let a = GenerationRecord::new(vec![], "a".to_string(), None, now);
        let b = GenerationRecord::new(vec![], "a".to_string(), None, now);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    #[should_panic(expected = "trimmed and non-empty")]
    #[cfg(debug_assertions)]
    fn test_record_rejects_empty_prompt() {
        GenerationRecord::new(vec![1], "   ".to_string(), None, Local::now());
    }
}
