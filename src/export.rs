//! PNG download artifacts
//!
//! Every history record can be exported as a PNG named after its creation
//! time. Images the service already returned as PNG are passed through
//! untouched; other formats are decoded and re-encoded.

use crate::ai::mime::is_png;
use crate::models::GenerationRecord;
use crate::{Error, Result};
use chrono::{DateTime, TimeZone};
use image::ImageFormat;
use std::fmt;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

pub const PNG_MIME: &str = "image/png";

/// `ai_generated_<YYYYMMDD_HHMMSS>.png`
pub fn download_filename<Tz: TimeZone>(created_at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("ai_generated_{}.png", created_at.format("%Y%m%d_%H%M%S"))
}

/// Encode `bytes` as PNG, reusing them when they already are.
pub fn encode_png(bytes: &[u8]) -> Result<Vec<u8>> {
    if is_png(bytes) {
        return Ok(bytes.to_vec());
    }

    let img = image::load_from_memory(bytes)?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    pub async fn from_record(record: &GenerationRecord) -> Result<Self> {
        let filename = download_filename(&record.created_at());
        let image = record.image().to_vec();

        let bytes = if is_png(&image) {
            image
        } else {
            tokio::task::spawn_blocking(move || encode_png(&image))
                .await
                .map_err(|e| Error::Invariant(format!("PNG encoding task join error: {}", e)))??
        };

        Ok(Self {
            filename,
            mime: PNG_MIME,
            bytes,
        })
    }

    /// Write the artifact into `dir`, creating it if needed.
    ///
    /// Existing files are never replaced. When `filename` is taken, a
    /// `_1`, `_2`, ... suffix is added before the extension. Returns the
    /// path actually written.
    pub async fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;

        let (stem, ext) = match self.filename.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (self.filename.as_str(), String::new()),
        };

        let mut attempt = 0usize;
        loop {
            let path = if attempt == 0 {
                dir.join(&self.filename)
            } else {
                dir.join(format!("{}_{}{}", stem, attempt, ext))
            };

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&self.bytes).await?;
                    file.flush().await?;
                    tracing::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!("{} already exists, trying next suffix", path.display());
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
