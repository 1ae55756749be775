//! Saved reference images for near-image queries
//!
//! Uploaded images are written to the uploads directory before encoding, so
//! the search payload is always the base64 of the bytes on disk.

use base64::Engine;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::{Error, Result};

/// Store for uploaded reference images
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create the store, ensuring the uploads directory exists
    pub fn new(config: &UploadConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.dir).map_err(|e| {
            Error::Config(format!(
                "Failed to create uploads directory {}: {}",
                config.dir.display(),
                e
            ))
        })?;
        Ok(Self {
            dir: config.dir.clone(),
        })
    }

    /// Whether a filename is an accepted reference image type (jpg/jpeg/png)
    pub fn is_supported(filename: &str) -> bool {
        match mime_guess::from_path(filename).first() {
            Some(mime) => mime == mime_guess::mime::IMAGE_JPEG || mime == mime_guess::mime::IMAGE_PNG,
            None => false,
        }
    }

    /// Save an upload under a collision-free name, returning the saved path
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        // Strip any path components a client might smuggle in
        let base = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("upload_{}.jpg", Uuid::new_v4()));

        let path = self.dir.join(format!("{}_{}", Uuid::new_v4(), base));
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Saved reference image to {}", path.display());
        Ok(path)
    }

    /// Read a saved image back and base64-encode its bytes for the wire
    pub async fn read_base64(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}
