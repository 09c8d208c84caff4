//! Uploaded image files on local disk
//!
//! Files are written to the upload directory under a random name that keeps
//! the original extension. The database row records that name and the path
//! the file is served from.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::Settings,
    error::{ApiError, ApiResult},
};

/// A file written by [`ImageStorage::save`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub filename: String,
    /// Path relative to the working directory, forward slashes
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
    dir: PathBuf,
    max_file_size: usize,
    extensions: Vec<String>,
}

impl ImageStorage {
    pub fn new(dir: impl Into<PathBuf>, max_file_size: usize, extensions: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            max_file_size,
            extensions,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.upload_dir.clone(),
            settings.max_file_size,
            settings.extensions(),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check size and extension, returning the lower-cased extension
    pub fn check(&self, original_name: &str, size: usize) -> ApiResult<String> {
        if size > self.max_file_size {
            return Err(ApiError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.max_file_size
            )));
        }

        let extension = extension_of(original_name);
        if !self.extensions.iter().any(|allowed| *allowed == extension) {
            return Err(ApiError::BadRequest(format!(
                "File type not allowed. Allowed types: {}",
                self.extensions.join(", ")
            )));
        }

        Ok(extension)
    }

    /// Validate and write an upload under a fresh name
    pub async fn save(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> ApiResult<StoredFile> {
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        let extension = self.check(original_name, bytes.len())?;

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            anyhow::anyhow!("Failed to create upload directory {:?}: {}", self.dir, e)
        })?;

        let filename = format!("{}{}", Uuid::new_v4(), extension);
        let path = self.dir.join(&filename);
        fs::write(&path, bytes)
            .await
            .map_err(|e| anyhow::anyhow!("Error saving file: {}", e))?;

        info!("Stored upload {} ({} bytes)", filename, bytes.len());

        let mime_type = content_type
            .filter(|ct| ct.starts_with("image/"))
            .map(str::to_string)
            .unwrap_or_else(|| mime_for(&extension).to_string());

        Ok(StoredFile {
            file_path: path.to_string_lossy().replace('\\', "/"),
            filename,
            file_size: bytes.len() as i64,
            mime_type,
        })
    }

    /// Remove a stored file; failures are logged and otherwise ignored
    pub async fn remove(&self, filename: &str) {
        // Only bare names produced by `save` are accepted
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
            warn!("Refusing to delete suspicious file name {:?}", filename);
            return;
        }

        match fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => info!("Deleted upload {}", filename),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Error deleting file {}: {}", filename, e),
        }
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn mime_for(extension: &str) -> &'static str {
    match extension {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
