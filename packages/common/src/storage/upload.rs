use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::error::StorageError;

/// Image extensions accepted for identification uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Returns the lowercased extension of `filename` when it is an accepted image type.
///
/// The extension is whatever follows the last `.`; the check is case-insensitive.
pub fn image_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

pub fn is_allowed_image(filename: &str) -> bool {
    image_extension(filename).is_some()
}

/// Scratch-directory store for uploaded images awaiting recognition.
///
/// Files are named `temp_{local timestamp}_{random token}.{ext}` and opened
/// with `create_new`, so concurrent requests never share or overwrite a path.
pub struct TempUploadStore {
    base_path: PathBuf,
    max_size: u64,
}

impl TempUploadStore {
    /// Create the store, creating `base_path` if it does not exist.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn temp_path(&self, ext: &str) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.base_path
            .join(format!("temp_{stamp}_{}.{ext}", &token[..12]))
    }

    /// Write `data` to a freshly generated path.
    ///
    /// The returned [`StoredUpload`] owns the file: it is deleted by
    /// [`StoredUpload::release`], or on drop if the request is abandoned.
    pub async fn store(&self, data: &[u8], extension: &str) -> Result<StoredUpload, StorageError> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(StorageError::UnsupportedExtension(extension.to_string()));
        }

        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let path = self.temp_path(&ext);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let written = async {
            file.write_all(data).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }

        debug!(path = %path.display(), size = data.len(), "Stored upload");
        Ok(StoredUpload {
            path,
            released: false,
        })
    }
}

/// A temp upload on disk, removed exactly once.
#[must_use = "dropping a StoredUpload deletes the file"]
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
    released: bool,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. Failures are logged, never returned.
    pub async fn release(mut self) {
        self.released = true;
        log_removal(&self.path, fs::remove_file(&self.path).await);
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        if !self.released {
            // Drop cannot await.
            log_removal(&self.path, std::fs::remove_file(&self.path));
        }
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => debug!(path = %path.display(), "Released upload"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Upload already gone");
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Temp file deletion failed");
        }
    }
}
