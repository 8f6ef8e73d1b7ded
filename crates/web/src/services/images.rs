//! Product image ingest.
//!
//! Uploaded files are written to the image area under a generated,
//! timestamp-prefixed name (see [`StoredImageName`]). Files are opened with
//! create-new semantics so an existing image is never overwritten; a taken
//! name gets a numeric suffix instead.
//!
//! No file-type or content validation is performed. The only size bound is
//! the request body limit applied by the router.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use wfa_core::StoredImageName;

/// Highest numeric suffix tried before giving up on a name.
const MAX_SUFFIX: u32 = 1000;

/// Errors from storing an upload.
#[derive(Debug, Error)]
pub enum ImageError {
    /// No file was submitted. Callers treat this as "keep the current image".
    #[error("no file uploaded")]
    EmptyUpload,

    /// Every candidate name for this upload is already taken.
    #[error("no free file name for {0}")]
    NameExhausted(String),

    /// Filesystem error while writing the image.
    #[error("image write failed: {0}")]
    Io(#[from] io::Error),
}

/// A file part from a product form.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Filename as sent by the client. Untrusted.
    pub filename: String,
    pub bytes: Bytes,
}

impl Upload {
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// A file part without a filename means nothing was selected.
    fn is_empty(&self) -> bool {
        self.filename.trim().is_empty()
    }
}

/// The image area on disk.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory images are written to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the image area if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be created.
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Persist an upload under a freshly generated name.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::EmptyUpload` if `upload` is `None` or has no
    /// filename. Returns `ImageError::Io` if the file cannot be written.
    pub async fn store(&self, upload: Option<&Upload>) -> Result<StoredImageName, ImageError> {
        self.store_at(Utc::now(), upload).await
    }

    /// [`ImageStore::store`] with an explicit upload time.
    ///
    /// # Errors
    ///
    /// See [`ImageStore::store`].
    pub async fn store_at(
        &self,
        at: DateTime<Utc>,
        upload: Option<&Upload>,
    ) -> Result<StoredImageName, ImageError> {
        let upload = upload.filter(|u| !u.is_empty()).ok_or(ImageError::EmptyUpload)?;
        let base = StoredImageName::generate(at, &upload.filename);

        for attempt in 0..=MAX_SUFFIX {
            let name = if attempt == 0 {
                base.clone()
            } else {
                base.with_suffix(attempt)
            };
            let path = self.root.join(name.as_str());

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = write_all(&mut file, &upload.bytes).await {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(e.into());
            }

            tracing::info!(image = %name, bytes = upload.bytes.len(), "Stored product image");
            return Ok(name);
        }

        Err(ImageError::NameExhausted(base.into_inner()))
    }
}

async fn write_all(file: &mut tokio::fs::File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}
