//! Image store abstraction: persist uploaded bytes, hand back a locator.
//!
//! The locator is the public URL clients use to fetch the image. The
//! [`LocalImageStore`] keeps files in one directory which the HTTP layer
//! serves read-only under [`IMAGE_URL_PATH`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

/// URL path under which stored movie images are served.
pub const IMAGE_URL_PATH: &str = "/images/movies";

/// Image store error types.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The locator does not belong to this store.
    #[error("Unknown image locator: {0}")]
    UnknownLocator(String),

    #[error("Invalid image file name: {0}")]
    InvalidFileName(String),
}

pub type ImageStoreResult<T> = Result<T, ImageStoreError>;

/// Pluggable storage for uploaded movie images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `bytes` under `file_name` and return the public locator.
    async fn store(&self, file_name: &str, bytes: &[u8]) -> ImageStoreResult<String>;

    /// Remove the file behind `locator`. Removing a file that is already
    /// gone succeeds.
    async fn remove(&self, locator: &str) -> ImageStoreResult<()>;
}

/// Filesystem-backed image store.
///
/// ```text
/// {root}/
///   {uuid}_{original name}
/// ```
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    /// Base URL without trailing slash, e.g. `http://localhost:3000`.
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory the files are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locator_for(&self, file_name: &str) -> String {
        format!("{}{IMAGE_URL_PATH}/{file_name}", self.public_base_url)
    }

    /// Map a locator back to the file inside `root`.
    fn path_for(&self, locator: &str) -> ImageStoreResult<PathBuf> {
        let prefix = format!("{}{IMAGE_URL_PATH}/", self.public_base_url);
        let file_name = locator
            .strip_prefix(&prefix)
            .filter(|name| is_plain_file_name(name))
            .ok_or_else(|| ImageStoreError::UnknownLocator(locator.to_string()))?;
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> ImageStoreResult<String> {
        if !is_plain_file_name(file_name) {
            return Err(ImageStoreError::InvalidFileName(file_name.to_string()));
        }
        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(file_name), bytes).await?;
        tracing::debug!(file_name, size = bytes.len(), "Stored image file");
        Ok(self.locator_for(file_name))
    }

    async fn remove(&self, locator: &str) -> ImageStoreResult<()> {
        let path = self.path_for(locator)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A single path component that cannot climb out of the store directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
