//! Revocable handles for locally-held media.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// File extensions the service accepts.
const ALLOWED_EXTENSIONS: &[&str] = &["mp4"];

/// A revocable reference to locally-held binary media: a user-selected
/// input or a downloaded result.
///
/// The content lives in a managed scratch file. Clones share the backing
/// file; [`revoke`](Self::revoke) releases it exactly once and
/// invalidates every clone. Dropping the last clone releases the file as
/// a fallback, so a handle can never leak past its owner.
#[derive(Debug, Clone)]
pub struct MediaHandle {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    revoked: AtomicBool,
}

impl MediaHandle {
    /// Import a user-selected file into a managed copy.
    ///
    /// Validates the source before touching the filesystem: it must
    /// exist, be non-empty, and carry a supported extension.
    pub async fn import(source: impl AsRef<Path>) -> ClientResult<Self> {
        let source = source.as_ref();

        let metadata = tokio::fs::metadata(source).await.map_err(|_| {
            ClientError::InvalidInput(format!("file not found: {}", source.display()))
        })?;
        if metadata.len() == 0 {
            return Err(ClientError::InvalidInput(format!(
                "file is empty: {}",
                source.display()
            )));
        }
        if !is_supported_video(source) {
            return Err(ClientError::InvalidInput(format!(
                "unsupported video file type: {}",
                source.display()
            )));
        }

        let path = scratch_path("input");
        tokio::fs::copy(source, &path).await?;
        debug!("Imported {} as {}", source.display(), path.display());
        Ok(Self::from_managed(path))
    }

    /// Wrap already-fetched bytes (a downloaded result) in a handle.
    pub async fn from_bytes(label: &str, bytes: &[u8]) -> ClientResult<Self> {
        let path = scratch_path(label);
        tokio::fs::write(&path, bytes).await?;
        Ok(Self::from_managed(path))
    }

    fn from_managed(path: PathBuf) -> Self {
        Self {
            inner: Arc::new(Inner {
                path,
                revoked: AtomicBool::new(false),
            }),
        }
    }

    /// Path to the backing file, `None` once revoked.
    pub fn path(&self) -> Option<&Path> {
        if self.is_revoked() {
            None
        } else {
            Some(&self.inner.path)
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.inner.revoked.load(Ordering::Acquire)
    }

    /// Whether two handles share the same backing file.
    pub fn shares_backing(&self, other: &MediaHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Release the backing file.
    ///
    /// Idempotent and infallible: the first call removes the file (a
    /// removal failure is logged and ignored), later calls are no-ops.
    pub fn revoke(&self) {
        if !self.inner.revoked.swap(true, Ordering::AcqRel) {
            if let Err(e) = std::fs::remove_file(&self.inner.path) {
                debug!("Ignoring failed removal of {}: {}", self.inner.path.display(), e);
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if !self.revoked.swap(true, Ordering::AcqRel) {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Check a filename against the service's extension allow-list.
pub fn is_supported_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn scratch_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("wmr-{}-{}.mp4", label, Uuid::new_v4()))
}
