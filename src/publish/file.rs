use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::{ESTIMATE_SIZE, EstimateRegister, PublishError, check_finite};

/// File-backed register
///
/// The estimate is stored as 8 little-endian bytes. Each publish writes a
/// temp file next to the target, syncs it and renames it into place, so a
/// concurrent reader sees either the old file or the new one.
#[derive(Debug, Clone)]
pub struct FileRegister {
    path: PathBuf,
}

impl FileRegister {
    /// Create a register backed by `path`
    ///
    /// Nothing is touched on disk until the first publish.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the record
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(path: &Path, value: f64) -> Result<(), PublishError> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)?;
        temp.write_all(&value.to_le_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| PublishError::Io(e.error))?;

        // Make the rename itself durable.
        #[cfg(unix)]
        std::fs::File::open(&parent)?.sync_all()?;

        Ok(())
    }
}

#[async_trait]
impl EstimateRegister for FileRegister {
    async fn publish(&self, value: f64) -> Result<(), PublishError> {
        check_finite(value)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::write_atomic(&path, value))
            .await
            .map_err(|e| PublishError::Io(std::io::Error::other(e)))?
    }

    async fn read(&self) -> Result<f64, PublishError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PublishError::NotPublished);
            }
            Err(e) => return Err(e.into()),
        };

        let raw: [u8; ESTIMATE_SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| PublishError::Corrupt { len: bytes.len() })?;
        Ok(f64::from_le_bytes(raw))
    }
}
