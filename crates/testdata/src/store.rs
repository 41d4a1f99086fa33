//! JSON fixture persistence
//!
//! Fixtures live at `<root>/<category>/<name>.json`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{DataError, DataResult};

/// Where generated fixtures are written and read back from
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Write `value` at the relative `path`, creating parent directories
    async fn write(&self, path: &Path, value: &serde_json::Value) -> DataResult<()>;

    /// Read the JSON document at the relative `path`
    async fn read(&self, path: &Path) -> DataResult<serde_json::Value>;

    /// Remove the document at the relative `path`; missing files are not an error
    async fn remove(&self, path: &Path) -> DataResult<()>;
}

/// Relative path of a fixture within a store
pub fn fixture_path(category: &str, name: &str) -> DataResult<PathBuf> {
    validate_component(category)?;
    validate_component(name)?;
    Ok(PathBuf::from(category).join(format!("{}.json", name)))
}

fn validate_component(part: &str) -> DataResult<()> {
    if part.is_empty()
        || part == "."
        || part == ".."
        || part.contains(|c: char| c == '/' || c == '\\')
        || part.contains('\0')
    {
        return Err(DataError::InvalidPath(part.to_string()));
    }
    Ok(())
}

/// Filesystem-backed store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root path of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl DataStore for FileStore {
    async fn write(&self, path: &Path, value: &serde_json::Value) -> DataResult<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_vec_pretty(value)?;

        // Atomic write: temp file then rename
        let tmp = full.with_extension("json.tmp");
        fs::write(&tmp, &content).await?;
        fs::rename(&tmp, &full).await?;

        info!("Wrote fixture {:?} ({} bytes)", full, content.len());
        Ok(())
    }

    async fn read(&self, path: &Path) -> DataResult<serde_json::Value> {
        let full = self.resolve(path);
        let content = match fs::read(&full).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!("Read fixture {:?}", full);
        Ok(serde_json::from_slice(&content)?)
    }

    async fn remove(&self, path: &Path) -> DataResult<()> {
        let full = self.resolve(path);
        match fs::remove_file(&full).await {
            Ok(()) => {
                debug!("Removed fixture {:?}", full);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
