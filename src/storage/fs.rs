//! Filesystem-backed blob store: one directory per container

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{BlobStore, ContainerStatus};
use crate::error::{PipelineError, Result};

/// Blob store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn container_dir(&self, container: &str) -> Result<PathBuf> {
        if !is_plain_relative(Path::new(container)) || container.contains('/') {
            return Err(store_error(container, "", "invalid container name"));
        }
        Ok(self.root.join(container))
    }

    fn object_path(&self, container: &str, object: &str) -> Option<PathBuf> {
        let dir = self.container_dir(container).ok()?;
        is_plain_relative(Path::new(object)).then(|| dir.join(object))
    }
}

/// Only normal components: no root, no `..`, not empty
fn is_plain_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn store_error(container: &str, object: &str, message: impl ToString) -> PipelineError {
    PipelineError::Store {
        container: container.to_string(),
        object: object.to_string(),
        message: message.to_string(),
    }
}

impl BlobStore for FsBlobStore {
    fn fetch(&self, container: &str, object: &str) -> Result<Vec<u8>> {
        let fetch_error = |message: String| PipelineError::Fetch {
            container: container.to_string(),
            object: object.to_string(),
            message,
        };
        let path = self
            .object_path(container, object)
            .ok_or_else(|| fetch_error("invalid object path".to_string()))?;

        debug!(path = %path.display(), "fetching object");
        fs::read(&path).map_err(|e| fetch_error(e.to_string()))
    }

    fn store(&self, container: &str, object: &str, bytes: &[u8], overwrite: bool) -> Result<()> {
        let path = self
            .object_path(container, object)
            .ok_or_else(|| store_error(container, object, "invalid object path"))?;

        if !overwrite && path.exists() {
            return Err(store_error(container, object, "object already exists"));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| store_error(container, object, e))?;
        }

        debug!(path = %path.display(), bytes = bytes.len(), "storing object");
        fs::write(&path, bytes).map_err(|e| store_error(container, object, e))
    }

    fn ensure_container(&self, container: &str) -> Result<ContainerStatus> {
        let dir = self.container_dir(container)?;
        fs::create_dir_all(&self.root).map_err(|e| store_error(container, "", e))?;
        match fs::create_dir(&dir) {
            Ok(()) => Ok(ContainerStatus::Created),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => {
                Ok(ContainerStatus::AlreadyExists)
            }
            Err(e) => Err(store_error(container, "", e)),
        }
    }
}
