//! In-memory blob store for tests and dry runs

use std::sync::{Mutex, MutexGuard};

use rustc_hash::{FxHashMap, FxHashSet};

use super::{BlobStore, ContainerStatus};
use crate::error::{PipelineError, Result};

#[derive(Debug, Default)]
struct Inner {
    containers: FxHashSet<String>,
    objects: FxHashMap<(String, String), Vec<u8>>,
}

/// Blob store holding every object in memory
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    inner: Mutex<Inner>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object, creating its container
    pub fn insert(&self, container: &str, object: &str, bytes: impl Into<Vec<u8>>) {
        let mut inner = self.lock();
        inner.containers.insert(container.to_string());
        inner
            .objects
            .insert((container.to_string(), object.to_string()), bytes.into());
    }

    /// Read an object back as text, if present and valid UTF-8
    pub fn get_text(&self, container: &str, object: &str) -> Option<String> {
        let inner = self.lock();
        inner
            .objects
            .get(&(container.to_string(), object.to_string()))
            .and_then(|b| String::from_utf8(b.clone()).ok())
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.lock().containers.contains(container)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BlobStore for MemoryBlobStore {
    fn fetch(&self, container: &str, object: &str) -> Result<Vec<u8>> {
        self.lock()
            .objects
            .get(&(container.to_string(), object.to_string()))
            .cloned()
            .ok_or_else(|| PipelineError::Fetch {
                container: container.to_string(),
                object: object.to_string(),
                message: "object not found".to_string(),
            })
    }

    fn store(&self, container: &str, object: &str, bytes: &[u8], overwrite: bool) -> Result<()> {
        let mut inner = self.lock();
        let store_error = |message: &str| PipelineError::Store {
            container: container.to_string(),
            object: object.to_string(),
            message: message.to_string(),
        };
        if !inner.containers.contains(container) {
            return Err(store_error("container does not exist"));
        }
        let key = (container.to_string(), object.to_string());
        if !overwrite && inner.objects.contains_key(&key) {
            return Err(store_error("object already exists"));
        }
        inner.objects.insert(key, bytes.to_vec());
        Ok(())
    }

    fn ensure_container(&self, container: &str) -> Result<ContainerStatus> {
        if self.lock().containers.insert(container.to_string()) {
            Ok(ContainerStatus::Created)
        } else {
            Ok(ContainerStatus::AlreadyExists)
        }
    }
}
