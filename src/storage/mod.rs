//! Blob storage collaborator

mod fs;
mod memory;

use crate::error::Result;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

/// Outcome of an idempotent container create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    AlreadyExists,
}

/// Address of one object inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef<'a> {
    pub container: &'a str,
    pub object: &'a str,
}

impl<'a> ObjectRef<'a> {
    pub const fn new(container: &'a str, object: &'a str) -> Self {
        Self { container, object }
    }
}

impl std::fmt::Display for ObjectRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.container, self.object)
    }
}

/// Blob store operations the pipelines rely on.
///
/// Implementations must be shareable across concurrently running pipelines.
pub trait BlobStore: Send + Sync {
    /// Read an object's raw bytes
    fn fetch(&self, container: &str, object: &str) -> Result<Vec<u8>>;

    /// Write an object, replacing any existing content when `overwrite` is set
    fn store(&self, container: &str, object: &str, bytes: &[u8], overwrite: bool) -> Result<()>;

    /// Create a container if it does not exist yet
    fn ensure_container(&self, container: &str) -> Result<ContainerStatus>;
}
