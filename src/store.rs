use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::foundation::error::{AvatrError, AvatrResult};

/// Content type used for every rendered asset.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Rendered assets never change once written; clients may cache them for a
/// week.
pub const IMMUTABLE_CACHE: &str = "public, max-age=604800, immutable";

/// The three object-store operations the pipeline needs. No listing,
/// versioning, or deletion.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn exists(&self, key: &str) -> AvatrResult<bool>;

    /// Fetch an object's bytes. A missing object is a `Storage` error.
    async fn get(&self, key: &str) -> AvatrResult<Vec<u8>>;

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> AvatrResult<()>;
}

/// One stored object with its serving metadata.
#[derive(Clone, Debug)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub cache_control: String,
}

/// In-process store backed by a map. Used by tests and as a scratch store.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the trait (fixture helper).
    pub fn insert(&self, key: &str, bytes: Vec<u8>) {
        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: String::new(),
                cache_control: String::new(),
            },
        );
    }

    /// Snapshot of one object, if present.
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn exists(&self, key: &str) -> AvatrResult<bool> {
        Ok(self.objects.lock().contains_key(key))
    }

    async fn get(&self, key: &str) -> AvatrResult<Vec<u8>> {
        self.objects
            .lock()
            .get(key)
            .map(|o| o.bytes.clone())
            .ok_or_else(|| AvatrError::storage(format!("no object at `{key}`")))
    }

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> AvatrResult<()> {
        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                cache_control: cache_control.to_string(),
            },
        );
        Ok(())
    }
}

/// Store backed by a local directory tree. Keys map to relative paths under
/// the root; serving metadata has nowhere to live on a filesystem and is
/// dropped.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> AvatrResult<PathBuf> {
        Ok(self.root.join(normalize_key(key)?))
    }
}

#[async_trait]
impl ObjectStore for DirStore {
    async fn exists(&self, key: &str) -> AvatrResult<bool> {
        let path = self.resolve(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| AvatrError::storage(format!("probe of `{key}` failed: {e}")))
    }

    async fn get(&self, key: &str) -> AvatrResult<Vec<u8>> {
        let path = self.resolve(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| AvatrError::storage(format!("read of `{key}` failed: {e}")))
    }

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
        _cache_control: &str,
    ) -> AvatrResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AvatrError::storage(format!("mkdir for `{key}` failed: {e}")))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AvatrError::storage(format!("write of `{key}` failed: {e}")))
    }
}

/// Normalize and validate store keys used as relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
fn normalize_key(key: &str) -> AvatrResult<String> {
    let s = key.replace('\\', "/");
    if s.starts_with('/') {
        return Err(AvatrError::storage("store keys must be relative"));
    }
    if s.is_empty() {
        return Err(AvatrError::storage("store key must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(AvatrError::storage("store keys must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(AvatrError::storage("store key must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../tests/unit/store.rs"]
mod tests;
