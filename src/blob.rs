//! Process-wide registry of in-memory blobs backing preview URIs.
//!
//! A [`PreviewHandle`] is the only way to create an entry, and dropping the
//! handle revokes it, so the registry never outlives the file it shows.

use crate::constants::BLOB_URI_PREFIX;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Bytes registered under a preview URI.
#[derive(Debug, Clone)]
pub struct Blob {
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl Blob {
    /// Inline `data:` URI, used where the blob scheme cannot be resolved.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    blobs: HashMap<u64, Blob>,
}

/// Shared handle to a blob table. Clones refer to the same table.
#[derive(Clone, Default)]
pub struct BlobRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    pub fn global() -> BlobRegistry {
        static GLOBAL: OnceLock<BlobRegistry> = OnceLock::new();
        GLOBAL.get_or_init(BlobRegistry::new).clone()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `bytes` and returns the handle that owns the entry.
    pub fn create(&self, media_type: &str, bytes: Arc<[u8]>) -> PreviewHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.blobs.insert(
            id,
            Blob {
                media_type: media_type.to_string(),
                bytes,
            },
        );
        tracing::debug!("Registered preview blob {} ({} live)", id, inner.blobs.len());

        PreviewHandle {
            id,
            uri: format!("{}{}", BLOB_URI_PREFIX, id),
            registry: self.clone(),
        }
    }

    /// Looks up a live blob by its URI.
    pub fn resolve(&self, uri: &str) -> Option<Blob> {
        let id = uri.strip_prefix(BLOB_URI_PREFIX)?.parse::<u64>().ok()?;
        self.lock().blobs.get(&id).cloned()
    }

    /// Number of entries not yet revoked.
    pub fn live_count(&self) -> usize {
        self.lock().blobs.len()
    }

    fn revoke(&self, id: u64) {
        let mut inner = self.lock();
        if inner.blobs.remove(&id).is_some() {
            tracing::debug!("Revoked preview blob {} ({} live)", id, inner.blobs.len());
        }
    }
}

impl std::fmt::Debug for BlobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owning reference to one registry entry; revoked on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    uri: String,
    registry: BlobRegistry,
}

impl PreviewHandle {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn resolve(&self) -> Option<Blob> {
        self.registry.resolve(&self.uri)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(self.id);
    }
}
