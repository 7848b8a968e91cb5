use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use super::state::{StateError, load_document, persist_document};
use crate::types::{CacheDocument, CachedFileReference};

/// The two independent halves of the file reference cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Silent documents registered for inline results.
    Placeholder,
    /// Real audio uploaded after a result was chosen.
    Final,
}

/// Track id to uploaded document cache, persisted as one JSON document.
///
/// Entries are never evicted. A miss is normal and means the caller has to
/// upload. Call [`ContentCache::persist`] right after every [`ContentCache::put`].
pub struct ContentCache {
    path: PathBuf,
    document: Mutex<CacheDocument>,
}

impl ContentCache {
    pub fn new(path: PathBuf, document: CacheDocument) -> Self {
        ContentCache {
            path,
            document: Mutex::new(document),
        }
    }

    pub async fn load(path: &Path) -> Result<Self, StateError> {
        let document = load_document(path).await?;
        Ok(Self::new(path.to_path_buf(), document))
    }

    pub async fn get(&self, namespace: Namespace, track_id: &str) -> Option<CachedFileReference> {
        let document = self.document.lock().await;
        Self::map(&document, namespace).get(track_id).cloned()
    }

    pub async fn put(&self, namespace: Namespace, track_id: &str, reference: CachedFileReference) {
        let mut document = self.document.lock().await;
        match namespace {
            Namespace::Placeholder => document.inline_docs.insert(track_id.to_string(), reference),
            Namespace::Final => document.sent_docs.insert(track_id.to_string(), reference),
        };
    }

    /// Drops an entry the platform no longer accepts.
    pub async fn remove(&self, namespace: Namespace, track_id: &str) -> Option<CachedFileReference> {
        let mut document = self.document.lock().await;
        match namespace {
            Namespace::Placeholder => document.inline_docs.remove(track_id),
            Namespace::Final => document.sent_docs.remove(track_id),
        }
    }

    /// Rewrites the whole cache document.
    pub async fn persist(&self) -> Result<(), StateError> {
        // held across the write so snapshots land on disk in order
        let document = self.document.lock().await;
        persist_document(&self.path, &*document).await
    }

    pub async fn len(&self, namespace: Namespace) -> usize {
        let document = self.document.lock().await;
        Self::map(&document, namespace).len()
    }

    fn map(
        document: &CacheDocument,
        namespace: Namespace,
    ) -> &std::collections::HashMap<String, CachedFileReference> {
        match namespace {
            Namespace::Placeholder => &document.inline_docs,
            Namespace::Final => &document.sent_docs,
        }
    }
}
