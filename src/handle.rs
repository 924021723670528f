//! Scoped display handles for packaged books.
//!
//! A reading view does not hold the package bytes directly; it asks a
//! [`BlobRegistry`] for a dereferenceable URL, the way a browser hands out
//! object URLs. The [`BlobHandle`] returned owns that URL and revokes it when
//! dropped, so every exit path of the view (close, navigation away, error)
//! releases the buffer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::debug;
use uuid::Uuid;

use crate::book::PackageBuffer;

type Entries = Mutex<HashMap<String, Blob>>;

/// Bytes plus declared media type, shared with whoever resolves the URL.
#[derive(Debug, Clone)]
pub struct Blob {
    pub media_type: &'static str,
    pub data: Arc<[u8]>,
}

/// Issues and resolves `blob:` URLs for packaged books.
#[derive(Debug, Clone, Default)]
pub struct BlobRegistry {
    entries: Arc<Entries>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `book` addressable until the returned handle is dropped.
    pub fn register(&self, book: &PackageBuffer) -> BlobHandle {
        let url = format!("blob:folio/{}", Uuid::new_v4());
        let blob = Blob {
            media_type: book.media_type(),
            data: Arc::from(book.as_bytes()),
        };
        lock(&self.entries).insert(url.clone(), blob);
        debug!("registered {} ({} bytes)", url, book.len());

        BlobHandle {
            url,
            entries: Arc::downgrade(&self.entries),
        }
    }

    /// Look up a live URL.
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        lock(&self.entries).get(url).cloned()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A live `blob:` URL. Revoked on drop.
#[derive(Debug)]
pub struct BlobHandle {
    url: String,
    entries: Weak<Entries>,
}

impl BlobHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Revoke the URL now rather than at end of scope.
    pub fn release(self) {}
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        // The registry may already be gone; nothing left to revoke then.
        if let Some(entries) = self.entries.upgrade() {
            lock(&entries).remove(&self.url);
            debug!("revoked {}", self.url);
        }
    }
}

/// A panic while holding the lock cannot leave the map half-updated, so a
/// poisoned lock is still usable.
fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<String, Blob>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}
