//! Load-once cache for the dependency manifest.
//!
//! One install run works against one manifest. The first successful load
//! fills the cache for the lifetime of the [`ManifestCache`]; later loads
//! return that document without fetching, whatever location they name. A
//! failed load leaves the cache empty.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::manifest::Manifest;

#[derive(Debug)]
struct Loaded {
    location: String,
    manifest: Arc<Manifest>,
}

/// Process-wide manifest cache, shared by reference with whoever resolves.
#[derive(Debug, Default)]
pub struct ManifestCache {
    slot: Mutex<Option<Loaded>>,
}

impl ManifestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached manifest, fetching and parsing `location` on the
    /// first call.
    ///
    /// The lock is held across the fetch so concurrent first loads cannot
    /// both populate the cache.
    pub fn load(&self, location: &str, fetcher: &dyn Fetch) -> Result<Arc<Manifest>> {
        let mut slot = self.lock();
        if let Some(loaded) = slot.as_ref() {
            if loaded.location != location {
                tracing::debug!(
                    cached = %loaded.location,
                    requested = %location,
                    "manifest already loaded, ignoring new location"
                );
            }
            return Ok(Arc::clone(&loaded.manifest));
        }

        let manifest = fetcher
            .fetch(location)
            .and_then(|bytes| Manifest::from_bytes(&bytes))
            .map_err(|e| Error::ManifestLoad {
                location: location.to_string(),
                source: Box::new(e),
            })?;
        tracing::info!(location = %location, entries = manifest.len(), "loaded dependency manifest");

        let manifest = Arc::new(manifest);
        *slot = Some(Loaded {
            location: location.to_string(),
            manifest: Arc::clone(&manifest),
        });
        Ok(manifest)
    }

    /// The cached manifest, if one has been loaded.
    pub fn get(&self) -> Option<Arc<Manifest>> {
        self.lock().as_ref().map(|l| Arc::clone(&l.manifest))
    }

    /// Location the cached manifest was loaded from.
    pub fn location(&self) -> Option<String> {
        self.lock().as_ref().map(|l| l.location.clone())
    }

    /// Whether a manifest has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Loaded>> {
        // The slot is only written after a complete parse, so a poisoned lock
        // still holds either nothing or a whole manifest
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
