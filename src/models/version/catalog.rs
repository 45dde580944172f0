use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::types::PhpbbVersion;
use crate::store::{StoreResult, VersionCatalog, VersionTagStore};

/// Version catalog cached in process, loaded lazily from the tag store.
#[derive(Clone)]
pub struct CachedVersionCatalog {
    tags: Arc<dyn VersionTagStore>,
    cache: Arc<Mutex<Option<BTreeMap<String, String>>>>,
}

impl CachedVersionCatalog {
    pub fn new(tags: Arc<dyn VersionTagStore>) -> Self {
        Self {
            tags,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}

#[async_trait]
impl VersionCatalog for CachedVersionCatalog {
    async fn versions(&self) -> StoreResult<BTreeMap<String, String>> {
        let cached = self.cache.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(cached) = cached {
            return Ok(cached);
        }

        // Lock is not held across the query; a concurrent loader just repeats it.
        let loaded: BTreeMap<String, String> = self
            .tags
            .known_versions()
            .await?
            .into_iter()
            .map(|(branch, point)| {
                let v = PhpbbVersion { branch, point };
                (v.catalog_key(), v.display())
            })
            .collect();

        *self.cache.lock().unwrap_or_else(|e| e.into_inner()) = Some(loaded.clone());
        log::debug!("Loaded {} platform versions into catalog", loaded.len());
        Ok(loaded)
    }

    fn invalidate(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if cache.take().is_some() {
            log::info!("Platform version catalog invalidated");
        }
    }
}
