//! Per-day cache of derived SigV4 signing keys.

use std::collections::HashMap;
use std::sync::RwLock;

/// Signing keys keyed by access key, region, service and date.
///
/// Keys are only valid for their date stamp, so a new day simply misses the
/// cache; [`SigningKeyCache::retain_date`] drops the stale entries.
#[derive(Default)]
pub struct SigningKeyCache {
    keys: RwLock<HashMap<String, Vec<u8>>>,
}

impl SigningKeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn cache_key(access_key_id: &str, region: &str, service: &str, date_stamp: &str) -> String {
        format!("{}:{}:{}:{}", access_key_id, region, service, date_stamp)
    }

    pub fn get(&self, access_key_id: &str, region: &str, service: &str, date_stamp: &str) -> Option<Vec<u8>> {
        let keys = self.keys.read().ok()?;
        keys.get(&Self::cache_key(access_key_id, region, service, date_stamp))
            .cloned()
    }

    pub fn put(
        &self,
        access_key_id: &str,
        region: &str,
        service: &str,
        date_stamp: &str,
        signing_key: Vec<u8>,
    ) {
        if let Ok(mut keys) = self.keys.write() {
            keys.insert(
                Self::cache_key(access_key_id, region, service, date_stamp),
                signing_key,
            );
        }
    }

    /// Drop every entry not derived for `date_stamp`.
    pub fn retain_date(&self, date_stamp: &str) {
        let suffix = format!(":{}", date_stamp);
        if let Ok(mut keys) = self.keys.write() {
            keys.retain(|k, _| k.ends_with(&suffix));
        }
    }

    pub fn len(&self) -> usize {
        self.keys.read().map(|k| k.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SigningKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyCache")
            .field("entries", &self.len())
            .finish()
    }
}
