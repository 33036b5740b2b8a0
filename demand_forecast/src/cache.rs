//! Single-flight cache for fitted models
//!
//! Re-fitting is pure, so caching is purely an optimisation. The cache is
//! keyed by (product, series fingerprint): a changed series is a new key,
//! and older entries for the same product are evicted on insert. Each key
//! carries its own fit permit, so two concurrent requests for the same
//! stale key run exactly one fit while readers of other keys are never
//! blocked behind it.

use crate::error::Result;
use retail_data::ProductId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    product: ProductId,
    fingerprint: u64,
}

#[derive(Debug)]
struct Entry<F> {
    fitted: Option<Arc<F>>,
    fit_permit: Arc<Mutex<()>>,
}

impl<F> Default for Entry<F> {
    fn default() -> Self {
        Self {
            fitted: None,
            fit_permit: Arc::new(Mutex::new(())),
        }
    }
}

/// Cache of fitted models keyed by (product, series fingerprint)
#[derive(Debug)]
pub struct FitCache<F> {
    entries: Mutex<HashMap<CacheKey, Entry<F>>>,
}

impl<F> Default for FitCache<F> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<F> FitCache<F> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached fit for the key, or run `fit` exactly once to
    /// produce it. Concurrent callers for the same key wait on the key's
    /// permit; callers for other keys proceed independently.
    pub fn get_or_fit<E>(
        &self,
        product: &str,
        fingerprint: u64,
        fit: E,
    ) -> Result<Arc<F>>
    where
        E: FnOnce() -> Result<F>,
    {
        let key = CacheKey {
            product: product.to_string(),
            fingerprint,
        };

        if let Some(fitted) = self.lookup(&key) {
            return Ok(fitted);
        }

        let permit = {
            let mut entries = self.lock_entries();
            entries.entry(key.clone()).or_default().fit_permit.clone()
        };
        let _guard = permit.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another caller may have completed the fit while we waited
        if let Some(fitted) = self.lookup(&key) {
            return Ok(fitted);
        }

        let fitted = Arc::new(fit()?);

        let mut entries = self.lock_entries();
        // A product's series has one live fingerprint; drop superseded fits
        entries.retain(|k, _| k.product != key.product || k.fingerprint == key.fingerprint);
        entries.entry(key).or_default().fitted = Some(fitted.clone());

        Ok(fitted)
    }

    /// Number of populated entries
    pub fn len(&self) -> usize {
        self.lock_entries()
            .values()
            .filter(|entry| entry.fitted.is_some())
            .count()
    }

    /// Whether the cache holds no populated entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<F>> {
        self.lock_entries()
            .get(key)
            .and_then(|entry| entry.fitted.clone())
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Entry<F>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
