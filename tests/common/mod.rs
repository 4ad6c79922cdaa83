//! Shared test backends.

#![allow(dead_code)]

use cellar::{BackendError, MemoryBackend, StorageBackend};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A memory backend that counts every write, for asserting the
/// write-per-transition contracts.
#[derive(Default)]
pub struct CountingBackend {
    inner: MemoryBackend,
    writes: AtomicUsize,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get(key).unwrap()
    }

    pub fn entries(&self) -> usize {
        self.inner.len()
    }
}

impl StorageBackend for CountingBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, raw: &str) -> Result<(), BackendError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, raw)
    }
}

/// A backend where every operation fails, for the degradation paths.
pub struct FailingBackend;

impl StorageBackend for FailingBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, BackendError> {
        Err(BackendError::Unavailable("store is down".to_string()))
    }

    fn set(&self, _key: &str, _raw: &str) -> Result<(), BackendError> {
        Err(BackendError::Unavailable("store is down".to_string()))
    }
}
