//! Main entry point: a store that activates cells.

use crate::cell::{Cell, Initial};
use crate::error::Result;
use cellar_store::{FileBackend, MemoryBackend, SlotStore, StorageBackend};
use std::path::Path;
use std::sync::Arc;

/// A handle to a key-value backend that activates cells on it.
///
/// `CellStore` is cheap to clone and shareable; cells themselves are
/// single-consumer values. Two cells activated with the same name see the
/// same two slots, last writer wins.
///
/// # Example
///
/// ```
/// use cellar::prelude::*;
///
/// let store = CellStore::ephemeral();
/// let mut layout = store.cell("layout", "wide");
/// assert_eq!(layout.get(), Some(&Value::from("wide")));
///
/// layout.set("narrow");
/// assert_eq!(layout.get(), Some(&Value::from("narrow")));
/// ```
#[derive(Clone)]
pub struct CellStore {
    slots: SlotStore,
}

impl CellStore {
    /// Open a durable store backed by a JSON map file at `path`.
    ///
    /// State persisted through this store survives process restarts.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = CellStore::open("./state/cells.json")?;
    /// let sidebar = store.cell("sidebar_open", true);
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let backend = FileBackend::open(path)?;
        Ok(Self::with_backend(Arc::new(backend)))
    }

    /// Create an ephemeral in-memory store.
    ///
    /// Nothing is written to disk; all state is gone when the last clone
    /// is dropped. The right choice for tests and throwaway sessions.
    pub fn ephemeral() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    /// Build a store over a caller-provided backend.
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        CellStore {
            slots: SlotStore::new(backend),
        }
    }

    /// Activate the cell `name` with the given initial value.
    ///
    /// This is the single public operation of the design: it seeds the
    /// cell from the store (the stored value wins over `initial`),
    /// reconciles the initial value's fingerprint, and hands back the live
    /// cell. Never fails; storage faults degrade to "nothing restored".
    pub fn cell(&self, name: &str, initial: impl Into<Initial>) -> Cell {
        Cell::activate(self.slots.clone(), name, initial.into())
    }
}
