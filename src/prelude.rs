//! Convenient imports for Cellar.
//!
//! ```
//! use cellar::prelude::*;
//!
//! let store = CellStore::ephemeral();
//! let mut cell = store.cell("sidebar_open", true);
//! cell.set(false);
//! ```

// Entry point and cell handle
pub use crate::cell::{Cell, Initial};
pub use crate::store::CellStore;

// Error handling
pub use crate::error::{Error, Result};

// Core value model
pub use cellar_core::{fingerprint, Fingerprint, Value};

// Backends, for injecting fakes or custom stores
pub use cellar_store::{FileBackend, MemoryBackend, StorageBackend};
