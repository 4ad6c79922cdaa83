//! # Cellar
//!
//! Persistent value cells: pieces of UI state that transparently mirror
//! themselves into a durable key-value store, so the value a user last saw
//! is the value they get back after a restart.
//!
//! The interesting part is the synchronization policy between three value
//! sources — the in-memory state, the caller-supplied initial value, and
//! the persisted value — and the rules for when each one wins:
//!
//! - On activation, the **stored value wins** over the initial value.
//! - When the caller's **initial value changes** (detected by structural
//!   fingerprint, so rebuilding an equal value does not count), the cell
//!   resets to the new initial value.
//! - Every distinct **value transition is persisted**; re-setting an
//!   identical value is not a transition and writes nothing.
//!
//! Storage faults never surface: a cell that cannot read falls back to its
//! initial value, a cell that cannot write keeps working in memory, and
//! both report through `tracing`.
//!
//! ## Quick Start
//!
//! ```
//! use cellar::prelude::*;
//!
//! // Durable: CellStore::open("./state/cells.json")?
//! let store = CellStore::ephemeral();
//!
//! // Activation: the stored value (if any) wins over the initial value
//! let mut theme = store.cell("theme", "light");
//! assert_eq!(theme.get(), Some(&Value::from("light")));
//!
//! // Setter and functional update, both persisted
//! theme.set("dark");
//! theme.update(|prev| prev.cloned().or_else(|| Some(Value::from("light"))));
//!
//! // A later activation under the same name restores the last value
//! let restored = store.cell("theme", "light");
//! assert_eq!(restored.get(), Some(&Value::from("dark")));
//! ```
//!
//! ## Crates
//!
//! - [`cellar_core`]: the [`Value`] model and structural fingerprinting
//! - [`cellar_wire`]: the deterministic text codec
//! - [`cellar_store`]: backends, slot keys, and the fault-tolerant adapter

#![warn(missing_docs)]

mod cell;
mod error;
mod store;

pub mod prelude;

// Re-export main entry points
pub use cell::{Cell, Initial};
pub use error::{Error, Result};
pub use store::CellStore;

// Re-export the value model and collaborator surfaces
pub use cellar_core::{fingerprint, Fingerprint, Value};
pub use cellar_store::{
    fingerprint_slot, value_slot, BackendError, FileBackend, MemoryBackend, SlotKeys, SlotState,
    SlotStore, StorageBackend, STORE_PREFIX,
};
pub use cellar_wire::{decode, encode, is_absent, DecodeError, ABSENT_MARKER};
