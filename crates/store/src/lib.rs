//! Storage layer for Cellar
//!
//! This crate owns everything between a cell and its bytes on disk:
//!
//! - [`StorageBackend`]: the injected key-value capability the ambient
//!   store of the original design is reduced to. Implementations only need
//!   fallible `get`/`set` over strings.
//! - [`MemoryBackend`] and [`FileBackend`]: the two shipped backends — an
//!   in-process map for ephemeral stores and tests, and a single-file map
//!   for state that must survive restarts.
//! - Slot-key derivation: each cell name maps to a `value` slot and an
//!   `initial_value_hash` slot under a fixed prefix.
//! - [`SlotStore`]: the fault-tolerant adapter cells actually talk to. It
//!   encodes/decodes on the way through and degrades on every storage
//!   fault instead of propagating it; a cell never sees a storage error.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod backend;
mod slots;

pub use backend::{BackendError, FileBackend, MemoryBackend, StorageBackend};
pub use slots::{fingerprint_slot, value_slot, SlotKeys, SlotState, SlotStore, STORE_PREFIX};
