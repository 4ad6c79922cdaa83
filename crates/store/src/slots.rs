//! Slot keys and the fault-tolerant slot adapter.
//!
//! Each cell owns two entries in the backend: the current value and the
//! fingerprint of the last-seen initial value. Both keys derive from the
//! cell name by pure string composition under a fixed prefix, so cells can
//! share a backend with unrelated entries without colliding.
//!
//! [`SlotStore`] is the only storage surface cells use. Its reads and
//! writes never fail from the caller's point of view: a read fault or a
//! malformed entry degrades to "nothing stored" and a write fault is
//! dropped, in both cases with a diagnostic event. Losing cached state must
//! never take the cell down with it.

use cellar_core::{Fingerprint, Value};
use cellar_wire::{decode, encode, is_absent, ABSENT_MARKER};
use std::sync::Arc;
use tracing::{error, warn};

use crate::backend::StorageBackend;

/// Fixed namespace prefix for every slot key.
pub const STORE_PREFIX: &str = "__cellar";

/// Key of the value slot for a cell name.
pub fn value_slot(name: &str) -> String {
    format!("{STORE_PREFIX}__value__{name}")
}

/// Key of the initial-value-hash slot for a cell name.
pub fn fingerprint_slot(name: &str) -> String {
    format!("{STORE_PREFIX}__initial_value_hash__{name}")
}

/// The two slot keys of one cell, derived once at activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotKeys {
    /// Key of the current-value entry.
    pub value: String,
    /// Key of the initial-value-fingerprint entry.
    pub fingerprint: String,
}

impl SlotKeys {
    /// Derive both keys for a cell name.
    pub fn for_name(name: &str) -> Self {
        SlotKeys {
            value: value_slot(name),
            fingerprint: fingerprint_slot(name),
        }
    }
}

/// What a value-slot read produced.
///
/// `Missing` and `Absent` are different states on purpose: a slot that was
/// never written falls back to the caller's initial value, while a slot
/// that holds the persisted absent value seeds the cell as absent.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    /// No entry (or an unreadable one, after the fault was reported).
    Missing,
    /// The entry holds the persisted absent value.
    Absent,
    /// The entry decoded to a value.
    Value(Value),
}

/// Fault-tolerant reader/writer for a cell's two slots.
#[derive(Clone)]
pub struct SlotStore {
    backend: Arc<dyn StorageBackend>,
}

impl SlotStore {
    /// Wrap a backend.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        SlotStore { backend }
    }

    /// Read and decode the value slot.
    ///
    /// The entry is decoded first; the persisted-absent sentinel is then
    /// recognized structurally via [`is_absent`], not by comparing raw
    /// text, so key order or whitespace in the stored form cannot hide it.
    /// Read faults and malformed entries report a warning and come back as
    /// [`SlotState::Missing`] so the cell can fall back to its initial
    /// value.
    pub fn load_value(&self, key: &str) -> SlotState {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SlotState::Missing,
            Err(err) => {
                warn!(key, error = %err, "value slot read failed; treating as unwritten");
                return SlotState::Missing;
            }
        };

        match decode(&raw) {
            Ok(value) if is_absent(&value) => SlotState::Absent,
            Ok(value) => SlotState::Value(value),
            Err(err) => {
                warn!(key, error = %err, "stored value is malformed; treating as unwritten");
                SlotState::Missing
            }
        }
    }

    /// Encode and write the value slot. Best effort: a write fault is
    /// reported and dropped.
    pub fn save_value(&self, key: &str, value: Option<&Value>) {
        let raw = match value {
            Some(value) => encode(value),
            None => ABSENT_MARKER.to_string(),
        };
        if let Err(err) = self.backend.set(key, &raw) {
            error!(key, error = %err, "value slot write failed; state not persisted");
        }
    }

    /// Read the fingerprint slot.
    ///
    /// A missing entry and the recorded-absent marker both mean "no
    /// fingerprint"; they compare equal to the fingerprint of an absent
    /// initial value.
    pub fn load_fingerprint(&self, key: &str) -> Option<Fingerprint> {
        match self.backend.get(key) {
            Ok(Some(raw)) if raw == ABSENT_MARKER => None,
            Ok(Some(raw)) => Some(Fingerprint::from_raw(raw)),
            Ok(None) => None,
            Err(err) => {
                warn!(key, error = %err, "fingerprint slot read failed; treating as unwritten");
                None
            }
        }
    }

    /// Write the fingerprint slot; `None` records the absent initial value
    /// as the marker. Best effort, like `save_value`.
    pub fn save_fingerprint(&self, key: &str, fingerprint: Option<&Fingerprint>) {
        let raw = match fingerprint {
            Some(fp) => fp.as_str(),
            None => ABSENT_MARKER,
        };
        if let Err(err) = self.backend.set(key, raw) {
            error!(key, error = %err, "fingerprint slot write failed");
        }
    }
}
