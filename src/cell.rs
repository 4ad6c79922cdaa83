//! The persistent cell: in-memory state with persistence bindings.
//!
//! A [`Cell`] moves through three phases. Activation seeds it from the
//! value slot (falling back to the caller's initial value), reconciles the
//! initial value's fingerprint against the one persisted last time, then
//! performs the single mount write. After that it is live: every distinct
//! value transition — from the setter, a functional update, or an
//! initial-value reset — persists the new value; everything else writes
//! nothing.
//!
//! Change detection is per input, made explicit instead of relying on a
//! host dependency array: the initial value is compared by structural
//! fingerprint against the persisted one, and the current value is gated
//! by [`Value::same_identity`]. Deep equality is deliberately not used
//! anywhere on the write path.

use cellar_core::{fingerprint, Value};
use cellar_store::{SlotKeys, SlotState, SlotStore};
use std::fmt;
use tracing::debug;

/// The caller-supplied initial value of a cell.
///
/// Either absent, a concrete value, or a deferred producer that is invoked
/// exactly once at the point of use.
pub enum Initial {
    /// No initial value.
    Absent,
    /// A concrete initial value.
    Value(Value),
    /// A deferred initializer, resolved once.
    Lazy(Box<dyn FnOnce() -> Value>),
}

impl Initial {
    /// A deferred initializer.
    ///
    /// Useful when producing the initial value is expensive and usually
    /// unnecessary because a stored value wins anyway — note the producer
    /// still runs once per activation to fingerprint the result.
    pub fn lazy(producer: impl FnOnce() -> Value + 'static) -> Self {
        Initial::Lazy(Box::new(producer))
    }

    fn resolve(self) -> Option<Value> {
        match self {
            Initial::Absent => None,
            Initial::Value(value) => Some(value),
            Initial::Lazy(producer) => Some(producer()),
        }
    }
}

impl fmt::Debug for Initial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Initial::Absent => f.write_str("Absent"),
            Initial::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Initial::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<Value> for Initial {
    fn from(value: Value) -> Self {
        Initial::Value(value)
    }
}

impl From<Option<Value>> for Initial {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(value) => Initial::Value(value),
            None => Initial::Absent,
        }
    }
}

impl From<bool> for Initial {
    fn from(b: bool) -> Self {
        Initial::Value(Value::from(b))
    }
}

impl From<i32> for Initial {
    fn from(i: i32) -> Self {
        Initial::Value(Value::from(i))
    }
}

impl From<i64> for Initial {
    fn from(i: i64) -> Self {
        Initial::Value(Value::from(i))
    }
}

impl From<f64> for Initial {
    fn from(f: f64) -> Self {
        Initial::Value(Value::from(f))
    }
}

impl From<&str> for Initial {
    fn from(s: &str) -> Self {
        Initial::Value(Value::from(s))
    }
}

impl From<String> for Initial {
    fn from(s: String) -> Self {
        Initial::Value(Value::from(s))
    }
}

/// A named piece of state mirrored into the durable store.
///
/// Created by [`CellStore::cell`](crate::CellStore::cell) (that call is the
/// activation). Dropping a cell has no persistence side effect; its slots
/// stay behind for the next activation.
pub struct Cell {
    name: String,
    keys: SlotKeys,
    slots: SlotStore,
    value: Option<Value>,
}

impl Cell {
    /// Activate a cell: seed it, reconcile the initial value, and perform
    /// the mount write. Runs exactly once per cell instance.
    pub(crate) fn activate(slots: SlotStore, name: &str, initial: Initial) -> Self {
        let keys = SlotKeys::for_name(name);
        let initial = initial.resolve();

        let value = match slots.load_value(&keys.value) {
            SlotState::Value(stored) => Some(stored),
            SlotState::Absent => None,
            SlotState::Missing => initial.clone(),
        };

        let mut cell = Cell {
            name: name.to_string(),
            keys,
            slots,
            value,
        };

        // The reset (if any) folds into the single mount write below, so
        // activation never writes the value slot twice.
        cell.reconcile_initial(initial);
        cell.persist_value();
        cell
    }

    /// The cell's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value, or `None` while the cell holds the absent state.
    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Set the current value.
    ///
    /// Persists once per distinct transition: setting a value identical to
    /// the current one (in the [`Value::same_identity`] sense) writes
    /// nothing.
    pub fn set(&mut self, value: impl Into<Value>) {
        self.apply(Some(value.into()));
    }

    /// Set the cell to the absent state.
    pub fn set_absent(&mut self) {
        self.apply(None);
    }

    /// Functional update: compute the next value from the previous one.
    ///
    /// The closure runs synchronously; its result flows through the same
    /// transition gate as [`set`](Cell::set).
    pub fn update(&mut self, f: impl FnOnce(Option<&Value>) -> Option<Value>) {
        let next = f(self.value.as_ref());
        self.apply(next);
    }

    /// The host's notification that the caller-supplied initial value may
    /// have changed since the last activation or notification.
    ///
    /// A changed fingerprint resets the cell to the new initial value and
    /// persists the fingerprint; an unchanged one does nothing at all.
    pub fn sync_initial(&mut self, initial: impl Into<Initial>) {
        let resolved = initial.into().resolve();
        if self.reconcile_initial(resolved) {
            self.persist_value();
        }
    }

    /// Compare the initial value's fingerprint against the persisted one
    /// and reset in memory on change. Writes only the fingerprint slot.
    /// Returns whether the in-memory value actually transitioned.
    fn reconcile_initial(&mut self, initial: Option<Value>) -> bool {
        let fp = fingerprint(initial.as_ref());
        let persisted = self.slots.load_fingerprint(&self.keys.fingerprint);
        if fp == persisted {
            return false;
        }

        debug!(name = %self.name, "initial value changed; resetting cell");
        self.slots.save_fingerprint(&self.keys.fingerprint, fp.as_ref());

        if same_identity(self.value.as_ref(), initial.as_ref()) {
            return false;
        }
        self.value = initial;
        true
    }

    /// Apply a setter result through the transition gate.
    fn apply(&mut self, next: Option<Value>) {
        if same_identity(self.value.as_ref(), next.as_ref()) {
            return;
        }
        self.value = next;
        self.persist_value();
    }

    fn persist_value(&self) {
        self.slots.save_value(&self.keys.value, self.value.as_ref());
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Identity over possibly-absent values: absent is identical to absent.
fn same_identity(current: Option<&Value>, next: Option<&Value>) -> bool {
    match (current, next) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_identity(b),
        _ => false,
    }
}
