//! Core types for Cellar
//!
//! This crate defines the canonical [`Value`] model that persistent cells
//! hold, plus the structural fingerprint used to detect semantic changes in
//! a cell's caller-supplied initial value across activations.
//!
//! Everything here is pure: no I/O, no logging, no storage. The storage and
//! codec crates build on these types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fingerprint;
pub mod value;

pub use fingerprint::{fingerprint, Fingerprint};
pub use value::Value;
