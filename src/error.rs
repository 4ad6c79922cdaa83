//! Unified error types for Cellar.
//!
//! Cell operations themselves are infallible by contract — storage faults
//! degrade inside the slot adapter. The errors here cover the surfaces
//! that *are* allowed to fail: opening a store and using the codec
//! directly.

use thiserror::Error;

/// All Cellar errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A storage backend failed (opening a file store, or a direct backend
    /// operation outside the cell path).
    #[error("storage error: {0}")]
    Storage(#[from] cellar_store::BackendError),

    /// Stored text failed to decode (direct codec use; the cell path
    /// degrades instead of returning this).
    #[error("decode error: {0}")]
    Decode(#[from] cellar_wire::DecodeError),
}

/// Result type for Cellar operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_convert() {
        let err: Error = cellar_store::BackendError::Unavailable("down".to_string()).into();
        assert!(matches!(err, Error::Storage(_)));
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn decode_errors_convert() {
        let err: Error = cellar_wire::decode("").unwrap_err().into();
        assert!(matches!(err, Error::Decode(_)));
    }
}
