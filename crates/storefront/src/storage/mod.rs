//! Durable storage for the cart snapshot.
//!
//! The cart is persisted as a single JSON document under a fixed key, the
//! same way a browser keeps it in local storage. The [`CartStore`] port
//! abstracts where that document lives:
//!
//! - [`JsonFileStore`] - a file on disk (`<dir>/bazar-cart.json`)
//! - [`MemoryStore`] - an in-process slot, for tests
//!
//! Stores deal in raw snapshot text. Parsing (and recovering from unparseable
//! snapshots) is the job of [`crate::services::cart::CartSession`].

mod file;
mod memory;

use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Key under which the cart snapshot is stored.
pub const CART_STORAGE_KEY: &str = "bazar-cart";

/// Errors that can occur when reading or writing the cart snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence port for the cart snapshot.
///
/// `load` returns `Ok(None)` when nothing has been stored yet. `save`
/// replaces any previous snapshot (last writer wins).
pub trait CartStore: Send + Sync {
    /// Read the stored snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing storage cannot be written.
    fn save(&self, snapshot: &str) -> Result<(), StorageError>;
}

impl<S: CartStore + ?Sized> CartStore for &S {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

impl<S: CartStore + ?Sized> CartStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}
