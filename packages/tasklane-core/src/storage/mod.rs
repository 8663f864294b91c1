pub mod fingerprint;
pub mod local;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Abstract keyed-slot storage the board persists into.
/// Implementations: FileStore (one file per key), MemoryStore (in-process).
pub trait SlotStore: Send + Sync {
    /// Read the raw serialized value of a slot. `Ok(None)` if never written.
    fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the raw serialized value of a slot.
    fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid slot key: {0:?}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load a slot, falling back to `default` when it is missing, unreadable or
/// does not parse as `T`.
pub fn load<T: DeserializeOwned>(store: &dyn SlotStore, key: &str, default: T) -> T {
    let raw = match store.read_slot(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            log::warn!("[tasklane.store] Failed to read slot {:?}: {}", key, e);
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!(
                "[tasklane.store] Slot {:?} does not parse, using default: {}",
                key,
                e
            );
            default
        }
    }
}

/// Serialize and store `value`. Failures are logged and swallowed: the caller's
/// in-memory state stays authoritative. Returns whether the write landed.
pub fn save<T: Serialize + ?Sized>(store: &dyn SlotStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|raw| store.write_slot(key, &raw));

    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("[tasklane.store] Failed to save slot {:?}: {}", key, e);
            false
        }
    }
}
