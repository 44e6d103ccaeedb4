//! Key-value storage port
//!
//! The durability layer for one profile: a flat string-keyed map of
//! serialized values, read and written whole.

use crate::domain::result::Result;

/// Per-profile key-value storage
///
/// Values are opaque strings (JSON in practice). Implementations must make
/// each `set` all-or-nothing: a reader sees either the old or the new value.
pub trait KeyValueStore: Send + Sync {
    /// Backend name (e.g., "file", "memory")
    fn name(&self) -> &str;

    /// Read a value, `None` if the key was never set or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for a key
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
