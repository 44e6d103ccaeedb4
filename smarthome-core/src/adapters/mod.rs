//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Local filesystem (one JSON file per key) for the KeyValueStore port
//! - In-memory map for tests and throwaway profiles

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
