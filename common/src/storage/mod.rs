mod error;
mod key_value_store;

pub use error::StorageError;
pub use key_value_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
