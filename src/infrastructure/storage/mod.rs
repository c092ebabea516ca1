pub mod json_file_store;
pub mod memory_store;

pub use json_file_store::JsonFileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
