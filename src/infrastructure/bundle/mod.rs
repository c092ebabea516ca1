pub mod directory_bundle;
pub mod memory_bundle;

pub use directory_bundle::DirectoryBundle;
pub use memory_bundle::MemoryBundle;
