pub mod bundle;
pub mod cache;
pub mod network;
pub mod storage;

pub use bundle::{DirectoryBundle, MemoryBundle};
pub use cache::{ImageCache, ImageCacheStats};
pub use network::SimulatedLatency;
pub use storage::{JsonFileKeyValueStore, MemoryKeyValueStore};
