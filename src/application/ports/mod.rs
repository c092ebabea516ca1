pub mod bundle;
pub mod key_value_store;

pub use bundle::{BundleReader, read_json};
pub use key_value_store::KeyValueStore;
