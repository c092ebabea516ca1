use crate::application::ports::KeyValueStore;
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryKeyValueStore {
    sets: Mutex<HashMap<String, HashSet<String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get_string_set(&self, key: &str) -> Result<HashSet<String>> {
        let sets = self.sets.lock().await;
        Ok(sets.get(key).cloned().unwrap_or_default())
    }

    async fn set_string_set(&self, key: &str, values: &HashSet<String>) -> Result<()> {
        let mut sets = self.sets.lock().await;
        sets.insert(key.to_string(), values.clone());
        Ok(())
    }
}
