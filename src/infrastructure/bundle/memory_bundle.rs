use crate::application::ports::BundleReader;
use crate::shared::{AppError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// メモリ上の同梱コンテンツ（テスト・デモ用）
#[derive(Default)]
pub struct MemoryBundle {
    files: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.files.get_mut().insert(file_name.into(), data.into());
        self
    }

    pub async fn insert(&self, file_name: impl Into<String>, data: impl Into<Bytes>) {
        let mut files = self.files.write().await;
        files.insert(file_name.into(), data.into());
    }

    pub async fn remove(&self, file_name: &str) -> Option<Bytes> {
        let mut files = self.files.write().await;
        files.remove(file_name)
    }
}

#[async_trait]
impl BundleReader for MemoryBundle {
    async fn read_binary(&self, file_name: &str) -> Result<Bytes> {
        let files = self.files.read().await;
        files
            .get(file_name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("404: Not Found ({file_name})")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_read() {
        let bundle = MemoryBundle::new().with_file("a.json", "{}");
        bundle.insert("b.bin", vec![1u8, 2, 3]).await;

        assert_eq!(bundle.read_binary("a.json").await.unwrap(), Bytes::from_static(b"{}"));
        assert_eq!(bundle.read_binary("b.bin").await.unwrap().len(), 3);

        bundle.remove("b.bin").await;
        assert!(bundle.read_binary("b.bin").await.unwrap_err().is_not_found());
    }
}
