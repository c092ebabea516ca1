use crate::application::ports::BundleReader;
use crate::shared::{AppError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// ディスク上のディレクトリを同梱コンテンツとして扱う
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// バンドル直下のファイルのみ許可する
    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        let is_plain_name = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains('/')
            && !file_name.contains('\\');
        if !is_plain_name {
            return Err(not_found(file_name));
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl BundleReader for DirectoryBundle {
    async fn read_binary(&self, file_name: &str) -> Result<Bytes> {
        let path = self.resolve(file_name)?;
        debug!("Reading bundled content {}", path.display());
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(not_found(file_name)),
            Err(err) => Err(AppError::Storage(format!(
                "Failed to read {}: {err}",
                path.display()
            ))),
        }
    }
}

fn not_found(file_name: &str) -> AppError {
    AppError::NotFound(format!("404: Not Found ({file_name})"))
}
