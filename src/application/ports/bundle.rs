use crate::shared::{AppError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// アプリに同梱されたコンテンツ（フィクスチャ JSON・画像）の読み出しポート
#[async_trait]
pub trait BundleReader: Send + Sync {
    /// 名前で指定したリソースを読み出す。存在しない場合は NotFound
    async fn read_binary(&self, file_name: &str) -> Result<Bytes>;
}

/// JSON リソースを読み出してデコードする
pub async fn read_json<T: DeserializeOwned>(
    reader: &dyn BundleReader,
    file_name: &str,
) -> Result<T> {
    let bytes = reader.read_binary(file_name).await?;
    serde_json::from_slice(&bytes)
        .map_err(|err| AppError::Decode(format!("Failed to decode {file_name}: {err}")))
}
