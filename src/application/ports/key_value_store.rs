use crate::shared::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// 永続キー・バリューストアのポート（文字列集合のみ扱う）
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 未保存のキーは空集合を返す
    async fn get_string_set(&self, key: &str) -> Result<HashSet<String>>;

    async fn set_string_set(&self, key: &str, values: &HashSet<String>) -> Result<()>;
}
