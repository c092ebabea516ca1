use crate::application::ports::KeyValueStore;
use crate::shared::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;
use tokio::{fs, sync::Mutex};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PreferencesDocument {
    #[serde(default)]
    string_sets: BTreeMap<String, BTreeSet<String>>,
}

/// 1つの JSON ファイルに永続化するキー・バリューストア
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    document: Mutex<PreferencesDocument>,
}

impl JsonFileKeyValueStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|err| {
                    AppError::Storage(format!("Failed to create preferences dir: {err}"))
                })?;
            }
        }

        let document = if fs::metadata(&path).await.is_ok() {
            let bytes = fs::read(&path)
                .await
                .map_err(|err| AppError::Storage(format!("Failed to read preferences: {err}")))?;
            if bytes.is_empty() {
                PreferencesDocument::default()
            } else {
                serde_json::from_slice(&bytes).map_err(|err| {
                    AppError::Decode(format!("Failed to parse preferences: {err}"))
                })?
            }
        } else {
            PreferencesDocument::default()
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    /// 一時ファイルに書き出してから置き換える。途中で失敗しても元のファイルは壊れない
    async fn persist(&self, document: &PreferencesDocument) -> Result<()> {
        let json = serde_json::to_vec_pretty(document).map_err(|err| {
            AppError::Storage(format!("Failed to serialize preferences: {err}"))
        })?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|err| AppError::Storage(format!("Failed to persist preferences: {err}")))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| AppError::Storage(format!("Failed to replace preferences: {err}")))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get_string_set(&self, key: &str) -> Result<HashSet<String>> {
        let document = self.document.lock().await;
        Ok(document
            .string_sets
            .get(key)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn set_string_set(&self, key: &str, values: &HashSet<String>) -> Result<()> {
        let mut document = self.document.lock().await;
        let previous = document
            .string_sets
            .insert(key.to_string(), values.iter().cloned().collect());
        if let Err(err) = self.persist(&document).await {
            // 書き込みに失敗したらメモリ上の状態も戻す
            match previous {
                Some(previous) => document.string_sets.insert(key.to_string(), previous),
                None => document.string_sets.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }
}
