use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://cdn.pawtraits.io/images/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub content: ContentConfig,
    pub storage: StorageConfig,
    pub latency: LatencyConfig,
    pub image_cache: ImageCacheConfig,
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    pub content_dir: PathBuf,
    pub image_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub preferences_file: String,
}

/// 擬似ネットワーク遅延の設定（ミリ秒）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    pub enabled: bool,
    pub fetch_posts_ms: u64,
    pub details_base_ms: u64,
    pub details_step_ms: u64,
    pub thumbnail_min_ms: u64,
    pub thumbnail_max_ms: u64,
    pub image_min_ms: u64,
    pub image_max_ms: u64,
    pub like_min_ms: u64,
    pub like_max_ms: u64,
    pub deferred_navigation_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCacheConfig {
    pub max_entries: usize,
    pub max_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content: ContentConfig {
                content_dir: PathBuf::from("./Content"),
                image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            },
            storage: StorageConfig::default(),
            latency: LatencyConfig::default(),
            image_cache: ImageCacheConfig {
                max_entries: 64,
                max_bytes: 64 * 1024 * 1024, // 64MB
            },
            broadcast_capacity: 64,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let mut data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.push("pawtraits");
        Self {
            data_dir,
            preferences_file: "preferences.json".to_string(),
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fetch_posts_ms: 1000,
            details_base_ms: 450,
            details_step_ms: 100,
            thumbnail_min_ms: 200,
            thumbnail_max_ms: 1100,
            image_min_ms: 400,
            image_max_ms: 1600,
            like_min_ms: 300,
            like_max_ms: 1600,
            deferred_navigation_ms: 150,
        }
    }
}

impl LatencyConfig {
    /// 遅延なし（プレビュー・テスト用）
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn deferred_navigation(&self) -> Duration {
        Duration::from_millis(self.deferred_navigation_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("PAWTRAITS_CONTENT_DIR") {
            if !v.trim().is_empty() {
                cfg.content.content_dir = PathBuf::from(v.trim());
            }
        }
        if let Ok(v) = std::env::var("PAWTRAITS_DATA_DIR") {
            if !v.trim().is_empty() {
                cfg.storage.data_dir = PathBuf::from(v.trim());
            }
        }
        if let Ok(v) = std::env::var("PAWTRAITS_IMAGE_BASE_URL") {
            if !v.trim().is_empty() {
                cfg.content.image_base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("PAWTRAITS_DISABLE_DELAYS") {
            cfg.latency.enabled = !parse_bool(&v, !cfg.latency.enabled);
        }
        if let Some(value) = std::env::var("PAWTRAITS_IMAGE_CACHE_ENTRIES")
            .ok()
            .and_then(|v| parse_usize(&v))
        {
            cfg.image_cache.max_entries = value.max(1);
        }
        if let Some(value) = std::env::var("PAWTRAITS_IMAGE_CACHE_BYTES")
            .ok()
            .and_then(|v| parse_usize(&v))
        {
            cfg.image_cache.max_bytes = value.max(1);
        }

        cfg
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.preferences_file)
    }

    pub fn image_base_url(&self) -> Result<Url, String> {
        Url::parse(&self.content.image_base_url)
            .map_err(|err| format!("Invalid image_base_url: {err}"))
    }

    pub fn validate(&self) -> Result<(), String> {
        let latency = &self.latency;
        let ranges = [
            ("thumbnail", latency.thumbnail_min_ms, latency.thumbnail_max_ms),
            ("image", latency.image_min_ms, latency.image_max_ms),
            ("like", latency.like_min_ms, latency.like_max_ms),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(format!(
                    "Latency {name}_min_ms ({min}) must not exceed {name}_max_ms ({max})"
                ));
            }
        }
        if self.image_cache.max_entries == 0 {
            return Err("Image cache max_entries must be greater than 0".to_string());
        }
        if self.image_cache.max_bytes == 0 {
            return Err("Image cache max_bytes must be greater than 0".to_string());
        }
        if self.broadcast_capacity == 0 {
            return Err("broadcast_capacity must be greater than 0".to_string());
        }
        if self.storage.preferences_file.trim().is_empty() {
            return Err("Storage preferences_file must not be empty".to_string());
        }
        let base = self.image_base_url()?;
        if !base.path().ends_with('/') {
            return Err("image_base_url must end with '/'".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
