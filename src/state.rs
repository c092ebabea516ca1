use crate::application::ports::{BundleReader, KeyValueStore};
use crate::application::services::{ContentStore, OptimisticLikes, SimulatedApiClient};
use crate::infrastructure::{DirectoryBundle, ImageCache, JsonFileKeyValueStore, SimulatedLatency};
use crate::shared::{AppConfig, AppError, Result};
use std::sync::Arc;
use tracing::info;

/// アプリケーション全体の状態を管理する構造体
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<ContentStore>,
    pub client: Arc<SimulatedApiClient>,
    pub likes: OptimisticLikes,
}

impl AppState {
    /// 設定に従いディスク上のバンドルと設定ファイルで初期化する
    pub async fn initialize(config: AppConfig) -> Result<Self> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let bundle: Arc<dyn BundleReader> =
            Arc::new(DirectoryBundle::new(config.content.content_dir.clone()));
        let preferences: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileKeyValueStore::open(config.preferences_path()).await?);

        Self::with_collaborators(config, bundle, preferences).await
    }

    pub async fn with_collaborators(
        config: AppConfig,
        bundle: Arc<dyn BundleReader>,
        preferences: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        config.validate().map_err(AppError::ConfigurationError)?;
        let image_base_url = config
            .image_base_url()
            .map_err(AppError::ConfigurationError)?;

        let store = Arc::new(
            ContentStore::load(bundle.as_ref(), preferences, config.broadcast_capacity).await?,
        );
        let client = Arc::new(SimulatedApiClient::new(
            store.clone(),
            bundle,
            SimulatedLatency::new(config.latency.clone()),
            ImageCache::from_config(&config.image_cache),
            image_base_url,
        ));
        let likes = OptimisticLikes::new(client.clone());

        info!(
            "Application state initialized (latency enabled: {})",
            config.latency.enabled
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            client,
            likes,
        })
    }
}
