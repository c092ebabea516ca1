use super::content_store::{ContentStore, PostsSubscription};
use crate::application::ports::{BundleReader, read_json};
use crate::domain::entities::{
    LoadedImage, Post, PostDetailsResponse, avatar_file_name, details_file_name,
};
use crate::domain::value_objects::{ImageVariant, last_path_component};
use crate::infrastructure::cache::{ImageCache, ImageCacheStats};
use crate::infrastructure::network::SimulatedLatency;
use crate::shared::{AppError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

/// ネットワーク越しの API を模したクライアント
///
/// 状態はすべて [`ContentStore`] に委譲し、ここでは遅延・キャッシュ・
/// キャンセルの振る舞いだけを扱う
pub struct SimulatedApiClient {
    store: Arc<ContentStore>,
    bundle: Arc<dyn BundleReader>,
    latency: SimulatedLatency,
    image_cache: ImageCache,
    image_base_url: Url,
    /// セッション内の詳細取得回数。回数に応じて遅延が短くなる
    fetch_details_calls: AtomicU64,
}

impl SimulatedApiClient {
    pub fn new(
        store: Arc<ContentStore>,
        bundle: Arc<dyn BundleReader>,
        latency: SimulatedLatency,
        image_cache: ImageCache,
        image_base_url: Url,
    ) -> Self {
        Self {
            store,
            bundle,
            latency,
            image_cache,
            image_base_url,
            fetch_details_calls: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    pub fn subscribe(&self) -> PostsSubscription {
        self.store.subscribe()
    }

    pub fn fetch_details_call_count(&self) -> u64 {
        self.fetch_details_calls.load(Ordering::SeqCst)
    }

    /// 投稿一覧を取得する。ページ指定は受け付けるが常に全件を返す
    pub async fn fetch_posts(&self, page: u32, token: &CancellationToken) -> Result<Vec<Post>> {
        self.latency
            .fixed(self.latency.config().fetch_posts_ms, token)
            .await?;
        if token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let posts = self.store.load_posts().await;
        debug!("Fetched page {page} ({} posts)", posts.len());
        Ok(posts)
    }

    /// 投稿の詳細（コメント）を取得してストアへ反映する
    pub async fn fetch_details(&self, post: &Post, token: &CancellationToken) -> Result<Post> {
        if post.has_details() {
            return Ok(post.clone());
        }

        let call_count = self.fetch_details_calls.load(Ordering::SeqCst);
        let delay_ms = self.latency.details_delay_ms(call_count);
        self.latency.fixed(delay_ms, token).await?;
        self.fetch_details_calls.fetch_add(1, Ordering::SeqCst);

        let file_name = details_file_name(&post.id);
        let response: PostDetailsResponse = read_json(self.bundle.as_ref(), &file_name).await?;
        if token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let updated = self.store.set_comments(&post.id, response.comments).await?;
        info!("Fetched details for post {} after {delay_ms}ms", post.id);
        Ok(updated)
    }

    pub fn image_url(&self, post: &Post, variant: ImageVariant) -> Result<Url> {
        Ok(self.image_base_url.join(post.image_name_for(variant))?)
    }

    /// キャッシュ済みの画像があれば返す（読み込みは行わない）
    pub fn cached_image(&self, url: &Url) -> Option<Arc<LoadedImage>> {
        self.image_cache.get(url.as_str())
    }

    pub async fn load_image(&self, url: &Url, token: &CancellationToken) -> Result<Arc<LoadedImage>> {
        if let Some(image) = self.image_cache.get(url.as_str()) {
            debug!("Image cache hit for {url}");
            return Ok(image);
        }

        // フルサイズ画像は転送量が大きい想定で遅延を長めにする
        let config = self.latency.config();
        let (min_ms, max_ms) = match ImageVariant::from_url(url) {
            ImageVariant::Thumbnail => (config.thumbnail_min_ms, config.thumbnail_max_ms),
            ImageVariant::Full => (config.image_min_ms, config.image_max_ms),
        };
        self.latency.random(min_ms, max_ms, token).await?;

        let file_name = last_path_component(url)
            .ok_or_else(|| AppError::NotFound(format!("404: Not Found ({url})")))?;
        let data = self.bundle.read_binary(&file_name).await?;
        if token.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        let image = Arc::new(LoadedImage::decode(&file_name, data)?);
        self.image_cache.insert(url.as_str().to_string(), image.clone());
        debug!("Loaded image {url} ({} bytes)", image.byte_len());
        Ok(image)
    }

    /// `<username>.heic` を読み込む。見つからない場合は None（既定アイコンを表示する）
    pub async fn load_avatar(&self, username: &str) -> Option<Arc<LoadedImage>> {
        let file_name = avatar_file_name(username);
        let cache_key = format!("avatar:{file_name}");
        if let Some(image) = self.image_cache.get(&cache_key) {
            return Some(image);
        }

        let loaded = match self.bundle.read_binary(&file_name).await {
            Ok(data) => LoadedImage::decode(&file_name, data),
            Err(err) => Err(err),
        };
        match loaded {
            Ok(image) => {
                let image = Arc::new(image);
                self.image_cache.insert(cache_key, image.clone());
                Some(image)
            }
            Err(err) => {
                debug!("No avatar for {username}: {err}");
                None
            }
        }
    }

    pub fn image_cache_stats(&self) -> ImageCacheStats {
        self.image_cache.stats()
    }

    pub async fn add_like(&self, post: &Post, token: &CancellationToken) -> Result<()> {
        self.set_liked(post, true, token).await
    }

    pub async fn remove_like(&self, post: &Post, token: &CancellationToken) -> Result<()> {
        self.set_liked(post, false, token).await
    }

    async fn set_liked(&self, post: &Post, liked: bool, token: &CancellationToken) -> Result<()> {
        let config = self.latency.config();
        self.latency
            .random(config.like_min_ms, config.like_max_ms, token)
            .await?;

        // キャンセル確認の後でのみ変更する
        self.store
            .toggle_liked_unless_cancelled(&post.id, liked, token)
            .await?;
        Ok(())
    }
}
