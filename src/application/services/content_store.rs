mod subscription;

pub use subscription::{PostsSnapshot, PostsSubscription};

use crate::application::ports::{BundleReader, KeyValueStore, read_json};
use crate::domain::entities::{Comment, Post, PostsResponse};
use crate::domain::value_objects::LikedSet;
use crate::shared::{AppError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const POSTS_FILE: &str = "posts.json";
pub const LIKED_POSTS_KEY: &str = "likedPosts";

struct StoreState {
    posts: Vec<Post>,
    liked: LikedSet,
    published: PostsSnapshot,
}

impl StoreState {
    fn apply_liked_overlay(&mut self) {
        for post in &mut self.posts {
            post.is_liked = self.liked.contains(&post.id);
        }
    }

    fn position(&self, post_id: &str) -> Result<usize> {
        self.posts
            .iter()
            .position(|post| post.id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("Post {post_id}")))
    }
}

/// 投稿状態の唯一の書き手
///
/// 読み取り・マージ・書き込み・通知はすべて1つのロック内で行うため、
/// 通知は変更順に全購読者へ届く
pub struct ContentStore {
    state: Mutex<StoreState>,
    preferences: Arc<dyn KeyValueStore>,
    sender: broadcast::Sender<PostsSnapshot>,
}

impl ContentStore {
    /// 同梱の `posts.json` と永続化済みのいいね集合から構築する
    pub async fn load(
        bundle: &dyn BundleReader,
        preferences: Arc<dyn KeyValueStore>,
        broadcast_capacity: usize,
    ) -> Result<Self> {
        let response: PostsResponse = read_json(bundle, POSTS_FILE).await.map_err(|err| {
            AppError::ConfigurationError(format!("Bundled {POSTS_FILE} is unusable: {err}"))
        })?;
        Self::new(response.posts, preferences, broadcast_capacity).await
    }

    pub async fn new(
        posts: Vec<Post>,
        preferences: Arc<dyn KeyValueStore>,
        broadcast_capacity: usize,
    ) -> Result<Self> {
        let liked = LikedSet::from(preferences.get_string_set(LIKED_POSTS_KEY).await?);
        let (sender, _) = broadcast::channel(broadcast_capacity.max(1));

        let mut state = StoreState {
            posts,
            liked,
            published: Arc::new(Vec::new()),
        };
        state.apply_liked_overlay();
        info!(
            "Content store ready with {} posts ({} liked)",
            state.posts.len(),
            state.liked.len()
        );

        Ok(Self {
            state: Mutex::new(state),
            preferences,
            sender,
        })
    }

    pub fn subscribe(&self) -> PostsSubscription {
        PostsSubscription::new(self.sender.subscribe())
    }

    /// ロック保持中に呼ぶこと
    fn publish(&self, state: &mut StoreState) {
        let snapshot: PostsSnapshot = Arc::new(state.posts.clone());
        state.published = snapshot.clone();
        // 購読者がいなくてもエラーにしない
        let _ = self.sender.send(snapshot);
    }

    /// いいね状態を反映した全投稿を返し、購読者へ通知する
    pub async fn load_posts(&self) -> Vec<Post> {
        let mut state = self.state.lock().await;
        state.apply_liked_overlay();
        self.publish(&mut state);
        state.posts.clone()
    }

    /// 最後に通知した投稿リスト
    pub async fn loaded_posts(&self) -> PostsSnapshot {
        let state = self.state.lock().await;
        state.published.clone()
    }

    pub async fn post(&self, post_id: &str) -> Option<Post> {
        let state = self.state.lock().await;
        state.posts.iter().find(|post| post.id == post_id).cloned()
    }

    /// 投稿にコメントを設定する。既に設定済みの場合は何もせず現在の投稿を返す
    pub async fn set_comments(&self, post_id: &str, comments: Vec<Comment>) -> Result<Post> {
        let mut state = self.state.lock().await;
        let index = state.position(post_id)?;

        if !state.posts[index].apply_comments(comments) {
            debug!("Post {post_id} already has comments, keeping existing list");
            return Ok(state.posts[index].clone());
        }

        info!(
            "Loaded {} comments for post {post_id}",
            state.posts[index].number_of_comments
        );
        self.publish(&mut state);
        Ok(state.posts[index].clone())
    }

    /// いいね状態を更新して永続化し、全投稿を再計算して通知する
    pub async fn toggle_liked(&self, post_id: &str, liked: bool) -> Result<Vec<Post>> {
        self.update_liked(post_id, liked, None).await
    }

    /// キャンセル確認と変更を同じロック内で行う
    pub(crate) async fn toggle_liked_unless_cancelled(
        &self,
        post_id: &str,
        liked: bool,
        token: &CancellationToken,
    ) -> Result<Vec<Post>> {
        self.update_liked(post_id, liked, Some(token)).await
    }

    async fn update_liked(
        &self,
        post_id: &str,
        liked: bool,
        token: Option<&CancellationToken>,
    ) -> Result<Vec<Post>> {
        let mut state = self.state.lock().await;
        if token.is_some_and(CancellationToken::is_cancelled) {
            return Err(AppError::Cancelled);
        }
        state.position(post_id)?;

        let mut next = state.liked.clone();
        if next.set(post_id, liked) {
            self.preferences
                .set_string_set(LIKED_POSTS_KEY, next.as_set())
                .await?;
            state.liked = next;
            info!("Post {post_id} liked={liked}");
        }

        state.apply_liked_overlay();
        self.publish(&mut state);
        Ok(state.posts.clone())
    }

    /// 現在の状態を再通知する（楽観的更新の巻き戻し用）
    pub async fn republish(&self) {
        let mut state = self.state.lock().await;
        self.publish(&mut state);
    }

    pub async fn liked_ids(&self) -> HashSet<String> {
        let state = self.state.lock().await;
        state.liked.as_set().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shared::tests::fixtures::{
        FailingKeyValueStore, sample_comments, sample_post, sample_posts_json,
    };
    use crate::infrastructure::{MemoryBundle, MemoryKeyValueStore};

    async fn setup_store() -> (ContentStore, Arc<MemoryKeyValueStore>) {
        let preferences = Arc::new(MemoryKeyValueStore::new());
        let posts = vec![sample_post("p1", 3), sample_post("p2", 0), sample_post("p3", 1)];
        let store = ContentStore::new(posts, preferences.clone(), 16).await.unwrap();
        (store, preferences)
    }

    #[tokio::test]
    async fn test_load_from_bundle() {
        let bundle = MemoryBundle::new().with_file(POSTS_FILE, sample_posts_json(&["a", "b"]));
        let store = ContentStore::load(&bundle, Arc::new(MemoryKeyValueStore::new()), 4)
            .await
            .unwrap();

        let posts = store.load_posts().await;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "a");
    }

    #[tokio::test]
    async fn test_missing_fixture_is_configuration_error() {
        let bundle = MemoryBundle::new();
        let result = ContentStore::load(&bundle, Arc::new(MemoryKeyValueStore::new()), 4).await;
        assert!(matches!(result, Err(AppError::ConfigurationError(_))));
    }

    #[tokio::test]
    async fn test_persisted_likes_are_overlaid_on_load() {
        let preferences = Arc::new(MemoryKeyValueStore::new());
        let ids: HashSet<String> = ["p2".to_string()].into_iter().collect();
        preferences.set_string_set(LIKED_POSTS_KEY, &ids).await.unwrap();

        let mut post = sample_post("p1", 0);
        // フィクスチャ側の値は無視される
        post.is_liked = true;
        let store = ContentStore::new(vec![post, sample_post("p2", 0)], preferences, 4)
            .await
            .unwrap();

        let posts = store.load_posts().await;
        assert!(!posts[0].is_liked);
        assert!(posts[1].is_liked);
    }

    #[tokio::test]
    async fn test_toggle_liked_round_trip() {
        let (store, preferences) = setup_store().await;

        let posts = store.toggle_liked("p1", true).await.unwrap();
        assert!(posts.iter().find(|p| p.id == "p1").unwrap().is_liked);
        assert!(store.load_posts().await[0].is_liked);
        assert!(preferences.get_string_set(LIKED_POSTS_KEY).await.unwrap().contains("p1"));

        store.toggle_liked("p1", false).await.unwrap();
        assert!(!store.load_posts().await[0].is_liked);
        assert!(store.liked_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_unknown_post_is_not_found() {
        let (store, _) = setup_store().await;
        let err = store.toggle_liked("nope", true).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_state_unchanged() {
        let store = ContentStore::new(
            vec![sample_post("p1", 0)],
            Arc::new(FailingKeyValueStore),
            4,
        )
        .await
        .unwrap();
        let mut subscription = store.subscribe();

        let err = store.toggle_liked("p1", true).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(store.liked_ids().await.is_empty());
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_token_skips_mutation() {
        let (store, _) = setup_store().await;
        let token = CancellationToken::new();
        token.cancel();

        let err = store
            .toggle_liked_unless_cancelled("p1", true, &token)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(store.liked_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_comments_is_idempotent() {
        let (store, _) = setup_store().await;

        let first = store.set_comments("p1", sample_comments(3)).await.unwrap();
        assert_eq!(first.comments.as_ref().unwrap().len(), 3);

        let second = store
            .set_comments("p1", vec![Comment::new("other", "mario", "late")])
            .await
            .unwrap();
        assert_eq!(second.comments, first.comments);
        assert_eq!(store.post("p1").await.unwrap().comments, first.comments);
    }

    #[tokio::test]
    async fn test_set_comments_unknown_post() {
        let (store, _) = setup_store().await;
        assert!(store
            .set_comments("missing", sample_comments(1))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_mutations_are_broadcast_in_order() {
        let (store, _) = setup_store().await;
        let mut subscription = store.subscribe();

        store.toggle_liked("p1", true).await.unwrap();
        store.set_comments("p2", sample_comments(2)).await.unwrap();
        store.toggle_liked("p3", true).await.unwrap();

        let first = subscription.recv().await.unwrap();
        assert!(first[0].is_liked);
        assert!(first[1].comments.is_none());

        let second = subscription.recv().await.unwrap();
        assert_eq!(second[1].comments.as_ref().unwrap().len(), 2);
        assert!(!second[2].is_liked);

        let third = subscription.recv().await.unwrap();
        assert!(third[2].is_liked);
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_to_latest_snapshot() {
        let posts = vec![sample_post("p1", 0), sample_post("p2", 0), sample_post("p3", 0)];
        let store = ContentStore::new(posts, Arc::new(MemoryKeyValueStore::new()), 1)
            .await
            .unwrap();
        let mut slow = store.subscribe();
        let mut polling = store.subscribe();

        store.toggle_liked("p1", true).await.unwrap();
        store.toggle_liked("p2", true).await.unwrap();
        store.toggle_liked("p3", true).await.unwrap();

        let latest = slow.recv().await.unwrap();
        assert!(latest.iter().all(|post| post.is_liked));
        assert!(slow.try_recv().is_none());

        let latest = polling.try_recv().unwrap();
        assert!(latest.iter().all(|post| post.is_liked));
        assert!(polling.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_noop_set_comments_does_not_broadcast() {
        let (store, _) = setup_store().await;
        store.set_comments("p1", sample_comments(1)).await.unwrap();

        let mut subscription = store.subscribe();
        store.set_comments("p1", sample_comments(2)).await.unwrap();
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_loaded_posts_tracks_last_publish() {
        let (store, _) = setup_store().await;
        assert!(store.loaded_posts().await.is_empty());

        store.load_posts().await;
        assert_eq!(store.loaded_posts().await.len(), 3);

        store.toggle_liked("p2", true).await.unwrap();
        assert!(store.loaded_posts().await[1].is_liked);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_all_land() {
        let (store, _) = setup_store().await;
        let store = Arc::new(store);
        let mut subscription = store.subscribe();

        let handles: Vec<_> = ["p1", "p2", "p3"]
            .into_iter()
            .map(|id| {
                let store = store.clone();
                tokio::spawn(async move { store.toggle_liked(id, true).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.liked_ids().await.len(), 3);
        // 各通知は直前の通知より多くのいいねを含む
        let mut previous = 0;
        for _ in 0..3 {
            let snapshot = subscription.recv().await.unwrap();
            let liked = snapshot.iter().filter(|p| p.is_liked).count();
            assert_eq!(liked, previous + 1);
            previous = liked;
        }
    }
}
