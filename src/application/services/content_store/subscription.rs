use crate::domain::entities::Post;
use std::sync::Arc;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::warn;

pub type PostsSnapshot = Arc<Vec<Post>>;

/// 投稿リスト更新通知の購読
///
/// 通知は常に全件のスナップショットなので、遅れて取りこぼした場合は
/// 最新の通知まで読み飛ばせば整合する
pub struct PostsSubscription {
    receiver: broadcast::Receiver<PostsSnapshot>,
}

impl PostsSubscription {
    pub(super) fn new(receiver: broadcast::Receiver<PostsSnapshot>) -> Self {
        Self { receiver }
    }

    /// 次の通知を待つ。ストアが破棄されると None
    pub async fn recv(&mut self) -> Option<PostsSnapshot> {
        loop {
            match self.receiver.recv().await {
                Ok(posts) => return Some(posts),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Posts subscriber lagged behind, skipped {skipped} updates");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// 届いている通知があれば取り出す
    pub fn try_recv(&mut self) -> Option<PostsSnapshot> {
        loop {
            match self.receiver.try_recv() {
                Ok(posts) => return Some(posts),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Posts subscriber lagged behind, skipped {skipped} updates");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
