use super::api_client::SimulatedApiClient;
use crate::domain::entities::Post;
use crate::shared::{AppError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// 進行中のいいね更新
pub struct PendingLike {
    /// 確定前に表示する仮の状態
    pub tentative: Post,
    token: CancellationToken,
    handle: JoinHandle<Result<()>>,
}

impl PendingLike {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// リクエストの完了を待つ。失敗時はストアの再通知で仮の状態が巻き戻っている
    pub async fn settle(self) -> Result<()> {
        self.handle
            .await
            .map_err(|err| AppError::Internal(format!("Like task failed: {err}")))?
    }
}

/// いいねの楽観的更新
///
/// 仮の状態を即座に返してリクエストを発行し、失敗またはキャンセル時は
/// ストアの正しい状態を再通知して購読側を整合させる
#[derive(Clone)]
pub struct OptimisticLikes {
    client: Arc<SimulatedApiClient>,
}

impl OptimisticLikes {
    pub fn new(client: Arc<SimulatedApiClient>) -> Self {
        Self { client }
    }

    pub fn toggle(&self, post: &Post, liked: bool, token: CancellationToken) -> PendingLike {
        let mut tentative = post.clone();
        tentative.is_liked = liked;

        let client = self.client.clone();
        let target = post.clone();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            let result = if liked {
                client.add_like(&target, &task_token).await
            } else {
                client.remove_like(&target, &task_token).await
            };

            if let Err(err) = &result {
                if err.is_cancelled() {
                    debug!("Like request for {} cancelled, reverting", target.id);
                } else {
                    warn!("Like request for {} failed, reverting: {err}", target.id);
                }
                client.store().republish().await;
            }
            result
        });

        PendingLike {
            tentative,
            token,
            handle,
        }
    }
}
