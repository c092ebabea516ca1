use crate::shared::AppError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// [`deferred_load`] の結果
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredOutcome<V> {
    /// 待機時間内に読み込みが完了した
    Loaded(V),
    /// 待機時間内に読み込みが失敗した。元の値で遷移する
    Fallback(V),
    /// 待機時間を超えた。元の値で遷移し、読み込みは破棄する
    TimedOut(V),
    /// 呼び出し側が中断した、または読み込みがキャンセルを返した。遷移しない
    Abandoned,
}

impl<V> DeferredOutcome<V> {
    /// 遷移先に渡す値
    pub fn into_value(self) -> Option<V> {
        match self {
            DeferredOutcome::Loaded(v)
            | DeferredOutcome::Fallback(v)
            | DeferredOutcome::TimedOut(v) => Some(v),
            DeferredOutcome::Abandoned => None,
        }
    }
}

/// 読み込みとタイマーを競争させ、先に終わった方の結果で遷移する
///
/// 短時間で終わる読み込みでは読み込み中表示のちらつきを避け、
/// 長い読み込みでは `max_delay` 後に元の値で遷移する
pub async fn deferred_load<V, F, Fut>(
    value: V,
    max_delay: Duration,
    token: &CancellationToken,
    load: F,
) -> DeferredOutcome<V>
where
    V: Clone,
    F: FnOnce(V) -> Fut,
    Fut: Future<Output = Result<V, AppError>>,
{
    if token.is_cancelled() {
        return DeferredOutcome::Abandoned;
    }

    let load = load(value.clone());
    tokio::select! {
        biased;
        _ = token.cancelled() => DeferredOutcome::Abandoned,
        result = load => match result {
            Ok(updated) => DeferredOutcome::Loaded(updated),
            Err(err) if err.is_cancelled() => DeferredOutcome::Abandoned,
            Err(err) => {
                debug!("Deferred load failed, falling back to original value: {err}");
                DeferredOutcome::Fallback(value)
            }
        },
        _ = tokio::time::sleep(max_delay) => DeferredOutcome::TimedOut(value),
    }
}
