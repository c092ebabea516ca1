use crate::shared::config::LatencyConfig;
use crate::shared::{AppError, Result};
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// 指定時間待機する。待機中にキャンセルされた場合は即座に Cancelled を返す
pub async fn sleep_or_cancel(duration: Duration, token: &CancellationToken) -> Result<()> {
    if duration.is_zero() {
        return if token.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        };
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// 擬似ネットワーク遅延
#[derive(Debug, Clone)]
pub struct SimulatedLatency {
    config: LatencyConfig,
}

impl SimulatedLatency {
    pub fn new(config: LatencyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LatencyConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub async fn fixed(&self, millis: u64, token: &CancellationToken) -> Result<()> {
        let duration = if self.is_enabled() {
            Duration::from_millis(millis)
        } else {
            Duration::ZERO
        };
        trace!("Simulated delay {:?}", duration);
        sleep_or_cancel(duration, token).await
    }

    /// min..=max の範囲でランダムに待機する
    pub async fn random(&self, min_ms: u64, max_ms: u64, token: &CancellationToken) -> Result<()> {
        let millis = if self.is_enabled() {
            rand::thread_rng().gen_range(min_ms..=max_ms.max(min_ms))
        } else {
            0
        };
        self.fixed(millis, token).await
    }

    /// 詳細取得の遅延。呼び出し回数ごとに step ずつ短くなり 0 で止まる
    pub fn details_delay_ms(&self, call_count: u64) -> u64 {
        self.config
            .details_base_ms
            .saturating_sub(self.config.details_step_ms.saturating_mul(call_count))
    }
}
