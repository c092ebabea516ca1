//! Pawtraits のフィードクライアント中核
//!
//! 投稿・コメント・いいね・画像を扱う擬似 API クライアントと、
//! その状態を保持するコンテンツストアを提供する

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::services::{
    ContentStore, DeferredOutcome, OptimisticLikes, PendingLike, PostsSnapshot, PostsSubscription,
    SimulatedApiClient, deferred_load,
};
pub use domain::{Comment, ImageVariant, LoadedImage, Post, Profile};
pub use shared::{AppConfig, AppError, Result};
pub use state::AppState;
