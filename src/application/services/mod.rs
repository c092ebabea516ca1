pub mod api_client;
pub mod content_store;
pub mod deferred_load;
pub mod optimistic_like;

pub use api_client::SimulatedApiClient;
pub use content_store::{ContentStore, PostsSnapshot, PostsSubscription};
pub use deferred_load::{DeferredOutcome, deferred_load};
pub use optimistic_like::{OptimisticLikes, PendingLike};
