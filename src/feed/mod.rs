//! Tracked accounts and their cached posts.

pub mod cache;
pub mod clock;
pub mod gate;
pub mod order;
pub mod store;

pub use cache::AccountCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{FetchGate, MIN_FETCH_SPACING, SYNC_PERIOD};
pub use store::{FeedStore, FollowOutcome, RemoveOutcome, SyncReport};
