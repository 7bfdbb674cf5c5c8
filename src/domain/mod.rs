pub mod handle;
pub mod post;
pub mod snapshot;

pub use handle::{handle_key, is_valid_handle, normalize_handle, same_handle};
pub use post::{newest_first, permalink, Post, MAX_POSTS_PER_ACCOUNT};
pub use snapshot::FeedSnapshot;
