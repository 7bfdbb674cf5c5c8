use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on posts kept per account.
pub const MAX_POSTS_PER_ACCOUNT: usize = 10;

/// One post retrieved from an account's timeline page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_handle: String,
    /// The tracked handle this post is filed under.
    pub canonical_handle: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub avatar_url: Option<String>,
}

impl Post {
    pub fn new(
        id: impl Into<String>,
        author_handle: impl Into<String>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let author_handle = author_handle.into();
        Self {
            id: id.into(),
            canonical_handle: author_handle.clone(),
            author_handle,
            text: text.into(),
            timestamp,
            avatar_url: None,
        }
    }

    /// Permalink of this post on the source service.
    pub fn permalink(&self, base_url: &str) -> String {
        permalink(base_url, &self.canonical_handle, &self.id)
    }
}

/// `{base}/{handle}/status/{id}`
pub fn permalink(base_url: &str, handle: &str, id: &str) -> String {
    format!("{}/{}/status/{}", base_url.trim_end_matches('/'), handle, id)
}

/// Sort newest first and keep at most [`MAX_POSTS_PER_ACCOUNT`] posts.
///
/// The sort is stable, so posts sharing a timestamp keep their document order.
pub fn newest_first(posts: &mut Vec<Post>) {
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    posts.truncate(MAX_POSTS_PER_ACCOUNT);
}
