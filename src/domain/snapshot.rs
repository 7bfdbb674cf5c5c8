use std::collections::HashMap;

use crate::domain::{handle_key, Post};

/// Consistent copy of the tracked list and its cached posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Tracked handles in display order.
    pub handles: Vec<String>,
    posts: HashMap<String, Vec<Post>>,
}

impl FeedSnapshot {
    pub fn new(handles: Vec<String>, posts: impl IntoIterator<Item = (String, Vec<Post>)>) -> Self {
        let posts = posts
            .into_iter()
            .map(|(handle, posts)| (handle_key(&handle), posts))
            .collect();
        Self { handles, posts }
    }

    pub fn posts_for(&self, handle: &str) -> &[Post] {
        self.posts
            .get(&handle_key(handle))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn newest(&self, handle: &str) -> Option<&Post> {
        self.posts_for(handle).first()
    }

    pub fn find_post(&self, handle: &str, id: &str) -> Option<&Post> {
        self.posts_for(handle).iter().find(|p| p.id == id)
    }

    pub fn total_posts(&self) -> usize {
        self.handles.iter().map(|h| self.posts_for(h).len()).sum()
    }
}
