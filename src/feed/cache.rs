use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{handle_key, newest_first, Post};

/// Most recent posts per account.
///
/// Lookups ignore case. An empty entry means "no posts found", a missing one means "never fetched".
#[derive(Debug, Clone, Default)]
pub struct AccountCache {
    entries: HashMap<String, Vec<Post>>,
}

impl AccountCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `handle` (any casing) with `posts`.
    pub fn insert(&mut self, handle: &str, mut posts: Vec<Post>) {
        newest_first(&mut posts);
        self.entries.insert(handle_key(handle), posts);
    }

    pub fn get(&self, handle: &str) -> Option<&[Post]> {
        self.entries
            .get(&handle_key(handle))
            .map(Vec::as_slice)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.entries.contains_key(&handle_key(handle))
    }

    pub fn remove(&mut self, handle: &str) -> Option<Vec<Post>> {
        self.entries.remove(&handle_key(handle))
    }

    pub fn newest_timestamp(&self, handle: &str) -> Option<DateTime<Utc>> {
        self.get(handle)
            .and_then(|posts| posts.first())
            .map(|p| p.timestamp)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
