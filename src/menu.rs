//! Menus built from a [`FeedSnapshot`].
//!
//! Menus are plain data. A front end renders the items and hands the
//! [`MenuAction`] of the chosen item back to the [`Shell`](crate::shell::Shell).

use crate::domain::{FeedSnapshot, Post};
use crate::wrap::wrap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the submenu listing an account's posts
    ShowAccount { handle: String },
    /// Open the submenu showing a full post
    ShowPost { handle: String, id: String },
    /// Open a post in the external viewer
    OpenPost { handle: String, id: String },
    Remove { handle: String },
    Follow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    Normal,
    Header,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub text: String,
    pub action: Option<MenuAction>,
    pub kind: MenuItemKind,
    pub has_children: bool,
}

impl MenuItem {
    pub fn new(text: impl Into<String>, action: MenuAction) -> Self {
        Self {
            text: text.into(),
            action: Some(action),
            kind: MenuItemKind::Normal,
            has_children: false,
        }
    }

    /// Plain text with nothing to activate.
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
            kind: MenuItemKind::Normal,
            has_children: false,
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self {
            kind: MenuItemKind::Header,
            ..Self::label(text)
        }
    }

    pub fn separator() -> Self {
        Self {
            kind: MenuItemKind::Separator,
            ..Self::label("")
        }
    }

    fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    pub fn is_selectable(&self) -> bool {
        self.action.is_some()
    }
}

pub const NO_POSTS: &str = "No posts!";
pub const RECENT_POSTS: &str = "Recent posts";
pub const POST_NOT_FOUND: &str = "Can't find post!";
pub const FOLLOW: &str = "Follow…";

const EMPTY_TITLE: &str = "🐦";
const POSTS_TITLE: &str = "🐥";

/// One post as a menu entry.
///
/// Text longer than `truncate - 2` characters is cut to `truncate - 3`
/// characters plus `...`, and the entry then leads to the full post instead
/// of opening it. `truncate == 0` never cuts.
pub fn post_item(post: &Post, truncate: usize) -> MenuItem {
    let handle = post.canonical_handle.clone();
    let id = post.id.clone();

    if truncate > 0 && post.text.chars().count() > truncate.saturating_sub(2) {
        let mut text: String = post.text.chars().take(truncate.saturating_sub(3)).collect();
        text.push_str("...");
        MenuItem::new(text, MenuAction::ShowPost { handle, id }).with_children()
    } else {
        MenuItem::new(post.text.clone(), MenuAction::OpenPost { handle, id })
    }
}

/// Newest post and an `@handle` entry per tracked account, then `Follow…`.
pub fn root_menu(snapshot: &FeedSnapshot, truncate: usize) -> Vec<MenuItem> {
    let mut items = Vec::with_capacity(snapshot.handles.len() * 2 + 2);

    for handle in &snapshot.handles {
        if let Some(post) = snapshot.newest(handle) {
            items.push(post_item(post, truncate));
        }
        items.push(
            MenuItem::new(
                format!("@{}", handle),
                MenuAction::ShowAccount {
                    handle: handle.clone(),
                },
            )
            .with_children(),
        );
    }

    items.push(MenuItem::separator());
    items.push(MenuItem::new(FOLLOW, MenuAction::Follow));
    items
}

/// Cached posts of one account followed by its `Remove` entry.
pub fn account_menu(snapshot: &FeedSnapshot, handle: &str, truncate: usize) -> Vec<MenuItem> {
    let posts = snapshot.posts_for(handle);
    let mut items = Vec::with_capacity(posts.len() + 3);

    if posts.is_empty() {
        items.push(MenuItem::label(NO_POSTS));
    } else {
        items.push(MenuItem::header(RECENT_POSTS));
        items.extend(posts.iter().map(|post| post_item(post, truncate)));
    }

    items.push(MenuItem::separator());
    items.push(MenuItem::new(
        format!("Remove @{}", handle),
        MenuAction::Remove {
            handle: handle.to_string(),
        },
    ));
    items
}

/// Full text of one post, one entry per wrapped line.
pub fn post_menu(snapshot: &FeedSnapshot, handle: &str, id: &str, width: usize) -> Vec<MenuItem> {
    let Some(post) = snapshot.find_post(handle, id) else {
        return vec![MenuItem::label(POST_NOT_FOUND)];
    };

    let open = || MenuAction::OpenPost {
        handle: post.canonical_handle.clone(),
        id: post.id.clone(),
    };

    let lines = wrap(&post.text, width);
    if lines.is_empty() {
        return vec![MenuItem::new("", open())];
    }
    lines
        .into_iter()
        .map(|line| MenuItem::new(line, open()))
        .collect()
}

/// Title line: the start of the newest post of the first tracked account.
pub fn status_title(snapshot: &FeedSnapshot, chars: usize) -> String {
    match snapshot.handles.first().and_then(|h| snapshot.newest(h)) {
        Some(post) => {
            let preview: String = post.text.chars().take(chars).collect();
            format!("{}{}", POSTS_TITLE, preview)
        }
        None => EMPTY_TITLE.to_string(),
    }
}
