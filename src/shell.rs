//! Glue between a menu front end and the feed store.

use std::sync::Arc;

use tracing::info;

use crate::app::Result;
use crate::config::DisplayConfig;
use crate::domain::{permalink, FeedSnapshot};
use crate::feed::{FeedStore, FollowOutcome, RemoveOutcome};
use crate::menu::{account_menu, post_menu, root_menu, status_title, MenuAction, MenuItem};
use crate::viewer::Viewer;

/// What happened when a menu action was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Submenu { title: String, items: Vec<MenuItem> },
    Opened { url: String },
    Removed(RemoveOutcome),
    /// The front end should ask for a handle and call `on_follow_requested`.
    FollowRequested,
}

pub struct Shell {
    feeds: Arc<FeedStore>,
    viewer: Arc<dyn Viewer + Send + Sync>,
    display: DisplayConfig,
}

impl Shell {
    pub fn new(
        feeds: Arc<FeedStore>,
        viewer: Arc<dyn Viewer + Send + Sync>,
        display: DisplayConfig,
    ) -> Self {
        Self {
            feeds,
            viewer,
            display,
        }
    }

    pub fn feeds(&self) -> &Arc<FeedStore> {
        &self.feeds
    }

    pub fn current_state(&self) -> FeedSnapshot {
        self.feeds.snapshot()
    }

    pub fn title(&self) -> String {
        status_title(&self.current_state(), self.display.title_chars)
    }

    pub fn root_menu(&self) -> Vec<MenuItem> {
        root_menu(&self.current_state(), self.display.truncate)
    }

    pub async fn on_follow_requested(&self, raw_handle: &str) -> Result<FollowOutcome> {
        self.feeds.follow(raw_handle).await
    }

    pub async fn on_remove_requested(&self, handle: &str) -> Result<RemoveOutcome> {
        self.feeds.remove(handle).await
    }

    /// Open a post's permalink in the viewer and return the URL.
    pub fn on_post_activated(&self, handle: &str, id: &str) -> String {
        let url = permalink(self.feeds.base_url(), handle, id);
        info!("Opening post {} by {}", id, handle);
        self.viewer.open_url(&url);
        url
    }

    /// Title and items of the submenu `action` leads to, built from the
    /// current state. `None` for actions that do not open a submenu.
    pub fn submenu(&self, action: &MenuAction) -> Option<(String, Vec<MenuItem>)> {
        match action {
            MenuAction::ShowAccount { handle } => Some(self.account_submenu(handle)),
            MenuAction::ShowPost { handle, id } => Some(self.post_submenu(handle, id)),
            _ => None,
        }
    }

    fn account_submenu(&self, handle: &str) -> (String, Vec<MenuItem>) {
        let items = account_menu(&self.current_state(), handle, self.display.truncate);
        (format!("@{}", handle), items)
    }

    fn post_submenu(&self, handle: &str, id: &str) -> (String, Vec<MenuItem>) {
        let items = post_menu(&self.current_state(), handle, id, self.display.wrap_width);
        (format!("@{}", handle), items)
    }

    pub async fn resolve(&self, action: &MenuAction) -> Result<Resolution> {
        let resolution = match action {
            MenuAction::ShowAccount { handle } => {
                let (title, items) = self.account_submenu(handle);
                Resolution::Submenu { title, items }
            }
            MenuAction::ShowPost { handle, id } => {
                let (title, items) = self.post_submenu(handle, id);
                Resolution::Submenu { title, items }
            }
            MenuAction::OpenPost { handle, id } => Resolution::Opened {
                url: self.on_post_activated(handle, id),
            },
            MenuAction::Remove { handle } => {
                Resolution::Removed(self.on_remove_requested(handle).await?)
            }
            MenuAction::Follow => Resolution::FollowRequested,
        };
        Ok(resolution)
    }
}
