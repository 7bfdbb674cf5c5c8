//! # Roost
//!
//! Keeps the latest posts of a handful of social accounts close at hand.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler → FeedStore → Fetcher → Extractor
//!                 ↓
//!         FeedSnapshot → Menu → Shell → TUI / CLI
//! ```
//!
//! Every ten minutes the [`scheduler`] asks the [`feed`] store for a sync
//! pass. The store downloads each tracked account's timeline page, the
//! [`extractor`] turns it into posts, and the freshest accounts move to the
//! top. Front ends read consistent snapshots and render them as [`menu`]s.
//!
//! ## Quick Start
//!
//! ```bash
//! # Track an account
//! roost follow @rustlang
//!
//! # Fetch everything once and print the newest posts
//! roost sync
//!
//! # Browse interactively while syncing in the background
//! roost tui
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires the feed store, persistence,
/// fetcher and shell together.
pub mod app;

/// Command-line interface using clap.
///
/// - `follow <handle>` / `remove <handle>`
/// - `list` - tracked accounts
/// - `sync` - one pass, then a digest of the newest posts
/// - `daemon` - periodic sync in the foreground
/// - `tui` - interactive menu
pub mod cli;

/// Configuration loaded from `~/.config/roost/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Post`](domain::Post): one post from a timeline
/// - [`FeedSnapshot`](domain::FeedSnapshot): tracked list plus cached posts
pub mod domain;

/// Turns timeline markup into posts using configurable CSS selectors.
pub mod extractor;

/// Tracked accounts, the post cache, the fetch gate and sync passes.
pub mod feed;

/// HTTP fetching behind the [`Fetcher`](fetcher::Fetcher) trait.
pub mod fetcher;

/// Menus as plain data, built from a snapshot.
pub mod menu;

/// Periodic sync driver.
pub mod scheduler;

/// Dispatches menu actions to the feed store and the viewer.
pub mod shell;

/// Tracked-list persistence.
///
/// - [`KeyValueStore`](store::KeyValueStore): load/store string lists by key
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Terminal menu built with ratatui.
///
/// Keybindings: j/k move, Enter opens, Esc goes back, o opens in the
/// browser, a follows, d removes, R refreshes, q quits.
pub mod tui;

/// Opening permalinks in the default browser.
pub mod viewer;

/// Greedy word wrapping for post text.
pub mod wrap;
