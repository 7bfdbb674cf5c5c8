use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::app::{Result, RoostError};
use crate::config::SourceConfig;
use crate::domain::{is_valid_handle, normalize_handle, same_handle, FeedSnapshot};
use crate::extractor::{Timeline, TimelineExtractor};
use crate::feed::cache::AccountCache;
use crate::feed::clock::{Clock, SystemClock};
use crate::feed::gate::FetchGate;
use crate::feed::order::sort_by_freshness;
use crate::fetcher::{timeline_url, Fetcher};
use crate::store::{KeyValueStore, TRACKED_HANDLES_KEY};

/// Outcome of one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Handles whose cache entry was replaced.
    pub refreshed: usize,
    /// Handles whose page did not mention them; cached as zero posts.
    pub unresolved: Vec<String>,
    /// Handles whose fetch or extraction failed; prior entry kept.
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    Added { handle: String, posts: usize },
    AlreadyTracked { handle: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { handle: String },
    NotTracked,
}

#[derive(Debug, Default)]
struct FeedState {
    tracked: Vec<String>,
    cache: AccountCache,
}

impl FeedState {
    fn find_tracked(&self, handle: &str) -> Option<&String> {
        self.tracked.iter().find(|h| same_handle(h, handle))
    }

    fn reorder(&mut self) {
        let cache = &self.cache;
        sort_by_freshness(&mut self.tracked, |h| cache.newest_timestamp(h));
    }
}

/// Owner of the tracked account list, the post cache and the fetch gate.
///
/// Built once at startup and shared behind an `Arc`. Mutations (sync pass,
/// follow, remove) are serialized by the writer lock, which also guards the
/// fetch gate. The list and cache sit together behind a read-write lock that
/// writers only take to publish a finished result, so a reader always sees a
/// matching list/cache pair.
pub struct FeedStore {
    state: RwLock<FeedState>,
    writer: Mutex<FetchGate>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    extractor: TimelineExtractor,
    persistence: Arc<dyn KeyValueStore + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
    base_url: String,
}

impl FeedStore {
    /// Load the tracked list and build an empty cache.
    ///
    /// Falls back to `initial_handles` when nothing has been persisted yet.
    pub fn open(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        persistence: Arc<dyn KeyValueStore + Send + Sync>,
        extractor: TimelineExtractor,
        source: &SourceConfig,
    ) -> Result<Self> {
        let loaded = match persistence.load(TRACKED_HANDLES_KEY)? {
            Some(handles) => handles,
            None => source.initial_handles.clone(),
        };

        let mut tracked: Vec<String> = Vec::with_capacity(loaded.len());
        for raw in &loaded {
            let handle = normalize_handle(raw);
            if !is_valid_handle(handle) || tracked.iter().any(|h| same_handle(h, handle)) {
                warn!("Dropping tracked handle {:?}", raw);
                continue;
            }
            tracked.push(handle.to_string());
        }
        info!("Tracking {} accounts", tracked.len());

        Ok(Self {
            state: RwLock::new(FeedState {
                tracked,
                cache: AccountCache::new(),
            }),
            writer: Mutex::new(FetchGate::new()),
            fetcher,
            extractor,
            persistence,
            clock: Arc::new(SystemClock),
            base_url: source.base_url.clone(),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Copy of the tracked list and cached posts, taken under one read lock.
    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.read();
        let posts = state
            .tracked
            .iter()
            .filter_map(|h| state.cache.get(h).map(|p| (h.clone(), p.to_vec())))
            .collect::<Vec<_>>();
        FeedSnapshot::new(state.tracked.clone(), posts)
    }

    pub fn tracked_handles(&self) -> Vec<String> {
        self.state.read().tracked.clone()
    }

    /// Refresh every tracked account, then reorder the list by freshness.
    ///
    /// Only the fetch gate fails the pass; per-account failures are logged,
    /// keep that account's previous posts, and show up in the report.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        let mut gate = self.writer.lock().await;

        let now = self.clock.now();
        if !gate.may_fetch_at(now) {
            let last_attempt = gate.last_attempt().unwrap_or(now);
            return Err(RoostError::RateLimited { last_attempt });
        }
        gate.record_attempt_at(now);

        let tracked = self.tracked_handles();
        let mut staged: Vec<(usize, Timeline)> = Vec::with_capacity(tracked.len());
        let mut report = SyncReport::default();

        for (position, handle) in tracked.iter().enumerate() {
            match self.fetch_timeline(handle).await {
                Ok(timeline) => staged.push((position, timeline)),
                Err(e) => {
                    warn!("Error fetching {}: {}", handle, e);
                    report.failed.push(handle.clone());
                }
            }
        }

        let mut guard = self.state.write();
        let state = &mut *guard;
        for (position, timeline) in staged {
            let Some(tracked_handle) = state.tracked.get_mut(position) else {
                continue;
            };
            match timeline.canonical_handle {
                Some(canonical) => {
                    state.cache.insert(&canonical, timeline.posts);
                    if *tracked_handle != canonical {
                        info!("Handle {} is now {}", tracked_handle, canonical);
                        *tracked_handle = canonical;
                    }
                    report.refreshed += 1;
                }
                None => {
                    info!("No posts by {} on its own page", tracked_handle);
                    state.cache.insert(tracked_handle, Vec::new());
                    report.unresolved.push(tracked_handle.clone());
                }
            }
        }
        state.reorder();

        info!(
            "Sync complete: {} refreshed, {} unresolved, {} failed",
            report.refreshed,
            report.unresolved.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Start tracking `raw_handle` (leading `@` and whitespace ignored).
    ///
    /// Fetches the new account right away, outside the fetch gate. The list
    /// is left untouched if that fetch fails.
    pub async fn follow(&self, raw_handle: &str) -> Result<FollowOutcome> {
        let handle = normalize_handle(raw_handle);
        if !is_valid_handle(handle) {
            return Err(RoostError::InvalidHandle(raw_handle.to_string()));
        }

        let _writer = self.writer.lock().await;

        let existing = self.state.read().find_tracked(handle).cloned();
        if let Some(handle) = existing {
            return Ok(FollowOutcome::AlreadyTracked { handle });
        }

        let timeline =
            self.fetch_timeline(handle)
                .await
                .map_err(|e| RoostError::FollowFetchFailed {
                    handle: handle.to_string(),
                    reason: failure_reason(e),
                })?;

        let (canonical, posts) = match timeline.canonical_handle {
            Some(canonical) => (canonical, timeline.posts),
            None => (handle.to_string(), Vec::new()),
        };
        let count = posts.len();

        let tracked = {
            let mut state = self.state.write();
            state.cache.insert(&canonical, posts);
            state.tracked.push(canonical.clone());
            state.tracked.clone()
        };
        self.persist(&tracked);

        info!("Following {} ({} posts)", canonical, count);
        Ok(FollowOutcome::Added {
            handle: canonical,
            posts: count,
        })
    }

    /// Stop tracking `handle`. Matches the stored casing exactly.
    pub async fn remove(&self, handle: &str) -> Result<RemoveOutcome> {
        let _writer = self.writer.lock().await;

        let tracked = {
            let mut state = self.state.write();
            let Some(position) = state.tracked.iter().position(|h| h == handle) else {
                return Ok(RemoveOutcome::NotTracked);
            };
            state.tracked.remove(position);
            state.cache.remove(handle);
            state.tracked.clone()
        };
        self.persist(&tracked);

        info!("Removed {}", handle);
        Ok(RemoveOutcome::Removed {
            handle: handle.to_string(),
        })
    }

    async fn fetch_timeline(&self, handle: &str) -> Result<Timeline> {
        let fetch_failed = |e: RoostError| RoostError::FetchFailed {
            handle: handle.to_string(),
            reason: e.to_string(),
        };

        let url = timeline_url(&self.base_url, handle).map_err(fetch_failed)?;
        let body = self.fetcher.fetch(&url).await.map_err(fetch_failed)?;
        let timeline = self.extractor.extract(handle, &body)?;

        info!(
            "Got {} posts for {}",
            timeline.posts.len(),
            timeline.canonical_handle.as_deref().unwrap_or(handle)
        );
        Ok(timeline)
    }

    fn persist(&self, tracked: &[String]) {
        if let Err(e) = self.persistence.store(TRACKED_HANDLES_KEY, tracked) {
            error!("Failed to persist tracked handles: {}", e);
        }
    }
}

fn failure_reason(e: RoostError) -> String {
    match e {
        RoostError::FetchFailed { reason, .. } | RoostError::ExtractionFailed { reason, .. } => {
            reason
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    use crate::extractor::ExtractorConfig;
    use crate::feed::clock::ManualClock;
    use crate::fetcher::StaticFetcher;
    use crate::store::MemoryStore;

    const BASE: &str = "https://social.example";

    fn page(author: &str, posts: &[(&str, i64)]) -> String {
        let fragments: String = posts
            .iter()
            .map(|(id, time)| {
                format!(
                    r#"<div class="tweet"><a class="tweet-timestamp" href="/{author}/status/{id}">
                       <span class="_timestamp" data-time="{time}"></span></a>
                       <p class="tweet-text">post {id}</p></div>"#
                )
            })
            .collect();
        format!("<html><body>{fragments}</body></html>")
    }

    fn url(handle: &str) -> String {
        format!("{BASE}/{handle}")
    }

    struct Harness {
        fetcher: Arc<StaticFetcher>,
        persistence: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        feeds: FeedStore,
    }

    fn harness(tracked: &[&str]) -> Harness {
        let fetcher = Arc::new(StaticFetcher::new());
        let persistence = Arc::new(MemoryStore::with_values(TRACKED_HANDLES_KEY, tracked));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
        ));
        let source = SourceConfig {
            base_url: BASE.to_string(),
            ..Default::default()
        };
        let feeds = FeedStore::open(
            fetcher.clone(),
            persistence.clone(),
            TimelineExtractor::new(ExtractorConfig::default()).unwrap(),
            &source,
        )
        .unwrap()
        .with_clock(clock.clone());

        Harness {
            fetcher,
            persistence,
            clock,
            feeds,
        }
    }

    #[tokio::test]
    async fn test_sync_orders_by_freshness() {
        let h = harness(&["C", "B", "A"]);
        h.fetcher.serve(url("A"), page("A", &[("1", 300)]));
        h.fetcher.serve(url("B"), page("B", &[("2", 200)]));
        h.fetcher.serve(url("C"), page("C", &[]));

        let report = h.feeds.sync_all().await.unwrap();

        assert_eq!(h.feeds.tracked_handles(), ["A", "B", "C"]);
        assert_eq!(report.refreshed, 2);
        assert_eq!(report.unresolved, ["C"]);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_fetches_sequentially_in_list_order() {
        let h = harness(&["x", "y", "z"]);
        for handle in ["x", "y", "z"] {
            h.fetcher.serve(url(handle), page(handle, &[("1", 1)]));
        }
        h.feeds.sync_all().await.unwrap();
        assert_eq!(h.fetcher.requests(), [url("x"), url("y"), url("z")]);
    }

    #[tokio::test]
    async fn test_second_sync_inside_window_is_rate_limited() {
        let h = harness(&["a"]);
        h.fetcher.serve(url("a"), page("a", &[("1", 100)]));
        h.feeds.sync_all().await.unwrap();
        let before = h.feeds.snapshot();

        h.fetcher.serve(url("a"), page("a", &[("2", 200)]));
        h.clock.advance(TimeDelta::minutes(8));
        let err = h.feeds.sync_all().await.unwrap_err();

        assert!(matches!(err, RoostError::RateLimited { .. }));
        assert_eq!(h.feeds.snapshot(), before);
        assert_eq!(h.fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_sync_after_window_proceeds() {
        let h = harness(&["a"]);
        h.fetcher.serve(url("a"), page("a", &[("1", 100)]));
        h.feeds.sync_all().await.unwrap();

        h.fetcher.serve(url("a"), page("a", &[("2", 200)]));
        h.clock.advance(TimeDelta::minutes(9));
        h.feeds.sync_all().await.unwrap();

        assert_eq!(h.feeds.snapshot().newest("a").unwrap().id, "2");
    }

    #[tokio::test]
    async fn test_failed_pass_still_counts_against_window() {
        let h = harness(&["a"]);
        h.fetcher.fail(url("a"), "timed out");

        let report = h.feeds.sync_all().await.unwrap();
        assert_eq!(report.failed, ["a"]);

        h.clock.advance(TimeDelta::minutes(1));
        assert!(matches!(
            h.feeds.sync_all().await,
            Err(RoostError::RateLimited { .. })
        ));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_posts() {
        let h = harness(&["a", "b"]);
        h.fetcher.serve(url("a"), page("a", &[("1", 100)]));
        h.fetcher.serve(url("b"), page("b", &[("5", 50)]));
        h.feeds.sync_all().await.unwrap();

        h.fetcher.fail(url("a"), "connection reset");
        h.fetcher.serve(url("b"), page("b", &[("6", 600)]));
        h.clock.advance(TimeDelta::minutes(10));
        let report = h.feeds.sync_all().await.unwrap();

        let snapshot = h.feeds.snapshot();
        assert_eq!(report.failed, ["a"]);
        assert_eq!(snapshot.newest("a").unwrap().id, "1");
        assert_eq!(snapshot.newest("b").unwrap().id, "6");
        assert_eq!(snapshot.handles, ["b", "a"]);
    }

    #[tokio::test]
    async fn test_invalid_markup_is_a_per_handle_failure() {
        let h = harness(&["a", "b"]);
        h.fetcher.serve(url("a"), vec![0xff, 0xfe]);
        h.fetcher.serve(url("b"), page("b", &[("1", 1)]));

        let report = h.feeds.sync_all().await.unwrap();
        assert_eq!(report.failed, ["a"]);
        assert_eq!(report.refreshed, 1);
        assert!(h.feeds.snapshot().posts_for("a").is_empty());
    }

    #[tokio::test]
    async fn test_sync_corrects_handle_casing() {
        let h = harness(&["rustlang"]);
        h.fetcher.serve(url("rustlang"), page("RustLang", &[("1", 100)]));

        h.feeds.sync_all().await.unwrap();

        let snapshot = h.feeds.snapshot();
        assert_eq!(snapshot.handles, ["RustLang"]);
        assert_eq!(snapshot.newest("RustLang").unwrap().canonical_handle, "RustLang");
        // Reordering alone is not persisted.
        assert_eq!(h.persistence.writes(), 0);
    }

    #[tokio::test]
    async fn test_sync_with_nothing_tracked() {
        let h = harness(&[]);
        let report = h.feeds.sync_all().await.unwrap();
        assert_eq!(report, SyncReport::default());
        assert!(h.fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cached_lists_stay_bounded() {
        let h = harness(&["a"]);
        let posts: Vec<(String, i64)> = (0..25).map(|i| (i.to_string(), i * 7)).collect();
        let posts: Vec<(&str, i64)> = posts.iter().map(|(id, t)| (id.as_str(), *t)).collect();
        h.fetcher.serve(url("a"), page("a", &posts));

        h.feeds.sync_all().await.unwrap();

        let snapshot = h.feeds.snapshot();
        let cached = snapshot.posts_for("a");
        assert_eq!(cached.len(), 10);
        assert!(cached.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_follow_existing_is_noop() {
        let h = harness(&["foo"]);

        let outcome = h.feeds.follow("  @Foo ").await.unwrap();

        assert_eq!(
            outcome,
            FollowOutcome::AlreadyTracked {
                handle: "foo".into()
            }
        );
        assert_eq!(h.feeds.tracked_handles().len(), 1);
        assert!(h.fetcher.requests().is_empty());
        assert_eq!(h.persistence.writes(), 0);
    }

    #[tokio::test]
    async fn test_follow_adds_fetches_and_persists() {
        let h = harness(&["a"]);
        h.fetcher.serve(url("a"), page("a", &[("1", 100)]));
        h.feeds.sync_all().await.unwrap();

        // Right after a pass, so the gate would refuse a sync.
        h.fetcher.serve(url("newbie"), page("NewBie", &[("7", 50), ("8", 70)]));
        let outcome = h.feeds.follow("@newbie").await.unwrap();

        assert_eq!(
            outcome,
            FollowOutcome::Added {
                handle: "NewBie".into(),
                posts: 2
            }
        );
        assert_eq!(h.feeds.tracked_handles(), ["a", "NewBie"]);
        assert_eq!(h.feeds.snapshot().newest("NewBie").unwrap().id, "8");
        assert_eq!(
            h.persistence.load(TRACKED_HANDLES_KEY).unwrap(),
            Some(vec!["a".to_string(), "NewBie".to_string()])
        );
    }

    #[tokio::test]
    async fn test_follow_does_not_move_the_gate() {
        let h = harness(&[]);
        h.fetcher.serve(url("a"), page("a", &[("1", 1)]));
        h.feeds.follow("a").await.unwrap();

        h.feeds.sync_all().await.unwrap();
    }

    #[tokio::test]
    async fn test_follow_failure_leaves_state_alone() {
        let h = harness(&["a"]);
        h.fetcher.fail(url("ghost"), "dns error");

        let err = h.feeds.follow("ghost").await.unwrap_err();

        match err {
            RoostError::FollowFetchFailed { handle, reason } => {
                assert_eq!(handle, "ghost");
                assert_eq!(reason, "dns error");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(h.feeds.tracked_handles(), ["a"]);
        assert!(h.feeds.snapshot().posts_for("ghost").is_empty());
        assert_eq!(h.persistence.writes(), 0);
    }

    #[tokio::test]
    async fn test_follow_unresolved_tracks_with_no_posts() {
        let h = harness(&[]);
        h.fetcher.serve(url("quiet"), page("someoneelse", &[("1", 1)]));

        let outcome = h.feeds.follow("quiet").await.unwrap();

        assert_eq!(
            outcome,
            FollowOutcome::Added {
                handle: "quiet".into(),
                posts: 0
            }
        );
        assert!(h.feeds.snapshot().posts_for("quiet").is_empty());
    }

    #[tokio::test]
    async fn test_follow_blank_is_invalid() {
        let h = harness(&[]);
        assert!(matches!(
            h.feeds.follow(" @ ").await,
            Err(RoostError::InvalidHandle(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_rejects_urls_and_paths() {
        let h = harness(&[]);
        for raw in ["https://evil.example/x", "//evil.example", "a/b", "a?b", "a#b"] {
            assert!(
                matches!(h.feeds.follow(raw).await, Err(RoostError::InvalidHandle(_))),
                "{raw}"
            );
        }
        assert!(h.fetcher.requests().is_empty());
        assert!(h.feeds.tracked_handles().is_empty());
        assert_eq!(h.persistence.writes(), 0);
    }

    #[tokio::test]
    async fn test_remove_untracked_is_noop() {
        let h = harness(&["Foo"]);
        h.fetcher.serve(url("Foo"), page("Foo", &[("1", 1)]));
        h.feeds.sync_all().await.unwrap();
        let before = h.feeds.snapshot();

        assert_eq!(h.feeds.remove("bar").await.unwrap(), RemoveOutcome::NotTracked);
        // Exact match only.
        assert_eq!(h.feeds.remove("foo").await.unwrap(), RemoveOutcome::NotTracked);

        assert_eq!(h.feeds.snapshot(), before);
        assert_eq!(h.persistence.writes(), 0);
    }

    #[tokio::test]
    async fn test_remove_drops_list_entry_and_cache() {
        let h = harness(&["a", "b"]);
        h.fetcher.serve(url("a"), page("a", &[("1", 1)]));
        h.fetcher.serve(url("b"), page("b", &[("2", 2)]));
        h.feeds.sync_all().await.unwrap();

        let outcome = h.feeds.remove("a").await.unwrap();

        assert_eq!(outcome, RemoveOutcome::Removed { handle: "a".into() });
        let snapshot = h.feeds.snapshot();
        assert_eq!(snapshot.handles, ["b"]);
        assert!(snapshot.posts_for("a").is_empty());
        assert_eq!(
            h.persistence.load(TRACKED_HANDLES_KEY).unwrap(),
            Some(vec!["b".to_string()])
        );
    }

    #[test]
    fn test_open_dedupes_and_falls_back_to_initial_handles() {
        let extractor = || TimelineExtractor::new(ExtractorConfig::default()).unwrap();

        let persisted = Arc::new(MemoryStore::with_values(
            TRACKED_HANDLES_KEY,
            &["Foo", "foo", "", "@bar", "https://evil.example/x"],
        ));
        let feeds = FeedStore::open(
            Arc::new(StaticFetcher::new()),
            persisted,
            extractor(),
            &SourceConfig::default(),
        )
        .unwrap();
        assert_eq!(feeds.tracked_handles(), ["Foo", "bar"]);

        let source = SourceConfig {
            initial_handles: vec!["@wirecutterdeals".into()],
            ..Default::default()
        };
        let feeds = FeedStore::open(
            Arc::new(StaticFetcher::new()),
            Arc::new(MemoryStore::new()),
            extractor(),
            &source,
        )
        .unwrap();
        assert_eq!(feeds.tracked_handles(), ["wirecutterdeals"]);
    }
}
