use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// A sync pass is refused if the previous attempt started less than this long ago.
pub const MIN_FETCH_SPACING: Duration = Duration::from_secs(9 * 60);

/// Period of the background scheduler. One minute looser than
/// [`MIN_FETCH_SPACING`] so ticker jitter never trips the gate.
pub const SYNC_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Remembers when the last sync pass started.
///
/// - First attempt always allowed.
/// - Attempts inside the spacing window are refused.
/// - The attempt is recorded before any network traffic, so a hung fetch
///   still counts against the window.
#[derive(Debug, Clone)]
pub struct FetchGate {
    spacing: TimeDelta,
    last_attempt: Option<DateTime<Utc>>,
}

impl Default for FetchGate {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchGate {
    pub fn new() -> Self {
        Self::with_spacing(MIN_FETCH_SPACING)
    }

    pub fn with_spacing(spacing: Duration) -> Self {
        Self {
            spacing: TimeDelta::seconds(spacing.as_secs() as i64),
            last_attempt: None,
        }
    }

    pub fn last_attempt(&self) -> Option<DateTime<Utc>> {
        self.last_attempt
    }

    /// Check if a pass may start at `now`. Does NOT mutate state.
    pub fn may_fetch_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_attempt {
            None => true,
            Some(last) => now.signed_duration_since(last) >= self.spacing,
        }
    }

    pub fn may_fetch_now(&self) -> bool {
        self.may_fetch_at(Utc::now())
    }

    pub fn record_attempt_at(&mut self, now: DateTime<Utc>) {
        self.last_attempt = Some(now);
    }

    pub fn record_attempt(&mut self) {
        self.record_attempt_at(Utc::now());
    }
}
