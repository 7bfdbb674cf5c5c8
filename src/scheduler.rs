//! Periodic sync driver.
//!
//! Runs `sync_all` on a fixed period, starting immediately. Used in the
//! background by the TUI and in the foreground by `roost daemon`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::app::RoostError;
use crate::feed::{FeedStore, SyncReport};

/// Result of the most recent tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Synced {
        at: DateTime<Utc>,
        report: SyncReport,
    },
    Skipped {
        last_attempt: DateTime<Utc>,
    },
    Failed {
        at: DateTime<Utc>,
        reason: String,
    },
}

pub struct Scheduler {
    feeds: Arc<FeedStore>,
    period: Duration,
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
    last_status: Mutex<Option<SyncStatus>>,
}

impl Scheduler {
    pub fn new(feeds: Arc<FeedStore>, period: Duration) -> Self {
        Self {
            feeds,
            period,
            running: Arc::new(AtomicBool::new(true)),
            wake: Arc::new(Notify::new()),
            last_status: Mutex::new(None),
        }
    }

    pub fn last_status(&self) -> Option<SyncStatus> {
        self.last_status.lock().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the loop to exit. Returns without waiting for it.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// One sync pass. A pass refused by the fetch gate is logged and skipped.
    pub async fn tick(&self) -> Option<SyncReport> {
        let status = match self.feeds.sync_all().await {
            Ok(report) => SyncStatus::Synced {
                at: Utc::now(),
                report,
            },
            Err(RoostError::RateLimited { last_attempt }) => {
                info!("Skipping sync, last attempt at {}", last_attempt);
                SyncStatus::Skipped { last_attempt }
            }
            Err(e) => {
                warn!("Sync failed: {}", e);
                SyncStatus::Failed {
                    at: Utc::now(),
                    reason: e.to_string(),
                }
            }
        };

        let report = match &status {
            SyncStatus::Synced { report, .. } => Some(report.clone()),
            _ => None,
        };
        *self.last_status.lock() = Some(status);
        report
    }

    /// Tick until [`stop`](Self::stop) is called. The first tick fires immediately.
    pub async fn run(&self) {
        info!(
            "Scheduler started (period {})",
            format_interval(self.period.as_secs())
        );

        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.is_running() {
            tokio::select! {
                _ = timer.tick() => {}
                _ = self.wake.notified() => {}
            }
            if !self.is_running() {
                break;
            }
            self.tick().await;
        }

        info!("Scheduler stopped");
    }

    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Stop on Ctrl-C, or SIGTERM on unix.
    pub fn stop_on_signal(self: Arc<Self>) {
        tokio::spawn(async move {
            wait_for_shutdown_signal().await;
            info!("Shutdown signal received");
            self.stop();
        });
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!("Failed to set up SIGTERM handler: {}", e);
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
    }
}

/// Parse "10m", "1h", "90s", "1d" or bare seconds.
pub fn parse_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim().to_lowercase();

    let (digits, unit) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], c),
        _ => (s.as_str(), 's'),
    };
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => {
            return Err(format!(
                "Invalid interval: {}. Use format like '10m', '1h', '1d'",
                s
            ))
        }
    };

    let value = digits
        .parse::<u64>()
        .map_err(|_| format!("Invalid interval: {}", s))?;
    if value == 0 {
        return Err("Interval must be greater than zero".to_string());
    }
    let secs = value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Invalid interval: {} is too long", s))?;
    Ok(Duration::from_secs(secs))
}

/// Largest whole unit: 600 -> "10m", 7200 -> "2h", 90 -> "90s".
pub fn format_interval(secs: u64) -> String {
    match secs {
        s if s >= 86400 && s % 86400 == 0 => format!("{}d", s / 86400),
        s if s >= 3600 && s % 3600 == 0 => format!("{}h", s / 3600),
        s if s >= 60 && s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{}s", s),
    }
}
