//! Opening post permalinks outside the program.

use parking_lot::Mutex;
use tracing::{info, warn};

pub trait Viewer {
    /// Open `url`. Failures are logged, never returned.
    fn open_url(&self, url: &str);
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn open_url(&self, url: &str) {
        info!("Opening {}", url);
        if let Err(e) = open::that(url) {
            warn!("Failed to open {}: {}", url, e);
        }
    }
}

/// Remembers URLs instead of opening them.
#[derive(Debug, Default)]
pub struct RecordingViewer {
    opened: Mutex<Vec<String>>,
}

impl RecordingViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

impl Viewer for RecordingViewer {
    fn open_url(&self, url: &str) {
        self.opened.lock().push(url.to_string());
    }
}
