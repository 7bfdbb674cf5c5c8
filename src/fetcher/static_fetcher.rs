use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::app::{Result, RoostError};
use crate::fetcher::Fetcher;

/// Serves canned pages from memory. Unknown URLs fail like a network error.
#[derive(Default)]
pub struct StaticFetcher {
    pages: Mutex<HashMap<String, std::result::Result<Vec<u8>, String>>>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.pages.lock().insert(url.into(), Ok(body.into()));
    }

    pub fn fail(&self, url: impl Into<String>, reason: impl Into<String>) {
        self.pages.lock().insert(url.into(), Err(reason.into()));
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().push(url.to_string());
        match self.pages.lock().get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => Err(RoostError::Other(reason.clone())),
            None => Err(RoostError::Other(format!("no route to {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_and_records() {
        let fetcher = StaticFetcher::new();
        fetcher.serve("https://example.com/a", "<html></html>");
        fetcher.fail("https://example.com/b", "connection reset");

        let body = tokio_test::block_on(fetcher.fetch("https://example.com/a")).unwrap();
        assert_eq!(body, b"<html></html>");
        assert!(tokio_test::block_on(fetcher.fetch("https://example.com/b")).is_err());
        assert!(tokio_test::block_on(fetcher.fetch("https://example.com/c")).is_err());

        assert_eq!(
            fetcher.requests(),
            [
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c"
            ]
        );
    }
}
