//! Timeline page extraction.
//!
//! Turns the markup of one account's timeline page into [`Post`] records.
//!
//! ```text
//! markup → fragments → Option<Post> per fragment → newest first, max 10
//! ```
//!
//! A broken fragment never fails the page: it is logged and dropped. The only
//! page-level failure is markup that cannot be read as a document.

mod config;

pub use config::ExtractorConfig;

use chrono::DateTime;
use scraper::{ElementRef, Html, Selector};

use crate::app::{Result, RoostError};
use crate::domain::{newest_first, same_handle, Post};

/// Posts found on one timeline page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    /// Casing of the requested handle as seen on the page.
    ///
    /// `None` when no fragment was authored by the requested handle.
    pub canonical_handle: Option<String>,
    pub posts: Vec<Post>,
}

pub struct TimelineExtractor {
    config: ExtractorConfig,
    post: Selector,
    permalink: Selector,
    timestamp: Selector,
    text: Selector,
    avatar: Selector,
}

impl TimelineExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Ok(Self {
            post: parse_selector(&config.post_selector)?,
            permalink: parse_selector(&config.permalink_selector)?,
            timestamp: parse_selector(&config.timestamp_selector)?,
            text: parse_selector(&config.text_selector)?,
            avatar: parse_selector(&config.avatar_selector)?,
            config,
        })
    }

    /// Extract up to ten posts, newest first, for `requested_handle`.
    pub fn extract(&self, requested_handle: &str, body: &[u8]) -> Result<Timeline> {
        let markup = std::str::from_utf8(body).map_err(|e| RoostError::ExtractionFailed {
            handle: requested_handle.to_string(),
            reason: e.to_string(),
        })?;
        let document = Html::parse_document(markup);

        let mut posts: Vec<Post> = document
            .select(&self.post)
            .filter_map(|fragment| self.extract_fragment(fragment))
            .collect();

        // Document order, before sorting.
        let canonical_handle = posts
            .iter()
            .find(|p| same_handle(&p.author_handle, requested_handle))
            .map(|p| p.author_handle.clone());

        let filed_under = canonical_handle.as_deref().unwrap_or(requested_handle);
        for post in &mut posts {
            post.canonical_handle = filed_under.to_string();
        }

        newest_first(&mut posts);

        Ok(Timeline {
            canonical_handle,
            posts,
        })
    }

    fn extract_fragment(&self, fragment: ElementRef<'_>) -> Option<Post> {
        let href = fragment
            .select(&self.permalink)
            .find_map(|el| el.value().attr(&self.config.permalink_attr))?;

        let (author, id) = split_permalink(href)?;

        let Some(raw_time) = fragment
            .select(&self.timestamp)
            .find_map(|el| el.value().attr(&self.config.timestamp_attr))
        else {
            tracing::debug!("No timestamp {}", href);
            return None;
        };

        let timestamp = match raw_time.trim().parse::<i64>() {
            Ok(secs) => DateTime::from_timestamp(secs, 0),
            Err(e) => {
                tracing::debug!("Bad timestamp {}: {}", raw_time, e);
                return None;
            }
        };
        let Some(timestamp) = timestamp else {
            tracing::debug!("Timestamp out of range {}", raw_time);
            return None;
        };

        let text = fragment
            .select(&self.text)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();

        let mut post = Post::new(id, author, text, timestamp);
        post.avatar_url = fragment
            .select(&self.avatar)
            .find_map(|el| el.value().attr(&self.config.avatar_attr))
            .map(String::from);

        Some(post)
    }
}

/// Split `/{author}/status/{id}` into `(author, id)`.
fn split_permalink(href: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = href.split('/').collect();
    if parts.len() != 4 {
        return None;
    }
    Some((parts[1], parts[3]))
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| RoostError::Config(format!("Invalid selector {:?}: {:?}", selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TimelineExtractor {
        TimelineExtractor::new(ExtractorConfig::default()).unwrap()
    }

    fn fragment(author: &str, id: &str, time: &str, text: &str) -> String {
        format!(
            r#"<div class="tweet">
                 <img class="avatar" src="https://img.example/{author}.png">
                 <a class="tweet-timestamp" href="/{author}/status/{id}">
                   <span class="_timestamp" data-time="{time}">now</span>
                 </a>
                 <p class="tweet-text">{text}</p>
               </div>"#
        )
    }

    fn page(fragments: &[String]) -> Vec<u8> {
        format!("<html><body>{}</body></html>", fragments.concat()).into_bytes()
    }

    #[test]
    fn test_orders_newest_first_and_skips_malformed() {
        let body = page(&[
            fragment("rustlang", "1", "1000", "first"),
            fragment("rustlang", "2", "500", "second"),
            r#"<div class="tweet"><span class="_timestamp" data-time="9999"></span>
               <p class="tweet-text">orphan</p></div>"#
                .to_string(),
            fragment("rustlang", "3", "2000", "third"),
        ]);

        let timeline = extractor().extract("rustlang", &body).unwrap();
        let ids: Vec<_> = timeline.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
        assert_eq!(timeline.canonical_handle.as_deref(), Some("rustlang"));
    }

    #[test]
    fn test_missing_permalink_yields_nothing() {
        let body = page(&[r#"<div class="tweet">
              <span class="_timestamp" data-time="100"></span>
              <p class="tweet-text">no link</p></div>"#
            .to_string()]);

        let timeline = extractor().extract("anyone", &body).unwrap();
        assert!(timeline.posts.is_empty());
        assert_eq!(timeline.canonical_handle, None);
    }

    #[test]
    fn test_bad_timestamp_skips_only_that_fragment() {
        let body = page(&[
            fragment("a", "1", "yesterday", "bad"),
            fragment("a", "2", "300", "good"),
            r#"<div class="tweet"><a class="tweet-timestamp" href="/a/status/3"></a></div>"#
                .to_string(),
        ]);

        let timeline = extractor().extract("a", &body).unwrap();
        assert_eq!(timeline.posts.len(), 1);
        assert_eq!(timeline.posts[0].id, "2");
        assert_eq!(timeline.posts[0].text, "good");
    }

    #[test]
    fn test_permalink_must_have_four_segments() {
        let body = page(&[
            r#"<div class="tweet"><a class="tweet-timestamp" href="/a/status/1/photo/1">
               <span class="_timestamp" data-time="10"></span></a></div>"#
                .to_string(),
            r#"<div class="tweet"><a class="tweet-timestamp" href="a/status">
               <span class="_timestamp" data-time="10"></span></a></div>"#
                .to_string(),
            fragment("a", "2", "20", "kept"),
        ]);

        let timeline = extractor().extract("a", &body).unwrap();
        assert_eq!(timeline.posts.len(), 1);
        assert_eq!(timeline.posts[0].id, "2");
    }

    #[test]
    fn test_canonical_handle_follows_page_casing() {
        let body = page(&[
            fragment("someoneelse", "9", "900", "repost"),
            fragment("RustLang", "1", "100", "hello"),
            fragment("rustlang", "2", "200", "lower"),
        ]);

        let timeline = extractor().extract("RUSTLANG", &body).unwrap();
        assert_eq!(timeline.canonical_handle.as_deref(), Some("RustLang"));
        assert!(timeline
            .posts
            .iter()
            .all(|p| p.canonical_handle == "RustLang"));
        assert_eq!(timeline.posts[0].author_handle, "someoneelse");
    }

    #[test]
    fn test_unresolved_handle_files_under_request() {
        let body = page(&[fragment("other", "1", "100", "x")]);
        let timeline = extractor().extract("me", &body).unwrap();
        assert_eq!(timeline.canonical_handle, None);
        assert_eq!(timeline.posts[0].canonical_handle, "me");
    }

    #[test]
    fn test_keeps_at_most_ten() {
        let fragments: Vec<String> = (0..14)
            .map(|i| fragment("a", &i.to_string(), &(i * 60).to_string(), "x"))
            .collect();
        let timeline = extractor().extract("a", &page(&fragments)).unwrap();

        assert_eq!(timeline.posts.len(), 10);
        assert_eq!(timeline.posts[0].id, "13");
        assert_eq!(timeline.posts[9].id, "4");
    }

    #[test]
    fn test_fields_are_extracted() {
        let body = page(&[fragment("a", "77", "1500000000", "Hello   <b>world</b>")]);
        let post = &extractor().extract("a", &body).unwrap().posts[0];

        assert_eq!(post.id, "77");
        assert_eq!(post.author_handle, "a");
        assert_eq!(post.text, "Hello   world");
        assert_eq!(post.timestamp.timestamp(), 1_500_000_000);
        assert_eq!(post.avatar_url.as_deref(), Some("https://img.example/a.png"));
    }

    #[test]
    fn test_avatar_is_optional() {
        let body = page(&[r#"<div class="tweet">
              <a class="tweet-timestamp" href="/a/status/1"><span class="_timestamp" data-time="5"></span></a>
              </div>"#
            .to_string()]);
        let post = &extractor().extract("a", &body).unwrap().posts[0];
        assert_eq!(post.avatar_url, None);
        assert_eq!(post.text, "");
    }

    #[test]
    fn test_invalid_utf8_is_extraction_failure() {
        let err = extractor().extract("a", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, RoostError::ExtractionFailed { ref handle, .. } if handle == "a"));
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let config = ExtractorConfig {
            post_selector: "div[".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            TimelineExtractor::new(config),
            Err(RoostError::Config(_))
        ));
    }
}
