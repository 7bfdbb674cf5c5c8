use serde::{Deserialize, Serialize};

/// CSS selectors describing where post fields live in a timeline page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// One match per post fragment
    pub post_selector: String,

    /// Link whose attribute holds `/{author}/status/{id}`
    pub permalink_selector: String,
    pub permalink_attr: String,

    /// Element whose attribute holds seconds since the epoch
    pub timestamp_selector: String,
    pub timestamp_attr: String,

    /// Post body
    pub text_selector: String,

    pub avatar_selector: String,
    pub avatar_attr: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            post_selector: ".tweet".to_string(),
            permalink_selector: "a.tweet-timestamp".to_string(),
            permalink_attr: "href".to_string(),
            timestamp_selector: "._timestamp".to_string(),
            timestamp_attr: "data-time".to_string(),
            text_selector: ".tweet-text".to_string(),
            avatar_selector: "img.avatar".to_string(),
            avatar_attr: "src".to_string(),
        }
    }
}
