//! Configuration for roost.
//!
//! Read from `~/.config/roost/config.toml` at startup. A commented default
//! file is written on first run. Every section and field is optional.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::extractor::ExtractorConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub display: DisplayConfig,
    pub extractor: ExtractorConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

/// Where timelines come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Timeline pages live at `{base_url}/{handle}`
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Tracked when nothing has been saved yet
    pub initial_handles: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://twitter.com".to_string(),
            user_agent: concat!("roost/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            initial_handles: Vec::new(),
        }
    }
}

/// How posts are rendered in menus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Menu labels longer than this are shortened with "..."; 0 disables
    pub truncate: usize,
    /// Line width for a fully expanded post
    pub wrap_width: usize,
    /// Characters of the newest post shown in the title
    pub title_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            truncate: 30,
            wrap_width: 50,
            title_chars: 20,
        }
    }
}

impl Config {
    /// Load from the default path, creating a commented default file if none exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_config_path()?;
        if !path.exists() {
            Self::write_default_config(&path)?;
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. Missing fields fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `~/.config/roost/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("roost").join("config.toml"))
    }

    /// `~/.local/share/roost` (or the platform equivalent)
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data_dir.join("roost"))
    }

    fn write_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

const DEFAULT_CONFIG: &str = r##"# roost configuration
#
# Colors: named (Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
# DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
# LightCyan, White, Reset) or hex ("#RRGGBB", "#RGB").
#
# Keys: single characters ("a", "R"), special keys (Enter, Esc, Tab,
# Backspace, Delete, Home, End, PageUp, PageDown, Up, Down, Left, Right,
# Space, F1-F12), optionally with modifiers ("Ctrl+c", "Alt+Enter").

[source]
base_url = "https://twitter.com"
timeout_secs = 10

# Accounts to track before any have been followed
initial_handles = []

[display]
# Longer menu labels end in "..." (0 = never shorten)
truncate = 30

# Width of an expanded post
wrap_width = 50

# Characters of the newest post shown in the title
title_chars = 20

[extractor]
post_selector = ".tweet"
permalink_selector = "a.tweet-timestamp"
permalink_attr = "href"
timestamp_selector = "._timestamp"
timestamp_attr = "data-time"
text_selector = ".tweet-text"
avatar_selector = "img.avatar"
avatar_attr = "src"

[colors]
border = "Cyan"
title = "LightCyan"
selection_fg = "Black"
selection_bg = "Cyan"
post = "White"
account = "Yellow"
header = "DarkGray"
separator = "DarkGray"
status_fg = "White"
status_bg = "DarkGray"
error = "LightRed"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
select = ["Enter", "Right", "l"]
back = ["Esc", "Left", "h", "Backspace"]
open_in_browser = ["o"]
refresh = ["R"]
follow = ["a"]
remove = ["d", "Delete"]
"##;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
