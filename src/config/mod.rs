//! Configuration file management
//!
//! Two kinds of TOML files:
//! - [`Settings`]: process settings (emoji source, network, default font).
//!   Default path: ~/.config/canvacard/config.toml
//! - [`CardFile`]: one card description, converted through the builders so
//!   every configuration error surfaces before rendering.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::card::{CardKind, CardSpec, TweetBuilder, WelcomeLeaveBuilder};
use crate::constants::{DEFAULT_FETCH_TIMEOUT_MS, TWEMOJI_BASE_URL, USER_AGENT};
use crate::emoji::{EmojiSource, TwemojiSource};
use crate::error::ConfigError;
use crate::font::{FontChoice, FontEmojiSource};
use crate::net::AssetFetcher;

/// Environment variable naming the settings file
pub const CONFIG_ENV: &str = "CANVACARD_CONFIG";

/// Process settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Emoji glyph source
    pub emoji: EmojiSettings,
    /// Asset fetching
    pub network: NetworkSettings,
    /// Fallback font
    pub font: FontSettings,
}

/// Where emoji bitmaps come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiSourceKind {
    /// Remote PNGs (Twemoji layout)
    #[default]
    Twemoji,
    /// Local colour emoji font
    Font,
    /// Draw emoji as plain text
    None,
}

/// Emoji settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiSettings {
    pub source: EmojiSourceKind,
    /// Base URL (or directory) for `twemoji`
    pub base_url: String,
    /// Emoji font path for `font` (searches well-known paths if empty)
    pub font: String,
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Per-fetch timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
}

/// Fallback font settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Font file used when a card's family is not registered (empty = system search)
    pub path: String,
}

impl Default for EmojiSettings {
    fn default() -> Self {
        Self {
            source: EmojiSourceKind::default(),
            base_url: TWEMOJI_BASE_URL.to_string(),
            font: String::new(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl NetworkSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl EmojiSettings {
    /// Build the configured glyph source.
    ///
    /// A missing emoji font degrades to `Disabled` rather than failing.
    pub fn build_source<F: AssetFetcher>(&self, fetcher: F) -> EmojiSource<F> {
        match self.source {
            EmojiSourceKind::Twemoji => {
                EmojiSource::Remote(TwemojiSource::with_base_url(fetcher, &self.base_url))
            }
            EmojiSourceKind::Font => {
                let explicit = (!self.font.is_empty()).then_some(self.font.as_str());
                match FontEmojiSource::discover(explicit) {
                    Some(source) => EmojiSource::Font(source),
                    None => {
                        warn!("No emoji font available, emoji will be drawn as text");
                        EmojiSource::Disabled
                    }
                }
            }
            EmojiSourceKind::None => EmojiSource::Disabled,
        }
    }
}

impl Settings {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/canvacard/config.toml";

    /// Get the path that would be used for loading settings.
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. CANVACARD_CONFIG environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
            warn!("{} points to a missing file: {}", CONFIG_ENV, path);
        }

        // 2. User config: ~/.config/canvacard/config.toml
        if let Some(path) = default_config_path() {
            if path.exists() {
                return Some(path);
            }
        }

        // 3. System config
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load settings with priority:
    /// 1. CANVACARD_CONFIG environment variable
    /// 2. ~/.config/canvacard/config.toml (user config)
    /// 3. /etc/canvacard/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(settings) => {
                    info!("Loaded config: {}", path.display());
                    return settings;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(settings)
    }
}

/// Default user config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("canvacard").join("config.toml"))
}

/// Font table of a card file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardFontSection {
    pub family: Option<String>,
    pub path: Option<String>,
}

/// `[welcome]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WelcomeSection {
    pub title: Option<String>,
    pub title_color: Option<String>,
    pub description: Option<String>,
    pub description_color: Option<String>,
    /// `color` or `image`
    pub background_type: Option<String>,
    pub background: Option<String>,
    pub overlay_opacity: Option<f32>,
    pub border: Option<String>,
    pub avatar_border: Option<String>,
}

/// `[tweet]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TweetSection {
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub comment: Option<String>,
    pub theme: Option<String>,
    pub verified: Option<bool>,
    pub icon_dir: Option<PathBuf>,
}

/// A card description file
#[derive(Debug, Clone, Deserialize)]
pub struct CardFile {
    /// `welcome`, `leave` or `tweet`
    pub kind: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub font: CardFontSection,
    #[serde(default)]
    pub welcome: WelcomeSection,
    #[serde(default)]
    pub tweet: TweetSection,
}

impl CardFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read card file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse card file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn font_choice(&self, default_family: &str) -> FontChoice {
        FontChoice {
            family: self
                .font
                .family
                .clone()
                .unwrap_or_else(|| default_family.to_string()),
            path: self.font.path.clone(),
        }
    }

    /// Run the description through the matching builder
    pub fn into_spec(self) -> Result<CardSpec, ConfigError> {
        match self.kind.parse::<CardKind>()? {
            CardKind::WelcomeLeave => self.welcome_spec(),
            CardKind::Tweet => self.tweet_spec(),
        }
    }

    fn welcome_spec(self) -> Result<CardSpec, ConfigError> {
        let s = &self.welcome;
        let mut b = WelcomeLeaveBuilder::new().font(self.font_choice("Poppins"));

        if let Some(avatar) = &self.avatar {
            b = b.avatar(avatar)?;
        }
        if let Some(title) = &s.title {
            b = b.title(title, s.title_color.as_deref())?;
        }
        if let Some(description) = &s.description {
            b = b.description(description, s.description_color.as_deref())?;
        }
        match (&s.background_type, &s.background) {
            (Some(kind), Some(value)) => b = b.background(kind, value)?,
            (None, Some(value)) => b = b.background("color", value)?,
            (Some(_), None) => return Err(ConfigError::Empty { field: "background" }),
            (None, None) => {}
        }
        if let Some(opacity) = s.overlay_opacity {
            b = b.overlay_opacity(opacity)?;
        }
        if let Some(border) = &s.border {
            b = b.border(border)?;
        }
        if let Some(color) = &s.avatar_border {
            b = b.avatar_border(color)?;
        }
        Ok(b.finalize())
    }

    fn tweet_spec(self) -> Result<CardSpec, ConfigError> {
        let s = &self.tweet;
        let mut b = TweetBuilder::new().font(self.font_choice("Chirp"));

        if let Some(avatar) = &self.avatar {
            b = b.avatar(avatar)?;
        }
        match (&s.display_name, &s.username) {
            (Some(name), Some(user)) => b = b.user(name, user)?,
            (Some(_), None) => return Err(ConfigError::Empty { field: "username" }),
            (None, Some(_)) => return Err(ConfigError::Empty { field: "display_name" }),
            (None, None) => {}
        }
        if let Some(comment) = &s.comment {
            b = b.comment(comment);
        }
        if let Some(theme) = &s.theme {
            b = b.theme(theme)?;
        }
        if let Some(verified) = s.verified {
            b = b.verified(verified);
        }
        if let Some(dir) = &s.icon_dir {
            b = b.icon_dir(dir.clone());
        }
        Ok(b.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Background, CardBody, Theme};
    use crate::utils::Color;
    use std::io::Write;

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.emoji.source, EmojiSourceKind::Twemoji);
        assert_eq!(settings.emoji.base_url, TWEMOJI_BASE_URL);
        assert_eq!(settings.network.timeout(), Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS));
    }

    #[test]
    fn test_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[emoji]\nsource = \"none\"\n\n[network]\ntimeout_ms = 2500\n"
        )
        .unwrap();
        let settings = Settings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.emoji.source, EmojiSourceKind::None);
        assert_eq!(settings.network.timeout_ms, 2500);
        assert_eq!(settings.network.user_agent, USER_AGENT);
    }

    #[test]
    fn test_settings_bad_source_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[emoji]\nsource = \"gif\"\n").unwrap();
        assert!(Settings::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_welcome_card_file() {
        let file = CardFile::from_toml(
            r##"
kind = "leave"
avatar = "https://cdn.example.com/a.png"

[font]
family = "Inter"

[welcome]
title = "Goodbye"
description = "See you soon"
background_type = "image"
background = "https://cdn.example.com/bg.png"
overlay_opacity = 0.4
border = "#fff"
"##,
        )
        .unwrap();
        let spec = file.into_spec().unwrap();
        assert_eq!(spec.font.family, "Inter");
        assert_eq!(spec.avatar, "https://cdn.example.com/a.png");
        match spec.body {
            CardBody::WelcomeLeave(card) => {
                assert_eq!(card.title.text, "Goodbye");
                assert_eq!(card.background, Background::Image("https://cdn.example.com/bg.png".to_string()));
                assert_eq!(card.border, Some(Color::WHITE));
                assert!((card.overlay_opacity - 0.4).abs() < 1e-6);
            }
            CardBody::Tweet(_) => panic!("wrong body"),
        }
    }

    #[test]
    fn test_tweet_card_file() {
        let file = CardFile::from_toml(
            r#"
kind = "tweet"

[tweet]
display_name = "Ferris"
username = "ferris"
comment = "Hello from the crab"
theme = "dark"
verified = true
"#,
        )
        .unwrap();
        let spec = file.into_spec().unwrap();
        assert_eq!(spec.font.family, "Chirp");
        match spec.body {
            CardBody::Tweet(card) => {
                assert_eq!(card.theme, Theme::Dark);
                assert!(card.verified);
                assert_eq!(card.comment, "Hello from the crab");
            }
            CardBody::WelcomeLeave(_) => panic!("wrong body"),
        }
    }

    #[test]
    fn test_card_file_config_errors() {
        let file = CardFile::from_toml("kind = \"rank\"").unwrap();
        assert_eq!(file.into_spec().unwrap_err(), ConfigError::CardKind("rank".to_string()));

        let file = CardFile::from_toml("kind = \"welcome\"\n[welcome]\nborder = \"blue\"\n").unwrap();
        assert!(matches!(
            file.into_spec().unwrap_err(),
            ConfigError::InvalidColor { field: "border", .. }
        ));
    }
}
