//! Immutable card snapshots
//!
//! Produced by the builders' `finalize()`; a render only ever sees a
//! `&CardSpec`, so configuration can't change under an in-flight render.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::font::FontChoice;
use crate::utils::Color;

/// Which compositor template a card uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    WelcomeLeave,
    Tweet,
}

impl FromStr for CardKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "welcome" | "leave" | "welcome-leave" => Ok(Self::WelcomeLeave),
            "tweet" => Ok(Self::Tweet),
            _ => Err(ConfigError::CardKind(s.to_string())),
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WelcomeLeave => write!(f, "welcome-leave"),
            Self::Tweet => write!(f, "tweet"),
        }
    }
}

/// Text plus the colour it is drawn in
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub color: Color,
}

/// Card background fill
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(Color),
    /// URL or path; failing to load it aborts the render
    Image(String),
}

/// Tweet colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Dim,
}

/// Colours a theme resolves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub background: Color,
    pub display_name: Color,
    pub username: Color,
    pub comment: Color,
}

const MUTED: Color = Color::rgb(0x84, 0x93, 0xa2);
const DIM_BACKGROUND: Color = Color::rgb(0x15, 0x20, 0x2b);

impl Theme {
    pub fn palette(self) -> ThemePalette {
        match self {
            Self::Light => ThemePalette {
                background: Color::WHITE,
                display_name: Color::BLACK,
                username: Color::BLACK,
                comment: Color::BLACK,
            },
            Self::Dark => ThemePalette {
                background: Color::BLACK,
                display_name: Color::WHITE,
                username: MUTED,
                comment: Color::WHITE,
            },
            Self::Dim => ThemePalette {
                background: DIM_BACKGROUND,
                display_name: Color::WHITE,
                username: MUTED,
                comment: Color::WHITE,
            },
        }
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "dim" => Ok(Self::Dim),
            _ => Err(ConfigError::Theme(s.to_string())),
        }
    }
}

/// Welcome / leave banner contents
#[derive(Debug, Clone, PartialEq)]
pub struct WelcomeLeaveCard {
    pub title: TextBlock,
    pub description: TextBlock,
    pub background: Background,
    /// Black overlay opacity (0.0-1.0)
    pub overlay_opacity: f32,
    /// Outer border colour; no border when None
    pub border: Option<Color>,
    pub avatar_border: Color,
}

/// Tweet card contents
#[derive(Debug, Clone, PartialEq)]
pub struct TweetCard {
    pub display_name: String,
    pub username: String,
    pub comment: String,
    pub theme: Theme,
    pub verified: bool,
    /// Directory holding reply/retweet/like/share/other PNG icons
    pub icon_dir: Option<PathBuf>,
}

/// Per-kind card contents
#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    WelcomeLeave(WelcomeLeaveCard),
    Tweet(TweetCard),
}

/// Everything a render needs, frozen
#[derive(Debug, Clone, PartialEq)]
pub struct CardSpec {
    pub font: FontChoice,
    /// Avatar URL or path
    pub avatar: String,
    pub body: CardBody,
}

impl CardSpec {
    pub fn kind(&self) -> CardKind {
        match self.body {
            CardBody::WelcomeLeave(_) => CardKind::WelcomeLeave,
            CardBody::Tweet(_) => CardKind::Tweet,
        }
    }

    /// The text that wraps and drives the canvas height
    pub fn body_text(&self) -> &str {
        match &self.body {
            CardBody::WelcomeLeave(card) => &card.description.text,
            CardBody::Tweet(card) => &card.comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_kind_from_str() {
        assert_eq!("welcome".parse::<CardKind>().unwrap(), CardKind::WelcomeLeave);
        assert_eq!("leave".parse::<CardKind>().unwrap(), CardKind::WelcomeLeave);
        assert_eq!("Tweet".parse::<CardKind>().unwrap(), CardKind::Tweet);
        assert!(matches!("rank".parse::<CardKind>(), Err(ConfigError::CardKind(_))));
    }

    #[test]
    fn test_theme_palette() {
        let theme: Theme = "dim".parse().unwrap();
        assert_eq!(theme.palette().background, Color::rgb(0x15, 0x20, 0x2b));
        assert_eq!(Theme::Light.palette().comment, Color::BLACK);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
