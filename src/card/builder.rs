//! Card builders
//!
//! Setters validate eagerly and name the offending field; `finalize()`
//! freezes the result into a [`CardSpec`].

use std::path::PathBuf;

use crate::card::spec::{
    Background, CardBody, CardSpec, TextBlock, Theme, TweetCard, WelcomeLeaveCard,
};
use crate::error::ConfigError;
use crate::font::FontChoice;
use crate::text::segment::cluster_count;
use crate::utils::Color;

/// Longest welcome title (grapheme clusters)
pub const MAX_TITLE_CHARS: usize = 20;
/// Longest welcome description (grapheme clusters)
pub const MAX_DESCRIPTION_CHARS: usize = 80;

const DEFAULT_AVATAR: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::from_hex(value).ok_or_else(|| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

/// Lengths count grapheme clusters
fn check_text(field: &'static str, text: &str, max: usize) -> Result<(), ConfigError> {
    if text.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    let len = cluster_count(text);
    if len > max {
        return Err(ConfigError::TooLong { field, max, len });
    }
    Ok(())
}

fn check_avatar(location: &str) -> Result<String, ConfigError> {
    if location.trim().is_empty() {
        return Err(ConfigError::Empty { field: "avatar" });
    }
    Ok(location.to_string())
}

/// Builder for welcome / leave banners
#[derive(Debug, Clone)]
pub struct WelcomeLeaveBuilder {
    font: FontChoice,
    avatar: String,
    card: WelcomeLeaveCard,
}

impl Default for WelcomeLeaveBuilder {
    fn default() -> Self {
        Self {
            font: FontChoice::family("Poppins"),
            avatar: DEFAULT_AVATAR.to_string(),
            card: WelcomeLeaveCard {
                title: TextBlock {
                    text: "Welcome".to_string(),
                    color: Color::WHITE,
                },
                description: TextBlock {
                    text: "Welcome to this server, go read the rules please!".to_string(),
                    color: Color::rgb(0xa7, 0xb9, 0xc5),
                },
                background: Background::Color(Color::rgb(0x23, 0x27, 0x2a)),
                overlay_opacity: 0.0,
                border: None,
                avatar_border: Color::rgb(0x2a, 0x2e, 0x35),
            },
        }
    }
}

impl WelcomeLeaveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: FontChoice) -> Self {
        self.font = font;
        self
    }

    pub fn avatar(mut self, location: &str) -> Result<Self, ConfigError> {
        self.avatar = check_avatar(location)?;
        Ok(self)
    }

    pub fn avatar_border(mut self, color: &str) -> Result<Self, ConfigError> {
        self.card.avatar_border = parse_color("avatar_border", color)?;
        Ok(self)
    }

    pub fn border(mut self, color: &str) -> Result<Self, ConfigError> {
        self.card.border = Some(parse_color("border", color)?);
        Ok(self)
    }

    /// `kind` is `color` (hex value) or `image` (URL or path)
    pub fn background(mut self, kind: &str, value: &str) -> Result<Self, ConfigError> {
        self.card.background = match kind {
            "color" => Background::Color(parse_color("background", value)?),
            "image" if value.trim().is_empty() => {
                return Err(ConfigError::Empty { field: "background" });
            }
            "image" => Background::Image(value.to_string()),
            other => return Err(ConfigError::BackgroundType(other.to_string())),
        };
        Ok(self)
    }

    pub fn title(mut self, text: &str, color: Option<&str>) -> Result<Self, ConfigError> {
        check_text("title", text, MAX_TITLE_CHARS)?;
        if let Some(color) = color {
            self.card.title.color = parse_color("title_color", color)?;
        }
        self.card.title.text = text.to_string();
        Ok(self)
    }

    pub fn description(mut self, text: &str, color: Option<&str>) -> Result<Self, ConfigError> {
        check_text("description", text, MAX_DESCRIPTION_CHARS)?;
        if let Some(color) = color {
            self.card.description.color = parse_color("description_color", color)?;
        }
        self.card.description.text = text.to_string();
        Ok(self)
    }

    pub fn overlay_opacity(mut self, opacity: f32) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigError::Opacity(opacity));
        }
        self.card.overlay_opacity = opacity;
        Ok(self)
    }

    pub fn finalize(self) -> CardSpec {
        CardSpec {
            font: self.font,
            avatar: self.avatar,
            body: CardBody::WelcomeLeave(self.card),
        }
    }
}

/// Builder for tweet cards
#[derive(Debug, Clone)]
pub struct TweetBuilder {
    font: FontChoice,
    avatar: String,
    card: TweetCard,
}

impl Default for TweetBuilder {
    fn default() -> Self {
        Self {
            font: FontChoice::family("Chirp"),
            avatar: DEFAULT_AVATAR.to_string(),
            card: TweetCard {
                display_name: "Canvacard".to_string(),
                username: "canvacard".to_string(),
                comment: "This is a tweet card. You can customize it as you wish. Enjoy!".to_string(),
                theme: Theme::Light,
                verified: false,
                icon_dir: None,
            },
        }
    }
}

impl TweetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: FontChoice) -> Self {
        self.font = font;
        self
    }

    pub fn avatar(mut self, location: &str) -> Result<Self, ConfigError> {
        self.avatar = check_avatar(location)?;
        Ok(self)
    }

    pub fn user(mut self, display_name: &str, username: &str) -> Result<Self, ConfigError> {
        if display_name.is_empty() {
            return Err(ConfigError::Empty { field: "display_name" });
        }
        if username.is_empty() {
            return Err(ConfigError::Empty { field: "username" });
        }
        self.card.display_name = display_name.to_string();
        self.card.username = username.trim_start_matches('@').to_string();
        Ok(self)
    }

    /// Comments longer than [`MAX_BODY_CHARS`](crate::constants::MAX_BODY_CHARS) grapheme
    /// clusters are cut with an ellipsis at layout time
    pub fn comment(mut self, text: &str) -> Self {
        self.card.comment = text.to_string();
        self
    }

    pub fn theme(mut self, theme: &str) -> Result<Self, ConfigError> {
        self.card.theme = theme.parse()?;
        Ok(self)
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.card.verified = verified;
        self
    }

    pub fn icon_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.card.icon_dir = Some(dir.into());
        self
    }

    pub fn finalize(self) -> CardSpec {
        CardSpec {
            font: self.font,
            avatar: self.avatar,
            body: CardBody::Tweet(self.card),
        }
    }
}
