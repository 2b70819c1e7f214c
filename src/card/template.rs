//! Per-kind layout templates
//!
//! All card geometry lives here; the compositor only reads it.

use crate::card::builder::MAX_DESCRIPTION_CHARS;
use crate::card::spec::CardKind;
use crate::constants::MAX_BODY_CHARS;
use crate::text::{FontSpec, WrapBudget, WrapConfig};

/// Horizontal anchoring of a text line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `x` is the line's midpoint
    Center,
}

/// Where and how a text block is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAnchor {
    pub x: f32,
    /// Baseline of the first line
    pub baseline: f32,
    pub align: Align,
    pub font: FontSpec,
}

/// Circular avatar placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarSlot {
    pub cx: f32,
    pub cy: f32,
    /// Clip radius
    pub radius: f32,
    /// Ring drawn around the clip (radius, line width)
    pub ring: Option<(f32, f32)>,
    /// Image box (x, y, side)
    pub image: (f32, f32, f32),
}

/// Geometry and typography of one card kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTemplate {
    pub width: u32,
    /// Height without the wrapped body
    pub base_height: f32,
    pub min_height: u32,
    pub title: TextAnchor,
    pub body: TextAnchor,
    pub wrap: WrapConfig,
    pub avatar: AvatarSlot,
}

pub const WELCOME_LEAVE: CardTemplate = CardTemplate {
    width: 700,
    base_height: 280.0,
    min_height: 350,
    title: TextAnchor {
        x: 350.0,
        baseline: 225.0,
        align: Align::Center,
        font: FontSpec {
            size: 28.0,
            emoji_scale: 0.9,
            emoji_baseline: 0.75,
        },
    },
    body: TextAnchor {
        x: 350.0,
        baseline: 260.0,
        align: Align::Center,
        font: FontSpec {
            size: 26.0,
            emoji_scale: 0.9,
            emoji_baseline: 0.75,
        },
    },
    wrap: WrapConfig {
        budget: WrapBudget::Chars(35),
        line_height: 35.0,
        max_chars: MAX_BODY_CHARS,
        // A validated description is never cut
        max_word_chars: MAX_DESCRIPTION_CHARS,
    },
    avatar: AvatarSlot {
        cx: 350.0,
        cy: 125.0,
        radius: 60.0,
        ring: Some((66.0, 5.0)),
        image: (290.0, 65.0, 120.0),
    },
};

pub const TWEET: CardTemplate = CardTemplate {
    width: 968,
    base_height: 343.0,
    min_height: 343,
    // Display name
    title: TextAnchor {
        x: 130.0,
        baseline: 70.0,
        align: Align::Left,
        font: FontSpec {
            size: 25.0,
            emoji_scale: 1.0,
            emoji_baseline: 0.8,
        },
    },
    // Comment
    body: TextAnchor {
        x: 85.0,
        baseline: 170.0,
        align: Align::Left,
        font: FontSpec {
            size: 25.0,
            emoji_scale: 1.0,
            emoji_baseline: 0.8,
        },
    },
    wrap: WrapConfig {
        budget: WrapBudget::Pixels(800.0),
        line_height: 40.0,
        max_chars: MAX_BODY_CHARS,
        max_word_chars: 57,
    },
    avatar: AvatarSlot {
        cx: 80.0,
        cy: 75.0,
        radius: 40.0,
        ring: None,
        image: (35.0, 28.0, 90.0),
    },
};

impl CardTemplate {
    pub fn for_kind(kind: CardKind) -> &'static CardTemplate {
        match kind {
            CardKind::WelcomeLeave => &WELCOME_LEAVE,
            CardKind::Tweet => &TWEET,
        }
    }

    /// Final canvas height for a body of `body_height` pixels
    pub fn canvas_height(&self, body_height: f32) -> u32 {
        ((self.base_height + body_height).ceil() as u32).max(self.min_height)
    }
}
