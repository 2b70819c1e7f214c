//! Card compositor
//!
//! One pipeline for every card kind:
//!
//! ```text
//! Configure -> PreMeasure -> AllocateSurface -> DrawBackground
//!   -> DrawFrameChrome -> DrawText(title) -> DrawText(body) -> DrawAvatar -> Encode
//! ```
//!
//! PreMeasure wraps the body with the same face and [`WrapConfig`] the draw
//! pass uses, so the allocated height always fits the drawn lines. A fatal
//! error at any stage returns before encoding; there is no partial output.
//!
//! [`WrapConfig`]: crate::text::WrapConfig

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use log::{debug, info, warn};

use crate::card::spec::{Background, CardBody, CardSpec, TweetCard, WelcomeLeaveCard};
use crate::card::template::{Align, CardTemplate, TextAnchor};
use crate::drawing::{Shape, Surface};
use crate::emoji::{EmojiResolver, GlyphSource};
use crate::error::CardError;
use crate::font::{FontBook, FontFace};
use crate::net::{load_image, AssetFetcher};
use crate::text::{FontSpec, LayoutEngine, LineLayout};
use crate::utils::Color;

/// Pipeline stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    PreMeasure,
    AllocateSurface,
    DrawBackground,
    DrawFrameChrome,
    DrawTitle,
    DrawBody,
    DrawAvatar,
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const VERIFIED_BLUE: Color = Color::rgb(0x1d, 0x9b, 0xf0);
const SEPARATOR: Color = Color::rgb(0x84, 0x93, 0xa2);

/// Tweet action icons: file stem, x, y (negative = from the bottom edge), side
const TWEET_ICONS: &[(&str, f32, f32, f32)] = &[
    ("reply", 186.6, -68.0, 45.0),
    ("retweet", 384.0, -68.0, 45.0),
    ("like", 577.8, -68.0, 45.0),
    ("share", 771.0, -68.0, 45.0),
    ("other", 900.0, 40.0, 35.0),
];

/// Renders [`CardSpec`]s to PNG.
///
/// Holds no per-render state; one renderer may serve many concurrent
/// renders, all sharing its emoji cache and font book.
pub struct Renderer<F, G> {
    fetcher: F,
    emoji: EmojiResolver<G>,
    fonts: Arc<FontBook>,
}

impl<F: AssetFetcher, G: GlyphSource> Renderer<F, G> {
    pub fn new(fetcher: F, emoji: EmojiResolver<G>, fonts: Arc<FontBook>) -> Self {
        Self {
            fetcher,
            emoji,
            fonts,
        }
    }

    pub fn emoji(&self) -> &EmojiResolver<G> {
        &self.emoji
    }

    /// Render a card to PNG bytes
    pub async fn render(&self, spec: &CardSpec) -> Result<Vec<u8>, CardError> {
        let surface = self.render_surface(spec).await?;
        debug!("{}", Stage::Encode);
        let png = surface.encode_png()?;
        info!(
            "Rendered {} card {}x{} ({} bytes)",
            spec.kind(),
            surface.width(),
            surface.height(),
            png.len()
        );
        Ok(png)
    }

    /// Run every stage except encoding
    pub async fn render_surface(&self, spec: &CardSpec) -> Result<Surface, CardError> {
        debug!("{}: {} card, font {:?}", Stage::Configure, spec.kind(), spec.font.family);
        let template = CardTemplate::for_kind(spec.kind());
        let face = self.fonts.resolve(&spec.font).await?;

        debug!("{}", Stage::PreMeasure);
        let engine = LayoutEngine::new(face.as_ref(), template.wrap);
        let body_font = template.body.font;
        let body_lines = engine.wrap(spec.body_text(), &body_font);
        let body_height = engine.estimate_height(spec.body_text(), &body_font);
        let height = template.canvas_height(body_height);

        debug!(
            "{}: {}x{} ({} body lines)",
            Stage::AllocateSurface,
            template.width,
            height,
            body_lines.len()
        );
        let mut surface = Surface::new(template.width, height)?;

        let face = face.as_ref();
        let title = &template.title;
        let title_width = match &spec.body {
            CardBody::WelcomeLeave(card) => {
                self.draw_welcome_chrome(&mut surface, card).await?;
                debug!("{}", Stage::DrawTitle);
                let line = engine.layout_line(&card.title.text, &title.font);
                self.draw_line(&mut surface, face, &line, title, title.baseline, card.title.color)
                    .await
            }
            CardBody::Tweet(card) => {
                self.draw_tweet_chrome(&mut surface, card).await;
                debug!("{}", Stage::DrawTitle);
                let palette = card.theme.palette();
                let name = engine.layout_line(&card.display_name, &title.font);
                let width = self
                    .draw_line(&mut surface, face, &name, title, title.baseline, palette.display_name)
                    .await;
                let handle = engine.layout_line(&format!("@{}", card.username), &title.font);
                self.draw_line(
                    &mut surface,
                    face,
                    &handle,
                    title,
                    title.baseline + 30.0,
                    palette.username,
                )
                .await;
                if card.verified {
                    draw_verified_badge(&mut surface, width + 140.0, 48.0, 30.0);
                }
                width
            }
        };
        debug!("Title width {:.1}px", title_width);

        debug!("{}", Stage::DrawBody);
        let body_color = match &spec.body {
            CardBody::WelcomeLeave(card) => card.description.color,
            CardBody::Tweet(card) => card.theme.palette().comment,
        };
        let step = engine.line_step();
        for (i, line) in body_lines.iter().enumerate() {
            let baseline = template.body.baseline + i as f32 * step;
            self.draw_line(&mut surface, face, line, &template.body, baseline, body_color)
                .await;
        }

        debug!("{}", Stage::DrawAvatar);
        let avatar = load_image(&self.fetcher, &spec.avatar)
            .await
            .map_err(|cause| CardError::Avatar { cause })?;
        let ring_color = match &spec.body {
            CardBody::WelcomeLeave(card) => card.avatar_border,
            CardBody::Tweet(_) => Color::TRANSPARENT,
        };
        draw_avatar(&mut surface, template, &avatar, ring_color);

        Ok(surface)
    }

    /// Border, frame clip, background and overlay of a welcome / leave card
    async fn draw_welcome_chrome(
        &self,
        surface: &mut Surface,
        card: &WelcomeLeaveCard,
    ) -> Result<(), CardError> {
        let w = surface.width() as f32;
        let h = surface.height() as f32;

        debug!("{}", Stage::DrawBackground);
        if let Some(border) = card.border {
            let outline = Shape::RoundedRect {
                x: 15.0,
                y: 15.0,
                w: w - 30.0,
                h: h - 30.0,
                radius: 40.0,
            };
            surface.stroke_shape(&outline, border, 8.0);
        }
        surface.clip_to(&Shape::RoundedRect {
            x: 25.0,
            y: 25.0,
            w: w - 50.0,
            h: h - 50.0,
            radius: 40.0,
        });

        match &card.background {
            Background::Color(color) => surface.fill_rect(10.0, 10.0, w - 20.0, h - 20.0, *color),
            Background::Image(location) => {
                let image = load_image(&self.fetcher, location)
                    .await
                    .map_err(|cause| CardError::Background { cause })?;
                surface.draw_image(&image, 10.0, 10.0, w - 20.0, h - 20.0);
            }
        }

        debug!("{}", Stage::DrawFrameChrome);
        if card.overlay_opacity > 0.0 {
            surface.set_global_alpha(card.overlay_opacity);
            let overlay = Shape::RoundedRect {
                x: 45.0,
                y: 45.0,
                w: w - 90.0,
                h: h - 90.0,
                radius: 30.0,
            };
            surface.fill_shape(&overlay, Color::BLACK);
            surface.set_global_alpha(1.0);
        }
        Ok(())
    }

    /// Theme fill, action icons and separator of a tweet card
    async fn draw_tweet_chrome(&self, surface: &mut Surface, card: &TweetCard) {
        let w = surface.width() as f32;
        let h = surface.height() as f32;

        debug!("{}", Stage::DrawBackground);
        surface.fill_rect(10.0, 10.0, w - 20.0, h - 20.0, card.theme.palette().background);

        debug!("{}", Stage::DrawFrameChrome);
        if let Some(dir) = &card.icon_dir {
            self.draw_icons(surface, dir).await;
        }
        surface.stroke_line(50.0, h - 88.0, 918.0, h - 88.0, SEPARATOR, 1.0);
    }

    /// Missing or broken icons are skipped
    async fn draw_icons(&self, surface: &mut Surface, dir: &Path) {
        let h = surface.height() as f32;
        for &(stem, x, y, side) in TWEET_ICONS {
            let location = dir.join(format!("{}.png", stem));
            let location = location.to_string_lossy();
            match load_image(&self.fetcher, &location).await {
                Ok(icon) => {
                    let y = if y < 0.0 { h + y } else { y };
                    surface.draw_image(&icon, x, y, side, side);
                }
                Err(e) => warn!("Skipping icon {}: {}", stem, e),
            }
        }
    }

    /// Draw one laid-out line, substituting resolved emoji.
    ///
    /// Unresolved emoji are drawn as text but keep the emoji slot width, so
    /// the drawn advance always equals the measured width. Returns the advance.
    async fn draw_line(
        &self,
        surface: &mut Surface,
        face: &dyn FontFace,
        line: &LineLayout,
        anchor: &TextAnchor,
        baseline: f32,
        color: Color,
    ) -> f32 {
        let font: &FontSpec = &anchor.font;
        let start = match anchor.align {
            Align::Left => anchor.x,
            Align::Center => anchor.x - line.width / 2.0,
        };

        let mut pen = start;
        for segment in &line.segments {
            if !segment.is_emoji() {
                pen += surface.fill_text(face, &segment.content, pen, baseline, font.size, color);
                continue;
            }
            let side = font.emoji_advance();
            match self.emoji.resolve(&segment.content).await {
                Some(glyph) => surface.draw_image(&glyph, pen, font.emoji_top(baseline), side, side),
                None => {
                    surface.fill_text(face, &segment.content, pen, baseline, font.size, color);
                }
            }
            pen += side;
        }
        pen - start
    }
}

/// Ring, circular clip and avatar bitmap
fn draw_avatar(surface: &mut Surface, template: &CardTemplate, avatar: &RgbaImage, ring_color: Color) {
    let slot = template.avatar;
    if let Some((radius, line_width)) = slot.ring {
        let ring = Shape::Circle {
            cx: slot.cx,
            cy: slot.cy,
            radius,
        };
        surface.stroke_shape(&ring, ring_color, line_width);
    }
    surface.clip_to(&Shape::Circle {
        cx: slot.cx,
        cy: slot.cy,
        radius: slot.radius,
    });
    let (x, y, side) = slot.image;
    surface.draw_image(avatar, x, y, side, side);
    surface.reset_clip();
}

/// Blue disc with a white check mark
fn draw_verified_badge(surface: &mut Surface, x: f32, y: f32, side: f32) {
    let r = side / 2.0;
    let (cx, cy) = (x + r, y + r);
    surface.fill_shape(&Shape::Circle { cx, cy, radius: r }, VERIFIED_BLUE);
    let stroke = side * 0.1;
    surface.stroke_line(cx - r * 0.45, cy, cx - r * 0.1, cy + r * 0.35, Color::WHITE, stroke);
    surface.stroke_line(cx - r * 0.1, cy + r * 0.35, cx + r * 0.5, cy - r * 0.35, Color::WHITE, stroke);
}
