//! canvacard - social card renderer with emoji-aware text layout
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        Builders  →  CardSpec (frozen)        │
//! ├──────────────────────────────────────────────┤
//! │  TextSegmenter  →  LayoutEngine (measure,    │
//! │                    wrap, estimate_height)    │
//! │                          ↓                   │
//! │  Renderer: surface + EmojiResolver + fonts   │
//! │                          ↓                   │
//! │                     PNG bytes                │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ```no_run
//! use std::sync::Arc;
//! use canvacard::{EmojiResolver, FontBook, HttpFetcher, Renderer, TwemojiSource, WelcomeLeaveBuilder};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let fetcher = HttpFetcher::with_default_timeout()?;
//! let emoji = EmojiResolver::new(TwemojiSource::new(fetcher.clone()));
//! let renderer = Renderer::new(fetcher, emoji, Arc::new(FontBook::new()));
//!
//! let card = WelcomeLeaveBuilder::new()
//!     .title("Welcome 👋", None)?
//!     .avatar("https://cdn.discordapp.com/embed/avatars/0.png")?
//!     .finalize();
//! let png = renderer.render(&card).await?;
//! std::fs::write("welcome.png", png)?;
//! # Ok(())
//! # }
//! ```

pub mod card;
pub mod config;
pub mod constants;
pub mod drawing;
pub mod emoji;
pub mod error;
pub mod font;
pub mod net;
pub mod text;
pub mod utils;

pub use card::{CardKind, CardSpec, Renderer, TweetBuilder, WelcomeLeaveBuilder};
pub use emoji::{EmojiCache, EmojiResolver, EmojiSource, GlyphSource, TwemojiSource};
pub use error::{CardError, ConfigError, FetchError, FontError, GlyphError, ImageLoadError};
pub use font::{FontBook, FontChoice, FontFace, FontdueFace};
pub use net::{AssetFetcher, HttpFetcher};
pub use text::{segment, LayoutEngine, TextSegment};
