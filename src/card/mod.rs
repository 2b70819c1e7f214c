//! Cards
//!
//! - [`builder`]: validating builders for each card kind
//! - [`spec`]: the immutable snapshot a render works from
//! - [`template`]: per-kind geometry and typography
//! - [`render`]: the compositor pipeline

pub mod builder;
pub mod render;
pub mod spec;
pub mod template;

pub use builder::{TweetBuilder, WelcomeLeaveBuilder};
pub use render::{Renderer, Stage};
pub use spec::{Background, CardBody, CardKind, CardSpec, TextBlock, Theme, TweetCard, WelcomeLeaveCard};
pub use template::{Align, CardTemplate};
