//! Text segmentation and layout
//!
//! - [`segment`]: grapheme-aware split into plain text and emoji runs
//! - [`layout`]: measurement, greedy wrapping and height estimation

pub mod layout;
pub mod segment;

pub use layout::{FontSpec, LayoutEngine, LineLayout, TextMeasure, WrapBudget, WrapConfig};
pub use segment::{
    asset_file_key, emoji_key, is_emoji_cluster, segment, SegmentKind, TextSegment,
};
