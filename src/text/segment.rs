//! Text segmentation
//!
//! Splits text into plain-text runs and emoji clusters. Classification
//! works on extended grapheme clusters using the Unicode emoji properties
//! (`Emoji`, `Emoji_Presentation`, `Extended_Pictographic`), and is the only
//! emoji rule used anywhere in the crate.

use unicode_properties::{EmojiStatus, UnicodeEmoji};
use unicode_segmentation::UnicodeSegmentation;

use crate::constants::{is_regional_indicator, KEYCAP, VS16, ZWJ};

/// Segment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    PlainText,
    Emoji,
}

/// A run of text with a single classification.
///
/// An emoji segment always holds exactly one grapheme cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub kind: SegmentKind,
    pub content: String,
}

impl TextSegment {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::PlainText,
            content: content.into(),
        }
    }

    pub fn emoji(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Emoji,
            content: content.into(),
        }
    }

    pub fn is_emoji(&self) -> bool {
        self.kind == SegmentKind::Emoji
    }
}

/// `Emoji_Presentation=Yes`: renders as emoji without a selector
fn has_emoji_presentation(c: char) -> bool {
    matches!(
        c.emoji_status(),
        EmojiStatus::EmojiPresentation
            | EmojiStatus::EmojiPresentationAndModifierBase
            | EmojiStatus::EmojiPresentationAndEmojiComponent
            | EmojiStatus::EmojiPresentationAndModifierAndEmojiComponent
    )
}

/// `Extended_Pictographic=Yes`.
///
/// Read back from the grapheme tables: GB11 keeps a pictograph after
/// `ZWJ` in the same cluster, GB9/GB9a do the same for extenders anywhere.
fn is_extended_pictographic(c: char) -> bool {
    if c.is_ascii() {
        return false;
    }
    let after_zwj = format!("\u{1F600}{}{}", ZWJ, c);
    let after_letter = format!("a{}", c);
    after_zwj.graphemes(true).count() == 1 && after_letter.graphemes(true).count() == 2
}

/// Determines if a grapheme cluster renders as an emoji.
///
/// - Flags (regional indicator pairs) are emoji.
/// - A base with `Emoji_Presentation` or `Extended_Pictographic` is emoji
///   (skin tones, ZWJ sequences and VS16 ride along in the same cluster).
/// - Any other `Emoji` base (digits, `#`, `*`) needs VS16 or a keycap (`1️⃣`).
pub fn is_emoji_cluster(cluster: &str) -> bool {
    let Some(base) = cluster.chars().next() else {
        return false;
    };

    if is_regional_indicator(base as u32)
        || has_emoji_presentation(base)
        || is_extended_pictographic(base)
    {
        return true;
    }
    base.is_emoji_char() && (cluster.contains(VS16) || cluster.contains(KEYCAP))
}

/// Split text into classified segments.
///
/// Adjacent plain clusters are coalesced, every emoji cluster is its own
/// segment, and concatenating the contents reproduces the input exactly.
pub fn segment(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut plain = String::new();

    for cluster in text.graphemes(true) {
        if is_emoji_cluster(cluster) {
            if !plain.is_empty() {
                segments.push(TextSegment::plain(std::mem::take(&mut plain)));
            }
            segments.push(TextSegment::emoji(cluster));
        } else {
            plain.push_str(cluster);
        }
    }

    if !plain.is_empty() {
        segments.push(TextSegment::plain(plain));
    }
    segments
}

/// Stable identity of an emoji cluster: every code point in
/// lowercase hex, joined with `-` (`"1f1ef-1f1f5"` for the JP flag).
pub fn emoji_key(cluster: &str) -> String {
    cluster
        .chars()
        .map(|c| format!("{:x}", c as u32))
        .collect::<Vec<_>>()
        .join("-")
}

/// File key used by Twemoji-style asset sets.
///
/// VS16 is dropped unless the sequence contains a ZWJ, matching how those
/// sets name their files.
pub fn asset_file_key(cluster: &str) -> String {
    if cluster.contains(ZWJ) {
        return emoji_key(cluster);
    }
    let stripped: String = cluster.chars().filter(|&c| c != VS16).collect();
    emoji_key(&stripped)
}

/// Number of grapheme clusters in `text`
pub fn cluster_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Keep at most `max` grapheme clusters, appending `marker` when cut
pub fn truncate_clusters(text: &str, max: usize, marker: &str) -> String {
    match text.grapheme_indices(true).nth(max) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], marker),
        None => text.to_string(),
    }
}
