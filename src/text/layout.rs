//! Line layout
//!
//! Greedy word wrapping over segmented text. The same pass backs
//! [`LayoutEngine::wrap`] (lines to draw) and
//! [`LayoutEngine::estimate_height`] (surface sizing before any drawing),
//! so the two can never disagree.

use log::trace;

use crate::constants::{ELLIPSIS, LINE_SPACING};
use crate::text::segment::{cluster_count, segment, truncate_clusters, TextSegment};

/// Width measurement callback (implemented by every font face)
pub trait TextMeasure {
    /// Advance width of `text` at `size` pixels
    fn measure_text(&self, text: &str, size: f32) -> f32;
}

/// Font parameters for one text block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Font size in pixels
    pub size: f32,
    /// Emoji side length as a multiple of `size`
    pub emoji_scale: f32,
    /// Distance from baseline up to the emoji's top edge, as a multiple of `size`
    pub emoji_baseline: f32,
}

impl FontSpec {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            emoji_scale: 1.0,
            emoji_baseline: 0.8,
        }
    }

    pub fn with_emoji(mut self, scale: f32, baseline: f32) -> Self {
        self.emoji_scale = scale;
        self.emoji_baseline = baseline;
        self
    }

    /// Fixed advance of one emoji cluster
    #[inline]
    pub fn emoji_advance(&self) -> f32 {
        self.size * self.emoji_scale
    }

    /// Top edge of an emoji drawn on `baseline`
    #[inline]
    pub fn emoji_top(&self, baseline: f32) -> f32 {
        baseline - self.size * self.emoji_baseline
    }
}

/// How much text fits on one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WrapBudget {
    /// Measured width in pixels
    Pixels(f32),
    /// Grapheme cluster count (soft character budget)
    Chars(usize),
}

/// Wrapping parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapConfig {
    pub budget: WrapBudget,
    /// Height of a single line in pixels
    pub line_height: f32,
    /// Hard cap on total text length before wrapping, in grapheme clusters
    pub max_chars: usize,
    /// Cap on text that contains no space at all, in grapheme clusters
    /// (not UTF-16 code units, so an emoji sequence counts once)
    pub max_word_chars: usize,
}

/// One wrapped line
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub segments: Vec<TextSegment>,
    /// Measured width in pixels
    pub width: f32,
}

impl LineLayout {
    /// Plain text of the line
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.content.as_str()).collect()
    }
}

/// Measures, wraps and sizes text against a measurement callback
pub struct LayoutEngine<'a, M: TextMeasure + ?Sized> {
    measurer: &'a M,
    config: WrapConfig,
}

impl<'a, M: TextMeasure + ?Sized> LayoutEngine<'a, M> {
    pub fn new(measurer: &'a M, config: WrapConfig) -> Self {
        Self { measurer, config }
    }

    /// Total width of a segment run.
    ///
    /// Emoji count as a fixed `size * emoji_scale` regardless of bitmap size.
    pub fn measure(&self, segments: &[TextSegment], font: &FontSpec) -> f32 {
        segments
            .iter()
            .map(|seg| {
                if seg.is_emoji() {
                    font.emoji_advance()
                } else {
                    self.measurer.measure_text(&seg.content, font.size)
                }
            })
            .sum()
    }

    /// Segment and measure a single line of text
    pub fn layout_line(&self, text: &str, font: &FontSpec) -> LineLayout {
        let segments = segment(text);
        let width = self.measure(&segments, font);
        LineLayout { segments, width }
    }

    /// Wrap text into lines.
    ///
    /// A line only exceeds the budget when it holds a single word.
    pub fn wrap(&self, text: &str, font: &FontSpec) -> Vec<LineLayout> {
        self.break_lines(text, font)
            .iter()
            .map(|line| self.layout_line(line, font))
            .collect()
    }

    /// Vertical extent of the wrapped text, computed without drawing.
    ///
    /// `line_height + extra_lines * line_height * LINE_SPACING`
    pub fn estimate_height(&self, text: &str, font: &FontSpec) -> f32 {
        let lines = self.break_lines(text, font).len();
        let extra = lines.saturating_sub(1) as f32;
        self.config.line_height + extra * self.line_step()
    }

    /// Distance between consecutive baselines
    pub fn line_step(&self) -> f32 {
        self.config.line_height * LINE_SPACING
    }

    fn fits(&self, candidate: &str, font: &FontSpec) -> bool {
        match self.config.budget {
            WrapBudget::Pixels(max) => self.measure(&segment(candidate), font) <= max,
            WrapBudget::Chars(max) => cluster_count(candidate) <= max,
        }
    }

    /// The greedy pass shared by `wrap` and `estimate_height`
    fn break_lines(&self, text: &str, font: &FontSpec) -> Vec<String> {
        let text = truncate_clusters(text, self.config.max_chars, ELLIPSIS);

        // Unbroken text (URLs, scripts without spaces) is one atomic word
        if !text.contains(' ') {
            return vec![truncate_clusters(&text, self.config.max_word_chars, ELLIPSIS)];
        }

        let mut lines = Vec::new();
        let mut current: Option<String> = None;

        for word in text.split(' ') {
            current = Some(match current.take() {
                None => word.to_string(),
                Some(line) => {
                    let candidate = format!("{} {}", line, word);
                    if self.fits(&candidate, font) {
                        candidate
                    } else {
                        trace!("line break before {:?}", word);
                        lines.push(line);
                        word.to_string()
                    }
                }
            });
        }
        lines.extend(current);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every char advances by half the font size
    struct HalfEm;

    impl TextMeasure for HalfEm {
        fn measure_text(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }
    }

    fn config(budget: WrapBudget) -> WrapConfig {
        WrapConfig {
            budget,
            line_height: 40.0,
            max_chars: 2490,
            max_word_chars: 57,
        }
    }

    #[test]
    fn test_measure_counts_emoji_as_fixed_width() {
        let engine = LayoutEngine::new(&HalfEm, config(WrapBudget::Pixels(800.0)));
        let font = FontSpec::new(20.0).with_emoji(0.9, 0.75);
        // "ab" = 2 * 10, emoji = 18
        let width = engine.measure(&segment("ab😀"), &font);
        assert!((width - 38.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        let engine = LayoutEngine::new(&HalfEm, config(WrapBudget::Pixels(100.0)));
        let font = FontSpec::new(20.0);
        let lines = engine.wrap("", &font);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].segments.is_empty());
        assert_eq!(engine.estimate_height("", &font), 40.0);
    }

    #[test]
    fn test_pixel_wrap_respects_budget() {
        // 10px per char, 100px per line
        let engine = LayoutEngine::new(&HalfEm, config(WrapBudget::Pixels(100.0)));
        let font = FontSpec::new(20.0);
        let lines = engine.wrap("one two three four five six", &font);
        let texts: Vec<String> = lines.iter().map(LineLayout::text).collect();
        assert_eq!(texts, vec!["one two", "three four", "five six"]);
        assert!(lines.iter().all(|l| l.width <= 100.0));
    }

    #[test]
    fn test_long_word_overflows_alone() {
        let engine = LayoutEngine::new(&HalfEm, config(WrapBudget::Pixels(50.0)));
        let font = FontSpec::new(20.0);
        let lines = engine.wrap("hi extraordinarily ok", &font);
        let texts: Vec<String> = lines.iter().map(LineLayout::text).collect();
        assert_eq!(texts, vec!["hi", "extraordinarily", "ok"]);
        assert!(lines[1].width > 50.0);
    }

    #[test]
    fn test_char_budget_wrap_keeps_emoji_atomic() {
        let engine = LayoutEngine::new(&HalfEm, config(WrapBudget::Chars(35)));
        let font = FontSpec::new(26.0);
        let text = "Hello 😀 world this is a long welcome message that needs wrapping";
        let lines = engine.wrap(text, &font);
        let texts: Vec<String> = lines.iter().map(LineLayout::text).collect();
        assert_eq!(
            texts,
            vec![
                "Hello 😀 world this is a long",
                "welcome message that needs wrapping"
            ]
        );
        assert!(lines[0].segments.contains(&TextSegment::emoji("😀")));
    }

    #[test]
    fn test_unbroken_word_is_truncated() {
        let engine = LayoutEngine::new(&HalfEm, config(WrapBudget::Pixels(800.0)));
        let font = FontSpec::new(25.0);
        let word = "x".repeat(100);
        let lines = engine.wrap(&word, &font);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), format!("{}...", "x".repeat(57)));
    }

    #[test]
    fn test_word_cap_counts_clusters() {
        let engine = LayoutEngine::new(&HalfEm, config(WrapBudget::Pixels(800.0)));
        // five code points, one cluster
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        let kept = engine.wrap(&family.repeat(57), &FontSpec::new(25.0));
        assert_eq!(kept[0].text(), family.repeat(57));

        let cut = engine.wrap(&family.repeat(58), &FontSpec::new(25.0));
        assert_eq!(cut[0].text(), format!("{}...", family.repeat(57)));
    }

    #[test]
    fn test_total_length_cap() {
        let mut cfg = config(WrapBudget::Pixels(10_000.0));
        cfg.max_chars = 11;
        let engine = LayoutEngine::new(&HalfEm, cfg);
        let lines = engine.wrap("hello world and more", &FontSpec::new(10.0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "hello world...");
    }

    #[test]
    fn test_estimate_matches_wrap() {
        let engine = LayoutEngine::new(&HalfEm, config(WrapBudget::Pixels(100.0)));
        let font = FontSpec::new(20.0);
        let text = "one two three four five six";
        let lines = engine.wrap(text, &font).len() as f32;
        assert_eq!(engine.estimate_height(text, &font), lines * engine.line_step());
    }

    #[test]
    fn test_emoji_geometry() {
        let font = FontSpec::new(20.0).with_emoji(0.9, 0.75);
        assert!((font.emoji_advance() - 18.0).abs() < 1e-4);
        assert!((font.emoji_top(100.0) - 85.0).abs() < 1e-4);
    }
}
