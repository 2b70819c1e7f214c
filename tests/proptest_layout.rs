//! Property-based tests for segmentation and line layout.
//!
//! Uses proptest to verify invariants that must hold across all inputs.

use canvacard::constants::ELLIPSIS;
use canvacard::text::segment::truncate_clusters;
use canvacard::text::{
    segment, FontSpec, LayoutEngine, LineLayout, TextMeasure, WrapBudget, WrapConfig,
};
use proptest::prelude::*;
use unicode_segmentation::UnicodeSegmentation;

/// Every char advances by half the font size
struct HalfEm;

impl TextMeasure for HalfEm {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Generate arbitrary UTF-8 strings.
fn utf8_string() -> impl Strategy<Value = String> {
    "\\PC{0,100}"
}

/// Words and emoji clusters (flags, ZWJ families, VS16, skin tones)
fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,12}",
        Just("\u{1F600}".to_string()),
        Just("\u{1F1EF}\u{1F1F5}".to_string()),
        Just("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}".to_string()),
        Just("\u{2764}\u{FE0F}".to_string()),
        Just("\u{1F44D}\u{1F3FD}".to_string()),
        Just("caf\u{E9}".to_string()),
    ]
}

/// Space-separated text, sometimes with doubled spaces
fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec((token(), prop::bool::weighted(0.1)), 0..60).prop_map(|parts| {
        let mut out = String::new();
        for (i, (word, double)) in parts.into_iter().enumerate() {
            if i > 0 {
                out.push(' ');
                if double {
                    out.push(' ');
                }
            }
            out.push_str(&word);
        }
        out
    })
}

fn pixel_config(budget: f32, max_chars: usize) -> WrapConfig {
    WrapConfig {
        budget: WrapBudget::Pixels(budget),
        line_height: 40.0,
        max_chars,
        max_word_chars: 57,
    }
}

// ============================================================================
// Segmentation
// ============================================================================

proptest! {
    #[test]
    fn segmentation_round_trips(s in utf8_string()) {
        let joined: String = segment(&s).into_iter().map(|seg| seg.content).collect();
        prop_assert_eq!(joined, s);
    }

    #[test]
    fn segmentation_round_trips_emoji_text(s in sentence()) {
        let joined: String = segment(&s).into_iter().map(|seg| seg.content).collect();
        prop_assert_eq!(joined, s);
    }

    #[test]
    fn emoji_segments_are_single_clusters(s in sentence()) {
        for seg in segment(&s).iter().filter(|seg| seg.is_emoji()) {
            prop_assert_eq!(seg.content.graphemes(true).count(), 1);
        }
    }

    #[test]
    fn no_empty_or_adjacent_plain_segments(s in utf8_string()) {
        let segments = segment(&s);
        prop_assert!(segments.iter().all(|seg| !seg.content.is_empty()));
        for pair in segments.windows(2) {
            prop_assert!(pair[0].is_emoji() || pair[1].is_emoji());
        }
    }
}

// ============================================================================
// Wrapping
// ============================================================================

proptest! {
    #[test]
    fn wrapped_lines_fit_unless_single_word(
        s in sentence(),
        budget in 40.0f32..600.0,
        size in 10.0f32..40.0,
    ) {
        let engine = LayoutEngine::new(&HalfEm, pixel_config(budget, 2490));
        let font = FontSpec::new(size);
        for line in engine.wrap(&s, &font) {
            if line.text().contains(' ') {
                prop_assert!(line.width <= budget, "{:?} is {}px > {}px", line.text(), line.width, budget);
            }
        }
    }

    #[test]
    fn estimate_matches_line_count(
        s in sentence(),
        budget in 40.0f32..600.0,
    ) {
        let engine = LayoutEngine::new(&HalfEm, pixel_config(budget, 2490));
        let font = FontSpec::new(25.0);
        let lines = engine.wrap(&s, &font).len() as f32;
        let estimate = engine.estimate_height(&s, &font);
        prop_assert!((estimate - lines * engine.line_step()).abs() < 1e-3);
    }

    #[test]
    fn joined_lines_reproduce_capped_text(
        s in sentence(),
        budget in 40.0f32..600.0,
        max_chars in 5usize..300,
    ) {
        let engine = LayoutEngine::new(&HalfEm, pixel_config(budget, max_chars));
        let font = FontSpec::new(20.0);
        let capped = truncate_clusters(&s, max_chars, ELLIPSIS);
        prop_assume!(capped.contains(' '));

        let lines = engine.wrap(&s, &font);
        let joined = lines.iter().map(LineLayout::text).collect::<Vec<_>>().join(" ");
        prop_assert_eq!(joined, capped);
    }

    #[test]
    fn char_budget_lines_stay_within_budget(s in sentence(), max in 10usize..60) {
        let config = WrapConfig {
            budget: WrapBudget::Chars(max),
            line_height: 35.0,
            max_chars: 2490,
            max_word_chars: max,
        };
        let engine = LayoutEngine::new(&HalfEm, config);
        for line in engine.wrap(&s, &FontSpec::new(26.0)) {
            let text = line.text();
            if text.contains(' ') {
                prop_assert!(text.graphemes(true).count() <= max);
            }
        }
    }
}
