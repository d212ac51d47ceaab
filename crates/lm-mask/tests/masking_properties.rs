//! Property-based tests for the masking engine.
//!
//! Uses proptest to verify that masking laws hold across many random lines.

use lm_mask::{FieldRuleSpec, MaskingEngine, RuleSet};
use proptest::prelude::*;

fn engine() -> MaskingEngine {
    MaskingEngine::new(RuleSet::build(vec![
        FieldRuleSpec::new("phone").content("num").skip_head(3).skip_tail(4).max_missed(2),
        FieldRuleSpec::new("name"),
        FieldRuleSpec::new("card").content("num|-").ignore_symbols(" ").max_missed(3),
    ]))
}

/// Lines built from characters that can never spell a configured label.
fn label_free_line() -> impl Strategy<Value = String> {
    "[0-9 =:;,./xyz张三\\-\t]{0,64}"
}

/// Arbitrary printable lines, labels included.
fn any_line() -> impl Strategy<Value = String> {
    "(phone|name|card|PHONE|[0-9a-z =:;,\\-张é\t]){0,24}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Lines without labels are returned exactly.
    #[test]
    fn identity_without_labels(line in label_free_line()) {
        let engine = engine();
        prop_assert_eq!(engine.mask(&line), line.as_str());
    }

    /// Masking is a pure function of the line.
    #[test]
    fn deterministic(line in any_line()) {
        let engine = engine();
        let first = engine.mask(&line).into_owned();
        let second = engine.mask(&line).into_owned();
        prop_assert_eq!(first, second);
    }

    /// One replacement is written per masked character.
    #[test]
    fn preserves_character_count(line in any_line()) {
        let engine = engine();
        let masked = engine.mask(&line);
        prop_assert_eq!(masked.chars().count(), line.chars().count());
    }

    /// Every changed character became the replacement character, and labels
    /// are never altered.
    #[test]
    fn only_replacement_characters_introduced(line in any_line()) {
        let engine = engine();
        let masked = engine.mask(&line);
        for (before, after) in line.chars().zip(masked.chars()) {
            if before != after {
                prop_assert_eq!(after, '*');
            }
        }
        for occurrence in engine.rules().occurrences(&line) {
            let original = &line[occurrence.start..occurrence.end];
            let chars_before = line[..occurrence.start].chars().count();
            let label_len = original.chars().count();
            let kept: String = masked.chars().skip(chars_before).take(label_len).collect();
            prop_assert_eq!(kept.as_str(), original);
        }
    }

    /// Disabled processing is the identity.
    #[test]
    fn disabled_is_identity(line in any_line()) {
        let engine = engine();
        prop_assert_eq!(engine.process(&line, false), line.as_str());
    }

    /// A value no longer than the visible head and tail is never masked.
    #[test]
    fn short_values_stay_visible(value in "[0-9]{1,7}") {
        let engine = engine();
        let line = format!("phone={}", value);
        prop_assert_eq!(engine.mask(&line), line.as_str());
    }

    /// Longer values keep exactly the head and tail.
    #[test]
    fn long_values_keep_head_and_tail(value in "[0-9]{8,20}") {
        let engine = engine();
        let line = format!("phone={}", value);
        let masked = engine.mask(&line);
        let expected = format!(
            "phone={}{}{}",
            &value[..3],
            "*".repeat(value.len() - 7),
            &value[value.len() - 4..]
        );
        prop_assert_eq!(&*masked, expected.as_str());
    }
}
