//! Fuzz target for the masking hot path.
//!
//! Arbitrary lines and rule attributes must never panic and must preserve
//! the line's character count.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lm_mask::{FieldRuleSpec, IgnoreMode, MaskingEngine, RuleSet};

#[derive(Arbitrary, Debug)]
struct Input {
    line: String,
    labels: Vec<String>,
    content: Option<String>,
    skip_head: Option<u8>,
    skip_tail: Option<u8>,
    replacement: Option<char>,
    ignore_symbols: Option<String>,
    max_missed: Option<u8>,
    literal_gated: bool,
}

fuzz_target!(|input: Input| {
    let specs = input.labels.iter().take(16).map(|label| FieldRuleSpec {
        name: Some(label.clone()),
        content: input.content.clone(),
        skip_head: input.skip_head.map(usize::from),
        skip_tail: input.skip_tail.map(usize::from),
        replacement_char: input.replacement,
        ignore_symbols: input.ignore_symbols.clone(),
        max_missed: input.max_missed.map(usize::from),
    });
    let mode = if input.literal_gated {
        IgnoreMode::LiteralGated
    } else {
        IgnoreMode::Independent
    };
    let engine = MaskingEngine::new(RuleSet::builder().rules(specs).ignore_mode(mode).build());

    let masked = engine.mask(&input.line);
    assert_eq!(masked.chars().count(), input.line.chars().count());
});
