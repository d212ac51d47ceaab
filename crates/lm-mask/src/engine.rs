//! Main masking engine.
//!
//! For every label occurrence the engine searches the text between that label
//! and the next one for the field's value, then overwrites the value with the
//! rule's replacement character. The label text itself is never touched.
//!
//! The engine sits on the logging hot path, so [`MaskingEngine::process`]
//! never fails: any internal error results in the original line being
//! returned as-is.

use crate::{FieldRule, IgnoreMode, MaskError, Result, RuleSet};
use std::borrow::Cow;
use std::ops::Range;

/// Detected boundaries of a field value. Offsets are byte offsets into the
/// line; `end` is exclusive. When `hit` is false the offsets are both the
/// position where the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSpan {
    pub start: usize,
    pub end: usize,
    pub hit: bool,
}

impl ValueSpan {
    fn miss(at: usize) -> Self {
        Self {
            start: at,
            end: at,
            hit: false,
        }
    }
}

/// A region of the line to overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MaskSpan {
    bytes: Range<usize>,
    /// Number of characters in `bytes`; one replacement is written per char.
    chars: usize,
    replacement: char,
}

/// Applies a [`RuleSet`] to log lines.
#[derive(Debug, Clone)]
pub struct MaskingEngine {
    rules: RuleSet,
    enabled: bool,
}

impl MaskingEngine {
    /// Create an enabled engine.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            enabled: true,
        }
    }

    /// Set whether [`MaskingEngine::format`] masks anything.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Mask `line` using the engine's configured enabled flag.
    pub fn format<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.process(line, self.enabled)
    }

    /// Mask `line` unconditionally.
    pub fn mask<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.process(line, true)
    }

    /// Mask `line`.
    ///
    /// Returns the input unchanged when `enabled` is false, the line is
    /// empty, no labels are configured, or nothing needed masking. Internal
    /// errors are logged at debug level and also yield the input unchanged.
    pub fn process<'a>(&self, line: &'a str, enabled: bool) -> Cow<'a, str> {
        if !enabled || line.is_empty() || self.rules.is_empty() {
            return Cow::Borrowed(line);
        }
        match self.try_mask(line) {
            Ok(Some(masked)) => Cow::Owned(masked),
            Ok(None) => Cow::Borrowed(line),
            Err(e) => {
                tracing::debug!(
                    target: "lm_mask",
                    error = %e,
                    line_len = line.len(),
                    "masking failed; line passed through"
                );
                Cow::Borrowed(line)
            }
        }
    }

    /// Mask `line`, reporting internal errors instead of hiding them.
    ///
    /// `Ok(None)` means nothing was masked.
    pub fn try_mask(&self, line: &str) -> Result<Option<String>> {
        let occurrences = self.rules.occurrences(line);
        if occurrences.is_empty() {
            return Ok(None);
        }

        let mode = self.rules.ignore_mode();
        let mut spans = Vec::new();
        for (i, occurrence) in occurrences.iter().enumerate() {
            let Some(rule) = self.rules.lookup(occurrence.label) else {
                continue;
            };
            let gap_end = occurrences.get(i + 1).map_or(line.len(), |next| next.start);
            if occurrence.end > gap_end {
                return Err(MaskError::internal(occurrence.end));
            }

            let value = scan_value(line, occurrence.end..gap_end, rule, mode)?;
            if let Some(span) = mask_span(line, value, rule)? {
                spans.push(span);
            }
        }

        if spans.is_empty() {
            return Ok(None);
        }
        apply_spans(line, &spans).map(Some)
    }
}

/// Search `gap` for the value of `rule`.
///
/// Scanning stops at the first non-content character after a hit, when the
/// tolerance budget is exceeded, or at the end of the gap. Before the first
/// hit, ignore symbols charge the budget once per consecutive run and every
/// other non-content character charges it once.
pub fn scan_value(
    line: &str,
    gap: Range<usize>,
    rule: &FieldRule,
    mode: IgnoreMode,
) -> Result<ValueSpan> {
    let text = line
        .get(gap.clone())
        .ok_or_else(|| MaskError::internal(gap.start))?;

    let max_missed = rule.max_missed();
    let mut hit = false;
    let mut start = None;
    let mut end = None;
    let mut missed = 0usize;
    let mut consecutive_ignored = 0usize;
    let mut cursor = gap.start;

    for (offset, c) in text.char_indices() {
        cursor = gap.start + offset;
        if missed > max_missed {
            break;
        }

        let ignored = rule.hit_ignore_symbol(c, mode);
        if !ignored && rule.hit_content(c) {
            hit = true;
            start.get_or_insert(cursor);
        } else if hit {
            end = Some(cursor);
            break;
        } else if ignored {
            consecutive_ignored += 1;
            if consecutive_ignored == 1 {
                missed += 1;
            }
        } else {
            consecutive_ignored = 0;
            missed += 1;
        }
        cursor = gap.end.min(cursor + c.len_utf8());
    }

    match (hit, start) {
        (true, Some(start)) => Ok(ValueSpan {
            start,
            end: end.unwrap_or(cursor),
            hit: true,
        }),
        _ => Ok(ValueSpan::miss(cursor)),
    }
}

/// Narrow a detected value by the rule's skip counts.
fn mask_span(line: &str, value: ValueSpan, rule: &FieldRule) -> Result<Option<MaskSpan>> {
    if !value.hit {
        return Ok(None);
    }
    let text = line
        .get(value.start..value.end)
        .ok_or_else(|| MaskError::internal(value.start))?;

    let total = text.chars().count();
    let head = rule.skip_head();
    let tail = rule.skip_tail();
    if head.saturating_add(tail) >= total {
        return Ok(None);
    }
    let count = total - head - tail;

    let offset_of = |nth: usize| {
        text.char_indices()
            .nth(nth)
            .map_or(text.len(), |(offset, _)| offset)
    };
    let from = value.start + offset_of(head);
    let to = value.start + offset_of(head + count);

    Ok(Some(MaskSpan {
        bytes: from..to,
        chars: count,
        replacement: rule.replacement_char(),
    }))
}

fn apply_spans(line: &str, spans: &[MaskSpan]) -> Result<String> {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for span in spans {
        let kept = line
            .get(last..span.bytes.start)
            .ok_or_else(|| MaskError::internal(last))?;
        out.push_str(kept);
        out.extend(std::iter::repeat(span.replacement).take(span.chars));
        last = span.bytes.end;
    }
    let rest = line.get(last..).ok_or_else(|| MaskError::internal(last))?;
    out.push_str(rest);
    Ok(out)
}
