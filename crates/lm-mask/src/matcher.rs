//! Whole-word, case-insensitive label matching.
//!
//! All labels are compiled into a single Aho-Corasick automaton when the rule
//! set is built, so scanning a line costs one pass regardless of how many
//! labels are configured.
//!
//! Case folding is per-character Unicode lowercasing. ASCII lines are
//! searched as-is through the automaton's ASCII folding; any other line is
//! lowercased into a scratch buffer first and match offsets are mapped back.

use crate::Result;
use aho_corasick::AhoCorasick;

/// One located label in a line. Offsets are byte offsets, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'r> {
    pub start: usize,
    pub end: usize,
    pub label: &'r str,
}

/// Multi-pattern matcher over a fixed set of lowercased labels.
#[derive(Clone)]
pub struct LabelMatcher {
    labels: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl std::fmt::Debug for LabelMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelMatcher")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl LabelMatcher {
    /// Compile a matcher for `labels`. Labels are expected to be non-empty
    /// and lowercased already.
    pub fn new(labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Ok(Self::empty());
        }
        let patterns: Vec<String> = labels.iter().map(|label| fold(label)).collect();
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)?;
        Ok(Self {
            labels,
            automaton: Some(automaton),
        })
    }

    /// A matcher that never matches.
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            automaton: None,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.automaton.is_none()
    }

    /// Find the non-overlapping whole-word occurrences in `line`, left to
    /// right. When candidates overlap, the leftmost wins, then the longest.
    pub fn find(&self, line: &str) -> Vec<Occurrence<'_>> {
        let automaton = match self.automaton {
            Some(ref ac) if !line.is_empty() => ac,
            _ => return Vec::new(),
        };

        let folded = (!line.is_ascii()).then(|| FoldedLine::new(line));
        let haystack = folded.as_ref().map_or(line, |f| f.text.as_str());

        let mut candidates: Vec<(usize, usize, usize)> = automaton
            .find_overlapping_iter(haystack)
            .filter_map(|m| {
                let (start, end) = match folded {
                    Some(ref f) => (f.origin(m.start())?, f.origin(m.end())?),
                    None => (m.start(), m.end()),
                };
                is_whole_word(line, start, end).then_some((start, end, m.pattern().as_usize()))
            })
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }
        candidates.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut occurrences = Vec::with_capacity(candidates.len());
        let mut cursor = 0;
        for (start, end, pattern) in candidates {
            if start < cursor {
                continue;
            }
            if let Some(label) = self.labels.get(pattern) {
                occurrences.push(Occurrence {
                    start,
                    end,
                    label: label.as_str(),
                });
                cursor = end;
            }
        }
        occurrences
    }
}

/// Lowercase `s` one character at a time.
fn fold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// A lowercased copy of a line with a map from its byte offsets back to the
/// original. Only offsets where an original character's lowercase form
/// begins (and the end of the line) have an origin.
struct FoldedLine {
    text: String,
    origin: Vec<Option<usize>>,
}

impl FoldedLine {
    fn new(line: &str) -> Self {
        let mut text = String::with_capacity(line.len());
        let mut origin = Vec::with_capacity(line.len() + 1);
        for (offset, c) in line.char_indices() {
            origin.push(Some(offset));
            text.extend(c.to_lowercase());
            origin.resize(text.len(), None);
        }
        origin.push(Some(line.len()));
        Self { text, origin }
    }

    fn origin(&self, folded: usize) -> Option<usize> {
        self.origin.get(folded).copied().flatten()
    }
}

/// Letters, digits and underscore join a label to its neighbors.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_whole_word(line: &str, start: usize, end: usize) -> bool {
    let before = line
        .get(..start)
        .and_then(|s| s.chars().next_back())
        .map_or(false, is_word_char);
    let after = line
        .get(end..)
        .and_then(|s| s.chars().next())
        .map_or(false, is_word_char);
    !before && !after
}
