//! Field rules and the default-rule merge protocol.
//!
//! A [`FieldRuleSpec`] is what configuration supplies: every attribute may be
//! absent. A [`FieldRule`] is what the scanner consumes: every attribute is
//! resolved. The only way from one to the other is [`FieldRule::extend`],
//! which fills absent attributes from a [`RuleDefaults`].

use crate::content::ContentSpec;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Reserved rule name whose attributes override the built-in defaults.
pub const DEFAULT_RULE_NAME: &str = "__default__";

static BUILTIN_DEFAULTS: Lazy<RuleDefaults> = Lazy::new(|| RuleDefaults {
    content: "num|en|lang".to_string(),
    parsed_content: ContentSpec::parse("num|en|lang"),
    skip_head: 0,
    skip_tail: 0,
    replacement_char: '*',
    ignore_symbols: " \t".to_string(),
    max_missed: 5,
});

/// How ignore symbols are recognized while scanning for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreMode {
    /// A character is ignored iff it is listed in the rule's ignore symbols.
    #[default]
    Independent,
    /// Ignore symbols only apply when the rule's content spec also lists at
    /// least one literal character. Matches configurations written for the
    /// log4j2 desensitization plugin.
    LiteralGated,
}

impl std::fmt::Display for IgnoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IgnoreMode::Independent => "independent",
            IgnoreMode::LiteralGated => "literal_gated",
        };
        write!(f, "{}", s)
    }
}

/// Unresolved field rule as supplied by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRuleSpec {
    /// Label to match. Blank or absent names are never matchable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Pipe-delimited content spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Leading value characters left visible.
    #[serde(default, alias = "skipHead", skip_serializing_if = "Option::is_none")]
    pub skip_head: Option<usize>,

    /// Trailing value characters left visible.
    #[serde(default, alias = "skipTail", skip_serializing_if = "Option::is_none")]
    pub skip_tail: Option<usize>,

    /// Character written over masked positions.
    #[serde(
        default,
        alias = "c",
        alias = "replacementChar",
        skip_serializing_if = "Option::is_none"
    )]
    pub replacement_char: Option<char>,

    /// Characters skipped while searching for the value.
    #[serde(
        default,
        alias = "ignoreSymbols",
        alias = "skipSymbols",
        skip_serializing_if = "Option::is_none"
    )]
    pub ignore_symbols: Option<String>,

    /// Tolerance budget before the search gives up.
    #[serde(default, alias = "maxMissed", skip_serializing_if = "Option::is_none")]
    pub max_missed: Option<usize>,
}

impl FieldRuleSpec {
    /// Create a spec with only a name; everything else falls back to defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Create a spec that overrides the built-in defaults.
    pub fn default_override() -> Self {
        Self::new(DEFAULT_RULE_NAME)
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn skip_head(mut self, n: usize) -> Self {
        self.skip_head = Some(n);
        self
    }

    pub fn skip_tail(mut self, n: usize) -> Self {
        self.skip_tail = Some(n);
        self
    }

    pub fn replacement_char(mut self, c: char) -> Self {
        self.replacement_char = Some(c);
        self
    }

    pub fn ignore_symbols(mut self, symbols: impl Into<String>) -> Self {
        self.ignore_symbols = Some(symbols.into());
        self
    }

    pub fn max_missed(mut self, n: usize) -> Self {
        self.max_missed = Some(n);
        self
    }

    /// The normalized label: trimmed and lowercased, `None` if blank.
    pub fn normalized_name(&self) -> Option<String> {
        let name = self.name.as_deref()?.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_lowercase())
        }
    }
}

/// Fully resolved default rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefaults {
    content: String,
    parsed_content: ContentSpec,
    skip_head: usize,
    skip_tail: usize,
    replacement_char: char,
    ignore_symbols: String,
    max_missed: usize,
}

impl RuleDefaults {
    /// The built-in baseline: `num|en|lang`, no skips, `*`, space and tab
    /// ignored, five misses tolerated.
    pub fn builtin() -> Self {
        BUILTIN_DEFAULTS.clone()
    }

    /// Return a copy with every present attribute of `patch` applied.
    pub fn override_with(&self, patch: &FieldRuleSpec) -> Self {
        let mut merged = self.clone();
        if let Some(ref content) = patch.content {
            merged.parsed_content = ContentSpec::parse(content);
            merged.content = content.clone();
        }
        if let Some(c) = patch.replacement_char {
            merged.replacement_char = c;
        }
        if let Some(n) = patch.max_missed {
            merged.max_missed = n;
        }
        if let Some(n) = patch.skip_head {
            merged.skip_head = n;
        }
        if let Some(n) = patch.skip_tail {
            merged.skip_tail = n;
        }
        if let Some(ref symbols) = patch.ignore_symbols {
            merged.ignore_symbols = symbols.clone();
        }
        merged
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn skip_head(&self) -> usize {
        self.skip_head
    }

    pub fn skip_tail(&self) -> usize {
        self.skip_tail
    }

    pub fn replacement_char(&self) -> char {
        self.replacement_char
    }

    pub fn ignore_symbols(&self) -> &str {
        &self.ignore_symbols
    }

    pub fn max_missed(&self) -> usize {
        self.max_missed
    }
}

impl Default for RuleDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolved masking policy for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    name: String,
    content: ContentSpec,
    skip_head: usize,
    skip_tail: usize,
    replacement_char: char,
    /// Sorted, deduplicated.
    ignore_symbols: Vec<char>,
    max_missed: usize,
}

impl FieldRule {
    /// Resolve `spec` under `name`, taking every absent attribute from
    /// `defaults`.
    pub fn extend(name: String, spec: &FieldRuleSpec, defaults: &RuleDefaults) -> Self {
        let content = match spec.content {
            Some(ref content) => ContentSpec::parse(content),
            None => defaults.parsed_content.clone(),
        };
        let symbols = spec
            .ignore_symbols
            .as_deref()
            .unwrap_or(&defaults.ignore_symbols);

        Self {
            name,
            content,
            skip_head: spec.skip_head.unwrap_or(defaults.skip_head),
            skip_tail: spec.skip_tail.unwrap_or(defaults.skip_tail),
            replacement_char: spec.replacement_char.unwrap_or(defaults.replacement_char),
            ignore_symbols: parse_symbols(symbols),
            max_missed: spec.max_missed.unwrap_or(defaults.max_missed),
        }
    }

    /// Returns whether `c` is part of a value for this field.
    #[inline]
    pub fn hit_content(&self, c: char) -> bool {
        self.content.hit(c)
    }

    /// Returns whether `c` is an ignore symbol under `mode`.
    #[inline]
    pub fn hit_ignore_symbol(&self, c: char, mode: IgnoreMode) -> bool {
        if mode == IgnoreMode::LiteralGated && !self.content.has_literals() {
            return false;
        }
        self.ignore_symbols.binary_search(&c).is_ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &ContentSpec {
        &self.content
    }

    pub fn skip_head(&self) -> usize {
        self.skip_head
    }

    pub fn skip_tail(&self) -> usize {
        self.skip_tail
    }

    pub fn replacement_char(&self) -> char {
        self.replacement_char
    }

    pub fn ignore_symbols(&self) -> &[char] {
        &self.ignore_symbols
    }

    pub fn max_missed(&self) -> usize {
        self.max_missed
    }
}

fn parse_symbols(symbols: &str) -> Vec<char> {
    let mut chars: Vec<char> = symbols.chars().collect();
    chars.sort_unstable();
    chars.dedup();
    chars
}
