//! The resolved, immutable collection of field rules.
//!
//! Building a [`RuleSet`] applies the default-rule override, extends every
//! rule from the merged defaults, and compiles the label matcher. Nothing is
//! mutated afterwards, so a rule set can be shared freely across threads.

use crate::matcher::{LabelMatcher, Occurrence};
use crate::rule::{FieldRule, FieldRuleSpec, IgnoreMode, RuleDefaults, DEFAULT_RULE_NAME};
use crate::Result;
use std::collections::HashMap;

/// Resolved rules plus the compiled label matcher.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Resolved rules, in label order.
    rules: Vec<FieldRule>,
    /// Lowercased label -> index into `rules`.
    index: HashMap<String, usize>,
    defaults: RuleDefaults,
    ignore_mode: IgnoreMode,
    matcher: LabelMatcher,
}

impl RuleSet {
    /// Build a rule set from `specs` with the default ignore mode.
    pub fn build<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = FieldRuleSpec>,
    {
        Self::builder().rules(specs).build()
    }

    /// Like [`RuleSet::build`] but reports a matcher compilation failure.
    pub fn try_build<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = FieldRuleSpec>,
    {
        Self::builder().rules(specs).try_build()
    }

    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// A rule set with no labels; every line passes through untouched.
    pub fn empty() -> Self {
        Self::builder().build()
    }

    /// Look up the rule for a label, case-insensitively.
    pub fn lookup(&self, label: &str) -> Option<&FieldRule> {
        let idx = match self.index.get(label) {
            Some(idx) => *idx,
            None => *self.index.get(&label.to_lowercase())?,
        };
        self.rules.get(idx)
    }

    /// The matchable labels, lowercased.
    pub fn labels(&self) -> &[String] {
        self.matcher.labels()
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether there are no matchable labels.
    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// The defaults every rule was extended from.
    pub fn defaults(&self) -> &RuleDefaults {
        &self.defaults
    }

    pub fn ignore_mode(&self) -> IgnoreMode {
        self.ignore_mode
    }

    /// Locate every label occurrence in `line`.
    pub fn occurrences<'r>(&'r self, line: &str) -> Vec<Occurrence<'r>> {
        self.matcher.find(line)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builder for [`RuleSet`].
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    specs: Vec<FieldRuleSpec>,
    ignore_mode: IgnoreMode,
}

impl RuleSetBuilder {
    pub fn rule(mut self, spec: FieldRuleSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn rules<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = FieldRuleSpec>,
    {
        self.specs.extend(specs);
        self
    }

    pub fn ignore_mode(mut self, mode: IgnoreMode) -> Self {
        self.ignore_mode = mode;
        self
    }

    /// Build the rule set. If the label automaton cannot be compiled the
    /// failure is logged and the result has no matchable labels.
    pub fn build(self) -> RuleSet {
        let ignore_mode = self.ignore_mode;
        match self.try_build() {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(
                    target: "lm_mask",
                    error = %e,
                    "label matcher build failed; masking disabled for this rule set"
                );
                RuleSet {
                    rules: Vec::new(),
                    index: HashMap::new(),
                    defaults: RuleDefaults::builtin(),
                    ignore_mode,
                    matcher: LabelMatcher::empty(),
                }
            }
        }
    }

    /// Build the rule set, surfacing matcher compilation errors.
    pub fn try_build(self) -> Result<RuleSet> {
        let total = self.specs.len();

        // Later specs with the same label replace earlier ones.
        let mut named: Vec<(String, FieldRuleSpec)> = Vec::with_capacity(total);
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(total);
        let mut dropped = 0usize;
        for spec in self.specs {
            let Some(name) = spec.normalized_name() else {
                dropped += 1;
                continue;
            };
            match positions.get(&name) {
                Some(&pos) => named[pos].1 = spec,
                None => {
                    positions.insert(name.clone(), named.len());
                    named.push((name, spec));
                }
            }
        }

        let mut defaults = RuleDefaults::builtin();
        let mut default_overridden = false;
        if let Some(pos) = positions.get(DEFAULT_RULE_NAME).copied() {
            let (_, patch) = named.remove(pos);
            defaults = defaults.override_with(&patch);
            default_overridden = true;
        }

        let mut rules = Vec::with_capacity(named.len());
        let mut index = HashMap::with_capacity(named.len());
        for (name, spec) in named {
            index.insert(name.clone(), rules.len());
            rules.push(FieldRule::extend(name, &spec, &defaults));
        }

        let labels = rules.iter().map(|r| r.name().to_string()).collect();
        let matcher = LabelMatcher::new(labels)?;

        tracing::debug!(
            target: "lm_mask",
            rules = rules.len(),
            dropped,
            default_overridden,
            ignore_mode = %self.ignore_mode,
            "rule set built"
        );

        Ok(RuleSet {
            rules,
            index,
            defaults,
            ignore_mode: self.ignore_mode,
            matcher,
        })
    }
}
