//! Label-driven value masking for free-form log lines.
//!
//! This crate rewrites log lines so that the values following configured
//! field labels (`phone=...`, `name: ...`) are overwritten with a replacement
//! character before the line reaches its sink. Callers do not need to tag or
//! pre-format anything: labels are found lexically and each value's extent is
//! determined by a per-field character policy.
//!
//! # Key Features
//!
//! - **One pass per line**: all labels are compiled into a single
//!   Aho-Corasick automaton when the rule set is built.
//! - **Tolerant value search**: separators and ignorable symbols between the
//!   label and its value are skipped up to a per-field budget.
//! - **Partial masking**: leading and trailing characters can be left visible.
//! - **Never fails the caller**: any internal error passes the line through
//!   unchanged.
//!
//! # Example
//!
//! ```
//! use lm_mask::{FieldRuleSpec, MaskingEngine, RuleSet};
//!
//! let rules = RuleSet::build(vec![FieldRuleSpec::new("phone")
//!     .content("num")
//!     .skip_head(3)
//!     .skip_tail(4)]);
//! let engine = MaskingEngine::new(rules);
//!
//! assert_eq!(engine.mask("phone=13812345678"), "phone=138****5678");
//! ```

pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod rule;
pub mod rule_set;

pub use config::{MaskingConfig, CONFIG_SCHEMA_VERSION};
pub use content::{CharClass, ContentSpec};
pub use engine::{scan_value, MaskingEngine, ValueSpan};
pub use error::{MaskError, Result};
pub use matcher::{LabelMatcher, Occurrence};
pub use rule::{FieldRule, FieldRuleSpec, IgnoreMode, RuleDefaults, DEFAULT_RULE_NAME};
pub use rule_set::{RuleSet, RuleSetBuilder};
