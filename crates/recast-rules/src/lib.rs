//! Ordered text rewrites that move translated sources from the declaration
//! dialect (visibility keywords, decorators, `module A.B { }` wrappers,
//! `import` statements) to the lean dialect.
//!
//! The engine is a fold over a fixed list of [`RewriteRule`]s. Each rule sees
//! the whole file as left by the previous rule, so the order of the list is
//! part of its behavior: longer visibility prefixes are stripped before the
//! shorter ones they overlap with, and the accessor rule depends on the shape
//! produced by the `private` rule.
//!
//! ```rust
//! use recast_rules::RuleEngine;
//!
//! let engine = RuleEngine::default();
//! let out = engine.apply("module R3.Geometry {\n    public static Origin() {}\n}");
//! assert_eq!(out, "    static Origin() {}");
//! ```

pub mod brace;
pub mod rules;

use regex::{Captures, NoExpand, Regex};

pub use rules::{PRIVACY_MARKER, default_rules, end_anchored_rules};

/// Text inserted at each site a rule's pattern matches.
#[derive(Clone, Copy)]
pub enum Replacement {
    /// Inserted verbatim; `$` has no special meaning.
    Literal(&'static str),
    /// Computed from the match's capture groups.
    Captures(fn(&Captures) -> String),
}

/// How a rule finds and rewrites its sites.
pub enum RuleAction {
    Regex {
        pattern: Regex,
        replacement: Replacement,
        /// Rewrite every site, or only the first one.
        all: bool,
    },
    /// A rewrite that cannot be expressed as a pattern. Returns `None` when
    /// there is nothing to rewrite.
    Structural(fn(&str) -> Option<String>),
}

/// One named, independently testable step of the pipeline.
pub struct RewriteRule {
    pub name: &'static str,
    pub action: RuleAction,
}

impl RewriteRule {
    pub fn regex(name: &'static str, pattern: Regex, replacement: Replacement) -> Self {
        Self {
            name,
            action: RuleAction::Regex {
                pattern,
                replacement,
                all: true,
            },
        }
    }

    pub fn regex_first(name: &'static str, pattern: Regex, replacement: Replacement) -> Self {
        Self {
            name,
            action: RuleAction::Regex {
                pattern,
                replacement,
                all: false,
            },
        }
    }

    pub fn structural(name: &'static str, rewrite: fn(&str) -> Option<String>) -> Self {
        Self {
            name,
            action: RuleAction::Structural(rewrite),
        }
    }

    /// Apply this rule alone. Returns `None` when the rule finds no site,
    /// which is never an error.
    pub fn apply(&self, content: &str) -> Option<String> {
        match &self.action {
            RuleAction::Regex {
                pattern,
                replacement,
                all,
            } => {
                if !pattern.is_match(content) {
                    return None;
                }
                let limit = if *all { 0 } else { 1 };
                let out = match replacement {
                    Replacement::Literal(text) => {
                        pattern.replacen(content, limit, NoExpand(*text))
                    }
                    Replacement::Captures(f) => {
                        pattern.replacen(content, limit, |caps: &Captures| f(caps))
                    }
                };
                Some(out.into_owned())
            }
            RuleAction::Structural(rewrite) => rewrite(content),
        }
    }
}

impl std::fmt::Debug for RewriteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.action {
            RuleAction::Regex { pattern, .. } => pattern.as_str().to_string(),
            RuleAction::Structural(_) => "<structural>".to_string(),
        };
        f.debug_struct("RewriteRule")
            .field("name", &self.name)
            .field("action", &kind)
            .finish()
    }
}

/// Output of a traced run: the rewritten text and the rules that changed it,
/// in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub output: String,
    pub applied: Vec<&'static str>,
}

impl RuleReport {
    pub fn was_applied(&self, name: &str) -> bool {
        self.applied.iter().any(|n| *n == name)
    }
}

#[derive(Debug)]
pub struct RuleEngine {
    rules: Vec<RewriteRule>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl RuleEngine {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Run every rule in order over the whole text.
    pub fn apply(&self, content: &str) -> String {
        self.apply_with_report(content).output
    }

    pub fn apply_with_report(&self, content: &str) -> RuleReport {
        let mut applied = Vec::new();
        let output = self
            .rules
            .iter()
            .fold(content.to_string(), |text, rule| match rule.apply(&text) {
                Some(updated) if updated != text => {
                    applied.push(rule.name);
                    updated
                }
                _ => text,
            });
        RuleReport { output, applied }
    }
}
