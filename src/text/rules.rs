//! Ordered rewrite rules and the stage rewriter
//!
//! Every cleaning stage is a [`RuleTable`]: an ordered list of
//! `(pattern, replacement)` pairs applied in one forward pass. Each rule
//! replaces all non-overlapping matches in the string produced by the rule
//! before it. Tables are never iterated to a fixed point.

use crate::{Error, Result};
use regex::{Captures, NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a table is applied to a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteStrategy {
    /// One full-string substitution per rule, in table order
    #[default]
    Sequential,
    /// Literal-only tables are scanned once by a single longest-match-first
    /// automaton; tables with pattern rules fall back to `Sequential`
    Combined,
}

/// A single rewrite rule
#[derive(Debug, Clone)]
pub struct Rule {
    source: String,
    pattern: Regex,
    replacement: String,
    literal: bool,
}

impl Rule {
    /// Regex rule; the replacement may reference groups as `${1}`
    pub fn pattern(stage: &'static str, pattern: &str, replacement: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|e| Error::RuleCompile {
            stage,
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            pattern: compiled,
            replacement: replacement.to_string(),
            literal: false,
        })
    }

    /// Literal rule; neither side is interpreted
    pub fn literal(stage: &'static str, from: &str, to: &str) -> Result<Self> {
        if from.is_empty() {
            return Err(Error::RuleCompile {
                stage,
                pattern: String::new(),
                message: "literal rule with empty pattern".into(),
            });
        }

        let compiled = Regex::new(&regex::escape(from)).map_err(|e| Error::RuleCompile {
            stage,
            pattern: from.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: from.to_string(),
            pattern: compiled,
            replacement: to.to_string(),
            literal: true,
        })
    }

    /// Pattern text as written in the table
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Replace every non-overlapping match in `text`
    pub fn apply(&self, text: &str) -> String {
        if self.literal {
            self.pattern
                .replace_all(text, NoExpand(&self.replacement))
                .into_owned()
        } else {
            self.pattern
                .replace_all(text, self.replacement.as_str())
                .into_owned()
        }
    }
}

/// Single-scan automaton over the literals of a table
#[derive(Debug, Clone)]
struct CombinedMatcher {
    regex: Regex,
    replacements: HashMap<String, String>,
}

impl CombinedMatcher {
    fn build(stage: &'static str, rules: &[Rule]) -> Result<Option<Self>> {
        if rules.is_empty() || rules.iter().any(|r| !r.literal) {
            return Ok(None);
        }

        let mut replacements = HashMap::new();
        for rule in rules {
            // First rule wins, as it would under sequential application
            replacements
                .entry(rule.source.clone())
                .or_insert_with(|| rule.replacement.clone());
        }

        // Regex alternation is leftmost-first, so longer literals go first
        let mut literals: Vec<&String> = replacements.keys().collect();
        literals.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let alternation = literals
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");

        let regex = Regex::new(&alternation).map_err(|e| Error::RuleCompile {
            stage,
            pattern: alternation.clone(),
            message: e.to_string(),
        })?;

        Ok(Some(Self { regex, replacements }))
    }

    fn apply(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |caps: &Captures| {
                self.replacements
                    .get(&caps[0])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Ordered, immutable rule list for one stage
#[derive(Debug, Clone)]
pub struct RuleTable {
    name: &'static str,
    rules: Vec<Rule>,
    combined: Option<CombinedMatcher>,
}

impl RuleTable {
    /// Compile a table of regex rules
    pub fn from_patterns(name: &'static str, entries: &[(&str, &str)]) -> Result<Self> {
        let rules = entries
            .iter()
            .map(|(p, r)| Rule::pattern(name, p, r))
            .collect::<Result<Vec<_>>>()?;
        Self::from_rules(name, rules)
    }

    /// Compile a table of literal rules
    pub fn from_literals(name: &'static str, entries: &[(&str, &str)]) -> Result<Self> {
        let rules = entries
            .iter()
            .map(|(from, to)| Rule::literal(name, from, to))
            .collect::<Result<Vec<_>>>()?;
        Self::from_rules(name, rules)
    }

    pub fn from_rules(name: &'static str, rules: Vec<Rule>) -> Result<Self> {
        let combined = CombinedMatcher::build(name, &rules)?;
        log::trace!("compiled rule table '{}' ({} rules)", name, rules.len());
        Ok(Self {
            name,
            rules,
            combined,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `Combined` applies to this table
    pub fn is_combinable(&self) -> bool {
        self.combined.is_some()
    }

    /// Apply every rule in order to the accumulated string
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            current = rule.apply(&current);
        }
        current
    }

    /// Apply with an explicit strategy
    pub fn apply_with(&self, text: &str, strategy: RewriteStrategy) -> String {
        match (strategy, &self.combined) {
            (RewriteStrategy::Combined, Some(matcher)) => matcher.apply(text),
            _ => self.apply(text),
        }
    }
}

/// Apply several tables back to back
pub fn apply_all(text: &str, tables: &[&RuleTable], strategy: RewriteStrategy) -> String {
    tables
        .iter()
        .fold(text.to_string(), |acc, table| table.apply_with(&acc, strategy))
}
