//! Pinyin → bopomofo
//!
//! Tables run per syllable, so `^`/`$` anchor to the syllable and the
//! uppercase placeholders can never collide with passthrough text.

use super::rules::{apply_all, RewriteStrategy};
use super::tables::RuleTables;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Resolved syllable: lowercase letters and an optional tone digit
    static ref SYLLABLE_REGEX: Regex = Regex::new(r"[a-z]+[1-4]?").unwrap();
}

/// Which pinyin → bopomofo rule tables to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinyinRuleSet {
    /// Special finals, initials, holistic syllables; neutral tone unmarked
    #[default]
    Standard,
    /// Single older table; neutral tone written as `˙`
    Legacy,
}

/// Convert one pinyin syllable such as `zhuang1` into bopomofo
pub fn syllable_to_bopomofo(
    syllable: &str,
    tables: &RuleTables,
    rules: PinyinRuleSet,
    strategy: RewriteStrategy,
) -> String {
    let bopomofo = apply_all(syllable, &tables.pinyin_stages(rules), strategy);
    log::trace!("{} -> {}", syllable, bopomofo);
    bopomofo
}

/// Convert every pinyin syllable in resolved text; other text is untouched
pub fn pinyin_to_bopomofo(
    text: &str,
    tables: &RuleTables,
    rules: PinyinRuleSet,
    strategy: RewriteStrategy,
) -> String {
    SYLLABLE_REGEX
        .replace_all(text, |caps: &Captures| {
            syllable_to_bopomofo(&caps[0], tables, rules, strategy)
        })
        .into_owned()
}
