//! Latin letter and digit spell-out

use super::rules::RewriteStrategy;
use super::tables::RuleTables;
use serde::{Deserialize, Serialize};

/// Which Latin letters get spelled out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatinCase {
    /// Only lowercase letters; uppercase passes through untouched
    #[default]
    LowercaseOnly,
    /// ASCII uppercase is lowercased first
    FoldUppercase,
}

/// Spell out lowercase Latin letters and digits in bopomofo
pub fn spell_out(
    text: &str,
    tables: &RuleTables,
    case: LatinCase,
    strategy: RewriteStrategy,
) -> String {
    match case {
        LatinCase::LowercaseOnly => tables.latin.apply_with(text, strategy),
        LatinCase::FoldUppercase => tables
            .latin
            .apply_with(&text.to_ascii_lowercase(), strategy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> RuleTables {
        RuleTables::compile().unwrap()
    }

    #[test]
    fn test_digits_and_letters() {
        let t = tables();
        assert_eq!(
            spell_out("a1", &t, LatinCase::LowercaseOnly, RewriteStrategy::Sequential),
            "ㄟˉㄧˉ"
        );
        assert_eq!(
            spell_out("w", &t, LatinCase::LowercaseOnly, RewriteStrategy::Sequential),
            "ㄉㄚˋㄅㄨˋㄌㄧㄡˋ"
        );
    }

    #[test]
    fn test_uppercase_policy() {
        let t = tables();
        assert_eq!(
            spell_out("1A", &t, LatinCase::LowercaseOnly, RewriteStrategy::Sequential),
            "ㄧˉA"
        );
        assert_eq!(
            spell_out("1A", &t, LatinCase::FoldUppercase, RewriteStrategy::Sequential),
            "ㄧˉㄟˉ"
        );
    }

    #[test]
    fn test_chinese_untouched() {
        let t = tables();
        assert_eq!(
            spell_out("你好", &t, LatinCase::LowercaseOnly, RewriteStrategy::Combined),
            "你好"
        );
    }

    #[test]
    fn test_strategies_agree() {
        let t = tables();
        let input = "abc xyz 0123456789 Hello";
        assert_eq!(
            spell_out(input, &t, LatinCase::FoldUppercase, RewriteStrategy::Sequential),
            spell_out(input, &t, LatinCase::FoldUppercase, RewriteStrategy::Combined)
        );
    }
}
