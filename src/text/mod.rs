//! Text cleaning stages
//!
//! Spell-out, pinyin resolution, pinyin → bopomofo and bopomofo → romanized
//! tokens, plus the rule tables and rewriter they share.

mod bopomofo;
mod latin;
mod lookup;
mod normalizer;
mod romaji;
mod rules;
mod tables;

pub use bopomofo::{pinyin_to_bopomofo, syllable_to_bopomofo, PinyinRuleSet};
pub use latin::{spell_out, LatinCase};
pub use lookup::{
    extract_tone, resolve, BuiltinPinyin, DictionaryPinyin, LookupError, PinyinLookup, Syllable,
    Tone,
};
pub use normalizer::TextNormalizer;
pub use romaji::{bopomofo_to_romaji, post_process};
pub use rules::{apply_all, RewriteStrategy, Rule, RuleTable};
pub use tables::RuleTables;

/// Rule data, exposed for inspection and tests
pub mod data {
    pub use super::tables::{
        COMPOUND_GLYPHS, GLIDE_RULES, HOLISTIC_SYLLABLES, INITIALS, LATIN_SPELL_OUT,
        LEGACY_PINYIN_RULES, NEUTRAL_TONE_MARK, RETROFLEX_RULES, SIBILANT_RULES, SINGLE_GLYPHS,
        SPECIAL_FINALS, SYMBOL_TO_BOPOMOFO,
    };
}

/// Check if character is Chinese
pub fn is_chinese_char(ch: char) -> bool {
    matches!(ch as u32,
        0x4E00..=0x9FFF |     // CJK Unified Ideographs
        0x3400..=0x4DBF |     // CJK Unified Ideographs Extension A
        0x20000..=0x2A6DF |   // CJK Unified Ideographs Extension B
        0x2A700..=0x2B73F |   // CJK Unified Ideographs Extension C
        0x2B740..=0x2B81F |   // CJK Unified Ideographs Extension D
        0xF900..=0xFAFF |     // CJK Compatibility Ideographs
        0x2F800..=0x2FA1F     // CJK Compatibility Ideographs Supplement
    )
}

/// Check if text contains Chinese characters
pub fn contains_chinese(text: &str) -> bool {
    text.chars().any(is_chinese_char)
}

/// Check if character is a bopomofo letter or tone mark
pub fn is_bopomofo_char(ch: char) -> bool {
    matches!(ch as u32, 0x3105..=0x312F | 0x31A0..=0x31BF)
        || matches!(ch, 'ˉ' | 'ˊ' | 'ˇ' | 'ˋ' | '˙')
}
