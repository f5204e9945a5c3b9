//! Static rule tables for every cleaning stage
//!
//! Table order is part of the contract: narrower rules come before the
//! broader ones that would otherwise swallow them.

use super::bopomofo::PinyinRuleSet;
use super::rules::RuleTable;
use crate::Result;

/// Lowercase Latin letters and digits spelled out in bopomofo
pub const LATIN_SPELL_OUT: &[(&str, &str)] = &[
    ("a", "ㄟˉ"),
    ("b", "ㄅㄧˋ"),
    ("c", "ㄙㄧˉ"),
    ("d", "ㄉㄧˋ"),
    ("e", "ㄧˋ"),
    ("f", "ㄝˊㄈㄨˋ"),
    ("g", "ㄐㄧˋ"),
    ("h", "ㄝˇㄑㄩˋ"),
    ("i", "ㄞˋ"),
    ("j", "ㄐㄟˋ"),
    ("k", "ㄎㄟˋ"),
    ("l", "ㄝˊㄛˋ"),
    ("m", "ㄝˊㄇㄨˋ"),
    ("n", "ㄣˉ"),
    ("o", "ㄡˉ"),
    ("p", "ㄆㄧˉ"),
    ("q", "ㄎㄧㄡˉ"),
    ("r", "ㄚˋ"),
    ("s", "ㄝˊㄙˋ"),
    ("t", "ㄊㄧˋ"),
    ("u", "ㄧㄡˉ"),
    ("v", "ㄨㄧˉ"),
    ("w", "ㄉㄚˋㄅㄨˋㄌㄧㄡˋ"),
    ("x", "ㄝˉㄎㄨˋㄙˋ"),
    ("y", "ㄨㄞˋ"),
    ("z", "ㄗㄟˋ"),
    ("1", "ㄧˉ"),
    ("2", "ㄦˋ"),
    ("3", "ㄙㄢˉ"),
    ("4", "ㄙˋ"),
    ("5", "ㄨˇ"),
    ("6", "ㄌㄧㄡˋ"),
    ("7", "ㄑㄧˉ"),
    ("8", "ㄅㄚˉ"),
    ("9", "ㄐㄧㄡˇ"),
    ("0", "ㄌㄧㄥˊ"),
];

/// Four-letter finals captured whole before the initials table runs
pub const SPECIAL_FINALS: &[(&str, &str)] = &[
    ("iang", "iK"),
    ("iong", "vG"),
    ("uang", "uK"),
    ("ueng", "uG"),
];

/// Initials, final spelling fixes and common finals to placeholders
pub const INITIALS: &[(&str, &str)] = &[
    ("^([jqx])u", "${1}v"),
    ("iu", "iou"),
    ("ui", "uei"),
    ("ong", "uG"),
    ("([iuv])n", "${1}en"),
    ("^zhi?", "Z"),
    ("^chi?", "C"),
    ("^shi?", "S"),
    ("^([zcsr])i", "${1}"),
    ("ai", "A"),
    ("ei", "I"),
    ("ao", "O"),
    ("ou", "U"),
    ("ang", "K"),
    ("eng", "G"),
    ("an", "M"),
    ("en", "N"),
    ("er", "R"),
    ("([iv])e", "${1}E"),
];

/// Zero-initial and syllabic-nasal syllables
pub const HOLISTIC_SYLLABLES: &[(&str, &str)] = &[
    ("^yue", "vE"),
    ("^ye", "iE"),
    ("^yu", "v"),
    ("^yi?", "i"),
    ("^wu?", "u"),
    (r"^m(\d?)$", "mu${1}"),
    (r"^n(\d?)$", "N${1}"),
    (r"^ng(\d?)$", "N${1}"),
];

/// Older single-table rewrite. Neutral syllables gain a `0`, which
/// [`NEUTRAL_TONE_MARK`] turns into `˙`
pub const LEGACY_PINYIN_RULES: &[(&str, &str)] = &[
    (r"^m(\d)$", "mu${1}"),
    (r"^n(\d)$", "N${1}"),
    ("^r$", "er"),
    ("iu", "iou"),
    ("ui", "uei"),
    ("ong", "ung"),
    ("^yi?", "i"),
    ("^wu?", "u"),
    ("iu", "v"),
    ("^([jqx])u", "${1}v"),
    ("([iuv])n", "${1}en"),
    ("^zhi?", "Z"),
    ("^chi?", "C"),
    ("^shi?", "S"),
    ("^([zcsr])i", "${1}"),
    ("ai", "A"),
    ("ei", "I"),
    ("ao", "O"),
    ("ou", "U"),
    ("ang", "K"),
    ("eng", "G"),
    ("an", "M"),
    ("en", "N"),
    ("er", "R"),
    ("eh", "E"),
    ("([iv])e", "${1}E"),
    ("([^0-4])$", "${1}0"),
];

pub const NEUTRAL_TONE_MARK: &[(&str, &str)] = &[("0", "˙")];

/// Placeholder letters and tone digits to bopomofo glyphs
pub const SYMBOL_TO_BOPOMOFO: &[(&str, &str)] = &[
    ("b", "ㄅ"),
    ("p", "ㄆ"),
    ("m", "ㄇ"),
    ("f", "ㄈ"),
    ("d", "ㄉ"),
    ("t", "ㄊ"),
    ("n", "ㄋ"),
    ("l", "ㄌ"),
    ("g", "ㄍ"),
    ("k", "ㄎ"),
    ("h", "ㄏ"),
    ("j", "ㄐ"),
    ("q", "ㄑ"),
    ("x", "ㄒ"),
    ("Z", "ㄓ"),
    ("C", "ㄔ"),
    ("S", "ㄕ"),
    ("r", "ㄖ"),
    ("z", "ㄗ"),
    ("c", "ㄘ"),
    ("s", "ㄙ"),
    ("i", "ㄧ"),
    ("u", "ㄨ"),
    ("v", "ㄩ"),
    ("a", "ㄚ"),
    ("o", "ㄛ"),
    ("e", "ㄜ"),
    ("E", "ㄝ"),
    ("A", "ㄞ"),
    ("I", "ㄟ"),
    ("O", "ㄠ"),
    ("U", "ㄡ"),
    ("M", "ㄢ"),
    ("N", "ㄣ"),
    ("K", "ㄤ"),
    ("G", "ㄥ"),
    ("R", "ㄦ"),
    ("1", "ˉ"),
    ("2", "ˊ"),
    ("3", "ˇ"),
    ("4", "ˋ"),
];

/// Glide + nucleus pairs that romanize as one unit
pub const COMPOUND_GLYPHS: &[(&str, &str)] = &[
    ("ㄅㄛ", "p⁼wo"),
    ("ㄆㄛ", "pʰwo"),
    ("ㄇㄛ", "mwo"),
    ("ㄈㄛ", "fwo"),
    ("ㄧㄢ", "yeNN"),
    ("ㄧㄣ", "iNN"),
    ("ㄧㄥ", "iNg"),
    ("ㄨㄥ", "uNg"),
    ("ㄩㄥ", "yuNg"),
];

pub const SINGLE_GLYPHS: &[(&str, &str)] = &[
    ("ㄅ", "p⁼"),
    ("ㄆ", "pʰ"),
    ("ㄇ", "m"),
    ("ㄈ", "f"),
    ("ㄉ", "t⁼"),
    ("ㄊ", "tʰ"),
    ("ㄋ", "n"),
    ("ㄌ", "l"),
    ("ㄍ", "k⁼"),
    ("ㄎ", "kʰ"),
    ("ㄏ", "h"),
    ("ㄐ", "ʧ⁼"),
    ("ㄑ", "ʧʰ"),
    ("ㄒ", "ʃ"),
    ("ㄓ", "ʦ`⁼"),
    ("ㄔ", "ʦ`ʰ"),
    ("ㄕ", "s`"),
    ("ㄖ", "ɹ`"),
    ("ㄗ", "ʦ⁼"),
    ("ㄘ", "ʦʰ"),
    ("ㄙ", "s"),
    ("ㄚ", "a"),
    ("ㄛ", "o"),
    ("ㄜ", "ə"),
    ("ㄝ", "e"),
    ("ㄞ", "ai"),
    ("ㄟ", "ei"),
    ("ㄠ", "au"),
    ("ㄡ", "ou"),
    ("ㄢ", "aNN"),
    ("ㄣ", "əNN"),
    ("ㄤ", "aNg"),
    ("ㄥ", "əNg"),
    ("ㄦ", "əɻ"),
    ("ㄧ", "i"),
    ("ㄨ", "u"),
    ("ㄩ", "ɥ"),
    ("ˉ", "→"),
    ("ˊ", "↑"),
    ("ˇ", "↓↑"),
    ("ˋ", "↓"),
    ("˙", ""),
    ("，", ","),
    ("。", "."),
    ("！", "!"),
    ("？", "?"),
    ("—", "-"),
    ("；", ";"),
    ("：", ":"),
    ("、", ","),
];

/// Glide insertion after both glyph tables
pub const GLIDE_RULES: &[(&str, &str)] = &[("i([aoe])", "y${1}"), ("u([aoəe])", "w${1}")];

/// Syllabic retroflex marker before a tone contour or syllable end
pub const RETROFLEX_RULES: &[(&str, &str)] = &[
    ("([ʦsɹ]`[⁼ʰ]?)([→↓↑ ]+|$)", "${1}ɹ`${2}"),
    ("ɻ", "ɹ`"),
];

/// Plain syllabic marker for the non-retroflex sibilants
pub const SIBILANT_RULES: &[(&str, &str)] = &[("([ʦs][⁼ʰ]?)([→↓↑ ]+|$)", "${1}ɹ${2}")];

/// Every stage table, compiled once
#[derive(Debug, Clone)]
pub struct RuleTables {
    pub latin: RuleTable,
    pub special_finals: RuleTable,
    pub initials: RuleTable,
    pub holistic: RuleTable,
    pub legacy_pinyin: RuleTable,
    pub symbols: RuleTable,
    pub neutral_mark: RuleTable,
    pub compound_glyphs: RuleTable,
    pub single_glyphs: RuleTable,
    pub glides: RuleTable,
    pub retroflex: RuleTable,
    pub sibilants: RuleTable,
}

impl RuleTables {
    /// Compile and validate all tables
    pub fn compile() -> Result<Self> {
        let tables = Self {
            latin: RuleTable::from_literals("latin", LATIN_SPELL_OUT)?,
            special_finals: RuleTable::from_patterns("special_finals", SPECIAL_FINALS)?,
            initials: RuleTable::from_patterns("initials", INITIALS)?,
            holistic: RuleTable::from_patterns("holistic", HOLISTIC_SYLLABLES)?,
            legacy_pinyin: RuleTable::from_patterns("legacy_pinyin", LEGACY_PINYIN_RULES)?,
            symbols: RuleTable::from_literals("symbols", SYMBOL_TO_BOPOMOFO)?,
            neutral_mark: RuleTable::from_literals("neutral_mark", NEUTRAL_TONE_MARK)?,
            compound_glyphs: RuleTable::from_literals("compound_glyphs", COMPOUND_GLYPHS)?,
            single_glyphs: RuleTable::from_literals("single_glyphs", SINGLE_GLYPHS)?,
            glides: RuleTable::from_patterns("glides", GLIDE_RULES)?,
            retroflex: RuleTable::from_patterns("retroflex", RETROFLEX_RULES)?,
            sibilants: RuleTable::from_patterns("sibilants", SIBILANT_RULES)?,
        };

        log::debug!(
            "compiled rule tables: {} rules total",
            tables.all().iter().map(|t| t.len()).sum::<usize>()
        );

        Ok(tables)
    }

    /// Pinyin → bopomofo tables for one rule set, in application order
    pub fn pinyin_stages(&self, rules: PinyinRuleSet) -> Vec<&RuleTable> {
        match rules {
            PinyinRuleSet::Standard => vec![
                &self.special_finals,
                &self.initials,
                &self.holistic,
                &self.symbols,
            ],
            PinyinRuleSet::Legacy => vec![&self.legacy_pinyin, &self.symbols, &self.neutral_mark],
        }
    }

    /// All tables in pipeline order
    pub fn all(&self) -> Vec<&RuleTable> {
        vec![
            &self.latin,
            &self.special_finals,
            &self.initials,
            &self.holistic,
            &self.legacy_pinyin,
            &self.symbols,
            &self.neutral_mark,
            &self.compound_glyphs,
            &self.single_glyphs,
            &self.glides,
            &self.retroflex,
            &self.sibilants,
        ]
    }
}
