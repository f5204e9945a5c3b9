//! Pinyin lookup and the resolution stage
//!
//! Resolution asks a [`PinyinLookup`] for every CJK ideograph of the input
//! in one batch. Resolved characters become `letters + tone digit + ' '`;
//! everything else is copied through untouched.

use super::{contains_chinese, is_chinese_char};
use crate::pipeline::{DiagnosticsSink, SYLLABLE_LABEL};
use crate::Result;
use lazy_static::lazy_static;
use pinyin::ToPinyin;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Mandarin tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    First,  // ā
    Second, // á
    Third,  // ǎ
    Fourth, // à
    Neutral,
}

impl Tone {
    pub fn from_digit(digit: u32) -> Tone {
        match digit {
            1 => Tone::First,
            2 => Tone::Second,
            3 => Tone::Third,
            4 => Tone::Fourth,
            _ => Tone::Neutral,
        }
    }

    /// Tone digit, `None` for the neutral tone
    pub fn digit(&self) -> Option<char> {
        match self {
            Tone::First => Some('1'),
            Tone::Second => Some('2'),
            Tone::Third => Some('3'),
            Tone::Fourth => Some('4'),
            Tone::Neutral => None,
        }
    }
}

/// One romanized syllable
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Syllable {
    /// Lowercase ASCII letters, `ü` written as `v`
    pub letters: String,
    pub tone: Tone,
}

impl Syllable {
    pub fn new(letters: impl Into<String>, tone: Tone) -> Self {
        Self {
            letters: letters.into(),
            tone,
        }
    }

    /// Parse `"zhong1"`, `"lü4"`, `"lu:4"`, `"de5"`, `"de"` or `"nǐ"`
    pub fn parse(pinyin: &str) -> Option<Syllable> {
        let (base, tone) = extract_tone(pinyin);

        let letters = base
            .to_lowercase()
            .replace("u:", "v")
            .replace('ü', "v")
            .replace('ê', "e");

        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_lowercase()) {
            return None;
        }

        Some(Syllable { letters, tone })
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)?;
        if let Some(digit) = self.tone.digit() {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

/// Split tone marks or a trailing tone digit off a pinyin string
pub fn extract_tone(pinyin: &str) -> (String, Tone) {
    let tone_marks = [
        ('ā', 'a', Tone::First),
        ('á', 'a', Tone::Second),
        ('ǎ', 'a', Tone::Third),
        ('à', 'a', Tone::Fourth),
        ('ē', 'e', Tone::First),
        ('é', 'e', Tone::Second),
        ('ě', 'e', Tone::Third),
        ('è', 'e', Tone::Fourth),
        ('ī', 'i', Tone::First),
        ('í', 'i', Tone::Second),
        ('ǐ', 'i', Tone::Third),
        ('ì', 'i', Tone::Fourth),
        ('ō', 'o', Tone::First),
        ('ó', 'o', Tone::Second),
        ('ǒ', 'o', Tone::Third),
        ('ò', 'o', Tone::Fourth),
        ('ū', 'u', Tone::First),
        ('ú', 'u', Tone::Second),
        ('ǔ', 'u', Tone::Third),
        ('ù', 'u', Tone::Fourth),
        ('ǖ', 'ü', Tone::First),
        ('ǘ', 'ü', Tone::Second),
        ('ǚ', 'ü', Tone::Third),
        ('ǜ', 'ü', Tone::Fourth),
        ('ń', 'n', Tone::Second),
        ('ň', 'n', Tone::Third),
        ('ǹ', 'n', Tone::Fourth),
        ('ḿ', 'm', Tone::Second),
    ];

    let mut result = pinyin.trim().to_string();
    let mut tone = Tone::Neutral;

    for (marked, plain, t) in tone_marks.iter() {
        if result.contains(*marked) {
            result = result.replace(*marked, &plain.to_string());
            tone = *t;
            break;
        }
    }

    // Numeric tone (e.g., "ma1"); 0 and 5 both mean neutral
    if let Some(digit) = result.chars().last().and_then(|c| c.to_digit(10)) {
        tone = Tone::from_digit(digit);
        result.pop();
    }

    (result, tone)
}

/// Failure of the lookup service itself, as opposed to a miss
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("pinyin service unavailable: {0}")]
    Unavailable(String),

    #[error("batch lookup returned {actual} results for {expected} characters")]
    BatchMismatch { expected: usize, actual: usize },
}

/// Character → pinyin service
///
/// `Ok(None)` is a clean miss. `Err` means the service could not answer and
/// must not be treated as a miss.
pub trait PinyinLookup: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    fn lookup(&self, ch: char) -> std::result::Result<Option<Syllable>, LookupError>;

    /// Results must be parallel to `chars`
    fn lookup_batch(
        &self,
        chars: &[char],
    ) -> std::result::Result<Vec<Option<Syllable>>, LookupError> {
        chars.iter().map(|&ch| self.lookup(ch)).collect()
    }
}

/// Lookup backed by the `pinyin` crate's dictionary (first reading)
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryPinyin;

impl PinyinLookup for DictionaryPinyin {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn lookup(&self, ch: char) -> std::result::Result<Option<Syllable>, LookupError> {
        Ok(ch
            .to_pinyin()
            .and_then(|p| Syllable::parse(p.with_tone_num_end())))
    }
}

lazy_static! {
    /// Small fixed reading table
    static ref BUILTIN_READINGS: HashMap<char, &'static str> = [
        ('你', "ni3"),
        ('好', "hao3"),
        ('世', "shi4"),
        ('界', "jie4"),
        ('中', "zhong1"),
        ('国', "guo2"),
        ('人', "ren2"),
        ('我', "wo3"),
        ('是', "shi4"),
        ('的', "de5"),
        ('了', "le5"),
        ('在', "zai4"),
        ('有', "you3"),
        ('个', "ge4"),
        ('这', "zhe4"),
        ('他', "ta1"),
        ('说', "shuo1"),
        ('来', "lai2"),
        ('要', "yao4"),
        ('就', "jiu4"),
        ('出', "chu1"),
        ('会', "hui4"),
        ('可', "ke3"),
        ('以', "yi3"),
        ('时', "shi2"),
        ('大', "da4"),
        ('看', "kan4"),
        ('地', "di4"),
        ('不', "bu4"),
        ('对', "dui4"),
        ('一', "yi1"),
        ('家', "jia1"),
        ('雄', "xiong2"),
        ('光', "guang1"),
        ('双', "shuang1"),
        ('字', "zi4"),
        ('四', "si4"),
        ('日', "ri4"),
        ('儿', "er2"),
        ('二', "er4"),
        ('月', "yue4"),
        ('天', "tian1"),
        ('水', "shui3"),
        ('吃', "chi1"),
        ('爱', "ai4"),
        ('六', "liu4"),
        ('绿', "lü4"),
        ('女', "nü3"),
        ('学', "xue2"),
        ('吗', "ma5"),
        ('们', "men5"),
        ('明', "ming2"),
        ('用', "yong4"),
        ('文', "wen2"),
        ('语', "yu3"),
        ('音', "yin1"),
        ('合', "he2"),
        ('成', "cheng2"),
        ('测', "ce4"),
        ('试', "shi4"),
        ('波', "bo1"),
        ('嗯', "n2"),
        ('呣', "m2"),
    ]
    .iter()
    .cloned()
    .collect();
}

/// Lookup over a small built-in table; deterministic and offline
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPinyin;

impl BuiltinPinyin {
    /// Characters the table knows
    pub fn characters() -> Vec<char> {
        let mut chars: Vec<char> = BUILTIN_READINGS.keys().copied().collect();
        chars.sort_unstable();
        chars
    }
}

impl PinyinLookup for BuiltinPinyin {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn lookup(&self, ch: char) -> std::result::Result<Option<Syllable>, LookupError> {
        Ok(BUILTIN_READINGS.get(&ch).and_then(|py| Syllable::parse(py)))
    }
}

/// Replace every resolvable character by its pinyin
pub fn resolve(text: &str, lookup: &dyn PinyinLookup, sink: &dyn DiagnosticsSink) -> Result<String> {
    if !contains_chinese(text) {
        return Ok(text.to_string());
    }

    let hanzi: Vec<char> = text.chars().filter(|&c| is_chinese_char(c)).collect();
    let readings = lookup.lookup_batch(&hanzi)?;

    if readings.len() != hanzi.len() {
        return Err(LookupError::BatchMismatch {
            expected: hanzi.len(),
            actual: readings.len(),
        }
        .into());
    }

    let mut readings = readings.into_iter();
    let mut output = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if !is_chinese_char(ch) {
            output.push(ch);
            continue;
        }

        match readings.next().flatten() {
            Some(syllable) => {
                let rendered = syllable.to_string();
                log::trace!("{} -> {}", ch, rendered);
                sink.log(SYLLABLE_LABEL, &rendered);
                output.push_str(&rendered);
                output.push(' ');
            }
            None => output.push(ch),
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::NullSink;
    use crate::Error;
    use std::sync::Mutex;

    #[test]
    fn test_extract_tone() {
        let (base, tone) = extract_tone("nǐ");
        assert_eq!(base, "ni");
        assert_eq!(tone, Tone::Third);

        let (base, tone) = extract_tone("hao3");
        assert_eq!(base, "hao");
        assert_eq!(tone, Tone::Third);

        let (base, tone) = extract_tone("de5");
        assert_eq!(base, "de");
        assert_eq!(tone, Tone::Neutral);
    }

    #[test]
    fn test_syllable_parse() {
        assert_eq!(Syllable::parse("lü4"), Some(Syllable::new("lv", Tone::Fourth)));
        assert_eq!(Syllable::parse("lu:4"), Some(Syllable::new("lv", Tone::Fourth)));
        assert_eq!(Syllable::parse("de"), Some(Syllable::new("de", Tone::Neutral)));
        assert_eq!(Syllable::parse("ZHONG1"), Some(Syllable::new("zhong", Tone::First)));
        assert_eq!(Syllable::parse(""), None);
        assert_eq!(Syllable::parse("5"), None);
    }

    #[test]
    fn test_syllable_display() {
        assert_eq!(Syllable::new("ni", Tone::Third).to_string(), "ni3");
        assert_eq!(Syllable::new("de", Tone::Neutral).to_string(), "de");
    }

    #[test]
    fn test_builtin_lookup() {
        let lookup = BuiltinPinyin;
        assert_eq!(
            lookup.lookup('你').unwrap(),
            Some(Syllable::new("ni", Tone::Third))
        );
        assert_eq!(lookup.lookup('A').unwrap(), None);
        assert_eq!(lookup.lookup('，').unwrap(), None);
    }

    #[test]
    fn test_dictionary_lookup() {
        let lookup = DictionaryPinyin;
        assert_eq!(
            lookup.lookup('你').unwrap(),
            Some(Syllable::new("ni", Tone::Third))
        );
        assert_eq!(lookup.lookup('a').unwrap(), None);
        assert_eq!(lookup.lookup('。').unwrap(), None);
    }

    #[test]
    fn test_resolve_passes_through_misses() {
        let out = resolve("你好，A!", &BuiltinPinyin, &NullSink).unwrap();
        assert_eq!(out, "ni3 hao3 ，A!");
    }

    #[test]
    fn test_resolve_neutral_tone_has_no_digit() {
        let out = resolve("好的", &BuiltinPinyin, &NullSink).unwrap();
        assert_eq!(out, "hao3 de ");
    }

    struct FaultyLookup;

    impl PinyinLookup for FaultyLookup {
        fn name(&self) -> &'static str {
            "faulty"
        }

        fn lookup(&self, _ch: char) -> std::result::Result<Option<Syllable>, LookupError> {
            Err(LookupError::Unavailable("dictionary not loaded".into()))
        }
    }

    #[test]
    fn test_resolve_reports_service_fault() {
        let err = resolve("你", &FaultyLookup, &NullSink).unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    struct ShortBatch;

    impl PinyinLookup for ShortBatch {
        fn name(&self) -> &'static str {
            "short"
        }

        fn lookup(&self, _ch: char) -> std::result::Result<Option<Syllable>, LookupError> {
            Ok(None)
        }

        fn lookup_batch(
            &self,
            _chars: &[char],
        ) -> std::result::Result<Vec<Option<Syllable>>, LookupError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_resolve_rejects_short_batch() {
        let err = resolve("你好", &ShortBatch, &NullSink).unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    /// Records every batch it is asked for
    struct CountingLookup {
        batches: Mutex<Vec<Vec<char>>>,
    }

    impl PinyinLookup for CountingLookup {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn lookup(&self, ch: char) -> std::result::Result<Option<Syllable>, LookupError> {
            BuiltinPinyin.lookup(ch)
        }

        fn lookup_batch(
            &self,
            chars: &[char],
        ) -> std::result::Result<Vec<Option<Syllable>>, LookupError> {
            self.batches.lock().unwrap().push(chars.to_vec());
            chars.iter().map(|&c| self.lookup(c)).collect()
        }
    }

    #[test]
    fn test_resolve_uses_one_ordered_batch() {
        let lookup = CountingLookup {
            batches: Mutex::new(Vec::new()),
        };
        resolve("我，是A", &lookup, &NullSink).unwrap();
        let batches = lookup.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec!['我', '是']);
    }

    #[test]
    fn test_resolve_skips_lookup_without_hanzi() {
        let lookup = CountingLookup {
            batches: Mutex::new(Vec::new()),
        };
        assert_eq!(resolve("abc。", &lookup, &NullSink).unwrap(), "abc。");
        assert!(lookup.batches.lock().unwrap().is_empty());

        // A broken service is never consulted for text without hanzi
        assert_eq!(resolve("A!", &FaultyLookup, &NullSink).unwrap(), "A!");
    }

    #[test]
    fn test_resolve_fault_kinds_stay_distinct() {
        let err = resolve("你", &FaultyLookup, &NullSink).unwrap_err();
        assert!(matches!(err, Error::Lookup(LookupError::Unavailable(_))));

        let err = resolve("你好", &ShortBatch, &NullSink).unwrap_err();
        assert!(matches!(
            err,
            Error::Lookup(LookupError::BatchMismatch {
                expected: 2,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_resolve_labels_syllables_separately() {
        let sink = crate::pipeline::MemorySink::new();
        resolve("你好", &BuiltinPinyin, &sink).unwrap();
        assert_eq!(
            sink.entries(),
            vec![
                (SYLLABLE_LABEL.to_string(), "ni3".to_string()),
                (SYLLABLE_LABEL.to_string(), "hao3".to_string())
            ]
        );
    }
}
