//! Core cleaner implementation

use super::{DiagnosticsSink, LogSink, NullSink, PipelineStage};
use crate::{
    config::{CleanerConfig, OutputAlphabet, PinyinSource},
    text::{
        bopomofo_to_romaji, pinyin_to_bopomofo, resolve, spell_out, BuiltinPinyin,
        DictionaryPinyin, PinyinLookup, RuleTables, TextNormalizer,
    },
    Result,
};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Every intermediate value of one cleaning run
#[derive(Debug, Clone, PartialEq)]
pub struct StageTrace {
    /// Original input
    pub input: String,
    /// Stage outputs in execution order
    pub stages: Vec<(PipelineStage, String)>,
}

impl StageTrace {
    /// Output of a stage, if it ran
    pub fn get(&self, stage: PipelineStage) -> Option<&str> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, v)| v.as_str())
    }

    /// Final cleaned string
    pub fn output(&self) -> &str {
        self.stages
            .last()
            .map(|(_, v)| v.as_str())
            .unwrap_or(&self.input)
    }
}

/// Text cleaner: raw text in, phonetic token string out
///
/// Cheap to clone; clones share the compiled rule tables and lookup.
#[derive(Clone)]
pub struct Cleaner {
    config: CleanerConfig,
    tables: Arc<RuleTables>,
    lookup: Arc<dyn PinyinLookup>,
    sink: Arc<dyn DiagnosticsSink>,
    normalizer: TextNormalizer,
}

impl Cleaner {
    /// Validate the config and compile every rule table
    pub fn new(config: CleanerConfig) -> Result<Self> {
        let lookup: Arc<dyn PinyinLookup> = match config.pinyin_source {
            PinyinSource::Dictionary => Arc::new(DictionaryPinyin),
            PinyinSource::Builtin => Arc::new(BuiltinPinyin),
        };
        Self::with_lookup(config, lookup)
    }

    /// Use a caller-supplied pinyin lookup instead of `config.pinyin_source`
    pub fn with_lookup(config: CleanerConfig, lookup: Arc<dyn PinyinLookup>) -> Result<Self> {
        config.validate()?;

        let start = Instant::now();
        let tables = Arc::new(RuleTables::compile()?);
        log::debug!(
            "Cleaner ready in {:.2}ms (output: {}, lookup: {})",
            start.elapsed().as_secs_f64() * 1000.0,
            config.output,
            lookup.name()
        );

        Ok(Self {
            config,
            tables,
            lookup,
            sink: Arc::new(LogSink),
            normalizer: TextNormalizer::new(),
        })
    }

    /// Replace the diagnostics sink
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Clean one utterance
    pub fn clean(&self, text: &str) -> Result<String> {
        let trace = self.trace(text)?;
        Ok(trace.output().to_string())
    }

    /// Clean raw bytes; invalid UTF-8 is rejected before any stage runs
    pub fn clean_bytes(&self, bytes: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(bytes)?;
        self.clean(text)
    }

    /// Split into sentences and clean each one
    pub fn clean_sentences(&self, text: &str) -> Result<Vec<String>> {
        self.normalizer
            .split_sentences(text)
            .iter()
            .map(|sentence| self.clean(sentence))
            .collect()
    }

    /// Clean independent utterances in parallel; output order matches input
    pub fn clean_many<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<Vec<String>> {
        texts
            .par_iter()
            .map(|text| self.clean(text.as_ref()))
            .collect()
    }

    /// Run the pipeline and keep every intermediate value
    pub fn trace(&self, text: &str) -> Result<StageTrace> {
        let mut trace = StageTrace {
            input: text.to_string(),
            stages: Vec::with_capacity(PipelineStage::all().len()),
        };

        let normalized = if self.config.strip_punctuation {
            self.normalizer.strip_punctuation(text)
        } else {
            text.to_string()
        };
        self.record(&mut trace, PipelineStage::Normalization, normalized);

        if self.config.output != OutputAlphabet::Pinyin {
            let spelled = self.spell_out(self.last(&trace));
            self.record(&mut trace, PipelineStage::SpellOut, spelled);
        }

        let pinyin = self.resolve(self.last(&trace))?;
        self.record(&mut trace, PipelineStage::PinyinResolution, pinyin);

        if self.config.output != OutputAlphabet::Pinyin {
            let bopomofo = self.to_bopomofo(self.last(&trace));
            self.record(&mut trace, PipelineStage::PinyinToBopomofo, bopomofo);
        }

        if self.config.output == OutputAlphabet::Romaji {
            let romaji = self.to_romaji(self.last(&trace));
            self.record(&mut trace, PipelineStage::BopomofoToRomaji, romaji);
        }

        let mut padded = self.last(&trace).to_string();
        padded.push_str(&self.config.padding);
        self.record(&mut trace, PipelineStage::Padding, padded);

        Ok(trace)
    }

    /// Latin/digit spell-out stage alone
    pub fn spell_out(&self, text: &str) -> String {
        spell_out(
            text,
            &self.tables,
            self.config.latin_case,
            self.config.strategy,
        )
    }

    /// Pinyin resolution stage alone
    pub fn resolve(&self, text: &str) -> Result<String> {
        resolve(text, self.lookup.as_ref(), self.stage_sink())
    }

    /// Pinyin → bopomofo stage alone
    pub fn to_bopomofo(&self, text: &str) -> String {
        pinyin_to_bopomofo(
            text,
            &self.tables,
            self.config.pinyin_rules,
            self.config.strategy,
        )
    }

    /// Bopomofo → romanization stage alone (without padding)
    pub fn to_romaji(&self, text: &str) -> String {
        bopomofo_to_romaji(text, &self.tables, self.config.strategy)
    }

    fn stage_sink(&self) -> &dyn DiagnosticsSink {
        if self.config.log_stages {
            self.sink.as_ref()
        } else {
            &NullSink
        }
    }

    fn last<'a>(&self, trace: &'a StageTrace) -> &'a str {
        trace.output()
    }

    fn record(&self, trace: &mut StageTrace, stage: PipelineStage, value: String) {
        self.stage_sink().log(stage.label(), &value);
        trace.stages.push((stage, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{MemorySink, SYLLABLE_LABEL};
    use crate::text::LatinCase;
    use crate::Error;

    fn builtin() -> Cleaner {
        Cleaner::new(CleanerConfig::default().with_pinyin_source(PinyinSource::Builtin)).unwrap()
    }

    #[test]
    fn test_clean_greeting() {
        assert_eq!(builtin().clean("你好").unwrap(), "ni↓↑ hau↓↑  ");
    }

    #[test]
    fn test_clean_sentence_with_punctuation() {
        assert_eq!(
            builtin().clean("你好，世界。").unwrap(),
            "ni↓↑ hau↓↑ ,s`ɹ`↓ ʧ⁼ye↓ . "
        );
    }

    #[test]
    fn test_trace_records_every_stage() {
        let trace = builtin().trace("1A").unwrap();
        assert_eq!(trace.get(PipelineStage::SpellOut), Some("ㄧˉA"));
        assert_eq!(trace.get(PipelineStage::PinyinResolution), Some("ㄧˉA"));
        assert_eq!(trace.get(PipelineStage::BopomofoToRomaji), Some("i→A"));
        assert_eq!(trace.output(), "i→A ");
    }

    #[test]
    fn test_output_alphabets() {
        let pinyin = Cleaner::new(
            CleanerConfig::default()
                .with_pinyin_source(PinyinSource::Builtin)
                .with_output(OutputAlphabet::Pinyin),
        )
        .unwrap();
        assert_eq!(pinyin.clean("中国").unwrap(), "zhong1 guo2  ");
        // Latin and digits stay as they are when the output is pinyin
        assert_eq!(pinyin.clean("我3a").unwrap(), "wo3 3a ");
        assert_eq!(pinyin.trace("我3a").unwrap().get(PipelineStage::SpellOut), None);

        let bopomofo = Cleaner::new(
            CleanerConfig::default()
                .with_pinyin_source(PinyinSource::Builtin)
                .with_output(OutputAlphabet::Bopomofo),
        )
        .unwrap();
        assert_eq!(bopomofo.clean("中国").unwrap(), "ㄓㄨㄥˉ ㄍㄨㄛˊ  ");
    }

    #[test]
    fn test_case_folding() {
        let cleaner = Cleaner::new(
            CleanerConfig::default()
                .with_pinyin_source(PinyinSource::Builtin)
                .with_latin_case(LatinCase::FoldUppercase),
        )
        .unwrap();
        assert_eq!(cleaner.clean("1A").unwrap(), "i→ei→ ");
    }

    #[test]
    fn test_strip_punctuation() {
        let cleaner = Cleaner::new(
            CleanerConfig::default()
                .with_pinyin_source(PinyinSource::Builtin)
                .with_strip_punctuation(true),
        )
        .unwrap();
        assert_eq!(cleaner.clean("是。").unwrap(), "s`ɹ`↓   ");
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        let err = builtin().clean_bytes(&[0xE4, 0xBD]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(builtin().clean_bytes("。".as_bytes()).unwrap(), ". ");
    }

    #[test]
    fn test_clean_sentences() {
        let out = builtin().clean_sentences("你好，世界。").unwrap();
        assert_eq!(out, vec!["ni↓↑ hau↓↑  ", "s`ɹ`↓ ʧ⁼ye↓  "]);
    }

    #[test]
    fn test_clean_many_keeps_order() {
        let cleaner = builtin();
        let inputs = ["你", "好", "。", "1A"];
        let out = cleaner.clean_many(&inputs[..]).unwrap();
        let sequential: Vec<String> = inputs.iter().map(|t| cleaner.clean(t).unwrap()).collect();
        assert_eq!(out, sequential);
    }

    #[test]
    fn test_sink_receives_stages_without_changing_output() {
        let sink = Arc::new(MemorySink::new());
        let cleaner = builtin().with_sink(sink.clone());
        let out = cleaner.clean("你").unwrap();
        assert_eq!(out, builtin().clean("你").unwrap());

        let entries = sink.entries();
        assert!(entries.iter().any(|(s, v)| s == SYLLABLE_LABEL && v == "ni3"));
        assert!(entries.iter().any(|(s, v)| s == "pinyin" && v == "ni3 "));
        assert!(entries.iter().any(|(s, _)| s == "romaji"));
    }

    #[test]
    fn test_log_stages_off_silences_sink() {
        let sink = Arc::new(MemorySink::new());
        let mut config = CleanerConfig::default().with_pinyin_source(PinyinSource::Builtin);
        config.log_stages = false;
        let cleaner = Cleaner::new(config).unwrap().with_sink(sink.clone());
        cleaner.clean("你好").unwrap();
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_legacy_rules_reach_the_output() {
        let legacy = Cleaner::new(
            CleanerConfig::from_cleaner_name("chinese_bopomofo_legacy")
                .unwrap()
                .with_pinyin_source(PinyinSource::Builtin),
        )
        .unwrap();
        assert_eq!(legacy.clean("好的。").unwrap(), "ㄏㄠˇ ㄉㄜ˙   ");
        assert_eq!(legacy.clean("中国").unwrap(), "ㄓㄨㄥˉ ㄍㄨㄛˊ  ");
    }

    #[test]
    fn test_invalid_config_rejected_at_startup() {
        let result = Cleaner::new(CleanerConfig::default().with_padding("x"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
