//! Cleaning pipeline orchestration
//!
//! Chains spell-out, pinyin resolution, bopomofo conversion and
//! romanization over one string.

mod cleaner;

pub use cleaner::{Cleaner, StageTrace};

use std::sync::Mutex;

/// Sink label for each syllable emitted during pinyin resolution
pub const SYLLABLE_LABEL: &str = "syllable";

/// Pipeline stage enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Normalization,
    SpellOut,
    PinyinResolution,
    PinyinToBopomofo,
    BopomofoToRomaji,
    Padding,
}

impl PipelineStage {
    /// Get stage name
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Normalization => "Normalization",
            PipelineStage::SpellOut => "Latin/Digit Spell-Out",
            PipelineStage::PinyinResolution => "Pinyin Resolution",
            PipelineStage::PinyinToBopomofo => "Pinyin to Bopomofo",
            PipelineStage::BopomofoToRomaji => "Bopomofo to Romaji",
            PipelineStage::Padding => "Padding",
        }
    }

    /// Short label handed to diagnostics sinks
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Normalization => "normalize",
            PipelineStage::SpellOut => "spell_out",
            PipelineStage::PinyinResolution => "pinyin",
            PipelineStage::PinyinToBopomofo => "bopomofo",
            PipelineStage::BopomofoToRomaji => "romaji",
            PipelineStage::Padding => "padding",
        }
    }

    /// Get all stages in order
    pub fn all() -> Vec<PipelineStage> {
        vec![
            PipelineStage::Normalization,
            PipelineStage::SpellOut,
            PipelineStage::PinyinResolution,
            PipelineStage::PinyinToBopomofo,
            PipelineStage::BopomofoToRomaji,
            PipelineStage::Padding,
        ]
    }
}

/// Receives intermediate values; fire-and-forget
pub trait DiagnosticsSink: Send + Sync {
    fn log(&self, stage: &str, value: &str);
}

/// Forwards to the `log` facade at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn log(&self, stage: &str, value: &str) {
        log::debug!("[{}] {}", stage, value);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn log(&self, _stage: &str, _value: &str) {}
}

/// Keeps every entry in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded `(stage, value)` pairs
    pub fn entries(&self) -> Vec<(String, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticsSink for MemorySink {
    fn log(&self, stage: &str, value: &str) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push((stage.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let stages = PipelineStage::all();
        assert_eq!(stages.first(), Some(&PipelineStage::Normalization));
        assert_eq!(stages.last(), Some(&PipelineStage::Padding));
        assert_eq!(PipelineStage::PinyinResolution.label(), "pinyin");
        assert!(PipelineStage::all()
            .iter()
            .all(|stage| stage.label() != SYLLABLE_LABEL));
    }

    #[test]
    fn test_memory_sink_records() {
        let sink = MemorySink::new();
        sink.log("pinyin", "ni3");
        sink.log("pinyin", "hao3");
        assert_eq!(
            sink.entries(),
            vec![
                ("pinyin".to_string(), "ni3".to_string()),
                ("pinyin".to_string(), "hao3".to_string())
            ]
        );
    }
}
