//! Configuration management for the cleaner

use crate::text::{LatinCase, PinyinRuleSet, RewriteStrategy};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Alphabet of the cleaned output; each one stops the pipeline earlier
///
/// `Pinyin` also skips spell-out, since spelled-out letters are bopomofo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputAlphabet {
    /// Pinyin resolution only
    Pinyin,
    /// Stop after pinyin → bopomofo
    Bopomofo,
    /// Full pipeline
    #[default]
    Romaji,
}

impl fmt::Display for OutputAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputAlphabet::Pinyin => "pinyin",
            OutputAlphabet::Bopomofo => "bopomofo",
            OutputAlphabet::Romaji => "romaji",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputAlphabet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pinyin" => Ok(OutputAlphabet::Pinyin),
            "bopomofo" | "zhuyin" => Ok(OutputAlphabet::Bopomofo),
            "romaji" | "romanized" => Ok(OutputAlphabet::Romaji),
            other => Err(Error::Config(format!("Unknown output alphabet: {}", other))),
        }
    }
}

/// Where pinyin readings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinyinSource {
    /// Full dictionary from the `pinyin` crate
    #[default]
    Dictionary,
    /// Small built-in table
    Builtin,
}

/// Main configuration for the cleaner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Output alphabet
    pub output: OutputAlphabet,
    /// Uppercase Latin handling during spell-out
    pub latin_case: LatinCase,
    /// How literal tables are applied
    pub strategy: RewriteStrategy,
    /// Pinyin reading source
    pub pinyin_source: PinyinSource,
    /// Pinyin → bopomofo rule tables
    pub pinyin_rules: PinyinRuleSet,
    /// Replace punctuation with spaces before cleaning
    pub strip_punctuation: bool,
    /// Appended to every cleaned utterance
    pub padding: String,
    /// Forward intermediate stage values to the log
    pub log_stages: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            output: OutputAlphabet::Romaji,
            latin_case: LatinCase::LowercaseOnly,
            strategy: RewriteStrategy::Sequential,
            pinyin_source: PinyinSource::Dictionary,
            pinyin_rules: PinyinRuleSet::Standard,
            strip_punctuation: false,
            padding: " ".into(),
            log_stages: true,
        }
    }
}

impl CleanerConfig {
    /// Named configuration matching a VITS-style cleaner name
    ///
    /// - `chinese_cleaners`: tone-numbered pinyin, no spell-out
    /// - `chinese_cleaners2`: romanized tokens (the default)
    /// - `chinese_bopomofo`: bopomofo with the standard tables
    /// - `chinese_bopomofo_legacy`: bopomofo with the older table, neutral
    ///   tone marked `˙`, punctuation stripped
    pub fn from_cleaner_name(name: &str) -> Result<Self> {
        let config = Self::default();
        match name {
            "chinese_cleaners" => Ok(config.with_output(OutputAlphabet::Pinyin)),
            "chinese_cleaners2" => Ok(config.with_output(OutputAlphabet::Romaji)),
            "chinese_bopomofo" => Ok(config.with_output(OutputAlphabet::Bopomofo)),
            "chinese_bopomofo_legacy" => Ok(config
                .with_output(OutputAlphabet::Bopomofo)
                .with_pinyin_rules(PinyinRuleSet::Legacy)
                .with_strip_punctuation(true)),
            other => Err(Error::Config(format!("Unknown cleaner name: {}", other))),
        }
    }

    pub fn with_output(mut self, output: OutputAlphabet) -> Self {
        self.output = output;
        self
    }

    pub fn with_latin_case(mut self, case: LatinCase) -> Self {
        self.latin_case = case;
        self
    }

    pub fn with_strategy(mut self, strategy: RewriteStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_pinyin_source(mut self, source: PinyinSource) -> Self {
        self.pinyin_source = source;
        self
    }

    pub fn with_pinyin_rules(mut self, rules: PinyinRuleSet) -> Self {
        self.pinyin_rules = rules;
        self
    }

    pub fn with_padding(mut self, padding: &str) -> Self {
        self.padding = padding.to_string();
        self
    }

    pub fn with_strip_punctuation(mut self, enable: bool) -> Self {
        self.strip_punctuation = enable;
        self
    }

    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: CleanerConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: CleanerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration and save to file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = CleanerConfig::default();
        config.save(path)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.padding.chars().all(char::is_whitespace) {
            return Err(Error::Config(format!(
                "padding must be whitespace only, got {:?}",
                self.padding
            )));
        }

        if self.padding.is_empty() {
            log::warn!("Empty padding: consecutive utterances will run together");
        }

        if self.strip_punctuation && self.output == OutputAlphabet::Romaji {
            log::debug!("Punctuation stripping removes the prosody hints , and .");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        let config = CleanerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output, OutputAlphabet::Romaji);
        assert_eq!(config.latin_case, LatinCase::LowercaseOnly);
        assert_eq!(config.padding, " ");
    }

    #[test]
    fn test_padding_must_be_whitespace() {
        let config = CleanerConfig::default().with_padding("#");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_cleaner_names() {
        assert_eq!(
            CleanerConfig::from_cleaner_name("chinese_cleaners").unwrap().output,
            OutputAlphabet::Pinyin
        );
        let legacy = CleanerConfig::from_cleaner_name("chinese_bopomofo_legacy").unwrap();
        assert_eq!(legacy.output, OutputAlphabet::Bopomofo);
        assert_eq!(legacy.pinyin_rules, PinyinRuleSet::Legacy);
        assert!(legacy.strip_punctuation);
        assert_eq!(
            CleanerConfig::from_cleaner_name("chinese_cleaners2").unwrap().output,
            OutputAlphabet::Romaji
        );
        assert!(CleanerConfig::from_cleaner_name("japanese_cleaners").is_err());
    }

    #[test]
    fn test_output_alphabet_from_str() {
        assert_eq!("Bopomofo".parse::<OutputAlphabet>().unwrap(), OutputAlphabet::Bopomofo);
        assert_eq!("zhuyin".parse::<OutputAlphabet>().unwrap(), OutputAlphabet::Bopomofo);
        assert!("ipa".parse::<OutputAlphabet>().is_err());
    }

    #[test]
    fn test_yaml_round_trip_through_file() {
        let path = std::env::temp_dir().join("hanzi_cleaner_config_test.yaml");
        let config = CleanerConfig::default()
            .with_output(OutputAlphabet::Bopomofo)
            .with_latin_case(LatinCase::FoldUppercase)
            .with_strategy(RewriteStrategy::Combined);
        config.save(&path).unwrap();

        let loaded = CleanerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: CleanerConfig = serde_yaml::from_str("latin_case: fold_uppercase\n").unwrap();
        assert_eq!(config.latin_case, LatinCase::FoldUppercase);
        assert_eq!(config.output, OutputAlphabet::Romaji);
        assert_eq!(config.padding, " ");
        assert_eq!(config.pinyin_rules, PinyinRuleSet::Standard);

        let legacy: CleanerConfig = serde_yaml::from_str("pinyin_rules: legacy\n").unwrap();
        assert_eq!(legacy.pinyin_rules, PinyinRuleSet::Legacy);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CleanerConfig::load("/nonexistent/cleaner.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }
}
