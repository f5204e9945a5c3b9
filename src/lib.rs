//! hanzi-cleaner - Mandarin text cleaner for TTS front ends
//!
//! Turns mixed Chinese, Latin, digit and punctuation text into the phonetic
//! token string a VITS-style synthesizer consumes.
//!
//! # Pipeline
//! 1. Latin letters and digits are spelled out in bopomofo
//! 2. Chinese characters are resolved to tone-numbered pinyin
//! 3. Pinyin syllables are rewritten into bopomofo
//! 4. Bopomofo is romanized, with glide and syllabic-consonant post rules
//!
//! # Example
//! ```no_run
//! use hanzi_cleaner::{Cleaner, CleanerConfig};
//!
//! let cleaner = Cleaner::new(CleanerConfig::default()).unwrap();
//! let tokens = cleaner.clean("你好，世界。").unwrap();
//! assert_eq!(tokens, "ni↓↑ hau↓↑ ,s`ɹ`↓ ʧ⁼ye↓ . ");
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod text;

pub use config::{CleanerConfig, OutputAlphabet, PinyinSource};
pub use error::{Error, Result};
pub use pipeline::{Cleaner, DiagnosticsSink, LogSink, MemorySink, NullSink, StageTrace};
pub use text::{LatinCase, PinyinLookup, PinyinRuleSet, RewriteStrategy, Syllable, Tone};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
