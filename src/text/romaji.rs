//! Bopomofo → romanized phonetic tokens
//!
//! Post rules only see text that came out of bopomofo runs, so IPA or
//! other symbols passed through from the input are never rewritten.

use super::is_bopomofo_char;
use super::rules::{apply_all, RewriteStrategy};
use super::tables::RuleTables;

/// Map glyphs to tokens, then insert glides and syllabic markers
pub fn bopomofo_to_romaji(text: &str, tables: &RuleTables, strategy: RewriteStrategy) -> String {
    let mut output = String::with_capacity(text.len() * 2);
    for (is_bopomofo, run) in bopomofo_runs(text) {
        if is_bopomofo {
            let mapped = apply_all(
                run,
                &[&tables.compound_glyphs, &tables.single_glyphs],
                strategy,
            );
            output.push_str(&post_process(&mapped, tables));
        } else {
            // Full-width punctuation
            output.push_str(&tables.single_glyphs.apply_with(run, strategy));
        }
    }
    output
}

/// Glide insertion, retroflex marker, plain sibilant marker; in that order
pub fn post_process(text: &str, tables: &RuleTables) -> String {
    let glided = tables.glides.apply(text);
    let retroflexed = tables.retroflex.apply(&glided);
    tables.sibilants.apply(&retroflexed)
}

/// Split into maximal runs of bopomofo and non-bopomofo characters
fn bopomofo_runs(text: &str) -> Vec<(bool, &str)> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_bopomofo = is_bopomofo_char(ch);
        match current {
            Some(kind) if kind == is_bopomofo => {}
            Some(kind) => {
                runs.push((kind, &text[start..idx]));
                start = idx;
                current = Some(is_bopomofo);
            }
            None => current = Some(is_bopomofo),
        }
    }

    if let Some(kind) = current {
        runs.push((kind, &text[start..]));
    }
    runs
}
