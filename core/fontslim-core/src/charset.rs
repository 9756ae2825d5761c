//! Character keep-set extraction (made by FontLab https://www.fontlab.com/)
//!
//! The keep-set is every distinct character found in the merged pages. Two
//! emission orders are supported: true first occurrence across the whole
//! text, and the legacy order that ranks characters by where they sit in the
//! last line read.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// How [`KeepSet::render`] orders its characters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharOrder {
    /// Order of first appearance across the whole input.
    #[default]
    FirstOccurrence,
    /// Stable sort by index within the final line read; characters missing
    /// from that line sort first.
    LegacyLastLine,
}

/// Distinct characters in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct KeepSet {
    chars: IndexSet<char>,
    last_line: String,
}

impl KeepSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (including its line terminator, if any).
    pub fn push_line(&mut self, line: &str) {
        self.chars.extend(line.chars());
        self.last_line.clear();
        self.last_line.push_str(line);
    }

    /// Add characters without affecting the remembered last line.
    pub fn extend<I: IntoIterator<Item = char>>(&mut self, chars: I) {
        self.chars.extend(chars);
    }

    pub fn from_text(text: &str) -> Self {
        let mut set = Self::new();
        for line in text.split_inclusive('\n') {
            set.push_line(line);
        }
        set
    }

    /// Read `reader` line by line, keeping line terminators.
    pub fn from_reader(mut reader: impl BufRead) -> Result<Self> {
        let mut set = Self::new();
        let mut buf = String::new();

        loop {
            buf.clear();
            let read = reader.read_line(&mut buf)?;
            if read == 0 {
                break;
            }
            set.push_line(&buf);
        }

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    pub fn render(&self, order: CharOrder) -> String {
        match order {
            CharOrder::FirstOccurrence => self.chars.iter().collect(),
            CharOrder::LegacyLastLine => self.render_legacy(),
        }
    }

    fn render_legacy(&self) -> String {
        let mut positions: HashMap<char, i64> = HashMap::new();
        for (idx, ch) in self.last_line.chars().enumerate() {
            positions.entry(ch).or_insert(idx as i64);
        }

        let mut ordered: Vec<char> = self.chars.iter().copied().collect();
        ordered.sort_by_key(|ch| positions.get(ch).copied().unwrap_or(-1));
        ordered.into_iter().collect()
    }
}

/// Distinct characters of `text` rendered in `order`.
pub fn dedup_chars(text: &str, order: CharOrder) -> String {
    KeepSet::from_text(text).render(order)
}

/// Build the keep-set from `input` plus `extra` and write it to `output`.
///
/// Returns `None` without creating `output` when the rendered set is blank.
pub fn write_keep_set(
    input: &Path,
    output: &Path,
    order: CharOrder,
    extra: &[char],
) -> Result<Option<String>> {
    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let mut set = KeepSet::from_reader(BufReader::new(file))
        .with_context(|| format!("reading {}", input.display()))?;
    set.extend(extra.iter().copied());
    let rendered = set.render(order);

    if rendered.trim().is_empty() {
        log::warn!("character set is empty; check the input files");
        return Ok(None);
    }

    fs::write(output, &rendered).with_context(|| format!("writing {}", output.display()))?;
    log::info!(
        "{} distinct character(s) saved to {}",
        set.len(),
        output.display()
    );
    Ok(Some(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn first_occurrence_spans_the_whole_text() {
        assert_eq!(dedup_chars("abca\ncbd", CharOrder::FirstOccurrence), "abc\nd");
    }

    #[test]
    fn legacy_order_ranks_by_last_line() {
        // last line is "cbd"; 'a' and '\n' are absent from it and lead
        let rendered = dedup_chars("abca\ncbd", CharOrder::LegacyLastLine);
        assert_eq!(rendered, "a\ncbd");
    }

    #[test]
    fn legacy_last_line_keeps_its_newline() {
        let rendered = dedup_chars("xy\nyx\n", CharOrder::LegacyLastLine);
        assert_eq!(rendered, "yx\n");
    }

    #[test]
    fn reader_and_text_agree() {
        let text = "<p>A</p>\n\n<p>B</p>\n\n";
        let from_reader = KeepSet::from_reader(Cursor::new(text)).expect("read");
        let from_text = KeepSet::from_text(text);

        for order in [CharOrder::FirstOccurrence, CharOrder::LegacyLastLine] {
            assert_eq!(from_reader.render(order), from_text.render(order));
        }
    }

    #[test]
    fn extend_does_not_touch_last_line() {
        let mut set = KeepSet::from_text("ba");
        set.extend(['z', 'a']);
        assert_eq!(set.render(CharOrder::FirstOccurrence), "baz");
        assert_eq!(set.render(CharOrder::LegacyLastLine), "zba");
    }
}
