//! Content merge and whole-file deduplication (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexSet;
use serde::Serialize;

/// Written after every distinct content in the merged file.
pub const RECORD_SEPARATOR: &str = "\n\n";

/// Why an index file did not make it into the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Empty or whitespace-only.
    Blank,
    /// Could not be read or was not valid UTF-8.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Distinct file contents in first-seen order, plus everything that was skipped.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub contents: IndexSet<String>,
    pub skipped: Vec<SkippedFile>,
    /// Whether the merged file was written by this call.
    pub written: bool,
}

impl MergeOutcome {
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Read every path and keep the textually distinct, non-blank contents.
///
/// Failures are per file: a file that cannot be read or decoded is logged and
/// recorded in [`MergeOutcome::skipped`], and the remaining files are still
/// processed.
pub fn collect_distinct_contents<I, P>(paths: I) -> MergeOutcome
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut outcome = MergeOutcome::default();

    for path in paths {
        let path = path.as_ref();
        match read_text(path) {
            Ok(content) if content.trim().is_empty() => {
                log::warn!("{} is empty or has only whitespace", path.display());
                outcome.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::Blank,
                });
            }
            Ok(content) => {
                if !outcome.contents.insert(content) {
                    log::debug!("{} duplicates an earlier file", path.display());
                }
            }
            Err(err) => {
                log::warn!("error reading {}: {err:#}", path.display());
                outcome.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: SkipReason::Unreadable(format!("{err:#}")),
                });
            }
        }
    }

    outcome
}

/// Concatenate contents, each followed by [`RECORD_SEPARATOR`].
pub fn render_merged(contents: &IndexSet<String>) -> String {
    let capacity = contents
        .iter()
        .map(|c| c.len() + RECORD_SEPARATOR.len())
        .sum::<usize>();
    let mut merged = String::with_capacity(capacity);
    for content in contents {
        merged.push_str(content);
        merged.push_str(RECORD_SEPARATOR);
    }
    merged
}

/// Write the merged contents to `output`.
///
/// Returns `false` without creating `output` when there is nothing to write.
pub fn write_merged(contents: &IndexSet<String>, output: &Path) -> Result<bool> {
    if contents.is_empty() {
        log::warn!("no content to write; check the input files");
        return Ok(false);
    }

    fs::write(output, render_merged(contents))
        .with_context(|| format!("writing {}", output.display()))?;

    log::info!(
        "{} distinct content(s) saved to {}",
        contents.len(),
        output.display()
    );
    Ok(true)
}

/// Merge the given index files into `output` and report what happened.
pub fn merge_index_files<I, P>(paths: I, output: &Path) -> Result<MergeOutcome>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut outcome = collect_distinct_contents(paths);
    outcome.written = write_merged(&outcome.contents, output)?;
    Ok(outcome)
}

/// Split merged text back into its records.
///
/// Only exact for contents that do not themselves contain the separator.
pub fn split_merged(text: &str) -> Vec<&str> {
    text.split(RECORD_SEPARATOR)
        .filter(|record| !record.is_empty())
        .collect()
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = String::from_utf8(bytes).context("not valid UTF-8")?;
    Ok(normalize_newlines(text))
}

/// Fold `\r\n` and lone `\r` into `\n`.
fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
