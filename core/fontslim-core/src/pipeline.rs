//! End-to-end scan → merge → keep-set → subset → cleanup run (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use crate::charset::{self, CharOrder, KeepSet};
use crate::cleanup;
use crate::discovery::{IndexDiscovery, PathDiscovery};
use crate::error::PipelineError;
use crate::merge::{self, SkippedFile};
use crate::subset::Subsetter;

/// Intermediate file holding the merged page contents.
pub const MERGED_FILE_NAME: &str = "output_unique.txt";
/// Intermediate file holding the rendered keep-set.
pub const KEEP_SET_FILE_NAME: &str = "word.txt";
/// Default name of the subsetted font.
pub const DEFAULT_OUTPUT_FONT: &str = "compressed_font.ttf";

/// Everything one run needs, gathered up front by the caller.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    root: PathBuf,
    font: PathBuf,
    output_font: PathBuf,
    work_dir: PathBuf,
    char_order: CharOrder,
    follow_symlinks: bool,
    exclude: Vec<Regex>,
    extra_chars: Vec<char>,
}

impl PipelineConfig {
    pub fn new(root: impl Into<PathBuf>, font: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            font: font.into(),
            output_font: PathBuf::from(DEFAULT_OUTPUT_FONT),
            work_dir: PathBuf::from("."),
            char_order: CharOrder::default(),
            follow_symlinks: false,
            exclude: Vec::new(),
            extra_chars: Vec::new(),
        }
    }

    pub fn with_output_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_font = path.into();
        self
    }

    /// Directory the two intermediate files are written to.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_char_order(mut self, order: CharOrder) -> Self {
        self.char_order = order;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn with_exclude(mut self, patterns: Vec<Regex>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Characters kept in the output font even if no page uses them.
    pub fn with_extra_chars(mut self, chars: Vec<char>) -> Self {
        self.extra_chars = chars;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn font(&self) -> &Path {
        &self.font
    }

    pub fn output_font(&self) -> &Path {
        &self.output_font
    }

    pub fn char_order(&self) -> CharOrder {
        self.char_order
    }

    pub fn merged_path(&self) -> PathBuf {
        self.work_dir.join(MERGED_FILE_NAME)
    }

    pub fn keep_set_path(&self) -> PathBuf {
        self.work_dir.join(KEEP_SET_FILE_NAME)
    }

    fn discovery(&self) -> PathDiscovery {
        PathDiscovery::new(&self.root)
            .follow_symlinks(self.follow_symlinks)
            .exclude(self.exclude.clone())
    }
}

/// What stages 1–3 found.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub discovered: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub distinct_contents: usize,
    pub keep_chars: Option<String>,
    pub keep_char_count: usize,
}

impl ScanReport {
    fn new(root: &Path, discovered: Vec<PathBuf>) -> Self {
        Self {
            root: root.to_path_buf(),
            discovered,
            skipped: Vec::new(),
            distinct_contents: 0,
            keep_chars: None,
            keep_char_count: 0,
        }
    }

    fn set_keep_chars(&mut self, chars: Option<String>) {
        self.keep_char_count = chars.as_deref().map_or(0, |c| c.chars().count());
        self.keep_chars = chars;
    }
}

/// Outcome of the subsetting stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubsetStatus {
    Done { output: PathBuf },
    Failed { error: String },
    /// No keep-set was produced, so the subsetter never ran.
    Skipped,
}

/// Full record of a [`run`].
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub scan: ScanReport,
    pub font: PathBuf,
    pub subset: SubsetStatus,
    pub removed_intermediates: Vec<PathBuf>,
}

impl RunReport {
    pub fn subset_succeeded(&self) -> bool {
        matches!(self.subset, SubsetStatus::Done { .. })
    }
}

/// Run every stage in order and clean up the intermediate files.
///
/// Only missing inputs and an empty discovery abort the run (as
/// [`PipelineError`]). Per-file read failures, empty sets and a failing
/// subsetter are logged and recorded in the report.
pub fn run(config: &PipelineConfig, subsetter: &dyn Subsetter) -> Result<RunReport> {
    require_dir(config.root(), "index directory")?;
    require_file(config.font(), "font file")?;
    require_distinct_output(config)?;

    let discovered = discover(config)?;
    let mut report = RunReport {
        scan: ScanReport::new(config.root(), discovered),
        font: config.font.clone(),
        subset: SubsetStatus::Skipped,
        removed_intermediates: Vec::new(),
    };

    let merged_path = config.merged_path();
    let keep_set_path = config.keep_set_path();

    let staged = run_stages(config, subsetter, &mut report);
    report.removed_intermediates = cleanup::remove_files([&merged_path, &keep_set_path]);
    staged?;

    log::info!("run finished for {}", config.root().display());
    Ok(report)
}

/// Dry run: discover, merge and build the keep-set in memory.
///
/// Writes nothing and never touches the font.
pub fn scan(config: &PipelineConfig) -> Result<ScanReport> {
    require_dir(config.root(), "index directory")?;

    let discovered = discover(config)?;
    let mut report = ScanReport::new(config.root(), discovered);

    let outcome = merge::collect_distinct_contents(&report.discovered);
    report.distinct_contents = outcome.contents.len();
    report.skipped = outcome.skipped;

    if !outcome.contents.is_empty() {
        let mut set = KeepSet::from_text(&merge::render_merged(&outcome.contents));
        set.extend(config.extra_chars.iter().copied());
        let rendered = set.render(config.char_order);
        if !rendered.trim().is_empty() {
            report.set_keep_chars(Some(rendered));
        }
    }

    Ok(report)
}

fn discover(config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    let found = config.discovery().discover()?;
    if found.is_empty() {
        return Err(PipelineError::NoIndexFiles {
            root: config.root().to_path_buf(),
        }
        .into());
    }
    Ok(found.into_iter().map(|f| f.path).collect())
}

fn run_stages(
    config: &PipelineConfig,
    subsetter: &dyn Subsetter,
    report: &mut RunReport,
) -> Result<()> {
    let merged_path = config.merged_path();
    let keep_set_path = config.keep_set_path();

    log::info!("merging {} index file(s)", report.scan.discovered.len());
    let outcome = merge::merge_index_files(&report.scan.discovered, &merged_path)?;
    report.scan.distinct_contents = outcome.contents.len();
    report.scan.skipped = outcome.skipped;

    let keep_chars = if outcome.written {
        log::info!("deduplicating characters");
        match charset::write_keep_set(
            &merged_path,
            &keep_set_path,
            config.char_order,
            &config.extra_chars,
        ) {
            Ok(chars) => chars,
            Err(err) => {
                log::warn!("character deduplication failed: {err:#}");
                None
            }
        }
    } else {
        None
    };
    report.scan.set_keep_chars(keep_chars);

    if let Some(text) = &report.scan.keep_chars {
        report.subset = match subsetter.subset(config.font(), config.output_font(), text) {
            Ok(()) => SubsetStatus::Done {
                output: config.output_font().to_path_buf(),
            },
            Err(err) => SubsetStatus::Failed {
                error: err.to_string(),
            },
        };
    }

    Ok(())
}

fn require_dir(path: &Path, what: &'static str) -> Result<()> {
    if path.as_os_str().is_empty() || !path.is_dir() {
        return Err(PipelineError::MissingInput {
            what,
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Refuse an output path that resolves to the source font.
fn require_distinct_output(config: &PipelineConfig) -> Result<()> {
    let font = fs::canonicalize(config.font())
        .with_context(|| format!("resolving {}", config.font().display()))?;
    if let Ok(output) = fs::canonicalize(config.output_font()) {
        if output == font {
            return Err(PipelineError::OutputIsFont { path: font }.into());
        }
    }
    Ok(())
}

fn require_file(path: &Path, what: &'static str) -> Result<()> {
    if path.as_os_str().is_empty() || !path.is_file() {
        return Err(PipelineError::MissingInput {
            what,
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}
