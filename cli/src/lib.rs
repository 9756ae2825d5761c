//! fontslim CLI (made by FontLab https://www.fontlab.com/)

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use log::LevelFilter;
use regex::Regex;

use fontslim_core::charset::CharOrder;
use fontslim_core::codepoints::parse_codepoint_list;
use fontslim_core::output::{write_json_pretty, write_run_summary, write_scan_summary};
use fontslim_core::pipeline::{self, PipelineConfig, DEFAULT_OUTPUT_FONT};
use fontslim_core::subset::{PyftSubset, DEFAULT_SUBSETTER};

/// Exit status for a run that finished but could not produce the font.
pub const SUBSET_FAILED_EXIT: i32 = 2;

/// Error carrying the exit code the process should end with.
#[derive(Debug)]
pub struct ExitCodeError(pub i32);

impl std::fmt::Display for ExitCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "exiting with code {}", self.0)
    }
}

impl std::error::Error for ExitCodeError {}

/// CLI entrypoint for fontslim.
#[derive(Debug, Parser)]
#[command(
    name = "fontslim",
    version,
    about = "Shrink a web font to the characters your site uses (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan a site, build the keep-set and subset the font
    Subset(SubsetArgs),
    /// Scan a site and print the keep-set without writing anything
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Site directory containing index.html files
    #[arg(value_hint = ValueHint::DirPath)]
    root: PathBuf,

    /// Regex; index files whose path matches are ignored
    #[arg(short = 'x', long = "exclude", value_hint = ValueHint::Other)]
    exclude: Vec<String>,

    /// Follow symlinks while walking the site
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Order of the emitted characters
    #[arg(long = "char-order", default_value_t = CharOrderArg::FirstOccurrence, value_enum)]
    char_order: CharOrderArg,

    /// Extra text whose characters are always kept
    #[arg(short = 't', long = "extra")]
    extra: Option<String>,

    /// Extra codepoints or ranges to keep (e.g. U+0030-U+0039,€)
    #[arg(short = 'u', long = "codepoints", value_hint = ValueHint::Other)]
    codepoints: Vec<String>,

    /// Emit the report as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Args)]
struct ScanArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Debug, Args)]
struct SubsetArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Font to subset
    #[arg(short = 'f', long = "font", value_hint = ValueHint::FilePath)]
    font: PathBuf,

    /// Where to write the subsetted font
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_FONT, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Directory for the intermediate files
    #[arg(long = "work-dir", env = "FONTSLIM_WORK_DIR", default_value = ".", value_hint = ValueHint::DirPath)]
    work_dir: PathBuf,

    /// Subsetting program (pyftsubset-compatible command line)
    #[arg(long = "subsetter", env = "FONTSLIM_SUBSETTER", default_value = DEFAULT_SUBSETTER, value_hint = ValueHint::CommandName)]
    subsetter: PathBuf,

    /// Keep hinting tables (omit --no-hinting)
    #[arg(long = "keep-hinting", action = ArgAction::SetTrue)]
    keep_hinting: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CharOrderArg {
    /// First appearance across all pages
    FirstOccurrence,
    /// Legacy ordering by position in the last line read
    Legacy,
}

impl From<CharOrderArg> for CharOrder {
    fn from(arg: CharOrderArg) -> Self {
        match arg {
            CharOrderArg::FirstOccurrence => CharOrder::FirstOccurrence,
            CharOrderArg::Legacy => CharOrder::LegacyLastLine,
        }
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Subset(args) => run_subset(args),
        Command::Scan(args) => run_scan(args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let config = build_config(&args.source, PathBuf::new())?;
    let report = pipeline::scan(&config)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.source.json {
        write_json_pretty(&report, &mut handle)?;
    } else {
        write_scan_summary(&report, &mut handle)?;
    }
    handle.flush()?;

    Ok(())
}

fn run_subset(args: SubsetArgs) -> Result<()> {
    let config = build_config(&args.source, args.font.clone())?
        .with_output_font(&args.output)
        .with_work_dir(&args.work_dir);
    let subsetter = PyftSubset::new(&args.subsetter).keep_hinting(args.keep_hinting);

    let report = pipeline::run(&config, &subsetter)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.source.json {
        write_json_pretty(&report, &mut handle)?;
    } else {
        write_run_summary(&report, &mut handle)?;
    }
    handle.flush()?;

    if !report.subset_succeeded() {
        return Err(ExitCodeError(SUBSET_FAILED_EXIT).into());
    }
    Ok(())
}

fn build_config(args: &SourceArgs, font: PathBuf) -> Result<PipelineConfig> {
    let exclude = compile_patterns(&args.exclude)?;
    let extra = collect_extra_chars(args.extra.as_deref(), &args.codepoints)?;

    Ok(PipelineConfig::new(&args.root, font)
        .with_exclude(exclude)
        .follow_symlinks(args.follow_symlinks)
        .with_char_order(args.char_order.into())
        .with_extra_chars(extra))
}

fn collect_extra_chars(text: Option<&str>, codepoints: &[String]) -> Result<Vec<char>> {
    let mut chars = Vec::new();
    for chunk in codepoints {
        chars.extend(parse_codepoint_list(chunk)?);
    }
    if let Some(text) = text {
        chars.extend(text.chars());
    }

    chars.sort_unstable();
    chars.dedup();
    Ok(chars)
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid regex: {p}")))
        .collect()
}
