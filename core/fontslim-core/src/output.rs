//! Report output helpers (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::merge::SkipReason;
use crate::pipeline::{RunReport, ScanReport, SubsetStatus};

/// Write any report as prettified JSON followed by a newline.
pub fn write_json_pretty<T: Serialize + ?Sized>(report: &T, mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Human-readable summary of a scan.
pub fn write_scan_summary(report: &ScanReport, mut w: impl Write) -> Result<()> {
    writeln!(
        w,
        "index files: {} found, {} distinct, {} skipped",
        report.discovered.len(),
        report.distinct_contents,
        report.skipped.len()
    )?;

    for skipped in &report.skipped {
        match &skipped.reason {
            SkipReason::Blank => writeln!(w, "  skipped {} (blank)", skipped.path.display())?,
            SkipReason::Unreadable(err) => {
                writeln!(w, "  skipped {} ({err})", skipped.path.display())?
            }
        }
    }

    match &report.keep_chars {
        Some(chars) => writeln!(
            w,
            "characters: {} kept\n{}",
            report.keep_char_count,
            chars.escape_debug()
        )?,
        None => writeln!(w, "characters: none")?,
    }

    Ok(())
}

/// Human-readable summary of a full run.
pub fn write_run_summary(report: &RunReport, mut w: impl Write) -> Result<()> {
    write_scan_summary(&report.scan, &mut w)?;

    match &report.subset {
        SubsetStatus::Done { output } => writeln!(w, "font: saved to {}", output.display())?,
        SubsetStatus::Failed { error } => writeln!(w, "font: subsetting failed: {error}")?,
        SubsetStatus::Skipped => writeln!(w, "font: not subsetted (no characters)")?,
    }

    for removed in &report.removed_intermediates {
        writeln!(w, "removed {}", removed.display())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::SkippedFile;
    use std::path::PathBuf;

    fn sample_run() -> RunReport {
        RunReport {
            scan: ScanReport {
                root: PathBuf::from("/site"),
                discovered: vec![
                    PathBuf::from("/site/index.html"),
                    PathBuf::from("/site/blog/index.html"),
                ],
                skipped: vec![SkippedFile {
                    path: PathBuf::from("/site/blog/index.html"),
                    reason: SkipReason::Blank,
                }],
                distinct_contents: 1,
                keep_chars: Some("<p>A/\n".into()),
                keep_char_count: 6,
            },
            font: PathBuf::from("/fonts/A.ttf"),
            subset: SubsetStatus::Done {
                output: PathBuf::from("compressed_font.ttf"),
            },
            removed_intermediates: vec![PathBuf::from("output_unique.txt")],
        }
    }

    #[test]
    fn json_flattens_scan_fields() {
        let mut buf = Vec::new();
        write_json_pretty(&sample_run(), &mut buf).expect("write json");

        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("parse");
        assert_eq!(parsed["root"], "/site");
        assert_eq!(parsed["keep_char_count"], 6);
        assert_eq!(parsed["subset"]["status"], "done");
        assert_eq!(parsed["skipped"][0]["reason"]["kind"], "blank");
    }

    #[test]
    fn summary_escapes_control_characters() {
        let mut buf = Vec::new();
        write_run_summary(&sample_run(), &mut buf).expect("write summary");

        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("2 found, 1 distinct, 1 skipped"));
        assert!(text.contains("<p>A/\\n"));
        assert!(text.contains("font: saved to compressed_font.ttf"));
    }
}
