//! Font subsetting through an external tool (made by FontLab https://www.fontlab.com/)

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;

use crate::error::SubsetError;

/// Program used when nothing else is configured.
pub const DEFAULT_SUBSETTER: &str = "pyftsubset";

/// Anything that can shrink a font down to a set of characters.
pub trait Subsetter {
    fn subset(&self, input: &Path, output: &Path, text: &str) -> Result<(), SubsetError>;
}

/// fontTools' `pyftsubset`, or any program with the same command line.
#[derive(Debug, Clone)]
pub struct PyftSubset {
    program: OsString,
    hinting: bool,
}

impl Default for PyftSubset {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSETTER)
    }
}

impl PyftSubset {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            hinting: false,
        }
    }

    /// Keep hinting tables instead of passing `--no-hinting`.
    pub fn keep_hinting(mut self, keep: bool) -> Self {
        self.hinting = keep;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments passed after the program name.
    pub fn command_args(&self, input: &Path, output: &Path, text: &str) -> Vec<OsString> {
        let mut args = vec![input.as_os_str().to_os_string(), format!("--text={text}").into()];
        if !self.hinting {
            args.push("--no-hinting".into());
        }
        let mut out = OsString::from("--output-file=");
        out.push(output.as_os_str());
        args.push(out);
        args
    }

    fn run(&self, input: &Path, output: &Path, text: &str) -> Result<(), SubsetError> {
        let program = self.program.to_string_lossy().to_string();
        let staged = staging_file(output)?;
        log::debug!(
            "running {program} on {} into {}",
            input.display(),
            staged.path().display()
        );

        let status = Command::new(&self.program)
            .args(self.command_args(input, staged.path(), text))
            .status()
            .map_err(|source| SubsetError::Launch {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(SubsetError::Exit {
                program,
                code: status.code(),
            });
        }

        match fs::metadata(staged.path()) {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {}
            _ => {
                return Err(SubsetError::EmptyOutput {
                    path: output.to_path_buf(),
                })
            }
        }

        staged
            .persist(output)
            .map_err(|err| SubsetError::Persist {
                path: output.to_path_buf(),
                source: err.error,
            })?;
        Ok(())
    }
}

impl Subsetter for PyftSubset {
    /// `output` is replaced only once the tool has succeeded; on failure the
    /// staged file is dropped and anything already at `output` is untouched.
    fn subset(&self, input: &Path, output: &Path, text: &str) -> Result<(), SubsetError> {
        let result = self.run(input, output, text);
        match &result {
            Ok(()) => log::info!("subsetted font saved to {}", output.display()),
            Err(err) => log::warn!("font subsetting failed: {err}"),
        }
        result
    }
}

/// Empty file beside `output` for the tool to write into.
fn staging_file(output: &Path) -> Result<NamedTempFile, SubsetError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = output
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut builder = tempfile::Builder::new();
    builder.prefix(".fontslim-").suffix(&suffix);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }

    builder
        .tempfile_in(dir)
        .map_err(|source| SubsetError::Staging {
            dir: dir.to_path_buf(),
            source,
        })
}
