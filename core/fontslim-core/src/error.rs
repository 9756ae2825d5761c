//! Terminal error conditions for fontslim-core (made by FontLab https://www.fontlab.com/)

use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop a run before anything useful can happen.
///
/// Everything else (unreadable files, empty merges, a failing subsetter) is
/// logged and recorded in the run report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{what} not found: {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("no index.html files found under {}", root.display())]
    NoIndexFiles { root: PathBuf },

    #[error("output font would overwrite the source font {}", path.display())]
    OutputIsFont { path: PathBuf },
}

/// Failures of the external subsetting tool.
#[derive(Debug, Error)]
pub enum SubsetError {
    #[error("failed to launch subsetter '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("subsetter '{program}' exited with {}", describe_code(*code))]
    Exit { program: String, code: Option<i32> },

    #[error("subsetter reported success but produced no output at {}", path.display())]
    EmptyOutput { path: PathBuf },

    #[error("cannot stage output in {}: {source}", dir.display())]
    Staging {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot move subsetted font into {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
