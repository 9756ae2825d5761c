//! Index file discovery helpers for fontslim-core (made by FontLab https://www.fontlab.com/)

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use regex::Regex;
use walkdir::WalkDir;

/// File name that marks a page worth scanning, compared case-insensitively.
pub const INDEX_FILE_NAME: &str = "index.html";

/// Path to a discovered index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFileRef {
    pub path: PathBuf,
}

/// Trait for enumerating index files from some backing store.
pub trait IndexDiscovery {
    fn discover(&self) -> Result<Vec<IndexFileRef>>;
}

/// Recursive filesystem walker that collects `index.html` files.
#[derive(Debug, Clone)]
pub struct PathDiscovery {
    root: PathBuf,
    follow_symlinks: bool,
    exclude: Vec<Regex>,
}

impl PathDiscovery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            exclude: Vec::new(),
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Drop any path whose full display form matches one of `patterns`.
    pub fn exclude(mut self, patterns: Vec<Regex>) -> Self {
        self.exclude = patterns;
        self
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude.is_empty() {
            return false;
        }
        let rendered = path.to_string_lossy();
        self.exclude.iter().any(|re| re.is_match(&rendered))
    }
}

impl IndexDiscovery for PathDiscovery {
    fn discover(&self) -> Result<Vec<IndexFileRef>> {
        if !self.root.exists() {
            return Err(anyhow!(
                "root path does not exist: {}",
                self.root.display()
            ));
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::debug!("skipping unreadable entry: {err}");
                    continue;
                }
            };

            if entry.file_type().is_file() && is_index_file(entry.path()) {
                if self.is_excluded(entry.path()) {
                    log::debug!("excluded {}", entry.path().display());
                    continue;
                }
                found.push(IndexFileRef {
                    path: entry.path().to_path_buf(),
                });
            }
        }

        log::info!(
            "found {} index file(s) under {}",
            found.len(),
            self.root.display()
        );
        Ok(found)
    }
}

/// True when the file name, lowercased, is `index.html`.
pub fn is_index_file(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_lowercase() == INDEX_FILE_NAME,
        None => false,
    }
}
