//! Removal of intermediate files (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::path::{Path, PathBuf};

/// Delete each path that currently exists as a file and return the ones removed.
///
/// Missing files are skipped silently. A failed deletion is logged and does
/// not stop the remaining ones.
pub fn remove_files<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut removed = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.is_file() {
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                log::info!("deleted {}", path.display());
                removed.push(path.to_path_buf());
            }
            Err(err) => log::warn!("could not delete {}: {err}", path.display()),
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_existing_and_skips_missing() {
        let tmp = tempdir().expect("tempdir");
        let present = tmp.path().join("output_unique.txt");
        let missing = tmp.path().join("word.txt");
        fs::write(&present, "x").expect("write");

        let removed = remove_files([&present, &missing]);

        assert_eq!(removed, vec![present.clone()]);
        assert!(!present.exists());
    }

    #[test]
    fn leaves_directories_alone() {
        let tmp = tempdir().expect("tempdir");
        let dir = tmp.path().join("word.txt");
        fs::create_dir(&dir).expect("mkdir");

        assert!(remove_files([&dir]).is_empty());
        assert!(dir.is_dir());
    }
}
