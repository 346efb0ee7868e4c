//! Test utilities for concopy
//!
//! Shared fixtures and temp-dir helpers used across the concopy workspace.
//! Fixtures are plain data (JSON and HTML text) so this crate does not depend
//! on `concopy-core`.

pub mod fixtures;

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// All test files end up in one gitignored location that is easy to clean
/// up by hand. The directory is removed when the returned `TempDir` drops.
///
/// # Panics
///
/// Panics if the current directory is unavailable or `.tmp/` cannot be
/// created.
///
/// # Examples
///
/// ```rust
/// use concopy_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("functions.json");
/// std::fs::write(&file_path, "{}").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let tmp_base = std::env::current_dir()?.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Write `contents` to `dir/name` and return the path
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_creates_in_tmp() {
        let temp = temp_dir_in_workspace();
        let path = temp.path();

        assert!(
            path.to_string_lossy().contains(".tmp"),
            "Path should contain .tmp, got: {}",
            path.display()
        );
        assert!(path.is_dir(), "Path should be a directory");
    }

    #[test]
    fn test_temp_dir_auto_cleanup() {
        let path = {
            let temp = temp_dir_in_workspace();
            temp.path().to_path_buf()
        };

        assert!(
            !path.exists(),
            "Directory should not exist after drop: {}",
            path.display()
        );
    }

    #[test]
    fn test_write_file_creates_parents() {
        let temp = temp_dir_in_workspace();
        let path = write_file(temp.path(), "nested/page.json", "{}");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }
}
