//! Category file scanner
//!
//! Lists the audio files directly inside one category directory. Matching is
//! a case-sensitive suffix check on the file name (`kick_01.wav` matches
//! `wav`, `kick_01.WAV` does not). Subdirectories are not descended into.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Category scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory exists but cannot be listed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scanner for one file extension
#[derive(Debug, Clone)]
pub struct FileScanner {
    suffix: String,
}

impl FileScanner {
    /// Scanner matching files named `*.{extension}`
    pub fn new(extension: &str) -> Self {
        Self {
            suffix: format!(".{}", extension),
        }
    }

    /// Whether `file_name` carries the scanner's extension
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.len() > self.suffix.len() && file_name.ends_with(&self.suffix)
    }

    /// List matching files in `dir`, sorted by name
    ///
    /// Failing to read `dir` itself is an error; unreadable entries inside it
    /// are logged and skipped.
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !dir.exists() {
            return Err(ScanError::PathNotFound(dir.to_path_buf()));
        }

        if !dir.is_dir() {
            return Err(ScanError::NotADirectory(dir.to_path_buf()));
        }

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if self.matches(&entry.file_name().to_string_lossy()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) if e.depth() == 0 => {
                    let io = e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::other(format!("cannot list {}", dir.display()))
                    });
                    return Err(ScanError::Io(io));
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        tracing::debug!(
            dir = %dir.display(),
            matched = files.len(),
            "Category scan complete"
        );

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let scanner = FileScanner::new("wav");
        assert!(scanner.matches("kick.wav"));
        assert!(!scanner.matches("kick.WAV"));
        assert!(!scanner.matches("kick.wav.bak"));
        assert!(!scanner.matches(".wav"));
        assert!(!scanner.matches("kickwav"));
    }

    #[test]
    fn test_scan_lists_only_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.wav", "a.wav", "c.WAV", "notes.txt"] {
            std::fs::write(temp_dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(temp_dir.path().join("nested.wav")).unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
        std::fs::write(temp_dir.path().join("sub").join("deep.wav"), b"").unwrap();

        let files = FileScanner::new("wav").scan(temp_dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.wav", "b.wav"]);
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            FileScanner::new("wav").scan(&missing),
            Err(ScanError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("kick.wav");
        std::fs::write(&file, b"").unwrap();
        assert!(matches!(
            FileScanner::new("wav").scan(&file),
            Err(ScanError::NotADirectory(_))
        ));
    }
}
