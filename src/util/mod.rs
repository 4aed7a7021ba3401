//! Utility functions for common operations.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, TraceTrimError};

/// Atomically write content to a file.
///
/// The bytes go to a temporary file in the target's directory, which is
/// synced and then renamed over `path`. If any step fails the original
/// file, if any, is left untouched. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be determined or
/// created, or if writing, syncing or renaming the temporary file fails.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => {
            return Err(TraceTrimError::io(
                format!("Cannot determine parent directory for: {}", path.display()),
                io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
            ))
        }
    };

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            TraceTrimError::io(format!("Failed to create directory: {}", parent.display()), e)
        })?;
    }

    // Same directory keeps the rename on one filesystem.
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        TraceTrimError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        TraceTrimError::io(format!("Failed to write temporary file for: {}", path.display()), e)
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        TraceTrimError::io(format!("Failed to sync temporary file for: {}", path.display()), e)
    })?;

    temp_file.persist(path).map_err(|e| {
        TraceTrimError::io(format!("Failed to atomically write file: {}", path.display()), e.error)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_creates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out.txt");

        atomic_write(&path, b"hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out.txt");
        std::fs::write(&path, "old content that is longer").unwrap();

        atomic_write(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("a").join("b").join("out.txt");

        atomic_write(&path, b"nested").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out.txt");
        atomic_write(&path, b"x").unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
