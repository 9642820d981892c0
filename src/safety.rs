//! Pre-flight checks on the output location.
//!
//! A missing output directory would otherwise only surface at the first
//! `PLAYLIST:END`, after part of the input has already been consumed.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that the output directory exists and is writable.
///
/// # Returns
/// * `Ok(())` if documents can be written into `dir`
/// * `Err` with a descriptive message otherwise
pub fn validate_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        bail!(
            "Output directory '{}' does not exist; create it before running",
            dir.display()
        );
    }

    if !dir.is_dir() {
        bail!("Output path '{}' is not a directory", dir.display());
    }

    let metadata = std::fs::metadata(dir)?;
    if metadata.permissions().readonly() {
        bail!("Output directory '{}' is read-only", dir.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_directory_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_dir(dir.path()).is_ok());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_output_dir(&dir.path().join("playlists"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("playlists");
        std::fs::write(&file, b"").unwrap();
        let result = validate_output_dir(&file);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("is not a directory"));
    }
}
