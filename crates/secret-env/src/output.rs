//! Output file handling

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// An output file opened for appending
#[derive(Debug)]
pub struct OutputFile {
    pub file: File,
    /// True when the file did not exist before this run
    pub created: bool,
}

/// Open `path` for appending, creating it (0644) when missing.
///
/// Falls back to a plain create when the append-open fails. Existing
/// content is never truncated on the primary path.
pub fn open_append(path: &Path) -> Result<OutputFile> {
    let missing = is_missing(path);

    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    options.mode(0o644);

    let (file, created) = match options.open(path) {
        Ok(file) => (file, missing),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "append open failed, creating");
            let file = File::create(path)
                .with_context(|| format!("Failed to open output file {}", path.display()))?;
            (file, true)
        }
    };

    if created {
        tracing::info!("generated [{}]", path.display());
    }

    Ok(OutputFile { file, created })
}

/// True only when the path definitely does not exist; stat failures for
/// any other reason count as present.
fn is_missing(path: &Path) -> bool {
    matches!(fs::metadata(path), Err(err) if err.kind() == ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");

        let out = open_append(&path).unwrap();
        assert!(out.created);
        assert!(path.exists());
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "EXISTING=\"1\"\n").unwrap();

        let mut out = open_append(&path).unwrap();
        assert!(!out.created);
        out.file.write_all(b"NEW=\"2\"\n").unwrap();
        drop(out);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "EXISTING=\"1\"\nNEW=\"2\"\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mode.env");
        open_append(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        // umask can only clear bits
        assert_eq!(mode & !0o644, 0);
    }

    #[test]
    fn test_is_missing_only_for_not_found() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.env");
        fs::write(&file, "A=\"1\"\n").unwrap();

        assert!(is_missing(&dir.path().join("absent.env")));
        assert!(!is_missing(&file));
        // stat fails with ENOTDIR, which is not "not found"
        let under_file = file.join("child.env");
        assert!(!under_file.exists());
        assert!(!is_missing(&under_file));
    }

    #[test]
    fn test_missing_parent_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join(".env");

        let err = open_append(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to open output file"));
    }
}
