//! Avatar file handle
//!
//! A selected file only carries its metadata until the upload step reads it.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// One mebibyte in bytes
pub const MIB: u64 = 1024 * 1024;

/// A file picked in the avatar input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    /// Original file name, used as the object key on upload
    pub name: String,
    /// Size in bytes at selection time
    pub size: u64,
    #[serde(skip)]
    pub path: PathBuf,
}

impl SelectedFile {
    /// Build a handle from a path on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if !metadata.is_file() {
            return Err(anyhow!("{} is not a file", path.display()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;

        Ok(Self {
            name,
            size: metadata.len(),
            path: path.to_path_buf(),
        })
    }

    /// Read the file content for upload.
    ///
    /// At most `size + 1` bytes are read; content whose length no longer
    /// matches the validated size is rejected.
    pub async fn read(&self) -> Result<Vec<u8>> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let mut content = Vec::new();
        file.take(self.size.saturating_add(1))
            .read_to_end(&mut content)
            .await
            .with_context(|| format!("cannot read {}", self.path.display()))?;

        if content.len() as u64 != self.size {
            return Err(anyhow!(
                "{} changed since it was selected ({} bytes expected)",
                self.name,
                self.size
            ));
        }
        Ok(content)
    }
}

/// Turn the avatar input text into a file selection.
///
/// Blank input is an empty selection; a path that cannot be opened is
/// reported as a message for the avatar field.
pub fn select_avatar(input: &str) -> Result<Vec<SelectedFile>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let path = expand_home(trimmed);
    SelectedFile::from_path(&path)
        .map(|file| vec![file])
        .map_err(|e| format!("{e:#}"))
}

/// Expand a leading `~/` using the user's home directory
fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(dirs) = directories::UserDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(input)
}

/// Human-readable size used in validation messages
pub fn format_size(bytes: u64) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MiB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.png");
        fs::write(&path, vec![0u8; 1024]).unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "me.png");
        assert_eq!(file.size, 1024);
        assert_eq!(file.path, path);
    }

    #[test]
    fn test_from_path_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::from_path(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }

    #[test]
    fn test_select_avatar_blank_is_empty_selection() {
        assert_eq!(select_avatar("   "), Ok(Vec::new()));
    }

    #[test]
    fn test_select_avatar_missing_file_is_message() {
        let err = select_avatar("/definitely/not/here.png").unwrap_err();
        assert!(err.contains("cannot read"));
    }

    #[test]
    fn test_select_avatar_trims_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        fs::write(&path, b"jpg").unwrap();

        let files = select_avatar(&format!("  {}  ", path.display())).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.jpg");
    }

    #[tokio::test]
    async fn test_read_returns_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.gif");
        fs::write(&path, b"GIF89a").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.read().await.unwrap(), b"GIF89a".to_vec());
    }

    #[tokio::test]
    async fn test_read_rejects_file_grown_after_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, vec![1u8; 16]).unwrap();
        let file = SelectedFile::from_path(&path).unwrap();

        fs::write(&path, vec![1u8; 4096]).unwrap();
        let err = file.read().await.unwrap_err();
        assert!(err.to_string().contains("changed since it was selected"));
    }

    #[tokio::test]
    async fn test_read_rejects_file_shrunk_after_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, vec![1u8; 16]).unwrap();
        let file = SelectedFile::from_path(&path).unwrap();

        fs::write(&path, vec![1u8; 4]).unwrap();
        assert!(file.read().await.is_err());
    }

    #[test]
    fn test_serialized_form_omits_path() {
        let file = SelectedFile {
            name: "me.png".to_string(),
            size: 10,
            path: PathBuf::from("/tmp/me.png"),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "me.png", "size": 10 }));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(5 * MIB), "5 MiB");
        assert_eq!(format_size(1500), "1500 bytes");
    }
}
