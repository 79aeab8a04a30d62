use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::io::board_io::StoreError;

/// Attachment intake: the board stores only a display name and an opaque
/// url. This collaborator produces both by copying the source file into
/// `stride/attachments/` under a collision-free name. The url is the path
/// relative to the stride directory.
pub fn store_attachment(stride_dir: &Path, source: &Path) -> Result<(String, String), StoreError> {
    let display_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .ok_or_else(|| StoreError::ReadError {
            path: source.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
        })?;

    let attachments_dir = stride_dir.join("attachments");
    fs::create_dir_all(&attachments_dir)?;

    let stored_name = format!("{}-{}", Uuid::new_v4().simple(), display_name);
    let dest = attachments_dir.join(&stored_name);
    fs::copy(source, &dest).map_err(|e| StoreError::ReadError {
        path: source.to_path_buf(),
        source: e,
    })?;

    let url = format!("attachments/{}", stored_name);
    Ok((display_name, url))
}

/// Remove a stored attachment payload if the url points inside
/// `stride/attachments/`. Foreign urls are left alone.
pub fn remove_attachment_file(stride_dir: &Path, url: &str) {
    if let Some(rest) = url.strip_prefix("attachments/") {
        let path: PathBuf = stride_dir.join("attachments").join(rest);
        let _ = fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_copies_and_returns_relative_url() {
        let tmp = TempDir::new().unwrap();
        let stride_dir = tmp.path().join("stride");
        fs::create_dir_all(&stride_dir).unwrap();

        let source = tmp.path().join("specs.pdf");
        fs::write(&source, b"%PDF-1.4 fake").unwrap();

        let (name, url) = store_attachment(&stride_dir, &source).unwrap();
        assert_eq!(name, "specs.pdf");
        assert!(url.starts_with("attachments/"));
        assert!(url.ends_with("-specs.pdf"));
        assert_eq!(fs::read(stride_dir.join(&url)).unwrap(), b"%PDF-1.4 fake");
    }

    #[test]
    fn test_store_missing_source_fails() {
        let tmp = TempDir::new().unwrap();
        let stride_dir = tmp.path().join("stride");
        fs::create_dir_all(&stride_dir).unwrap();
        assert!(store_attachment(&stride_dir, &tmp.path().join("nope.pdf")).is_err());
    }

    #[test]
    fn test_same_filename_twice_does_not_collide() {
        let tmp = TempDir::new().unwrap();
        let stride_dir = tmp.path().join("stride");
        fs::create_dir_all(&stride_dir).unwrap();

        let source = tmp.path().join("notes.txt");
        fs::write(&source, b"a").unwrap();

        let (_, url1) = store_attachment(&stride_dir, &source).unwrap();
        let (_, url2) = store_attachment(&stride_dir, &source).unwrap();
        assert_ne!(url1, url2);
    }

    #[test]
    fn test_remove_attachment_file() {
        let tmp = TempDir::new().unwrap();
        let stride_dir = tmp.path().join("stride");
        fs::create_dir_all(&stride_dir).unwrap();

        let source = tmp.path().join("doc.md");
        fs::write(&source, b"x").unwrap();
        let (_, url) = store_attachment(&stride_dir, &source).unwrap();
        assert!(stride_dir.join(&url).exists());

        remove_attachment_file(&stride_dir, &url);
        assert!(!stride_dir.join(&url).exists());

        // foreign url: no-op, no panic
        remove_attachment_file(&stride_dir, "https://example.com/doc.md");
    }
}
