//! Turning command-line paths into upload candidates.

use anyhow::Context;
use invoicer_core::models::CandidateFile;
use invoicer_core::validation::content_type_for_filename;
use std::path::Path;

/// Build a candidate for a local file without reading its contents.
///
/// The declared type is `content_type` when given, otherwise derived from the
/// extension. Size comes from the file's metadata.
pub async fn candidate_from_path(
    path: &Path,
    content_type: Option<&str>,
) -> anyhow::Result<CandidateFile> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("{} is not a file", path.display());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let declared_type = content_type
        .map(str::to_string)
        .unwrap_or_else(|| content_type_for_filename(&name).to_string());

    Ok(CandidateFile::from_path(
        name,
        declared_type,
        metadata.len(),
        path,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicer_core::models::FileSource;

    #[tokio::test]
    async fn test_candidate_uses_extension_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("march.PDF");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let file = candidate_from_path(&path, None).await.unwrap();
        assert_eq!(file.name, "march.PDF");
        assert_eq!(file.declared_type, "application/pdf");
        assert_eq!(file.byte_size, 8);
        assert_eq!(file.source, FileSource::Path(path));
    }

    #[tokio::test]
    async fn test_content_type_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan");
        tokio::fs::write(&path, b"....").await.unwrap();

        let file = candidate_from_path(&path, Some("image/png")).await.unwrap();
        assert_eq!(file.declared_type, "image/png");
    }

    #[tokio::test]
    async fn test_missing_file_and_directory_fail() {
        let dir = tempfile::tempdir().unwrap();
        assert!(candidate_from_path(&dir.path().join("gone.pdf"), None)
            .await
            .is_err());
        assert!(candidate_from_path(dir.path(), None).await.is_err());
    }
}
