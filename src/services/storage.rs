use std::path::{Path, PathBuf};

/// Local-disk store for uploaded résumés.
///
/// Files are written under the configured root with their sanitized client
/// name. There is no uniqueness scheme: two uploads with the same name
/// overwrite each other, last writer wins.
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Creates the store, ensuring the upload directory exists.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes uploaded bytes under `filename` and returns the full path.
    /// The caller is responsible for sanitizing the name first.
    pub async fn save(&self, filename: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.root.join(filename);
        tokio::fs::write(&path, data).await?;
        tracing::debug!("Stored upload at {}", path.display());
        Ok(path)
    }
}
