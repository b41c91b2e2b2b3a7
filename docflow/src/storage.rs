//! File storage for uploaded documents and templates.
//!
//! Whole-file writes into two flat directories: one for signed-document
//! uploads, one for fillable templates. Filenames are sanitized and checked
//! against the extension allow-list before anything touches disk.

use crate::config::StorageConfig;
use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct FileStore {
    uploads_dir: PathBuf,
    templates_dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl FileStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            uploads_dir: config.uploads_dir.clone(),
            templates_dir: config.templates_dir.clone(),
            allowed_extensions: config.allowed_extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Store a signed-document upload; returns the stored path.
    #[instrument(skip(self, bytes), fields(size = bytes.len()), err)]
    pub async fn store_upload(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.store_in(&self.uploads_dir, filename, bytes).await
    }

    /// Store a fillable template; returns the stored path.
    #[instrument(skip(self, bytes), fields(size = bytes.len()), err)]
    pub async fn store_template(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.store_in(&self.templates_dir, filename, bytes).await
    }

    /// Absolute template path for a stored link. Links are kept relative to
    /// the templates directory so the directory can move between deployments.
    pub fn template_path(&self, link: &str) -> PathBuf {
        let name = Path::new(link)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.templates_dir.join(name)
    }

    async fn store_in(&self, dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let filename = sanitize_filename(filename);
        if filename.is_empty() {
            return Err(Error::BadRequest {
                message: "No file name provided".to_string(),
            });
        }
        self.check_extension(&filename)?;

        tokio::fs::create_dir_all(dir).await.map_err(|e| Error::Internal {
            operation: format!("create storage directory '{}': {e}", dir.display()),
        })?;

        let path = dir.join(&filename);
        tokio::fs::write(&path, bytes).await.map_err(|e| Error::Internal {
            operation: format!("write file '{}': {e}", path.display()),
        })?;

        Ok(path)
    }

    fn check_extension(&self, filename: &str) -> Result<()> {
        let extension = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            Ok(())
        } else {
            Err(Error::UnsupportedFileType { extension })
        }
    }
}

/// Strip directory components and replace anything outside a conservative
/// character set, so a hostile filename cannot escape the storage directory.
fn sanitize_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    name.chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect::<String>()
        .trim_matches(['.', '_'])
        .to_string()
}
