//! Category images on the local filesystem.

use document_store::bson::oid::ObjectId;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::ImageUpload;

/// Sub-directory of the assets root holding category images
pub const CATEGORY_DIR: &str = "category";

/// Writes `<root>/category/<id>.<ext>`, served as `/assets/category/<id>.<ext>`
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store the upload under the category id and return its public URL.
    /// Any earlier image of the same category is replaced, whatever its
    /// extension.
    pub async fn save(&self, id: ObjectId, upload: &ImageUpload) -> io::Result<String> {
        let file_name = match extension(&upload.file_name) {
            Some(ext) => format!("{}.{}", id.to_hex(), ext),
            None => id.to_hex(),
        };

        let dir = self.root.join(CATEGORY_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        remove_previous(&dir, &id.to_hex(), &file_name).await?;
        tokio::fs::write(dir.join(&file_name), &upload.bytes).await?;

        debug!(%id, file = %file_name, bytes = upload.bytes.len(), "Stored category image");
        Ok(format!("/assets/{}/{}", CATEGORY_DIR, file_name))
    }
}

/// Delete `<stem>` and `<stem>.*` files other than `keep`
async fn remove_previous(dir: &Path, stem: &str, keep: &str) -> io::Result<()> {
    let prefix = format!("{stem}.");
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name != keep && (name == stem || name.starts_with(&prefix)) {
            tokio::fs::remove_file(entry.path()).await?;
            debug!(file = %name, "Removed previous category image");
        }
    }

    Ok(())
}

/// Lowercased extension of the client's file name, if it is plain ASCII
/// alphanumerics
fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
}
