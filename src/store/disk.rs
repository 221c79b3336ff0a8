use crate::core::store::ObjectStore;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Object store on the local filesystem. Each bucket is a directory under `root`.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(key);
        if relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        }) {
            bail!("Invalid object location: {bucket}/{key}");
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for DiskStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("Failed to write object to {}", path.display()))?;
        debug!(
            "Disk PUT {} ({} bytes, {})",
            path.display(),
            body.len(),
            content_type
        );
        Ok(())
    }
}
