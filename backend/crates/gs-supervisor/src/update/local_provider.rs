use crate::update::UpdateProvider;
use crate::update::install::{copy_tree, install_dir};
use crate::{Result, SupervisorError};

use gs_core::VersionDescriptor;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

/// Name of the file holding the staged build's version.
pub const LOCAL_VERSION_FILE: &str = "version.txt";

/// Installs builds dropped into a staging directory on the same host.
#[derive(Debug, Clone)]
pub struct LocalUpdateProvider {
    dir: PathBuf,
}

impl LocalUpdateProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Version of the staged build, or `None` when nothing is staged.
    pub async fn staged_version(&self) -> Result<Option<String>> {
        let path = self.dir.join(LOCAL_VERSION_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let version = contents.trim();
                Ok((!version.is_empty()).then(|| version.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SupervisorError::io(path, e)),
        }
    }
}

#[async_trait]
impl UpdateProvider for LocalUpdateProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn check_for_update(&self, current: Option<&VersionDescriptor>) -> Result<bool> {
        let Some(staged) = self.staged_version().await? else {
            return Ok(false);
        };
        Ok(current.is_none_or(|c| c.version != staged))
    }

    async fn apply_update(
        &self,
        current: Option<&VersionDescriptor>,
        dest: &Path,
    ) -> Result<Option<VersionDescriptor>> {
        let Some(staged) = self.staged_version().await? else {
            return Ok(None);
        };
        if current.is_some_and(|c| c.version == staged) {
            return Ok(None);
        }

        let source = self.dir.clone();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || {
            install_dir(&dest, |staging| {
                copy_tree(&source, staging, &[LOCAL_VERSION_FILE])
            })
        })
        .await
        .map_err(|e| SupervisorError::update(format!("install task failed: {e}")))??;

        info!("Installed version {staged} from {}", self.dir.display());
        Ok(Some(VersionDescriptor::new(staged)))
    }
}
