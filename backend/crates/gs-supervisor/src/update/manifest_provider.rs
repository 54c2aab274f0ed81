use crate::update::install::{extract_zip, install_dir, is_zip, make_executable};
use crate::update::{UpdateProvider, verify_checksum};
use crate::{Result, SupervisorError};

use gs_core::{PlatformArtifact, VersionDescriptor};

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

const DEFAULT_BINARY_NAME: &str = "server";

/// Release manifest served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(default)]
    pub artifacts: BTreeMap<String, PlatformArtifact>,
    #[serde(default)]
    pub launch_overrides: BTreeMap<String, String>,
}

impl Manifest {
    pub fn descriptor(&self) -> VersionDescriptor {
        VersionDescriptor {
            version: self.version.clone(),
            artifacts: self.artifacts.clone(),
            launch_overrides: self.launch_overrides.clone(),
        }
    }
}

/// Installs builds listed in a JSON manifest.
#[derive(Debug, Clone)]
pub struct ManifestUpdateProvider {
    client: reqwest::Client,
    manifest_url: String,
    platform: String,
}

impl ManifestUpdateProvider {
    pub fn new(
        manifest_url: impl Into<String>,
        platform: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            manifest_url: manifest_url.into(),
            platform: platform.into(),
        })
    }

    pub async fn fetch_manifest(&self) -> Result<Manifest> {
        let manifest = self
            .client
            .get(&self.manifest_url)
            .send()
            .await?
            .error_for_status()?
            .json::<Manifest>()
            .await?;
        Ok(manifest)
    }

    async fn download(&self, artifact: &PlatformArtifact) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(&artifact.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl UpdateProvider for ManifestUpdateProvider {
    fn name(&self) -> &'static str {
        "manifest"
    }

    async fn check_for_update(&self, current: Option<&VersionDescriptor>) -> Result<bool> {
        let manifest = self.fetch_manifest().await?;
        Ok(current.is_none_or(|c| c.version != manifest.version))
    }

    async fn apply_update(
        &self,
        current: Option<&VersionDescriptor>,
        dest: &Path,
    ) -> Result<Option<VersionDescriptor>> {
        let manifest = self.fetch_manifest().await?;
        if current.is_some_and(|c| c.version == manifest.version) {
            return Ok(None);
        }

        let artifact = manifest.artifacts.get(&self.platform).ok_or_else(|| {
            SupervisorError::update(format!(
                "manifest version {} has no artifact for platform {}",
                manifest.version, self.platform
            ))
        })?;

        let bytes = self.download(artifact).await?;
        verify_checksum(&artifact.url, &bytes, &artifact.checksum)?;

        let file_name = artifact_file_name(&artifact.url);
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || {
            install_dir(&dest, |staging| {
                if is_zip(&bytes) {
                    extract_zip(&bytes, staging)
                } else {
                    let target = staging.join(&file_name);
                    std::fs::write(&target, &bytes)
                        .map_err(|e| SupervisorError::io(&target, e))?;
                    make_executable(&target)
                }
            })
        })
        .await
        .map_err(|e| SupervisorError::update(format!("install task failed: {e}")))??;

        info!(
            "Installed version {} from {}",
            manifest.version, artifact.url
        );
        Ok(Some(manifest.descriptor()))
    }
}

/// Last path segment of a download URL, without any query string.
pub(crate) fn artifact_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_BINARY_NAME)
        .to_string()
}
