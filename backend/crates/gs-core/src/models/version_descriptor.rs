use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Download location and content checksum for one target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformArtifact {
    pub url: String,
    /// Hex-encoded SHA-256 of the artifact.
    pub checksum: String,
}

/// An installable build of a game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    pub version: String,
    /// Keyed by platform name, e.g. `linux-x86_64`.
    #[serde(default)]
    pub artifacts: BTreeMap<String, PlatformArtifact>,
    /// Passed to the server as `--key=value` launch arguments.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub launch_overrides: BTreeMap<String, String>,
}

impl VersionDescriptor {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            artifacts: BTreeMap::new(),
            launch_overrides: BTreeMap::new(),
        }
    }

    pub fn with_artifact(
        mut self,
        platform: impl Into<String>,
        url: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        self.artifacts.insert(
            platform.into(),
            PlatformArtifact {
                url: url.into(),
                checksum: checksum.into(),
            },
        );
        self
    }

    pub fn with_launch_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.launch_overrides.insert(key.into(), value.into());
        self
    }

    pub fn artifact(&self, platform: &str) -> Option<&PlatformArtifact> {
        self.artifacts.get(platform)
    }

    /// Platform name of the host this binary was built for.
    pub fn host_platform() -> String {
        format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
    }
}
