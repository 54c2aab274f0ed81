use crate::{ProcessError, Result};

use std::path::Path;

use tokio::process::Command;
use tracing::info;

const GCORE: &str = "gcore";

/// Write a core dump of `pid` with `gcore`. The file is `{path}.{pid}`.
pub async fn gcore(pid: u32, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let output = Command::new(GCORE)
        .arg("-o")
        .arg(path)
        .arg(pid.to_string())
        .output()
        .await
        .map_err(|e| ProcessError::dump(format!("could not run {GCORE}: {e}")))?;

    if !output.status.success() {
        return Err(ProcessError::dump(format!(
            "{GCORE} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    info!("Wrote process dump for pid {pid} to {}.{pid}", path.display());
    Ok(())
}
