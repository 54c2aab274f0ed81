//! Staged installation into an instance's binary directory.
//!
//! New files are written to a sibling `.staging` directory first and swapped
//! in with renames, so a failed download or extraction leaves the previous
//! build untouched.

use crate::{Result, SupervisorError};

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};
use zip::ZipArchive;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC)
}

/// Unpack a zip archive into `dest`. Entries escaping `dest` are rejected.
pub fn extract_zip(bytes: &[u8], dest: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    archive.extract(dest)?;
    Ok(())
}

/// Populate a fresh staging directory with `fill`, then replace `dest` with it.
pub fn install_dir<F>(dest: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let staging = sibling(dest, "staging");
    let previous = sibling(dest, "previous");

    remove_if_exists(&staging)?;
    std::fs::create_dir_all(&staging).map_err(|e| SupervisorError::io(&staging, e))?;

    if let Err(e) = fill(&staging) {
        let _ = std::fs::remove_dir_all(&staging);
        return Err(e);
    }

    remove_if_exists(&previous)?;
    if dest.exists() {
        std::fs::rename(dest, &previous).map_err(|e| SupervisorError::io(dest, e))?;
    }

    if let Err(e) = std::fs::rename(&staging, dest) {
        // Put the old build back before reporting
        if previous.exists() {
            restore_previous(&previous, dest);
        }
        return Err(SupervisorError::io(dest, e));
    }

    remove_if_exists(&previous)?;
    debug!("Installed new build into {}", dest.display());
    Ok(())
}

/// Move the backed-up build at `previous` back to `dest`. Returns false when
/// the rollback failed and `dest` may be missing.
pub(crate) fn restore_previous(previous: &Path, dest: &Path) -> bool {
    match std::fs::rename(previous, dest) {
        Ok(()) => {
            warn!("Rolled back to the previous build in {}", dest.display());
            true
        }
        Err(e) => {
            error!(
                "Failed to restore {} to {}: {e}; the instance has no runnable build",
                previous.display(),
                dest.display()
            );
            false
        }
    }
}

/// Recursively copy the contents of `from` into `to`, skipping `exclude`
/// entries at the top level.
pub(crate) fn copy_tree(from: &Path, to: &Path, exclude: &[&str]) -> Result<()> {
    let entries = std::fs::read_dir(from).map_err(|e| SupervisorError::io(from, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| SupervisorError::io(from, e))?;
        let name = entry.file_name();
        if exclude.iter().any(|x| name == *x) {
            continue;
        }

        let source = entry.path();
        let target = to.join(&name);
        let file_type = entry
            .file_type()
            .map_err(|e| SupervisorError::io(&source, e))?;

        if file_type.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| SupervisorError::io(&target, e))?;
            copy_tree(&source, &target, &[])?;
        } else {
            std::fs::copy(&source, &target).map_err(|e| SupervisorError::io(&source, e))?;
        }
    }

    Ok(())
}

/// Mark a single downloaded binary as executable.
#[cfg(unix)]
pub(crate) fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)
        .map_err(|e| SupervisorError::io(path, e))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    std::fs::set_permissions(path, permissions).map_err(|e| SupervisorError::io(path, e))
}

#[cfg(not(unix))]
pub(crate) fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn sibling(dest: &Path, suffix: &str) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{suffix}"));
    dest.with_file_name(name)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SupervisorError::io(path, e)),
    }
}
