use std::path::{Path, PathBuf};

use tracing::debug;

/// Executable of a live process as reported by `/proc/<pid>/exe`.
fn process_executable(pid: u32) -> Option<PathBuf> {
    std::fs::read_link(format!("/proc/{pid}/exe")).ok()
}

/// True only when `pid` is running exactly `expected`.
///
/// Symlinks in `expected` are resolved first because the kernel reports the
/// resolved path. An unreadable link counts as a mismatch.
pub fn executable_matches(pid: u32, expected: &Path) -> bool {
    let Some(actual) = process_executable(pid) else {
        debug!("Cannot read executable of pid {pid}");
        return false;
    };

    let expected = std::fs::canonicalize(expected).unwrap_or_else(|_| expected.to_path_buf());

    if actual != expected {
        debug!(
            "pid {pid} runs {} instead of {}",
            actual.display(),
            expected.display()
        );
        return false;
    }

    true
}
