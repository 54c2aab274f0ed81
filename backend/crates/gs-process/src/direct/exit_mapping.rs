use gs_core::ExitStatus;

/// Map an OS exit status into the supervisor's taxonomy.
#[cfg(unix)]
pub fn exit_status_from_os(status: std::process::ExitStatus) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    if let Some(code) = status.code() {
        return ExitStatus::ExitCode(code);
    }

    match status.signal() {
        Some(signal) if status.core_dumped() => ExitStatus::CoreDumped(signal),
        Some(signal) => ExitStatus::Signaled(signal),
        None => ExitStatus::Unknown(status.to_string()),
    }
}

#[cfg(not(unix))]
pub fn exit_status_from_os(status: std::process::ExitStatus) -> ExitStatus {
    match status.code() {
        Some(code) => ExitStatus::ExitCode(code),
        None => ExitStatus::Unknown(status.to_string()),
    }
}
