use crate::ExitStatus;

#[test]
fn test_exit_status_is_clean() {
    assert!(ExitStatus::Success.is_clean());
    assert!(ExitStatus::ExitCode(0).is_clean());

    assert!(!ExitStatus::ExitCode(1).is_clean());
    assert!(!ExitStatus::Signaled(9).is_clean());
    assert!(!ExitStatus::CoreDumped(11).is_clean());
    assert!(!ExitStatus::OutOfMemory.is_clean());
    assert!(!ExitStatus::ServiceFailed("resources".to_string()).is_clean());
    assert!(!ExitStatus::Timeout.is_clean());
    assert!(!ExitStatus::Unknown("lost".to_string()).is_clean());
}

#[test]
fn test_exit_status_display() {
    assert_eq!(ExitStatus::ExitCode(3).to_string(), "exit code 3");
    assert_eq!(ExitStatus::Signaled(9).to_string(), "killed by signal 9");
    assert_eq!(
        ExitStatus::ServiceFailed("resources".to_string()).to_string(),
        "service failed: resources"
    );
}

#[test]
fn test_exit_status_serde_shape() {
    let json = serde_json::to_value(ExitStatus::Signaled(15)).unwrap();
    assert_eq!(json["kind"], "signaled");
    assert_eq!(json["value"], 15);

    let parsed: ExitStatus = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, ExitStatus::Signaled(15));
}

#[test]
fn test_exit_status_kind() {
    assert_eq!(ExitStatus::OutOfMemory.kind(), "out_of_memory");
    assert_eq!(ExitStatus::CoreDumped(6).kind(), "core_dumped");
}
