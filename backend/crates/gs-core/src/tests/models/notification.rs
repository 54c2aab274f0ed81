use crate::{ExitStatus, InstanceKey, Notification, NotificationKind};

fn key() -> InstanceKey {
    InstanceKey::new("arena").unwrap()
}

#[test]
fn test_notification_event_names() {
    let crashed = Notification::new(
        key(),
        NotificationKind::Crashed {
            status: ExitStatus::ExitCode(2),
        },
    );
    let intervention = Notification::new(
        key(),
        NotificationKind::NeedsIntervention {
            consecutive_failures: 3,
        },
    );
    let stopped = Notification::new(key(), NotificationKind::Stopped { reason: None });

    assert_eq!(crashed.event_name(), "crashed");
    assert_eq!(intervention.event_name(), "needs_intervention");
    assert_eq!(stopped.event_name(), "stopped");
}

#[test]
fn test_notification_message_mentions_instance_and_cause() {
    let crashed = Notification::new(
        key(),
        NotificationKind::Crashed {
            status: ExitStatus::Signaled(11),
        },
    );

    let message = crashed.message();
    assert!(message.contains("arena"));
    assert!(message.contains("signal 11"));

    let stopped = Notification::new(
        key(),
        NotificationKind::Stopped {
            reason: Some("maintenance".to_string()),
        },
    );
    assert!(stopped.message().ends_with("stopped: maintenance"));
}

#[test]
fn test_notification_serializes_flat() {
    let notification = Notification::new(
        key(),
        NotificationKind::NeedsIntervention {
            consecutive_failures: 3,
        },
    );

    let json = serde_json::to_value(&notification).unwrap();
    assert_eq!(json["instance"], "arena");
    assert_eq!(json["event"], "needs_intervention");
    assert_eq!(json["consecutive_failures"], 3);
}
