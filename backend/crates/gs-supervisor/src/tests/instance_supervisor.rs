use super::fakes::StopBehavior;
use super::{CONTROL_ENDPOINT, Fixture, STOP_GRACE, settle};
use crate::command::SupervisorCommand;
use crate::launch::ENV_SECRET_TOKEN;
use crate::status::InstancePhase;

use gs_core::{ExitStatus, InstanceRecord, VersionDescriptor};

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, none, some};

fn secret_of(fixture: &Fixture) -> String {
    fixture
        .processes
        .last_spec()
        .env_value(ENV_SECRET_TOKEN)
        .unwrap()
        .to_string()
}

#[tokio::test(start_paused = true)]
async fn given_no_persisted_process_when_booted_then_server_started() {
    // Given
    let fixture = Fixture::new();

    // When
    let (handle, _task) = fixture.boot().await;

    // Then
    let status = handle.status();
    assert_that!(fixture.processes.spawn_count(), eq(1));
    assert_that!(status.phase, eq(InstancePhase::Running));
    assert_that!(status.start_generation, eq(1));
    assert_that!(status.last_heartbeat, none());

    let secret = secret_of(&fixture);
    assert!(handle.verify_token(&secret));
    let record = fixture.store.record(&fixture.config.key).unwrap();
    assert_that!(record.secret_token, some(eq(&secret)));
}

#[tokio::test(start_paused = true)]
async fn given_running_instance_when_start_requested_then_ignored() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;

    // When
    handle.start().await.unwrap();
    settle().await;

    // Then
    assert_that!(fixture.processes.spawn_count(), eq(1));
    assert_that!(handle.status().start_generation, eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_crash_before_heartbeat_when_exit_observed_then_init_failure_counted_and_restarted() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;

    // When
    fixture.processes.last().exit(ExitStatus::ExitCode(1));
    settle().await;

    // Then
    let status = handle.status();
    assert_that!(fixture.processes.spawn_count(), eq(2));
    assert_that!(status.start_generation, eq(2));
    assert_that!(status.consecutive_init_failures, eq(1));
    assert_that!(status.last_exit, some(eq(&ExitStatus::ExitCode(1))));
    assert_that!(fixture.notifier.count("crashed"), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_crash_after_heartbeat_when_exit_observed_then_failures_reset() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    fixture.processes.last().exit(ExitStatus::ExitCode(1));
    settle().await;
    handle.heartbeat().await.unwrap();
    settle().await;

    // When
    fixture.processes.last().exit(ExitStatus::Signaled(11));
    settle().await;

    // Then
    assert_that!(fixture.processes.spawn_count(), eq(3));
    assert_that!(handle.status().consecutive_init_failures, eq(0));
    assert_that!(fixture.notifier.count("crashed"), eq(2));
}

#[tokio::test(start_paused = true)]
async fn given_clean_exit_when_observed_then_no_crash_notification() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    handle.heartbeat().await.unwrap();
    settle().await;

    // When
    fixture.processes.last().exit(ExitStatus::ExitCode(0));
    settle().await;

    // Then
    assert_that!(fixture.processes.spawn_count(), eq(2));
    assert_that!(fixture.notifier.count("crashed"), eq(0));
}

#[tokio::test(start_paused = true)]
async fn given_exit_notice_from_old_generation_when_received_then_dropped() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    let before = handle.status();

    // When
    handle
        .send(SupervisorCommand::ExitNotice {
            generation: 0,
            status: ExitStatus::ExitCode(1),
        })
        .await
        .unwrap();
    settle().await;

    // Then
    assert_that!(handle.status(), eq(&before));
    assert_that!(fixture.processes.spawn_count(), eq(1));
    assert_that!(fixture.notifier.events().len(), eq(0));
}

#[tokio::test(start_paused = true)]
async fn given_timeout_from_old_generation_when_received_then_no_kill() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    handle.heartbeat().await.unwrap();
    settle().await;

    // When
    handle
        .send(SupervisorCommand::TimeoutFired { generation: 1 })
        .await
        .unwrap();
    settle().await;

    // Then
    assert_that!(fixture.processes.last().kills(), eq(0));
    assert_that!(handle.status().phase, eq(InstancePhase::Running));
}

#[tokio::test(start_paused = true)]
async fn given_retry_from_old_generation_when_received_then_no_spawn() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;

    // When
    handle
        .send(SupervisorCommand::RetryStart { generation: 0 })
        .await
        .unwrap();
    settle().await;

    // Then
    assert_that!(fixture.processes.attempts(), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_regular_heartbeats_when_time_passes_then_never_killed() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;

    // When
    tokio::time::sleep(Duration::from_secs(40)).await;
    handle.heartbeat().await.unwrap();
    settle().await;
    tokio::time::sleep(Duration::from_secs(40)).await;

    // Then
    assert_that!(fixture.processes.last().kills(), eq(0));
    assert_that!(handle.status().last_heartbeat, some(anything()));

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_that!(fixture.processes.handle(0).kills(), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_no_heartbeat_when_timeout_elapses_then_killed_and_counted_as_init_failure() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;

    // When
    tokio::time::sleep(fixture.config.heartbeat_timeout() + Duration::from_secs(1)).await;
    settle().await;

    // Then
    let status = handle.status();
    assert_that!(fixture.processes.handle(0).kills(), eq(1));
    assert_that!(fixture.processes.handle(0).dumps(), eq(0));
    assert_that!(fixture.processes.spawn_count(), eq(2));
    assert_that!(status.consecutive_init_failures, eq(1));
    assert_that!(status.last_exit, some(eq(&ExitStatus::Signaled(9))));
}

#[tokio::test(start_paused = true)]
async fn given_dump_on_timeout_when_timeout_elapses_then_dump_taken_before_kill() {
    // Given
    let mut fixture = Fixture::new();
    fixture.config.dump_on_timeout = true;
    let (_handle, _task) = fixture.boot().await;

    // When
    tokio::time::sleep(fixture.config.heartbeat_timeout() + Duration::from_secs(1)).await;
    settle().await;

    // Then
    let first = fixture.processes.handle(0);
    assert_that!(first.dumps(), eq(1));
    assert_that!(first.kills(), eq(1));
    assert!(fixture.config.dumps_dir().is_dir());
}

#[tokio::test(start_paused = true)]
async fn given_repeated_init_failures_when_limit_reached_then_waits_for_update() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;

    // When
    for _ in 0..3 {
        fixture.processes.last().exit(ExitStatus::ExitCode(1));
        settle().await;
    }

    // Then
    let status = handle.status();
    assert_that!(fixture.processes.spawn_count(), eq(3));
    assert_that!(status.phase, eq(InstancePhase::AwaitingUpdate));
    assert_that!(status.consecutive_init_failures, eq(3));
    assert_that!(fixture.notifier.count("needs_intervention"), eq(1));

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_that!(fixture.processes.spawn_count(), eq(3));
}

#[tokio::test(start_paused = true)]
async fn given_awaiting_update_when_update_found_then_started_with_new_build() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    for _ in 0..3 {
        fixture.processes.last().exit(ExitStatus::ExitCode(1));
        settle().await;
    }
    fixture.updates.publish(VersionDescriptor::new("2.0"));

    // When
    let outcome = handle.check_for_update_now().await;
    settle().await;

    // Then
    assert_that!(outcome.unwrap(), some(eq(true)));
    let status = handle.status();
    assert_that!(fixture.processes.spawn_count(), eq(4));
    assert_that!(status.phase, eq(InstancePhase::Running));
    assert_that!(status.version, some(eq("2.0")));
    assert_that!(status.consecutive_init_failures, eq(0));
    assert!(!status.awaiting_update);
    assert_eq!(fixture.updates.installs(), [fixture.config.bin_dir()]);
}

#[tokio::test(start_paused = true)]
async fn given_awaiting_update_when_restart_requested_then_started_without_resetting_failures() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    for _ in 0..3 {
        fixture.processes.last().exit(ExitStatus::ExitCode(1));
        settle().await;
    }

    // When
    handle.restart().await.unwrap();
    settle().await;

    // Then
    let status = handle.status();
    assert_that!(fixture.processes.spawn_count(), eq(4));
    assert_that!(status.phase, eq(InstancePhase::Running));
    assert!(!status.awaiting_update);
    assert_that!(status.consecutive_init_failures, eq(3));
}

#[tokio::test(start_paused = true)]
async fn given_running_instance_when_stopped_then_not_restarted() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;

    // When
    handle.stop(Some("maintenance".to_string())).await.unwrap();
    settle().await;

    // Then
    let status = handle.status();
    assert_that!(status.phase, eq(InstancePhase::Stopped));
    assert_that!(status.consecutive_init_failures, eq(1));
    assert_that!(status.stop_reason, some(eq("maintenance")));
    assert_that!(fixture.processes.spawn_count(), eq(1));
    assert_that!(fixture.processes.last().kills(), eq(0));
    assert_eq!(
        fixture.stopper.requests(),
        [(CONTROL_ENDPOINT.to_string(), "maintenance".to_string())]
    );
    assert_that!(fixture.stopper.last_token(), some(eq(&secret_of(&fixture))));
    assert_that!(fixture.notifier.count("stopped"), eq(1));
    assert_that!(
        fixture.notifier.last_stop_reason(),
        some(eq("maintenance"))
    );

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_that!(fixture.processes.spawn_count(), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_heartbeat_before_stop_when_exit_observed_then_failures_reset() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    fixture.processes.last().exit(ExitStatus::ExitCode(1));
    settle().await;
    handle.heartbeat().await.unwrap();
    settle().await;

    // When
    handle.stop(None).await.unwrap();
    settle().await;

    // Then
    let status = handle.status();
    assert_that!(status.phase, eq(InstancePhase::Stopped));
    assert_that!(status.consecutive_init_failures, eq(0));
    assert_that!(fixture.processes.spawn_count(), eq(2));
}

#[tokio::test(start_paused = true)]
async fn given_init_failures_one_below_limit_when_stopped_before_heartbeat_then_waits_for_update() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    for _ in 0..2 {
        fixture.processes.last().exit(ExitStatus::ExitCode(1));
        settle().await;
    }
    assert_that!(handle.status().consecutive_init_failures, eq(2));

    // When
    handle.stop(None).await.unwrap();
    settle().await;

    // Then
    let status = handle.status();
    assert_that!(status.consecutive_init_failures, eq(3));
    assert!(status.awaiting_update);
    assert_that!(fixture.notifier.count("needs_intervention"), eq(1));
    assert_that!(fixture.processes.spawn_count(), eq(3));

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_that!(fixture.processes.spawn_count(), eq(3));
}

#[tokio::test(start_paused = true)]
async fn given_stopped_instance_when_restarted_then_started_again() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    handle.stop(None).await.unwrap();
    settle().await;

    // When
    handle.restart().await.unwrap();
    settle().await;

    // Then
    let status = handle.status();
    assert_that!(fixture.processes.spawn_count(), eq(2));
    assert_that!(status.phase, eq(InstancePhase::Running));
    assert!(!status.manually_stopped);
    assert_that!(status.stop_reason, none());
}

#[tokio::test(start_paused = true)]
async fn given_refused_stop_request_when_stopping_then_killed_immediately() {
    // Given
    let fixture = Fixture::new();
    fixture.stopper.behave(StopBehavior::Fail);
    let (handle, _task) = fixture.boot().await;

    // When
    handle.stop(None).await.unwrap();
    settle().await;

    // Then
    assert_that!(fixture.processes.last().kills(), eq(1));
    assert_that!(handle.status().phase, eq(InstancePhase::Stopped));
    assert_that!(fixture.stopper.requests()[0].1, eq("operator request"));
}

#[tokio::test(start_paused = true)]
async fn given_ignored_stop_request_when_grace_elapses_then_killed() {
    // Given
    let fixture = Fixture::new();
    fixture.stopper.behave(StopBehavior::Ignore);
    let (handle, _task) = fixture.boot().await;

    // When
    handle.stop(None).await.unwrap();
    settle().await;

    // Then
    assert_that!(handle.status().phase, eq(InstancePhase::Stopping));
    assert_that!(fixture.processes.last().kills(), eq(0));

    tokio::time::sleep(STOP_GRACE + Duration::from_secs(1)).await;
    settle().await;
    assert_that!(fixture.processes.last().kills(), eq(1));
    assert_that!(handle.status().phase, eq(InstancePhase::Stopped));
}

#[tokio::test(start_paused = true)]
async fn given_no_control_endpoint_when_stopping_then_killed_without_request() {
    // Given
    let mut fixture = Fixture::new();
    fixture.config.control_endpoint = None;
    let (handle, _task) = fixture.boot().await;

    // When
    handle.stop(None).await.unwrap();
    settle().await;

    // Then
    assert!(fixture.stopper.requests().is_empty());
    assert_that!(fixture.processes.last().kills(), eq(1));
    assert_that!(handle.status().phase, eq(InstancePhase::Stopped));
}

#[tokio::test(start_paused = true)]
async fn given_running_instance_when_update_found_then_stopped_updated_and_restarted() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    handle.heartbeat().await.unwrap();
    settle().await;
    fixture
        .updates
        .publish(VersionDescriptor::new("2.0").with_launch_override("map", "dust"));

    // When
    let outcome = handle.check_for_update_now().await;
    settle().await;

    // Then
    assert_that!(outcome.unwrap(), some(eq(true)));
    assert_that!(fixture.stopper.requests()[0].1, eq("update available"));
    assert_that!(fixture.processes.handle(0).kills(), eq(0));
    assert_that!(fixture.processes.spawn_count(), eq(2));

    let status = handle.status();
    assert_that!(status.version, some(eq("2.0")));
    assert!(!status.update_pending);
    assert!(fixture.processes.last_spec().args.contains(&"--map=dust".to_string()));

    let record = fixture.store.record(&fixture.config.key).unwrap();
    assert_that!(record.version_id(), some(eq("2.0")));
}

#[tokio::test(start_paused = true)]
async fn given_update_stop_ignored_when_time_passes_then_process_not_killed() {
    // Given
    let fixture = Fixture::new();
    fixture.stopper.behave(StopBehavior::Ignore);
    let (handle, _task) = fixture.boot().await;
    handle.heartbeat().await.unwrap();
    fixture.updates.publish(VersionDescriptor::new("2.0"));

    // When
    handle.check_for_update_now().await.unwrap();
    settle().await;
    tokio::time::sleep(STOP_GRACE + Duration::from_secs(1)).await;

    // Then
    assert_that!(fixture.processes.last().kills(), eq(0));
    assert!(handle.status().update_pending);
    assert_that!(fixture.processes.spawn_count(), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_stopped_instance_when_update_found_then_applied_on_next_start() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    handle.stop(None).await.unwrap();
    settle().await;
    fixture.updates.publish(VersionDescriptor::new("2.0"));

    // When
    handle.check_for_update_now().await.unwrap();
    settle().await;

    // Then
    assert!(handle.status().update_pending);
    assert_that!(fixture.processes.spawn_count(), eq(1));
    assert!(fixture.updates.installs().is_empty());

    handle.restart().await.unwrap();
    settle().await;
    assert_that!(fixture.processes.spawn_count(), eq(2));
    assert_that!(handle.status().version, some(eq("2.0")));
}

#[tokio::test(start_paused = true)]
async fn given_no_new_build_when_checked_then_nothing_happens() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;

    // When
    let outcome = handle.check_for_update_now().await;
    settle().await;

    // Then
    assert_that!(outcome.unwrap(), some(eq(false)));
    assert!(fixture.stopper.requests().is_empty());
    assert!(!handle.status().update_pending);
}

#[tokio::test(start_paused = true)]
async fn given_unreachable_provider_when_checked_then_outcome_unknown() {
    // Given
    let fixture = Fixture::new();
    fixture.updates.fail_check();
    let (handle, _task) = fixture.boot().await;

    // When
    let outcome = handle.check_for_update_now().await;
    settle().await;

    // Then
    assert_that!(outcome.unwrap(), none());
    assert_that!(handle.status().phase, eq(InstancePhase::Running));
}

#[tokio::test(start_paused = true)]
async fn given_failing_update_when_restarting_then_installed_version_started() {
    // Given
    let fixture = Fixture::new();
    fixture.updates.fail_apply();
    let (handle, _task) = fixture.boot().await;
    handle.heartbeat().await.unwrap();
    fixture.updates.publish(VersionDescriptor::new("2.0"));

    // When
    handle.check_for_update_now().await.unwrap();
    settle().await;

    // Then
    let status = handle.status();
    assert_that!(fixture.processes.spawn_count(), eq(2));
    assert_that!(status.phase, eq(InstancePhase::Running));
    assert_that!(status.version, none());
    assert!(!status.update_pending);
}

#[tokio::test(start_paused = true)]
async fn given_failing_spawn_when_retries_allowed_then_backs_off_until_started() {
    // Given
    let fixture = Fixture::new();
    fixture.processes.fail_next(2);

    // When
    let (handle, _task) = fixture.boot().await;

    // Then
    assert_that!(fixture.processes.attempts(), eq(1));
    assert_that!(handle.status().phase, eq(InstancePhase::Down));

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert_that!(fixture.processes.attempts(), eq(2));
    assert_that!(fixture.processes.spawn_count(), eq(0));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_that!(fixture.processes.attempts(), eq(2));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_that!(fixture.processes.attempts(), eq(3));
    assert_that!(fixture.processes.spawn_count(), eq(1));
    assert_that!(handle.status().phase, eq(InstancePhase::Running));
}

#[tokio::test(start_paused = true)]
async fn given_failing_spawn_when_retries_exhausted_then_stays_down() {
    // Given
    let fixture = Fixture::new();
    fixture.processes.fail_next(10);

    // When
    let (handle, _task) = fixture.boot().await;
    tokio::time::sleep(Duration::from_secs(600)).await;

    // Then
    assert_that!(fixture.processes.attempts(), eq(4));
    assert_that!(handle.status().phase, eq(InstancePhase::Down));
}

#[tokio::test(start_paused = true)]
async fn given_retries_disabled_when_spawn_fails_then_waits_for_operator() {
    // Given
    let mut fixture = Fixture::new();
    fixture.settings.spawn_backoff = crate::SpawnBackoff::new(&gs_config::SpawnRetryConfig {
        max_attempts: 0,
        ..Default::default()
    });
    fixture.processes.fail_next(1);
    let (handle, _task) = fixture.boot().await;

    // When
    tokio::time::sleep(Duration::from_secs(600)).await;

    // Then
    assert_that!(fixture.processes.attempts(), eq(1));

    handle.start().await.unwrap();
    settle().await;
    assert_that!(fixture.processes.attempts(), eq(2));
    assert_that!(handle.status().phase, eq(InstancePhase::Running));
}

#[tokio::test(start_paused = true)]
async fn given_pending_retry_when_stopped_then_retry_cancelled() {
    // Given
    let fixture = Fixture::new();
    fixture.processes.fail_next(1);
    let (handle, _task) = fixture.boot().await;

    // When
    handle.stop(None).await.unwrap();
    settle().await;
    tokio::time::sleep(Duration::from_secs(60)).await;

    // Then
    assert_that!(fixture.processes.attempts(), eq(1));
    assert_that!(handle.status().phase, eq(InstancePhase::Stopped));
}

#[tokio::test(start_paused = true)]
async fn given_persisted_process_when_booted_then_reattached_with_persisted_secret() {
    // Given
    let fixture = Fixture::new();
    let mut record = InstanceRecord::empty(fixture.config.key.clone());
    record.secret_token = Some("persisted-secret".to_string());
    record.current_version = Some(VersionDescriptor::new("1.4"));
    fixture.store.seed(record);
    fixture.processes.leave_running();

    // When
    let (handle, _task) = fixture.boot().await;

    // Then
    let status = handle.status();
    assert_that!(fixture.processes.spawn_count(), eq(0));
    assert_that!(status.phase, eq(InstancePhase::Running));
    assert_that!(status.version, some(eq("1.4")));
    assert_that!(status.last_heartbeat, some(anything()));
    assert!(handle.verify_token("persisted-secret"));
}

#[tokio::test(start_paused = true)]
async fn given_reattached_process_when_it_exits_then_restarted_without_init_failure() {
    // Given
    let fixture = Fixture::new();
    let reattached = fixture.processes.leave_running();
    let (handle, _task) = fixture.boot().await;

    // When
    reattached.exit(ExitStatus::ExitCode(2));
    settle().await;

    // Then
    assert_that!(fixture.processes.spawn_count(), eq(1));
    assert_that!(fixture.processes.forgotten(), eq(1));
    assert_that!(handle.status().consecutive_init_failures, eq(0));
}

#[tokio::test(start_paused = true)]
async fn given_reattached_process_without_secret_when_heartbeat_presented_then_rejected() {
    // Given
    let fixture = Fixture::new();
    fixture.processes.leave_running();

    // When
    let (handle, _task) = fixture.boot().await;

    // Then
    assert!(!handle.verify_token(""));
    assert!(!handle.verify_token("anything"));
}

#[tokio::test(start_paused = true)]
async fn given_restarted_process_when_started_then_secret_rotated() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    let first = secret_of(&fixture);
    handle.heartbeat().await.unwrap();

    // When
    handle.restart().await.unwrap();
    settle().await;

    // Then
    let second = secret_of(&fixture);
    assert_that!(fixture.processes.spawn_count(), eq(2));
    assert_ne!(first, second);
    assert!(!handle.verify_token(&first));
    assert!(handle.verify_token(&second));
    let record = fixture.store.record(&fixture.config.key).unwrap();
    assert_that!(record.secret_token, some(eq(&second)));
}

#[tokio::test(start_paused = true)]
async fn given_new_config_when_applied_then_used_on_next_start() {
    // Given
    let fixture = Fixture::new();
    let (handle, _task) = fixture.boot().await;
    handle.heartbeat().await.unwrap();
    let mut config = fixture.config.clone();
    config.args = vec!["--port=9000".to_string()];

    // When
    handle
        .update_config(config, fixture.updates.clone())
        .await
        .unwrap();
    settle().await;

    // Then
    assert_that!(fixture.processes.spawn_count(), eq(1));

    handle.restart().await.unwrap();
    settle().await;
    assert_eq!(fixture.processes.last_spec().args, ["--port=9000"]);
}

#[tokio::test(start_paused = true)]
async fn given_running_instance_when_shut_down_then_stopped_and_queue_closed() {
    // Given
    let fixture = Fixture::new();
    let (handle, task) = fixture.boot().await;

    // When
    handle.shutdown().await.unwrap();
    task.await.unwrap();

    // Then
    assert!(fixture.processes.last().has_exited());
    assert_that!(fixture.processes.forgotten(), eq(1));
    assert_that!(fixture.stopper.requests()[0].1, eq("supervisor shutdown"));
    assert_that!(handle.status().phase, eq(InstancePhase::Stopped));
    assert_that!(handle.start().await, err(anything()));
}

#[tokio::test(start_paused = true)]
async fn given_every_handle_dropped_when_idle_then_loop_ends() {
    // Given
    let fixture = Fixture::new();
    let (handle, task) = fixture.boot().await;

    // When
    drop(handle);

    // Then
    task.await.unwrap();
}
