use crate::LaunchSpec;

use std::path::PathBuf;

#[test]
fn test_launch_spec_builder() {
    let spec = LaunchSpec::new("/srv/game/bin/server", "/srv/game")
        .arg("--port=7777")
        .env("GS_INSTANCE_KEY", "arena");

    assert_eq!(spec.program, PathBuf::from("/srv/game/bin/server"));
    assert_eq!(spec.working_dir, PathBuf::from("/srv/game"));
    assert_eq!(spec.args, vec!["--port=7777".to_string()]);
    assert_eq!(spec.env_value("GS_INSTANCE_KEY"), Some("arena"));
}

#[test]
fn test_launch_spec_env_last_wins() {
    let spec = LaunchSpec::new("server", ".")
        .env("MODE", "first")
        .env("MODE", "second");

    assert_eq!(spec.env_value("MODE"), Some("second"));
    assert_eq!(spec.env_value("MISSING"), None);
}
