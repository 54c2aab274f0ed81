use gs_auth::InstanceToken;
use gs_config::InstanceConfig;
use gs_core::LaunchSpec;

pub const ENV_INSTANCE_KEY: &str = "GS_INSTANCE_KEY";
pub const ENV_SECRET_TOKEN: &str = "GS_SECRET_TOKEN";
pub const ENV_CONTROL_URL: &str = "GS_CONTROL_URL";
pub const ENV_CONFIG_DIR: &str = "GS_INSTANCE_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "GS_INSTANCE_DATA_DIR";

/// Build the launch spec for one start of `config`.
///
/// Configured environment comes first so the supervisor-provided values
/// always win. Provider overrides are appended after the configured args.
pub fn build_launch_spec(
    config: &InstanceConfig,
    token: &InstanceToken,
    control_url: &str,
    overrides: &[(String, String)],
) -> LaunchSpec {
    let mut spec = LaunchSpec::new(config.program_path(), config.working_path())
        .log_file(config.log_path());

    for arg in &config.args {
        spec = spec.arg(arg);
    }
    for (key, value) in overrides {
        spec = spec.arg(format!("--{key}={value}"));
    }

    for (key, value) in &config.env {
        spec = spec.env(key, value);
    }

    spec.env(ENV_INSTANCE_KEY, config.key.as_str())
        .env(ENV_SECRET_TOKEN, token.expose())
        .env(ENV_CONTROL_URL, control_url)
        .env(ENV_CONFIG_DIR, config.config_dir().display().to_string())
        .env(ENV_DATA_DIR, config.data_dir().display().to_string())
}

/// Base URL of the instance's own control API routes.
pub fn instance_control_url(public_url: &str, config: &InstanceConfig) -> String {
    format!(
        "{}/api/v1/instances/{}",
        public_url.trim_end_matches('/'),
        config.key
    )
}
