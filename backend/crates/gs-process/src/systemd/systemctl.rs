use crate::systemd::UnitProperties;
use crate::{ProcessError, Result};

use gs_core::LaunchSpec;

use tokio::process::Command;
use tracing::debug;

const SYSTEMCTL: &str = "systemctl";
const SYSTEMD_RUN: &str = "systemd-run";

/// Thin async wrapper over the `systemctl` and `systemd-run` binaries.
#[derive(Debug, Clone)]
pub struct Systemctl {
    user_scope: bool,
}

impl Systemctl {
    pub fn new(user_scope: bool) -> Self {
        Self { user_scope }
    }

    pub async fn show(&self, unit: &str) -> Result<UnitProperties> {
        let property = format!("--property={}", UnitProperties::QUERY);
        let output = self.systemctl(&["show", &property, unit]).await?;
        Ok(UnitProperties::parse(&output))
    }

    pub async fn kill(&self, unit: &str) -> Result<()> {
        self.systemctl(&["kill", "--signal=SIGKILL", "--kill-whom=all", unit])
            .await
            .map(drop)
    }

    pub async fn reset_failed(&self, unit: &str) -> Result<()> {
        self.systemctl(&["reset-failed", unit]).await.map(drop)
    }

    pub async fn run(&self, unit: &str, spec: &LaunchSpec) -> Result<()> {
        let args = systemd_run_args(unit, spec, self.user_scope);
        debug!("{SYSTEMD_RUN} {}", args.join(" "));
        Self::exec(SYSTEMD_RUN, &args).await.map(drop)
    }

    async fn systemctl(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<String> = Vec::with_capacity(args.len() + 1);
        if self.user_scope {
            full.push("--user".to_string());
        }
        full.extend(args.iter().map(|a| a.to_string()));
        Self::exec(SYSTEMCTL, &full).await
    }

    async fn exec(program: &str, args: &[String]) -> Result<String> {
        let command = format!("{program} {}", args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| ProcessError::command(&command, e.to_string()))?;

        if !output.status.success() {
            return Err(ProcessError::command(
                &command,
                format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Arguments for launching `spec` as the transient service `unit`.
pub fn systemd_run_args(unit: &str, spec: &LaunchSpec, user_scope: bool) -> Vec<String> {
    let mut args = Vec::new();

    if user_scope {
        args.push("--user".to_string());
    }

    args.push(format!("--unit={unit}"));
    args.push("--quiet".to_string());
    // Type=exec makes systemd-run fail when the binary cannot be executed
    args.push("--property=Type=exec".to_string());
    args.push("--property=KillSignal=SIGKILL".to_string());
    args.push(format!(
        "--working-directory={}",
        spec.working_dir.display()
    ));

    for (key, value) in &spec.env {
        args.push(format!("--setenv={key}={value}"));
    }

    if let Some(log_file) = &spec.log_file {
        args.push(format!(
            "--property=StandardOutput=append:{}",
            log_file.display()
        ));
        args.push(format!(
            "--property=StandardError=append:{}",
            log_file.display()
        ));
    }

    args.push("--".to_string());
    args.push(spec.program.display().to_string());
    args.extend(spec.args.iter().cloned());

    args
}
