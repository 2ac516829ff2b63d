//! Opening URLs in the desktop's default handler
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::core::ServiceError;

const SERVICE: &str = "launcher";

#[async_trait]
pub trait Launcher: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<(), ServiceError>;
}

/// Runs `xdg-open`/`open` (or whatever the settings name) with the URL appended
pub struct SystemLauncher {
    command: Vec<String>,
    limit: Duration,
}

impl SystemLauncher {
    pub fn new(command: Vec<String>, limit: Duration) -> Self {
        Self { command, limit }
    }
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn open_url(&self, url: &str) -> Result<(), ServiceError> {
        if self.command.is_empty() {
            return Err(ServiceError::NotConfigured(SERVICE));
        }
        let mut args: Vec<&str> = self.command.iter().map(String::as_str).collect();
        args.push(url);
        run_command(SERVICE, &args, self.limit).await.map(|_| ())
    }
}

/// Run `argv` to completion within `limit`, returning trimmed stdout.
///
/// A non-zero exit status is reported as [`ServiceError::Unavailable`] with
/// the program's stderr.
pub(crate) async fn run_command(
    service: &'static str,
    argv: &[&str],
    limit: Duration,
) -> Result<String, ServiceError> {
    let (program, args) = argv
        .split_first()
        .ok_or(ServiceError::NotConfigured(service))?;
    debug!("Running {program} {args:?}");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(limit, cmd.output())
        .await
        .map_err(|_| ServiceError::Timeout {
            service,
            after: limit,
        })?
        .map_err(|e| ServiceError::unavailable(service, format!("{program}: {e}")))?;

    if !output.status.success() {
        return Err(ServiceError::unavailable(
            service,
            format!(
                "{program} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
