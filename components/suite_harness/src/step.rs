//! Executable steps
//!
//! A step is one hook or one test body. The harness races every step
//! against a ceiling and drops it when the ceiling passes, so steps must be
//! cancel-safe: anything they spawn has to die with them. Command steps run
//! in their own process group and kill the group when dropped mid-run.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use suite_profile::{Environment, ProfileName};
use tokio::process::Command;

/// Lines of stderr kept in a command failure reason
const STDERR_TAIL_LINES: usize = 5;

/// What a step knows about the file it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepContext {
    /// Project root
    pub root: PathBuf,
    /// Test file, relative to the project root
    pub file: PathBuf,
    /// Active profile
    pub profile: ProfileName,
    /// Active environment
    pub environment: Environment,
}

/// One hook or test body
#[async_trait]
pub trait Step: Send + Sync {
    /// Run the step; `Err` carries the failure reason
    async fn run(&self, ctx: &StepContext) -> Result<(), String>;
}

/// Step that runs a shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    shell: String,
    command: String,
}

impl CommandStep {
    /// Run `command` through `sh -c`
    pub fn new(command: impl Into<String>) -> Self {
        Self::with_shell("sh", command)
    }

    /// Run `command` through `<shell> -c`
    pub fn with_shell(shell: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            command: command.into(),
        }
    }

    /// The command line
    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl Step for CommandStep {
    async fn run(&self, ctx: &StepContext) -> Result<(), String> {
        let mut command = Command::new(&self.shell);
        command
            .arg("-c")
            .arg(&self.command)
            .current_dir(&ctx.root)
            .env("SUITE_PROFILE", ctx.profile.as_str())
            .env("SUITE_ENVIRONMENT", ctx.environment.as_str())
            .env("SUITE_FILE", &ctx.file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let child = command
            .spawn()
            .map_err(|e| format!("failed to spawn `{}`: {}", self.command, e))?;
        let group = GroupKill::new(child.id());
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("failed to wait for `{}`: {}", self.command, e))?;
        group.disarm();

        if output.status.success() {
            return Ok(());
        }

        let status = match output.status.code() {
            Some(code) => format!("exited with status {}", code),
            None => "was terminated by a signal".to_string(),
        };
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail = tail_lines(&stderr, STDERR_TAIL_LINES);

        if tail.is_empty() {
            Err(format!("`{}` {}", self.command, status))
        } else {
            Err(format!("`{}` {}: {}", self.command, status, tail))
        }
    }
}

/// Kills a command's whole process group if dropped while still armed
///
/// `kill_on_drop` only reaches the shell itself; this also reaches whatever
/// the shell started. A command that runs to completion disarms the guard,
/// so background processes it left behind on purpose survive.
#[cfg_attr(not(unix), allow(dead_code))]
struct GroupKill {
    pgid: Option<u32>,
}

impl GroupKill {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }

    fn disarm(mut self) {
        self.pgid = None;
    }
}

#[cfg(unix)]
impl Drop for GroupKill {
    fn drop(&mut self) {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;
        use tracing::debug;

        let Some(pgid) = self.pgid.and_then(|id| i32::try_from(id).ok()) else {
            return;
        };
        match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
            Ok(()) => debug!(pgid, "killed process group of cancelled command"),
            Err(err) => debug!(pgid, error = %err, "could not kill process group"),
        }
    }
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
