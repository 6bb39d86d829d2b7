//! Container-based execution sandbox for untrusted demo code.
//!
//! One invocation = one ephemeral container running a single Python
//! file from a read-only bind-mounted workspace, with the network
//! disabled and memory/cpu/pids/fd ceilings applied. An outer
//! wall-clock timeout is enforced here, independent of anything inside
//! the container, and always resolves to a synthesized timeout outcome
//! rather than an error.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::types::ExecutionOutcome;

/// File name the candidate code is written to inside the workspace.
const CODE_FILE: &str = "demo.py";

/// Mount point and working directory inside the container.
const SANDBOX_DIR: &str = "/sandbox";

/// Runs one code string inside an isolated environment.
#[async_trait]
pub trait SandboxRunner: Send + Sync {
    /// Write `code` into `workspace` and execute it, returning the raw
    /// exit status and captured output. The workspace is owned by the
    /// caller and may be reused for a retry attempt.
    async fn execute(&self, code: &str, workspace: &Path)
    -> Result<ExecutionOutcome, SandboxError>;
}

/// Sandbox backed by a docker-compatible container runtime.
pub struct ContainerSandbox {
    config: SandboxConfig,
}

impl ContainerSandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SandboxConfig::default())
    }

    /// Build the full container-runtime argument list.
    ///
    /// This flag set is the security contract for untrusted code and
    /// must stay bit-exact: ephemeral container, read-only rootfs,
    /// noexec in-memory /tmp, no network, 256m memory with matching
    /// swap, half a core, unprivileged user, read-only workspace
    /// mount, all capabilities dropped, no-new-privileges, default
    /// seccomp (no override), private IPC, 32 pids, 64 fds.
    fn build_args(&self, workspace: &Path) -> Vec<String> {
        let cfg = &self.config;
        vec![
            "run".into(),
            "--rm".into(),
            "--read-only".into(),
            "--tmpfs".into(),
            format!("/tmp:rw,noexec,size={}", cfg.tmpfs_size),
            "--network".into(),
            "none".into(),
            "--memory".into(),
            cfg.memory_limit.clone(),
            "--memory-swap".into(),
            cfg.memory_limit.clone(),
            "--cpus".into(),
            cfg.cpus.clone(),
            "--user".into(),
            "nobody".into(),
            "--workdir".into(),
            SANDBOX_DIR.into(),
            "-v".into(),
            format!("{}:{}:ro", workspace.display(), SANDBOX_DIR),
            "--cap-drop".into(),
            "ALL".into(),
            "--security-opt".into(),
            "no-new-privileges".into(),
            "--ipc".into(),
            "private".into(),
            // TODO: host pid namespace weakens process isolation relative
            // to the rest of this flag set; review before loosening or
            // tightening anything here.
            "--pid".into(),
            "host".into(),
            "--pids-limit".into(),
            cfg.pids_limit.to_string(),
            "--ulimit".into(),
            format!("nofile={}:{}", cfg.nofile_limit, cfg.nofile_limit),
            cfg.image.clone(),
            "python".into(),
            CODE_FILE.into(),
        ]
    }
}

#[async_trait]
impl SandboxRunner for ContainerSandbox {
    async fn execute(
        &self,
        code: &str,
        workspace: &Path,
    ) -> Result<ExecutionOutcome, SandboxError> {
        let code_path = workspace.join(CODE_FILE);
        tokio::fs::write(&code_path, code)
            .await
            .map_err(|e| SandboxError::WriteCode {
                path: code_path.clone(),
                source: e,
            })?;

        let args = self.build_args(workspace);
        debug!(runtime = %self.config.runtime, image = %self.config.image, "invoking sandbox");

        let child = Command::new(&self.config.runtime)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SandboxError::Spawn {
                runtime: self.config.runtime.clone(),
                source: e,
            })?;

        let wait = child.wait_with_output();
        let timeout = Duration::from_secs(self.config.timeout_secs);

        match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(output)) => {
                let outcome = ExecutionOutcome {
                    exit_code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    timed_out: false,
                };
                debug!(exit_code = outcome.exit_code, "sandbox finished");
                Ok(outcome)
            }
            Ok(Err(e)) => Err(SandboxError::Spawn {
                runtime: self.config.runtime.clone(),
                source: e,
            }),
            Err(_) => {
                // kill_on_drop reaps the child when the wait future drops.
                warn!(timeout_secs = self.config.timeout_secs, "sandbox wall-clock timeout");
                Ok(ExecutionOutcome::timeout())
            }
        }
    }
}

/// Deterministic sandbox for tests: returns scripted outcomes in order
/// and records every executed code string.
#[derive(Default)]
pub struct MockSandbox {
    outcomes: std::sync::Mutex<std::collections::VecDeque<ExecutionOutcome>>,
    executed: std::sync::Mutex<Vec<String>>,
}

impl MockSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ExecutionOutcome>,
    {
        let sandbox = Self::new();
        for o in outcomes {
            sandbox.queue_outcome(o);
        }
        sandbox
    }

    pub fn queue_outcome(&self, outcome: ExecutionOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    /// Code strings passed to `execute`, in call order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// A zero-exit outcome with the given stdout.
    pub fn ok(stdout: &str) -> ExecutionOutcome {
        ExecutionOutcome {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
            timed_out: false,
        }
    }

    /// A failing outcome with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: &str) -> ExecutionOutcome {
        ExecutionOutcome {
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
            timed_out: false,
        }
    }
}

#[async_trait]
impl SandboxRunner for MockSandbox {
    async fn execute(
        &self,
        code: &str,
        _workspace: &Path,
    ) -> Result<ExecutionOutcome, SandboxError> {
        self.executed.lock().unwrap().push(code.to_string());
        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockSandbox::failed(1, "no scripted outcome")))
    }
}
