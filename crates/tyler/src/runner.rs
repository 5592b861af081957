//! Supervision of a generated script running under `bash`.
//!
//! Exactly one child runs at a time, in its own process group. While it
//! runs, SIGINT and SIGTERM sent to Tyler are turned into a stop request:
//! the group gets SIGTERM, then SIGKILL if the child is still alive after
//! [`GRACE_PERIOD`]. The signal listeners live only as long as
//! [`ScriptRunner::run`].

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::ui;

/// How long a child may take to exit after SIGTERM before it is killed.
pub const GRACE_PERIOD: Duration = Duration::from_secs(2);

// ── Signals ─────────────────────────────────────────────────────────

/// Listener for the termination signals Tyler forwards.
pub struct ShutdownSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    #[cfg(unix)]
    pub fn register() -> Result<Self, String> {
        use tokio::signal::unix::{SignalKind, signal};
        let interrupt = signal(SignalKind::interrupt())
            .map_err(|e| format!("failed to install SIGINT handler: {e}"))?;
        let terminate = signal(SignalKind::terminate())
            .map_err(|e| format!("failed to install SIGTERM handler: {e}"))?;
        Ok(Self {
            interrupt,
            terminate,
        })
    }

    #[cfg(not(unix))]
    pub fn register() -> Result<Self, String> {
        Ok(Self {})
    }

    /// Wait for the next signal and return its name.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "Ctrl-C",
            Err(_) => std::future::pending().await,
        }
    }
}

// ── Stopping a child ────────────────────────────────────────────────

/// How [`terminate`] ended the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited within the grace period after SIGTERM.
    Graceful,
    /// Needed SIGKILL.
    Killed,
}

/// Deliver `sig` to the child, or to its whole process group when the
/// child leads one.
#[cfg(unix)]
fn signal_child(child: &Child, sig: libc::c_int) {
    let Some(pid) = child.id() else {
        return;
    };
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: getpgid(2) and kill(2) on a pid we spawned and have not reaped yet.
    let target = if unsafe { libc::getpgid(pid) } == pid {
        -pid
    } else {
        pid
    };
    // SAFETY: as above; a negative target addresses the child's own group.
    let rc = unsafe { libc::kill(target, sig) };
    if rc != 0 {
        warn!(
            "failed to send signal {sig} to {target}: {}",
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(unix)]
async fn force_kill(child: &mut Child) -> Result<(), String> {
    signal_child(child, libc::SIGKILL);
    child
        .wait()
        .await
        .map(|_| ())
        .map_err(|e| format!("failed to reap killed child: {e}"))
}

#[cfg(not(unix))]
async fn force_kill(child: &mut Child) -> Result<(), String> {
    child
        .kill()
        .await
        .map_err(|e| format!("failed to kill child: {e}"))
}

/// Ask `child` to stop, escalating to a kill after `grace`.
pub async fn terminate(child: &mut Child, grace: Duration) -> Result<Termination, String> {
    #[cfg(unix)]
    signal_child(child, libc::SIGTERM);
    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => {
            debug!("child exited after SIGTERM with {status}");
            Ok(Termination::Graceful)
        }
        Ok(Err(e)) => Err(format!("failed to wait for child: {e}")),
        Err(_) => {
            info!("child ignored SIGTERM for {grace:?}, killing it");
            force_kill(child).await?;
            Ok(Termination::Killed)
        }
    }
}

// ── ScriptRunner ────────────────────────────────────────────────────

/// Result of running a script to the end (or until we stopped it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exit status 0.
    Completed,
    /// Tyler received a signal and stopped the script.
    Stopped,
    /// The script died from SIGINT/SIGTERM sent by someone else.
    Interrupted,
    /// Non-zero exit or death by another signal.
    Failed(String),
}

/// Runs one generated script with inherited stdio.
pub struct ScriptRunner {
    script: PathBuf,
    workdir: PathBuf,
    grace: Duration,
    stop_notice: Option<String>,
}

impl ScriptRunner {
    pub fn new(script: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            workdir: workdir.into(),
            grace: GRACE_PERIOD,
            stop_notice: None,
        }
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Line printed as soon as a stop is requested, before the grace period.
    pub fn with_stop_notice(mut self, notice: impl Into<String>) -> Self {
        self.stop_notice = Some(notice.into());
        self
    }

    /// Run until the script exits or Tyler receives SIGINT/SIGTERM.
    pub async fn run(&self) -> Result<RunOutcome, String> {
        let mut signals = ShutdownSignals::register()?;
        self.run_until(signals.recv()).await
    }

    /// Run until the script exits or `stop` resolves, whichever is first.
    /// `stop` yields the name of what asked for the stop.
    pub async fn run_until(
        &self,
        stop: impl Future<Output = &'static str>,
    ) -> Result<RunOutcome, String> {
        debug!(
            "spawning bash {} in {}",
            self.script.display(),
            self.workdir.display()
        );
        let mut command = Command::new("bash");
        command
            .arg(&self.script)
            .current_dir(&self.workdir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        // Own group, so a stop also reaches whatever the script started.
        #[cfg(unix)]
        command.process_group(0);
        let mut child = command
            .spawn()
            .map_err(|e| format!("failed to start bash {}: {e}", self.script.display()))?;

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| format!("failed to wait for script: {e}"))?;
                Ok(self.outcome(status))
            }
            name = stop => {
                info!("received {name}, stopping {}", self.script.display());
                if let Some(notice) = &self.stop_notice {
                    ui::warning(notice);
                }
                terminate(&mut child, self.grace).await?;
                Ok(RunOutcome::Stopped)
            }
        }
    }

    fn outcome(&self, status: ExitStatus) -> RunOutcome {
        if status.success() {
            return RunOutcome::Completed;
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            match status.signal() {
                Some(libc::SIGINT) | Some(libc::SIGTERM) => return RunOutcome::Interrupted,
                Some(sig) => {
                    return RunOutcome::Failed(format!(
                        "bash {} was killed by signal {sig}",
                        self.script.display()
                    ));
                }
                None => {}
            }
        }
        RunOutcome::Failed(format!(
            "Command failed with exit code {}: bash {}",
            status.code().unwrap_or(-1),
            self.script.display()
        ))
    }
}
