//! Supervises exactly one child process of the installed binary.
//!
//! `tokio::process::Child` is moved into a background waiter task rather
//! than held here: the waiter reports the child's exit to the main loop
//! over an `mpsc` channel instead of mutating shared state directly, so the
//! only state kept in `Supervisor` is the pid (used to signal the process)
//! and the receiving end of that channel.

use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::Instant;

const STOP_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Sent by the background waiter task when the supervised child exits on
/// its own.
pub struct ChildExit {
    pub status: std::io::Result<std::process::ExitStatus>,
}

pub struct Supervisor {
    pid: Option<u32>,
    exit_rx: Option<mpsc::Receiver<ChildExit>>,
}

impl Supervisor {
    pub fn new() -> Self {
        Supervisor {
            pid: None,
            exit_rx: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.pid.is_some()
    }

    /// Launch `path` and start a background task that reports its exit.
    pub fn launch(&mut self, path: &Path) -> std::io::Result<()> {
        let mut child = Command::new(path)
            .stdout(std::process::Stdio::inherit())
            .stderr(std::process::Stdio::inherit())
            .spawn()?;

        let pid = child.id();
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            let status = child.wait().await;
            // The receiver may already be gone (e.g. supervisor dropped
            // during a hot update's stop phase); a failed send is fine.
            let _ = tx.send(ChildExit { status }).await;
        });

        self.pid = pid;
        self.exit_rx = Some(rx);
        tracing::info!(pid = ?self.pid, path = %path.display(), "launched supervised process");
        Ok(())
    }

    /// Drain any pending exit notification without blocking. Clears the
    /// handle if the child has exited.
    pub fn poll_exit(&mut self) -> Option<std::io::Result<std::process::ExitStatus>> {
        let rx = self.exit_rx.as_mut()?;
        match rx.try_recv() {
            Ok(exit) => {
                tracing::warn!(status = ?exit.status, "supervised process exited");
                self.clear();
                Some(exit.status)
            }
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn clear(&mut self) {
        self.pid = None;
        self.exit_rx = None;
    }

    /// Stop the supervised process: `SIGINT`, wait up to 10 seconds, then
    /// `SIGKILL` if it is still alive. Always clears the handle afterward.
    pub async fn stop(&mut self) {
        let Some(pid) = self.pid else {
            self.clear();
            return;
        };

        send_signal(pid, libc::SIGINT);

        let deadline = Instant::now() + STOP_GRACE_PERIOD;
        loop {
            if Instant::now() >= deadline {
                tracing::warn!(pid, "process did not stop within grace period, sending SIGKILL");
                send_signal(pid, libc::SIGKILL);
                break;
            }

            let Some(rx) = self.exit_rx.as_mut() else {
                break;
            };
            let remaining = deadline.saturating_duration_since(Instant::now());
            let poll_window = remaining.min(Duration::from_millis(200));
            if tokio::time::timeout(poll_window, rx.recv()).await.ok().flatten().is_some() {
                break;
            }
        }

        self.clear();
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: i32) {
    // Safety: `kill` with a valid pid and signal number has no memory-safety
    // implications; a failure (e.g. ESRCH because the process already
    // exited) is harmless here.
    unsafe {
        libc::kill(pid as i32, signal);
    }
}

#[cfg(not(unix))]
fn send_signal(_pid: u32, _signal: i32) {}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    #[tokio::test]
    async fn poll_exit_observes_a_short_lived_child() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "short", "exit 0");

        let mut supervisor = Supervisor::new();
        supervisor.launch(&script).unwrap();
        assert!(supervisor.is_running());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let exit = supervisor.poll_exit();
        assert!(exit.is_some());
        assert!(!supervisor.is_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_terminates_a_long_lived_child_promptly() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "long", "trap 'exit 0' INT; sleep 30");

        let mut supervisor = Supervisor::new();
        supervisor.launch(&script).unwrap();

        let started = Instant::now();
        supervisor.stop().await;
        assert!(started.elapsed() < STOP_GRACE_PERIOD);
        assert!(!supervisor.is_running());
    }
}
