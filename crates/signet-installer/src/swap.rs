//! The hot-update state machine:
//!
//! ```text
//! [running]   --stop signal-->          [stopping]
//! [stopping]  --exit | 10s timeout-->    [stopped]
//! [stopped]   --rename target→backup-->  [backed_up]
//! [backed_up] --rename staged→target-->  [installed]
//! [installed] --launch-->                [verifying]
//! [verifying] --launch_ok-->             [committed]    (delete backup)
//! [verifying] --launch_fail-->           [rolling_back]
//! [rolling_back] --restore backup-->     [rolled_back]
//! ```
//!
//! Invariant: at `[backed_up]` and `[installed]` the backup exists and is a
//! valid prior artifact; at `[committed]` no backup remains.

use crate::error::Result;
use crate::supervisor::Supervisor;
use std::path::Path;
use std::time::Duration;

/// How long a freshly launched process must stay alive to count as a
/// successful verification rather than an immediate crash.
const LAUNCH_VERIFY_WINDOW: Duration = Duration::from_millis(300);

/// Checked at startup and at the top of every update cycle. A crash between
/// `[backed_up]` and `[installed]` leaves the target missing with a
/// `.backup` still present; promote it before proceeding.
pub fn recover_crash(target_path: &Path, backup_path: &Path) -> std::io::Result<()> {
    if !target_path.exists() && backup_path.exists() {
        tracing::warn!(
            target = %target_path.display(),
            "target missing with backup present, recovering from a prior interrupted update"
        );
        std::fs::rename(backup_path, target_path)?;
    }
    Ok(())
}

/// Install `staged_path` as `target_path` when no prior binary exists.
/// Clears extended attributes best-effort on macOS (quarantine flags on a
/// freshly downloaded binary would otherwise block execution).
pub fn cold_install(staged_path: &Path, target_path: &Path) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::rename(staged_path, target_path)?;
    set_executable(target_path)?;
    clear_quarantine(target_path);
    Ok(())
}

/// Replace a live `target_path` with `staged_path`, stopping and
/// relaunching the supervised process, with rollback to the prior binary on
/// launch failure.
pub async fn hot_update(
    supervisor: &mut Supervisor,
    staged_path: &Path,
    target_path: &Path,
    backup_path: &Path,
) -> Result<()> {
    // [running] -> [stopping] -> [stopped]
    supervisor.stop().await;

    // [stopped] -> [backed_up]
    std::fs::rename(target_path, backup_path)?;

    // [backed_up] -> [installed]
    std::fs::rename(staged_path, target_path)?;
    set_executable(target_path)?;
    clear_quarantine(target_path);

    // [installed] -> [verifying]
    let launch_result = supervisor.launch(target_path);
    let verified = match launch_result {
        Ok(()) => {
            tokio::time::sleep(LAUNCH_VERIFY_WINDOW).await;
            supervisor.poll_exit().is_none()
        }
        Err(err) => {
            tracing::error!(%err, "failed to spawn newly installed binary");
            false
        }
    };

    if verified {
        // [verifying] -> [committed]
        std::fs::remove_file(backup_path)?;
        tracing::info!(target = %target_path.display(), "hot update committed");
        Ok(())
    } else {
        // [verifying] -> [rolling_back] -> [rolled_back]
        tracing::error!("new binary failed to launch, rolling back to prior version");
        if target_path.exists() {
            std::fs::remove_file(target_path)?;
        }
        std::fs::rename(backup_path, target_path)?;
        supervisor.launch(target_path).ok();
        Err(crate::error::InstallerError::LaunchVerificationFailed)
    }
}

fn set_executable(path: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(target_os = "macos")]
fn clear_quarantine(path: &Path) {
    let _ = std::process::Command::new("xattr").arg("-c").arg(path).status();
}

#[cfg(not(target_os = "macos"))]
fn clear_quarantine(_path: &Path) {}
