use crate::error::{PublisherError, Result};
use std::path::Path;
use std::process::Command;

/// A single timestamp snapshot shared by `version` and `build_time` so the
/// two values always describe the same instant.
pub struct BuildStamp {
    /// `YYYYMMDD-HHMMSS`, used only for equality comparison by the installer.
    pub version: String,
    /// `YYYY-MM-DD HH:MM:SS`, human-readable.
    pub build_time: String,
}

impl BuildStamp {
    pub fn now() -> Self {
        let now = chrono::Local::now();
        BuildStamp {
            version: now.format("%Y%m%d-%H%M%S").to_string(),
            build_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Invoke the (external, black-box) build toolchain. Stdout/stderr stream to
/// the user; a non-zero exit is a fatal build error. The stamp is passed
/// through the environment so the toolchain's linker directive can embed it
/// in the artifact.
pub fn run_build(project_dir: &Path, build_command: &str, platform: &str, stamp: &BuildStamp) -> Result<()> {
    tracing::info!(command = build_command, %platform, version = %stamp.version, "running build command");

    let status = Command::new(build_command)
        .current_dir(project_dir)
        .env("SIGNET_VERSION", &stamp.version)
        .env("SIGNET_BUILD_TIME", &stamp.build_time)
        .env("SIGNET_PLATFORM", platform)
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .status()
        .map_err(PublisherError::BuildSpawn)?;

    if !status.success() {
        return Err(PublisherError::BuildFailed(status));
    }

    tracing::info!("build succeeded");
    Ok(())
}
