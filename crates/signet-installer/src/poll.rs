//! The installer's foreground loop: poll, decide, update-or-supervise.

use crate::config::Cli;
use crate::error::Result;
use crate::supervisor::Supervisor;
use crate::{swap, update};
use signet_core::VerifyingKey;

pub struct InstallerState {
    pub current_version: Option<String>,
    pub supervisor: Supervisor,
}

impl InstallerState {
    pub fn new() -> Self {
        InstallerState {
            current_version: None,
            supervisor: Supervisor::new(),
        }
    }
}

impl Default for InstallerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs forever. Never returns on success; the caller is expected to exit
/// the process only on unrecoverable startup failure before calling this.
pub async fn run(cli: &Cli, public_key: VerifyingKey) -> Result<()> {
    let client = update::build_client()?;
    let backup_path = cli.backup_path();
    let mut state = InstallerState::new();

    swap::recover_crash(&cli.target_binary_path, &backup_path)?;

    loop {
        if let Err(err) = tick(cli, &public_key, &client, &backup_path, &mut state).await {
            tracing::error!(%err, "poll cycle failed, retrying after interval");
        }
        tokio::time::sleep(std::time::Duration::from_secs(cli.interval_secs)).await;
    }
}

async fn tick(
    cli: &Cli,
    public_key: &VerifyingKey,
    client: &reqwest::Client,
    backup_path: &std::path::Path,
    state: &mut InstallerState,
) -> Result<()> {
    swap::recover_crash(&cli.target_binary_path, backup_path)?;

    let metadata = match update::fetch_latest(client, &cli.relay_url).await {
        Ok(Some(metadata)) => metadata,
        Ok(None) => {
            tracing::debug!("no version published yet");
            return supervise(cli, state);
        }
        Err(err) => {
            tracing::warn!(%err, "failed to reach relay");
            return supervise(cli, state);
        }
    };

    let needs_update = state
        .current_version
        .as_deref()
        .map(|current| current != metadata.version)
        .unwrap_or(true);

    if !needs_update {
        return supervise(cli, state);
    }

    tracing::info!(version = %metadata.version, "new version available");
    let staged_path = update::download_and_stage(client, &cli.relay_url, &metadata, public_key).await?;

    if cli.target_binary_path.exists() {
        swap::hot_update(
            &mut state.supervisor,
            &staged_path,
            &cli.target_binary_path,
            backup_path,
        )
        .await?;
    } else {
        swap::cold_install(&staged_path, &cli.target_binary_path)?;
        state.supervisor.launch(&cli.target_binary_path)?;
    }

    state.current_version = Some(metadata.version);
    Ok(())
}

/// Drain any pending exit notification and relaunch if the child is not
/// currently running.
fn supervise(cli: &Cli, state: &mut InstallerState) -> Result<()> {
    state.supervisor.poll_exit();
    if !state.supervisor.is_running() && cli.target_binary_path.exists() {
        tracing::info!("supervised process not running, relaunching");
        state.supervisor.launch(&cli.target_binary_path)?;
    }
    Ok(())
}
