use clap::Parser;
use std::path::PathBuf;

/// Polls a relay for new signet artifacts, verifies, atomically swaps, and
/// supervises the running binary.
#[derive(Debug, Parser)]
#[command(name = "signet-installer")]
pub struct Cli {
    /// Base URL of the relay, e.g. `https://relay.example.com`.
    pub relay_url: String,
    /// Path to the PEM-encoded Ed25519 public key pinned for this deployment.
    pub public_key_path: PathBuf,
    /// Path the supervised binary is installed to and launched from.
    pub target_binary_path: PathBuf,

    /// Seconds between poll cycles.
    #[arg(long, default_value_t = 300)]
    pub interval_secs: u64,

    /// Increase log verbosity; repeatable.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn backup_path(&self) -> PathBuf {
        let mut path = self.target_binary_path.clone().into_os_string();
        path.push(".backup");
        PathBuf::from(path)
    }
}
