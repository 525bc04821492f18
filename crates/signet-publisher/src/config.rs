use clap::Parser;
use std::path::PathBuf;

/// `signet-publisher <relay_url> <token> <private_key_path> [project_path]`
///
/// Builds a fresh artifact, signs it, and uploads it to a relay. Exits `0`
/// on success, `1` on any error (configuration, build, or transport).
#[derive(Parser, Debug)]
#[command(author, version, about = "Build, sign, and publish a signet artifact")]
pub struct Cli {
    /// Base URL of the relay, e.g. https://relay.example.com:8443
    pub relay_url: String,

    /// Bearer token configured on the relay for uploads.
    pub token: String,

    /// Path to the Ed25519 private key (PEM, `PRIVATE KEY`).
    pub private_key_path: PathBuf,

    /// Directory the build command runs in. Defaults to the current directory.
    pub project_path: Option<PathBuf>,

    /// Name of the artifact file the build command is expected to produce
    /// (relative to `project_path`).
    #[arg(long, default_value = "signet-artifact")]
    pub binary_name: String,

    /// Free-form platform descriptor embedded in the metadata, e.g. darwin/arm64.
    #[arg(long, default_value = "darwin/arm64")]
    pub platform: String,

    /// Build command to invoke (a black box — this pipeline does not
    /// interpret its cross-compilation flags, only its exit status and the
    /// artifact it leaves behind).
    #[arg(long, default_value = "./build.sh")]
    pub build_command: String,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn project_dir(&self) -> PathBuf {
        self.project_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.project_dir().join(&self.binary_name)
    }
}
