//! Polls a relay for new signet artifacts, verifies, atomically swaps, and
//! supervises the running binary.
//!
//! `signet-installer <relay_url> <public_key_path> <target_binary_path>`

mod config;
mod error;
mod poll;
mod supervisor;
mod swap;
mod update;

use clap::Parser;
use config::Cli;
use error::InstallerError;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn load_public_key(path: &std::path::Path) -> error::Result<signet_core::VerifyingKey> {
    let pem = std::fs::read_to_string(path).map_err(|source| InstallerError::PublicKeyLoad {
        path: path.to_path_buf(),
        source: signet_core::CoreError::Io(source),
    })?;
    signet_core::parse_public_key_pem(&pem).map_err(|source| InstallerError::PublicKeyLoad {
        path: path.to_path_buf(),
        source,
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let public_key = match load_public_key(&cli.public_key_path) {
        Ok(key) => key,
        Err(err) => {
            eprintln!("signet-installer: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!(relay_url = %cli.relay_url, target = %cli.target_binary_path.display(), "starting signet-installer");

    if let Err(err) = poll::run(&cli, public_key).await {
        eprintln!("signet-installer: {err}");
        std::process::exit(1);
    }
}
