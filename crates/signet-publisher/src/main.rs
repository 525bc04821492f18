//! Builds, signs, and uploads a signet artifact to a relay.
//!
//! `signet-publisher <relay_url> <token> <private_key_path> [project_path]`

mod build;
mod config;
mod error;
mod upload;

use build::BuildStamp;
use clap::Parser;
use config::Cli;
use error::{PublisherError, Result};
use signet_core::{sha256_hex, sign_base64, Metadata};

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

fn run(cli: &Cli) -> Result<()> {
    let key_pem = std::fs::read_to_string(&cli.private_key_path).map_err(|source| {
        PublisherError::KeyLoad {
            path: cli.private_key_path.clone(),
            source: signet_core::CoreError::Io(source),
        }
    })?;
    let signing_key =
        signet_core::parse_private_key_pem(&key_pem).map_err(|source| PublisherError::KeyLoad {
            path: cli.private_key_path.clone(),
            source,
        })?;

    let stamp = BuildStamp::now();
    tracing::info!(version = %stamp.version, "publishing new artifact");

    build::run_build(&cli.project_dir(), &cli.build_command, &cli.platform, &stamp)?;

    let artifact_path = cli.artifact_path();
    let artifact = std::fs::read(&artifact_path).map_err(|source| PublisherError::ArtifactRead {
        path: artifact_path.clone(),
        source,
    })?;

    let checksum = sha256_hex(&artifact);
    tracing::info!(%checksum, bytes = artifact.len(), "artifact built");

    let signature = sign_base64(&signing_key, &artifact);
    let metadata = Metadata {
        version: stamp.version.clone(),
        build_time: stamp.build_time.clone(),
        checksum,
        platform: cli.platform.clone(),
        signature,
    };

    tracing::info!(relay_url = %cli.relay_url, "uploading artifact");
    let response = upload::upload(&cli.relay_url, &cli.token, &cli.binary_name, &artifact, &metadata)?;
    tracing::info!(%response, "upload succeeded");

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("signet-publisher: {err}");
        std::process::exit(1);
    }
}
