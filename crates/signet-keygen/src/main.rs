//! Generates one Ed25519 keypair for the signet pipeline.
//!
//! Writes `deploy-private.key` (mode 0600, PEM `PRIVATE KEY`) and
//! `deploy-public.key` (mode 0644, PEM `PUBLIC KEY`) to the working
//! directory (or `--out-dir`). The private key must never leave the
//! publisher machine — only the public key is distributed to the relay and
//! installer.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Generate an Ed25519 keypair for signet")]
struct Cli {
    /// Directory to write deploy-private.key and deploy-public.key into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating output directory {}", cli.out_dir.display()))?;

    let signing_key = signet_core::generate_keypair(&mut rand::rngs::OsRng);
    let verifying_key = signing_key.verifying_key();

    let private_path = cli.out_dir.join("deploy-private.key");
    let public_path = cli.out_dir.join("deploy-public.key");

    write_with_mode(&private_path, signet_core::encode_private_key_pem(&signing_key), 0o600)
        .context("writing private key")?;
    write_with_mode(&public_path, signet_core::encode_public_key_pem(&verifying_key), 0o644)
        .context("writing public key")?;

    println!("Ed25519 keypair generated:");
    println!("  - {} (KEEP THIS SECRET — never upload it anywhere)", private_path.display());
    println!("  - {} (distribute to the relay and every installer)", public_path.display());
    println!();
    println!("Public key (base64): {}", STANDARD.encode(verifying_key.to_bytes()));

    Ok(())
}

fn write_with_mode(path: &std::path::Path, contents: String, mode: u32) -> Result<()> {
    std::fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(mode);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    {
        let _ = mode;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn generated_keypair_round_trips_through_pem() {
        let signing_key = signet_core::generate_keypair(&mut rand::rngs::OsRng);
        let verifying_key = signing_key.verifying_key();

        let dir = tempdir().unwrap();
        let priv_path = dir.path().join("deploy-private.key");
        let pub_path = dir.path().join("deploy-public.key");

        write_with_mode(&priv_path, signet_core::encode_private_key_pem(&signing_key), 0o600).unwrap();
        write_with_mode(&pub_path, signet_core::encode_public_key_pem(&verifying_key), 0o644).unwrap();

        let parsed_priv = signet_core::parse_private_key_pem(&std::fs::read_to_string(&priv_path).unwrap()).unwrap();
        let parsed_pub = signet_core::parse_public_key_pem(&std::fs::read_to_string(&pub_path).unwrap()).unwrap();

        assert_eq!(parsed_priv.to_bytes(), signing_key.to_bytes());
        assert_eq!(parsed_pub.to_bytes(), verifying_key.to_bytes());
    }

    #[cfg(unix)]
    #[test]
    fn private_key_file_is_mode_0600() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let path = dir.path().join("deploy-private.key");
        write_with_mode(&path, "stub".to_string(), 0o600).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
