use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, InstallerError>;

#[derive(Debug, thiserror::Error)]
pub enum InstallerError {
    #[error("failed to read public key at {path}: {source}")]
    PublicKeyLoad {
        path: PathBuf,
        #[source]
        source: signet_core::CoreError,
    },
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed metadata from relay: {0}")]
    MalformedMetadata(#[from] serde_json::Error),
    #[error("downloaded artifact failed integrity verification: {0}")]
    IntegrityFailed(signet_core::CoreError),
    #[error("filesystem operation failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("new binary failed to launch during verification")]
    LaunchVerificationFailed,
}
