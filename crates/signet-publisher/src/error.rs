use std::path::PathBuf;

/// Convenient result alias for publisher operations.
pub type Result<T> = std::result::Result<T, PublisherError>;

/// Errors that can abort a publish run. Every variant maps to a distinct
/// failure category from the error taxonomy: configuration, build, or
/// transport.
#[derive(thiserror::Error, Debug)]
pub enum PublisherError {
    /// The private key file could not be read or parsed.
    #[error("failed to load private key from {path}: {source}")]
    KeyLoad {
        path: PathBuf,
        #[source]
        source: signet_core::CoreError,
    },
    /// The build toolchain exited with a non-zero status.
    #[error("build command exited with status {0}")]
    BuildFailed(std::process::ExitStatus),
    /// The build command could not be spawned at all.
    #[error("failed to spawn build command: {0}")]
    BuildSpawn(#[source] std::io::Error),
    /// The built artifact could not be read back from disk.
    #[error("failed to read artifact at {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The metadata document failed to serialize.
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The upload request could not be sent.
    #[error("upload request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The relay responded with a non-2xx status.
    #[error("relay rejected upload ({status}): {body}")]
    RelayRejected {
        status: reqwest::StatusCode,
        body: String,
    },
}
