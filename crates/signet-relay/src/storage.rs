//! On-disk storage for the single "latest" artifact and its metadata.
//!
//! Writes are staged to `.tmp` siblings and renamed into place in a fixed
//! order (`latest.bin` before `latest.json`) so a reader never observes a
//! metadata file describing an artifact that hasn't landed yet.

use signet_core::Metadata;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const ARTIFACT_FILE: &str = "latest.bin";
const METADATA_FILE: &str = "latest.json";

pub struct Storage {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl Storage {
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Storage {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn artifact_path(&self) -> PathBuf {
        self.dir.join(ARTIFACT_FILE)
    }

    fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE)
    }

    pub async fn read_metadata(&self) -> std::io::Result<Option<Metadata>> {
        let path = self.metadata_path();
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(
                Metadata::from_json(&bytes)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?,
            )),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn read_artifact(&self) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.artifact_path()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Persist a newly-verified (artifact, metadata) pair. Serialized by
    /// `write_lock` so two concurrent uploads cannot interleave their
    /// staged writes; the loser simply overwrites the winner's files after
    /// it releases the lock, leaving one fully-formed pair on disk.
    pub async fn write_pair(&self, artifact: &[u8], metadata: &Metadata) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;

        let dir = self.dir.clone();
        let artifact = artifact.to_vec();
        let metadata_bytes = metadata
            .to_json_pretty()
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;

        tokio::task::spawn_blocking(move || write_pair_blocking(&dir, &artifact, &metadata_bytes))
            .await
            .expect("storage write task panicked")
    }
}

fn write_pair_blocking(dir: &Path, artifact: &[u8], metadata_bytes: &[u8]) -> std::io::Result<()> {
    stage_and_rename(dir, ARTIFACT_FILE, artifact, 0o755)?;
    stage_and_rename(dir, METADATA_FILE, metadata_bytes, 0o644)?;
    Ok(())
}

fn stage_and_rename(dir: &Path, name: &str, bytes: &[u8], mode: u32) -> std::io::Result<()> {
    let tmp_path = dir.join(format!("{name}.tmp"));
    let final_path = dir.join(name);

    std::fs::write(&tmp_path, bytes)?;

    #[cfg(unix)]
    std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(mode))?;
    #[cfg(not(unix))]
    let _ = mode;

    std::fs::rename(&tmp_path, &final_path)?;
    Ok(())
}
