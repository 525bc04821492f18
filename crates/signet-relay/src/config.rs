use crate::error::{RelayError, Result};
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_TOKEN: &str = "default-token-cambiar-en-produccion";
const DEFAULT_PUBLIC_KEY_PATH: &str = "./deploy-public.key";
const DEFAULT_PORT: u16 = 8443;
const DEFAULT_STORAGE_DIR: &str = "./storage";

/// Raw, partially-populated configuration as it appears in `config.json`.
/// Every field is optional so a file can override a subset and defer the
/// rest to environment variables or defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    token: Option<String>,
    public_key_path: Option<String>,
    port: Option<u16>,
    storage_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub token: String,
    pub public_key_path: PathBuf,
    pub port: u16,
    pub storage_dir: PathBuf,
}

impl RelayConfig {
    /// Load from `$RELAY_CONFIG` or `./config.json` if present, falling back
    /// field-by-field to `RELAY_TOKEN`/`RELAY_PUBLIC_KEY`/`RELAY_PORT`/
    /// `RELAY_STORAGE` environment variables, then to the documented
    /// defaults.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("RELAY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config.json"));

        let file = if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| RelayError::ConfigRead {
                    path: config_path.clone(),
                    source,
                })?;
            serde_json::from_str(&contents)?
        } else {
            ConfigFile::default()
        };

        let token = file
            .token
            .or_else(|| std::env::var("RELAY_TOKEN").ok())
            .unwrap_or_else(|| DEFAULT_TOKEN.to_string());

        let public_key_path = file
            .public_key_path
            .or_else(|| std::env::var("RELAY_PUBLIC_KEY").ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_KEY_PATH));

        let port = file
            .port
            .or_else(|| std::env::var("RELAY_PORT").ok().and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let storage_dir = file
            .storage_dir
            .or_else(|| std::env::var("RELAY_STORAGE").ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        Ok(RelayConfig {
            token,
            public_key_path,
            port,
            storage_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let file = ConfigFile::default();
        assert!(file.token.is_none());
        assert!(file.public_key_path.is_none());
    }
}
