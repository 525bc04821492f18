use crate::storage::Storage;
use signet_core::VerifyingKey;
use std::sync::Arc;

pub struct RelayState {
    pub storage: Storage,
    pub public_key: VerifyingKey,
    pub token: String,
    pub download_filename: String,
}

pub type SharedState = Arc<RelayState>;
