pub mod adapter;
pub mod device;
pub mod json_store;
#[cfg(feature = "network")]
pub mod remote;
pub mod schema;

pub use adapter::Store;

use anyhow::Result;
use thiserror::Error;

use crate::config::Config;

/// Uniform load/save/delete over named collections. One implementation is
/// chosen at startup and injected; call sites never branch on the backend.
pub trait Backend {
    fn get(&self, collection: &str) -> Result<Option<String>>;
    fn put(&self, collection: &str, payload: &str) -> Result<()>;
    fn delete(&self, collection: &str) -> Result<()>;
    fn label(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote store returned status {status} for collection {collection}")]
    RemoteStatus { status: u16, collection: String },
    #[error("unsupported export version: {found} (expected {expected})")]
    UnsupportedExportVersion { found: u32, expected: u32 },
}

pub fn backend_from_config(config: &Config) -> Result<Box<dyn Backend>> {
    #[cfg(feature = "network")]
    if config.remote_enabled && !config.remote_base_url.is_empty() {
        // The device id lives next to the local data files either way.
        let local = json_store::JsonFileBackend::new()?;
        let device_id = device::load_or_create(local.base_dir())?;
        let backend = remote::RemoteBackend::new(
            &config.remote_base_url,
            device_id,
            config.remote_timeout_secs,
        )?;
        return Ok(Box::new(backend));
    }

    #[cfg(not(feature = "network"))]
    let _ = config;

    Ok(Box::new(json_store::JsonFileBackend::new()?))
}
