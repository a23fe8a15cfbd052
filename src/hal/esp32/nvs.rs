//! Configuration storage in the ESP-IDF NVS partition.
//!
//! The whole [`JigConfig`] is kept as one JSON blob (see
//! [`crate::persist`]) under a single key, so a save either replaces the
//! previous configuration or leaves it untouched.

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use esp_idf_svc::sys::EspError;
use thiserror::Error;

use crate::config::JigConfig;
use crate::persist::{decode, encode, PersistError, BLOB_CAPACITY};
use crate::traits::ConfigStore;

/// NVS namespace for jig settings.
const NAMESPACE: &str = "boxjig";

/// Key holding the configuration blob.
const CONFIG_KEY: &str = "config";

/// NVS store failures.
#[derive(Error, Debug)]
pub enum NvsStoreError {
    /// NVS read or write failed.
    #[error("NVS access failed: {0}")]
    Nvs(#[from] EspError),
    /// Blob could not be encoded or decoded.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// [`ConfigStore`] backed by ESP-IDF NVS.
///
/// # Example
///
/// ```ignore
/// use esp_idf_svc::nvs::EspDefaultNvsPartition;
/// use rs_boxjig::config::load_configuration;
/// use rs_boxjig::hal::esp32::Esp32NvsStore;
///
/// let mut store = Esp32NvsStore::new(EspDefaultNvsPartition::take()?)?;
/// let config = load_configuration(&mut store)?;
/// ```
pub struct Esp32NvsStore {
    nvs: EspNvs<NvsDefault>,
}

impl Esp32NvsStore {
    /// Opens the jig namespace read-write.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace cannot be opened.
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, EspError> {
        Ok(Self {
            nvs: EspNvs::new(partition, NAMESPACE, true)?,
        })
    }
}

impl ConfigStore for Esp32NvsStore {
    type Error = NvsStoreError;

    fn load(&mut self) -> Result<Option<JigConfig>, NvsStoreError> {
        let mut buf = [0u8; BLOB_CAPACITY];
        match self.nvs.get_raw(CONFIG_KEY, &mut buf)? {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, config: &JigConfig) -> Result<(), NvsStoreError> {
        let mut buf = [0u8; BLOB_CAPACITY];
        let len = encode(config, &mut buf)?;
        self.nvs.set_raw(CONFIG_KEY, &buf[..len])?;
        log::info!("configuration written to NVS ({} bytes)", len);
        Ok(())
    }
}
