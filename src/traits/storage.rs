//! Persistent configuration storage abstraction.
//!
//! The byte layout is the store's business. The core hands over a whole
//! [`JigConfig`] and gets a whole one back; see [`crate::config`] for the
//! validating `load_configuration` / `save_configuration` wrappers.

use crate::config::JigConfig;

/// Durable configuration storage (EEPROM, NVS, flash page, file).
///
/// # Implementation Notes
///
/// - `load` returns `Ok(None)` when nothing has been saved yet
/// - `save` must either store every field or fail; a later `load` has to
///   reproduce the saved configuration exactly
pub trait ConfigStore {
    /// Error type for storage operations.
    type Error;

    /// Reads the saved configuration, if any.
    fn load(&mut self) -> Result<Option<JigConfig>, Self::Error>;

    /// Writes `config`, replacing whatever was stored.
    fn save(&mut self, config: &JigConfig) -> Result<(), Self::Error>;
}
