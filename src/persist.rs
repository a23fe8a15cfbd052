//! JSON blob persistence for [`JigConfig`] using `serde-json-core`.
//!
//! Configurations are flattened into [`StoredConfig`], a record of plain
//! integers, unit enums and the pattern list, then written as a compact
//! JSON object into a caller-supplied buffer. No allocation is involved,
//! so the same codec serves flash pages, EEPROM and ESP32 NVS blobs.
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::config::{JigConfig, JointParameters};
//! use rs_boxjig::pattern::SlotPattern;
//! use rs_boxjig::persist::{decode, encode, BLOB_CAPACITY};
//!
//! let config = JigConfig::default().with_joint(
//!     JointParameters::default()
//!         .with_pattern(SlotPattern::from_widths(&[200, 300, 450, 300, 200]).unwrap()),
//! );
//!
//! let mut buf = [0u8; BLOB_CAPACITY];
//! let len = encode(&config, &mut buf).unwrap();
//! assert_eq!(decode(&buf[..len]).unwrap(), config);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{BoardConfig, JigConfig, JointParameters, MotionConfig, Sizing};
use crate::pattern::{ExhaustionPolicy, SlotPattern};
use crate::traits::ConfigStore;
use crate::units::{CalibrationError, StepsPerThou};

/// Blob layout version written by [`encode`].
pub const FORMAT_VERSION: u8 = 1;

/// Buffer size that fits any encodable configuration.
pub const BLOB_CAPACITY: usize = 1024;

// ============================================================================
// Errors
// ============================================================================

/// Failures encoding or decoding a configuration blob.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistError {
    /// Output buffer too small for the encoded configuration.
    #[error("configuration does not fit in the storage buffer")]
    BufferFull,
    /// Stored bytes are not a configuration blob.
    #[error("stored configuration is malformed")]
    Malformed,
    /// Written by a newer or older layout.
    #[error("unsupported configuration format version {0}")]
    UnsupportedVersion(u8),
    /// Stored calibration ratio is unusable.
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    /// Backing storage failed.
    #[error("storage backend failed")]
    Backend,
}

// ============================================================================
// Stored Layout
// ============================================================================

/// Which of the two sizing fields is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// `slot_width` applies.
    Uniform,
    /// `pattern` applies.
    Pattern,
}

/// Flat, versioned on-storage record of a [`JigConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    /// Layout version.
    pub version: u8,
    /// Kerf (thou).
    pub kerf: u32,
    /// Slop (thou).
    pub slop: u32,
    /// Max advance per cut pass (thou).
    pub max_advance: u32,
    /// Sizing mode.
    pub sizing: SizingMode,
    /// Uniform slot width (thou), 0 in pattern mode.
    pub slot_width: u32,
    /// Pattern widths, empty in uniform mode.
    pub pattern: SlotPattern,
    /// Negative-board exhaustion policy.
    pub exhaustion: ExhaustionPolicy,
    /// Stock length (thou).
    pub wood_length: u32,
    /// Slots across the stock.
    pub slot_count: u16,
    /// Calibration numerator.
    pub cal_steps: u32,
    /// Calibration denominator.
    pub cal_thou: u32,
    /// Jog distance (thou).
    pub jog_step: u32,
    /// Step pulse half-period (µs).
    pub step_pulse_us: u32,
}

impl From<&JigConfig> for StoredConfig {
    fn from(c: &JigConfig) -> Self {
        let (sizing, slot_width, pattern) = match &c.joint.sizing {
            Sizing::Uniform { slot_width } => (SizingMode::Uniform, *slot_width, SlotPattern::new()),
            Sizing::Pattern(pattern) => (SizingMode::Pattern, 0, pattern.clone()),
        };
        Self {
            version: FORMAT_VERSION,
            kerf: c.joint.kerf,
            slop: c.joint.slop,
            max_advance: c.joint.max_advance,
            sizing,
            slot_width,
            pattern,
            exhaustion: c.joint.exhaustion,
            wood_length: c.board.wood_length,
            slot_count: c.board.slot_count,
            cal_steps: c.motion.calibration.steps(),
            cal_thou: c.motion.calibration.thou(),
            jog_step: c.motion.jog_step,
            step_pulse_us: c.motion.step_pulse_us,
        }
    }
}

impl TryFrom<StoredConfig> for JigConfig {
    type Error = PersistError;

    fn try_from(s: StoredConfig) -> Result<Self, PersistError> {
        if s.version != FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion(s.version));
        }
        let sizing = match s.sizing {
            SizingMode::Uniform => Sizing::Uniform {
                slot_width: s.slot_width,
            },
            SizingMode::Pattern => Sizing::Pattern(s.pattern),
        };
        Ok(Self {
            joint: JointParameters {
                kerf: s.kerf,
                slop: s.slop,
                max_advance: s.max_advance,
                sizing,
                exhaustion: s.exhaustion,
            },
            board: BoardConfig {
                wood_length: s.wood_length,
                slot_count: s.slot_count,
            },
            motion: MotionConfig {
                calibration: StepsPerThou::new(s.cal_steps, s.cal_thou)?,
                jog_step: s.jog_step,
                step_pulse_us: s.step_pulse_us,
            },
        })
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Encodes `config` into `buf`, returning the number of bytes written.
pub fn encode(config: &JigConfig, buf: &mut [u8]) -> Result<usize, PersistError> {
    serde_json_core::to_slice(&StoredConfig::from(config), buf)
        .map_err(|_| PersistError::BufferFull)
}

/// Decodes a blob written by [`encode`].
///
/// Values are not validated here; [`crate::config::load_configuration`]
/// does that for stores.
pub fn decode(bytes: &[u8]) -> Result<JigConfig, PersistError> {
    let (stored, _): (StoredConfig, usize) =
        serde_json_core::from_slice(bytes).map_err(|_| PersistError::Malformed)?;
    JigConfig::try_from(stored)
}

// ============================================================================
// Memory Store
// ============================================================================

/// [`ConfigStore`] over a fixed in-memory page.
///
/// Stands in for a flash page or EEPROM: saving overwrites the whole page,
/// and an erased page loads as "nothing saved".
///
/// # Example
///
/// ```rust
/// use rs_boxjig::config::{load_configuration, save_configuration, JigConfig};
/// use rs_boxjig::persist::MemoryBlobStore;
///
/// let mut store = MemoryBlobStore::<1024>::new();
/// save_configuration(&mut store, &JigConfig::default()).unwrap();
/// assert_eq!(load_configuration(&mut store).unwrap(), JigConfig::default());
/// ```
#[derive(Debug)]
pub struct MemoryBlobStore<const N: usize> {
    page: [u8; N],
    len: usize,
}

impl<const N: usize> MemoryBlobStore<N> {
    /// Creates an erased store.
    pub const fn new() -> Self {
        Self {
            page: [0; N],
            len: 0,
        }
    }

    /// Raw bytes of the saved blob.
    pub fn as_bytes(&self) -> &[u8] {
        &self.page[..self.len]
    }

    /// Erases the page.
    pub fn erase(&mut self) {
        self.page = [0; N];
        self.len = 0;
    }
}

impl<const N: usize> Default for MemoryBlobStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ConfigStore for MemoryBlobStore<N> {
    type Error = PersistError;

    fn load(&mut self) -> Result<Option<JigConfig>, PersistError> {
        if self.len == 0 {
            return Ok(None);
        }
        decode(self.as_bytes()).map(Some)
    }

    fn save(&mut self, config: &JigConfig) -> Result<(), PersistError> {
        let mut scratch = [0u8; N];
        let len = encode(config, &mut scratch)?;
        self.page = scratch;
        self.len = len;
        log::debug!("configuration saved ({} bytes)", len);
        Ok(())
    }
}
