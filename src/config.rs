//! Jig configuration: joint parameters, board sizing and motion calibration.
//!
//! Everything here is plain data with builder-style setters. The values are
//! loaded once before a run, handed to the controller, and only written back
//! on an explicit save, never mid-cut.
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::config::{JigConfig, JointParameters, MotionConfig};
//! use rs_boxjig::units::StepsPerThou;
//!
//! // Use defaults
//! let config = JigConfig::default();
//! assert!(config.validate().is_ok());
//!
//! // Or customize
//! let config = JigConfig::default()
//!     .with_joint(
//!         JointParameters::default()
//!             .with_kerf(123)
//!             .with_slop(2)
//!             .with_slot_width(500),
//!     )
//!     .with_motion(MotionConfig::default().with_calibration(StepsPerThou::LEADSCREW_V2));
//! assert!(config.validate().is_ok());
//! ```

use thiserror::Error;

use crate::geometry::{self, compute_quadruple, GeometryError};
use crate::pattern::{ExhaustionPolicy, PatternError, SlotPattern};
use crate::traits::ConfigStore;
use crate::units::StepsPerThou;

// ============================================================================
// Errors
// ============================================================================

/// Parameter combinations the jig refuses to run.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Derived distances are not physically valid.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Programmed pattern is unusable.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// A cut pass must advance the carriage.
    #[error("max advance per pass must be greater than zero")]
    ZeroMaxAdvance,
    /// Uniform joints need a slot width.
    #[error("slot width must be greater than zero")]
    ZeroSlotWidth,
    /// Board fitting needs at least one slot.
    #[error("slot count must be greater than zero")]
    ZeroSlotCount,
    /// Board too short to divide into the requested slots.
    #[error("{wood_length} thou of stock cannot hold {slot_count} slots")]
    BoardTooShort {
        /// Stock length (thou).
        wood_length: u32,
        /// Requested slots.
        slot_count: u16,
    },
}

/// Failure loading or saving through a [`ConfigStore`].
#[derive(Error, Debug)]
pub enum SettingsError<E> {
    /// The store itself failed.
    #[error("configuration store failed: {0:?}")]
    Store(E),
    /// Stored or supplied values failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

// ============================================================================
// Joint Parameters
// ============================================================================

/// How slot widths are chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sizing {
    /// Every valley and finger has the same width.
    Uniform {
        /// Slot width (thou).
        slot_width: u32,
    },
    /// Widths come from a programmed pattern.
    Pattern(SlotPattern),
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::Uniform { slot_width: 500 }
    }
}

/// Inputs for one cutting session.
///
/// All distances are thousandths of an inch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JointParameters {
    /// Width removed by one blade pass.
    pub kerf: u32,
    /// Clearance added to each valley and taken from each finger.
    pub slop: u32,
    /// Largest carriage advance allowed for a single cut pass.
    ///
    /// May be smaller than `kerf` to force overlapping passes.
    pub max_advance: u32,
    /// Uniform width or programmed pattern.
    pub sizing: Sizing,
    /// Behaviour of the negative board at the end of a pattern.
    pub exhaustion: ExhaustionPolicy,
}

impl Default for JointParameters {
    fn default() -> Self {
        Self {
            kerf: 125,
            slop: 2,
            max_advance: 100,
            sizing: Sizing::default(),
            exhaustion: ExhaustionPolicy::default(),
        }
    }
}

impl JointParameters {
    /// Set the blade kerf
    pub fn with_kerf(mut self, kerf: u32) -> Self {
        self.kerf = kerf;
        self
    }

    /// Set the fit clearance
    pub fn with_slop(mut self, slop: u32) -> Self {
        self.slop = slop;
        self
    }

    /// Set the per-pass advance limit
    pub fn with_max_advance(mut self, max_advance: u32) -> Self {
        self.max_advance = max_advance;
        self
    }

    /// Use uniform slots of the given width
    pub fn with_slot_width(mut self, slot_width: u32) -> Self {
        self.sizing = Sizing::Uniform { slot_width };
        self
    }

    /// Use a programmed slot pattern
    pub fn with_pattern(mut self, pattern: SlotPattern) -> Self {
        self.sizing = Sizing::Pattern(pattern);
        self
    }

    /// Set the negative-board exhaustion policy
    pub fn with_exhaustion(mut self, policy: ExhaustionPolicy) -> Self {
        self.exhaustion = policy;
        self
    }

    /// Switch to uniform slots sized to divide `board` evenly.
    pub fn fit_to_board(self, board: &BoardConfig) -> Result<Self, ConfigError> {
        Ok(self.with_slot_width(board.slot_width()?))
    }

    /// True when widths come from a pattern.
    pub fn is_patterned(&self) -> bool {
        matches!(self.sizing, Sizing::Pattern(_))
    }

    /// Checks that every pair this configuration can produce has valid distances.
    ///
    /// Pattern widths are checked both as valleys and as fingers, since the
    /// mating board uses each width in the opposite role.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kerf == 0 {
            return Err(GeometryError::ZeroKerf.into());
        }
        if self.max_advance == 0 {
            return Err(ConfigError::ZeroMaxAdvance);
        }
        match &self.sizing {
            Sizing::Uniform { slot_width } => {
                if *slot_width == 0 {
                    return Err(ConfigError::ZeroSlotWidth);
                }
                compute_quadruple(*slot_width, *slot_width, self.kerf, self.slop)?;
            }
            Sizing::Pattern(pattern) => {
                pattern.validate()?;
                for width in pattern.iter() {
                    geometry::cut_distances(width, self.kerf, self.slop)?;
                    geometry::move_distance(width, self.kerf, self.slop)?;
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Board Config
// ============================================================================

/// Stock dimensions used to derive a uniform slot width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    /// Length of the joint edge (thou).
    pub wood_length: u32,
    /// Valleys plus fingers across that edge.
    pub slot_count: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            wood_length: 5500,
            slot_count: 11,
        }
    }
}

impl BoardConfig {
    /// Set the stock length
    pub fn with_wood_length(mut self, wood_length: u32) -> Self {
        self.wood_length = wood_length;
        self
    }

    /// Set the number of slots
    pub fn with_slot_count(mut self, slot_count: u16) -> Self {
        self.slot_count = slot_count;
        self
    }

    /// Uniform width that divides the stock into `slot_count` slots.
    ///
    /// Rounds down; any remainder is left on the trailing finger.
    pub fn slot_width(&self) -> Result<u32, ConfigError> {
        if self.slot_count == 0 {
            return Err(ConfigError::ZeroSlotCount);
        }
        match self.wood_length / u32::from(self.slot_count) {
            0 => Err(ConfigError::BoardTooShort {
                wood_length: self.wood_length,
                slot_count: self.slot_count,
            }),
            width => Ok(width),
        }
    }
}

// ============================================================================
// Motion Config
// ============================================================================

/// Carriage drive settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionConfig {
    /// Stepper calibration for the fitted lead screw.
    pub calibration: StepsPerThou,
    /// Manual jog distance per step-up/step-down press (thou).
    pub jog_step: u32,
    /// Half-period of a step pulse in microseconds.
    pub step_pulse_us: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            calibration: StepsPerThou::default(),
            jog_step: 10,
            step_pulse_us: 400,
        }
    }
}

impl MotionConfig {
    /// Set the stepper calibration
    pub fn with_calibration(mut self, calibration: StepsPerThou) -> Self {
        self.calibration = calibration;
        self
    }

    /// Set the jog distance
    pub fn with_jog_step(mut self, jog_step: u32) -> Self {
        self.jog_step = jog_step;
        self
    }

    /// Set the step pulse half-period
    pub fn with_step_pulse_us(mut self, us: u32) -> Self {
        self.step_pulse_us = us;
        self
    }
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete persisted jig configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JigConfig {
    /// Joint cutting parameters
    pub joint: JointParameters,
    /// Stock dimensions for board fitting
    pub board: BoardConfig,
    /// Carriage drive settings
    pub motion: MotionConfig,
}

impl JigConfig {
    /// Set joint parameters
    pub fn with_joint(mut self, joint: JointParameters) -> Self {
        self.joint = joint;
        self
    }

    /// Set board dimensions
    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    /// Set motion settings
    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    /// Validates the joint parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.joint.validate()
    }
}

// ============================================================================
// Load / Save
// ============================================================================

/// Loads the stored configuration, or defaults if nothing was saved yet.
///
/// # Errors
///
/// Fails if the store fails or the stored values no longer validate.
pub fn load_configuration<S: ConfigStore>(
    store: &mut S,
) -> Result<JigConfig, SettingsError<S::Error>> {
    match store.load().map_err(SettingsError::Store)? {
        Some(config) => {
            config.validate().inspect_err(|e| {
                log::warn!("stored configuration rejected: {}", e);
            })?;
            Ok(config)
        }
        None => {
            log::info!("no stored configuration, using defaults");
            Ok(JigConfig::default())
        }
    }
}

/// Validates and then persists `config`.
///
/// Invalid configurations are rejected before anything is written.
pub fn save_configuration<S: ConfigStore>(
    store: &mut S,
    config: &JigConfig,
) -> Result<(), SettingsError<S::Error>> {
    config.validate().inspect_err(|e| {
        log::warn!("refusing to save configuration: {}", e);
    })?;
    store.save(config).map_err(SettingsError::Store)
}

// ============================================================================
// Tests
// ============================================================================
