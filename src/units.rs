//! Conversion between carriage travel and stepper steps.
//!
//! All jig distances are integer thousandths of an inch ("thou"). The
//! stepper driver only understands step pulses, so every move passes through
//! a [`StepsPerThou`] calibration on its way to the hardware.
//!
//! The calibration is an exact ratio rather than a float so that conversion
//! is reproducible and rounds the same way on every target.
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::units::StepsPerThou;
//!
//! let direct = StepsPerThou::LEADSCREW_V1;
//! assert_eq!(direct.steps_for(500), 2000);
//!
//! // 4.19 steps per thou, rounded up so the carriage never under-travels
//! let geared = StepsPerThou::LEADSCREW_V2;
//! assert_eq!(geared.steps_for(1), 5);
//! assert_eq!(geared.steps_for(100), 419);
//! ```

use thiserror::Error;

/// Invalid calibration ratio.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// Either side of the ratio was zero.
    #[error("calibration ratio {steps}/{thou} must be non-zero on both sides")]
    ZeroRatio {
        /// Steps side of the ratio.
        steps: u32,
        /// Thou side of the ratio.
        thou: u32,
    },
}

/// Steps issued per thousandth of an inch of carriage travel.
///
/// Stored as `steps / thou` so fractional calibrations (for example 4.19
/// steps per thou as `419 / 100`) convert without float rounding drift.
///
/// # Default
///
/// Defaults to [`LEADSCREW_V1`](Self::LEADSCREW_V1), 4 steps per thou.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepsPerThou {
    steps: u32,
    thou: u32,
}

impl StepsPerThou {
    /// First hardware revision: 4 steps per thou.
    pub const LEADSCREW_V1: Self = Self { steps: 4, thou: 1 };

    /// Second hardware revision: 4.19 steps per thou.
    pub const LEADSCREW_V2: Self = Self {
        steps: 419,
        thou: 100,
    };

    /// Creates a calibration of `steps` pulses per `thou` thousandths.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::ZeroRatio`] if either side is zero.
    pub const fn new(steps: u32, thou: u32) -> Result<Self, CalibrationError> {
        if steps == 0 || thou == 0 {
            return Err(CalibrationError::ZeroRatio { steps, thou });
        }
        Ok(Self { steps, thou })
    }

    /// Steps side of the ratio.
    #[inline]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Thou side of the ratio.
    #[inline]
    pub const fn thou(&self) -> u32 {
        self.thou
    }

    /// Number of step pulses needed to travel `distance_thou`.
    ///
    /// Rounds up, so a non-zero distance always yields at least one step and
    /// the carriage never stops short. Saturates at `u32::MAX`.
    pub const fn steps_for(&self, distance_thou: u32) -> u32 {
        let scaled = distance_thou as u64 * self.steps as u64;
        let steps = scaled.div_ceil(self.thou as u64);
        if steps > u32::MAX as u64 {
            u32::MAX
        } else {
            steps as u32
        }
    }

    /// Whole thousandths of travel covered by `steps` pulses.
    ///
    /// Rounds down: a partially covered thou is not reported as travelled.
    pub const fn thou_for_steps(&self, steps: u32) -> u32 {
        (steps as u64 * self.thou as u64 / self.steps as u64) as u32
    }
}

impl Default for StepsPerThou {
    fn default() -> Self {
        Self::LEADSCREW_V1
    }
}
