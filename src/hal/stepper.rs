//! Step/direction stepper carriage on top of `embedded-hal` 1.0.
//!
//! Works with any stepper driver that takes a STEP pulse train and a DIR
//! level (A4988, DRV8825, TB6600 and similar):
//! - DIR is set once per move
//! - Each step is a high pulse followed by an equal low period
//! - The limit switch is sampled before every step toward the blade;
//!   moves away from it ignore the switch so a tripped carriage can back off
//!
//! Moves are blocking. A tripped limit switch ends the move and the steps
//! already issued are converted back to whole thou, so the cut-pass
//! controller only deducts travel that really happened.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, ErrorKind, InputPin, OutputPin};
use thiserror::Error;

use crate::config::MotionConfig;
use crate::traits::{CarriageDriver, Direction, MoveOutcome};
use crate::units::StepsPerThou;

/// Pin failures while driving the stepper.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperError {
    /// STEP or DIR output could not be driven.
    #[error("step/dir output failed: {0:?}")]
    Output(ErrorKind),
    /// Limit switch could not be read.
    #[error("limit switch read failed: {0:?}")]
    Limit(ErrorKind),
}

/// Lead-screw carriage driven by a step/dir stepper driver.
///
/// # Example
///
/// ```rust
/// use rs_boxjig::config::MotionConfig;
/// use rs_boxjig::hal::{MockLimitSwitch, MockPin, NoopDelay, StepperCarriage};
/// use rs_boxjig::traits::{CarriageDriver, Direction, MoveOutcome};
///
/// let mut carriage = StepperCarriage::new(
///     MockPin::new(),
///     MockPin::new(),
///     MockLimitSwitch::new(),
///     NoopDelay::new(),
///     &MotionConfig::default(),
/// );
///
/// // 4 steps per thou on the default lead screw
/// assert_eq!(carriage.move_carriage(25, Direction::Toward), Ok(MoveOutcome::Completed));
/// let (step, _dir, _limit, _delay) = carriage.release();
/// assert_eq!(step.rising_edges, 100);
/// ```
pub struct StepperCarriage<STEP, DIR, LIM, D> {
    step: STEP,
    dir: DIR,
    limit: LIM,
    delay: D,
    calibration: StepsPerThou,
    /// High and low time of each step pulse.
    pulse_us: u32,
    /// DIR level that moves the carriage toward the blade.
    toward_level_high: bool,
    limit_active_low: bool,
}

impl<STEP, DIR, LIM, D> StepperCarriage<STEP, DIR, LIM, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIM: InputPin,
    D: DelayNs,
{
    /// Creates a carriage using the calibration and pulse timing from
    /// `motion`.
    ///
    /// Defaults: DIR high moves toward the blade, the limit switch reads
    /// high when tripped.
    pub fn new(step: STEP, dir: DIR, limit: LIM, delay: D, motion: &MotionConfig) -> Self {
        Self {
            step,
            dir,
            limit,
            delay,
            calibration: motion.calibration,
            pulse_us: motion.step_pulse_us.max(1),
            toward_level_high: true,
            limit_active_low: false,
        }
    }

    /// Swap the DIR polarity (motor wired the other way round)
    pub fn with_inverted_direction(mut self) -> Self {
        self.toward_level_high = !self.toward_level_high;
        self
    }

    /// Treat a low limit input as tripped (switch to ground with pull-up)
    pub fn with_limit_active_low(mut self) -> Self {
        self.limit_active_low = true;
        self
    }

    /// Current calibration
    pub fn calibration(&self) -> StepsPerThou {
        self.calibration
    }

    /// Gives the pins and delay back.
    pub fn release(self) -> (STEP, DIR, LIM, D) {
        (self.step, self.dir, self.limit, self.delay)
    }

    fn limit_tripped(&mut self) -> Result<bool, StepperError> {
        let level = if self.limit_active_low {
            self.limit.is_low()
        } else {
            self.limit.is_high()
        };
        level.map_err(|e| StepperError::Limit(e.kind()))
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), StepperError> {
        let high = (direction == Direction::Toward) == self.toward_level_high;
        let result = if high {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
        result.map_err(|e| StepperError::Output(e.kind()))
    }

    fn pulse(&mut self) -> Result<(), StepperError> {
        self.step
            .set_high()
            .map_err(|e| StepperError::Output(e.kind()))?;
        self.delay.delay_us(self.pulse_us);
        self.step
            .set_low()
            .map_err(|e| StepperError::Output(e.kind()))?;
        self.delay.delay_us(self.pulse_us);
        Ok(())
    }
}

impl<STEP, DIR, LIM, D> CarriageDriver for StepperCarriage<STEP, DIR, LIM, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIM: InputPin,
    D: DelayNs,
{
    type Error = StepperError;

    fn move_carriage(
        &mut self,
        distance_thou: u32,
        direction: Direction,
    ) -> Result<MoveOutcome, StepperError> {
        if distance_thou == 0 {
            return Ok(MoveOutcome::Completed);
        }

        let steps = self.calibration.steps_for(distance_thou);
        self.set_direction(direction)?;
        // DIR setup time before the first edge
        self.delay.delay_us(self.pulse_us);

        let guarded = direction == Direction::Toward;
        for issued in 0..steps {
            if guarded && self.limit_tripped()? {
                let travelled = self.calibration.thou_for_steps(issued);
                log::warn!(
                    "limit switch tripped after {} of {} steps ({} thou)",
                    issued,
                    steps,
                    travelled
                );
                return Ok(MoveOutcome::AbortedEarly { travelled });
            }
            self.pulse()?;
        }

        log::trace!("{} steps {}", steps, direction.as_str());
        Ok(MoveOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockLimitSwitch, MockPin, NoopDelay};

    type TestCarriage = StepperCarriage<MockPin, MockPin, MockLimitSwitch, NoopDelay>;

    fn carriage(limit: MockLimitSwitch, motion: MotionConfig) -> TestCarriage {
        StepperCarriage::new(MockPin::new(), MockPin::new(), limit, NoopDelay::new(), &motion)
    }

    // =========================================================================
    // Full Moves
    // =========================================================================

    #[test]
    fn issues_calibrated_step_count() {
        let mut c = carriage(MockLimitSwitch::new(), MotionConfig::default());
        assert_eq!(c.move_carriage(120, Direction::Toward), Ok(MoveOutcome::Completed));
        let (step, dir, limit, _) = c.release();
        assert_eq!(step.rising_edges, 480);
        assert!(!step.high);
        assert!(dir.high);
        assert_eq!(limit.samples, 480);
    }

    #[test]
    fn fractional_calibration_rounds_up() {
        let motion = MotionConfig::default().with_calibration(StepsPerThou::LEADSCREW_V2);
        let mut c = carriage(MockLimitSwitch::new(), motion);
        c.move_carriage(1, Direction::Toward).unwrap();
        let (step, ..) = c.release();
        assert_eq!(step.rising_edges, 5);
    }

    #[test]
    fn zero_distance_touches_nothing() {
        let mut c = carriage(MockLimitSwitch::new(), MotionConfig::default());
        assert_eq!(c.move_carriage(0, Direction::Away), Ok(MoveOutcome::Completed));
        let (step, dir, limit, delay) = c.release();
        assert_eq!(step.rising_edges, 0);
        assert_eq!(dir.rising_edges, 0);
        assert_eq!(limit.samples, 0);
        assert_eq!(delay.total_ns, 0);
    }

    #[test]
    fn pulse_timing_from_config() {
        let motion = MotionConfig::default().with_step_pulse_us(250);
        let mut c = carriage(MockLimitSwitch::new(), motion);
        c.move_carriage(1, Direction::Toward).unwrap();
        let (.., delay) = c.release();
        // DIR setup plus high and low time for each of 4 steps
        assert_eq!(delay.total_ns, 250_000 * 9);
    }

    // =========================================================================
    // Direction
    // =========================================================================

    #[test]
    fn away_drives_dir_low() {
        let mut c = carriage(MockLimitSwitch::new(), MotionConfig::default());
        c.move_carriage(1, Direction::Away).unwrap();
        let (_, dir, ..) = c.release();
        assert!(!dir.high);
    }

    #[test]
    fn inverted_direction() {
        let mut c = carriage(MockLimitSwitch::new(), MotionConfig::default()).with_inverted_direction();
        c.move_carriage(1, Direction::Toward).unwrap();
        let (_, dir, ..) = c.release();
        assert!(!dir.high);
    }

    // =========================================================================
    // Limit Switch
    // =========================================================================

    #[test]
    fn limit_stop_reports_whole_thou_travelled() {
        let mut c = carriage(MockLimitSwitch::tripping_after(21), MotionConfig::default());
        assert_eq!(
            c.move_carriage(120, Direction::Toward),
            Ok(MoveOutcome::AbortedEarly { travelled: 5 })
        );
        let (step, ..) = c.release();
        assert_eq!(step.rising_edges, 21);
    }

    #[test]
    fn limit_already_tripped_moves_nothing() {
        let mut c = carriage(MockLimitSwitch::tripping_after(0), MotionConfig::default());
        assert_eq!(
            c.move_carriage(50, Direction::Toward),
            Ok(MoveOutcome::AbortedEarly { travelled: 0 })
        );
    }

    #[test]
    fn away_move_ignores_tripped_limit() {
        let mut c = carriage(MockLimitSwitch::tripping_after(0), MotionConfig::default());
        assert_eq!(c.move_carriage(10, Direction::Away), Ok(MoveOutcome::Completed));
        let (step, dir, limit, _) = c.release();
        assert_eq!(step.rising_edges, 40);
        assert!(!dir.high);
        assert_eq!(limit.samples, 0);
    }

    #[test]
    fn active_low_limit() {
        // Never "high", so an active-low switch reads tripped immediately
        let mut c = carriage(MockLimitSwitch::new(), MotionConfig::default()).with_limit_active_low();
        assert_eq!(
            c.move_carriage(10, Direction::Toward),
            Ok(MoveOutcome::AbortedEarly { travelled: 0 })
        );
    }
}
