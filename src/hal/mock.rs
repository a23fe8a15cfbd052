//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every trait in [`crate::traits`]
//! plus the `embedded-hal` pins the stepper carriage is built from, so the
//! whole jig can be exercised on a desktop.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockCarriage`] | [`CarriageDriver`] | Records moves, injects limit stops |
//! | [`MockControls`] | [`ControlInput`] | Queued button events |
//! | [`MockStore`] | [`ConfigStore`] | In-memory configuration |
//! | [`MockDisplay`] | [`JigDisplay`] | Tracks render calls |
//! | [`MockPin`] | `OutputPin` | Counts step pulses, holds DIR level |
//! | [`MockLimitSwitch`] | `InputPin` | Trips after N samples |
//! | [`NoopDelay`] | `DelayNs` | Totals requested delay |
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::{CutController, hal::MockCarriage, pattern::Piece};
//! use rs_boxjig::config::JointParameters;
//!
//! let mut controller = CutController::new(MockCarriage::new(), JointParameters::default());
//! controller.start(Piece::Positive).unwrap();
//! controller.advance().unwrap();
//!
//! // Verify via the recorded moves
//! assert_eq!(controller.driver().moves.len(), 1);
//! assert_eq!(controller.driver().position(), 100);
//! ```
//!
//! [`CarriageDriver`]: crate::traits::CarriageDriver
//! [`ControlInput`]: crate::traits::ControlInput
//! [`ConfigStore`]: crate::traits::ConfigStore
//! [`JigDisplay`]: crate::traits::JigDisplay

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::config::JigConfig;
use crate::traits::{
    CarriageDriver, ConfigStore, ControlEvents, ControlInput, Direction, JigDisplay, MoveOutcome,
};
use crate::JigStatus;

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock carriage for testing.
///
/// Records every requested move and tracks a signed position (thou,
/// `Toward` positive). Use [`abort_after`](Self::abort_after) to simulate a
/// limit stop and `fail_next` to simulate a driver fault.
///
/// # Example
///
/// ```rust
/// use rs_boxjig::hal::MockCarriage;
/// use rs_boxjig::traits::{CarriageDriver, Direction, MoveOutcome};
///
/// let mut carriage = MockCarriage::new();
/// carriage.abort_after(1, 25);
///
/// carriage.move_carriage(100, Direction::Toward).unwrap();
/// let outcome = carriage.move_carriage(100, Direction::Toward).unwrap();
///
/// assert_eq!(outcome, MoveOutcome::AbortedEarly { travelled: 25 });
/// assert_eq!(carriage.position(), 125);
/// assert_eq!(carriage.moves.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockCarriage {
    /// Requested moves (distance, direction), in order.
    pub moves: Vec<(u32, Direction)>,
    /// Move index to stop early, and the travel it gets before stopping.
    pub abort_at: Option<(usize, u32)>,
    /// Fail the next move with a driver error.
    pub fail_next: bool,
    position: i64,
}

impl MockCarriage {
    /// Creates a new mock carriage at position 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the `index`th move from now (0 = the next one) after
    /// `travelled` thou.
    pub fn abort_after(&mut self, index: usize, travelled: u32) {
        self.abort_at = Some((index + self.moves.len(), travelled));
    }

    /// Net position in thou.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Sum of all requested distances, ignoring direction.
    pub fn total_requested(&self) -> u64 {
        self.moves.iter().map(|(d, _)| u64::from(*d)).sum()
    }
}

impl CarriageDriver for MockCarriage {
    type Error = ();

    fn move_carriage(&mut self, distance_thou: u32, direction: Direction) -> Result<MoveOutcome, ()> {
        if core::mem::take(&mut self.fail_next) {
            return Err(());
        }

        let index = self.moves.len();
        self.moves.push((distance_thou, direction));

        let (travelled, outcome) = match self.abort_at {
            Some((at, travelled)) if at == index => {
                self.abort_at = None;
                let travelled = travelled.min(distance_thou);
                (travelled, MoveOutcome::AbortedEarly { travelled })
            }
            _ => (distance_thou, MoveOutcome::Completed),
        };

        let delta = i64::from(travelled);
        self.position += match direction {
            Direction::Toward => delta,
            Direction::Away => -delta,
        };
        Ok(outcome)
    }
}

/// Mock button input for testing.
///
/// Queue events to simulate presses; each poll returns the oldest queued
/// event, then [`ControlEvents::NONE`] once the queue is empty.
///
/// # Example
///
/// ```rust
/// use rs_boxjig::hal::MockControls;
/// use rs_boxjig::traits::{ControlEvents, ControlInput};
///
/// let mut controls = MockControls::new();
/// controls.queue(ControlEvents::advance());
/// controls.queue(ControlEvents::back());
///
/// assert!(controls.poll_controls().advance);
/// assert!(controls.poll_controls().back);
/// assert!(controls.poll_controls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockControls {
    /// Events not yet polled, oldest first.
    pub pending: Vec<ControlEvents>,
    /// Number of polls so far.
    pub poll_count: usize,
}

impl MockControls {
    /// Creates a mock with no pending presses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one poll's worth of events
    pub fn queue(&mut self, events: ControlEvents) {
        self.pending.push(events);
    }

    /// Queue `count` advance presses
    pub fn queue_advances(&mut self, count: usize) {
        self.pending
            .extend(core::iter::repeat(ControlEvents::advance()).take(count));
    }
}

impl ControlInput for MockControls {
    fn poll_controls(&mut self) -> ControlEvents {
        self.poll_count += 1;
        if self.pending.is_empty() {
            ControlEvents::NONE
        } else {
            self.pending.remove(0)
        }
    }
}

// ============================================================================
// Storage Mocks
// ============================================================================

/// In-memory configuration store.
///
/// # Example
///
/// ```rust
/// use rs_boxjig::hal::MockStore;
/// use rs_boxjig::config::JigConfig;
/// use rs_boxjig::traits::ConfigStore;
///
/// let mut store = MockStore::new();
/// assert_eq!(store.load().unwrap(), None);
///
/// store.save(&JigConfig::default()).unwrap();
/// assert_eq!(store.save_count, 1);
/// assert_eq!(store.load().unwrap(), Some(JigConfig::default()));
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    /// Currently stored configuration.
    pub stored: Option<JigConfig>,
    /// Number of successful saves.
    pub save_count: usize,
    /// Fail the next load or save.
    pub fail_next: bool,
}

impl MockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `config`.
    pub fn with_config(config: JigConfig) -> Self {
        Self {
            stored: Some(config),
            ..Self::default()
        }
    }
}

impl ConfigStore for MockStore {
    type Error = ();

    fn load(&mut self) -> Result<Option<JigConfig>, ()> {
        if core::mem::take(&mut self.fail_next) {
            return Err(());
        }
        Ok(self.stored.clone())
    }

    fn save(&mut self, config: &JigConfig) -> Result<(), ()> {
        if core::mem::take(&mut self.fail_next) {
            return Err(());
        }
        self.stored = Some(config.clone());
        self.save_count += 1;
        Ok(())
    }
}

// ============================================================================
// Display Mocks
// ============================================================================

/// Mock display for testing UI rendering.
///
/// Tracks render calls and stores the last rendered status for verification.
///
/// # Example
///
/// ```
/// use rs_boxjig::hal::MockDisplay;
/// use rs_boxjig::traits::JigDisplay;
///
/// let mut display = MockDisplay::new();
/// display.init().unwrap();
/// assert_eq!(display.render_count, 0);
/// ```
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// The last status that was rendered.
    pub last_status: Option<JigStatus>,
    /// Number of times render() was called.
    pub render_count: usize,
    /// Last message shown via show_message().
    pub last_message: Option<(String, Option<String>)>,
    /// Whether init() was called.
    pub initialized: bool,
}

impl MockDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }
}

impl JigDisplay for MockDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.last_status = None;
        self.last_message = None;
        Ok(())
    }

    fn render(&mut self, status: &JigStatus) -> Result<(), ()> {
        self.last_status = Some(*status);
        self.render_count += 1;
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
        self.last_message = Some((line1.into(), line2.map(Into::into)));
        Ok(())
    }
}

// ============================================================================
// embedded-hal Mocks
// ============================================================================

/// Output pin that remembers its level and counts rising edges.
#[derive(Debug, Default)]
pub struct MockPin {
    /// Current level.
    pub high: bool,
    /// Low-to-high transitions seen.
    pub rising_edges: u32,
}

impl MockPin {
    /// Creates a pin driven low.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
        Ok(())
    }
}

/// Limit switch input that reads high once tripped.
///
/// `trip_after: Some(n)` trips on the `n+1`th sample and stays tripped.
#[derive(Debug, Default)]
pub struct MockLimitSwitch {
    /// Samples to allow before tripping; `None` never trips.
    pub trip_after: Option<u32>,
    /// Samples taken so far.
    pub samples: u32,
}

impl MockLimitSwitch {
    /// A switch that never trips.
    pub fn new() -> Self {
        Self::default()
    }

    /// A switch that trips after `samples` clear reads.
    pub fn tripping_after(samples: u32) -> Self {
        Self {
            trip_after: Some(samples),
            samples: 0,
        }
    }
}

impl ErrorType for MockLimitSwitch {
    type Error = Infallible;
}

impl InputPin for MockLimitSwitch {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let tripped = self.trip_after.is_some_and(|n| self.samples >= n);
        self.samples += 1;
        Ok(tripped)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Delay that returns immediately and totals the requested time.
#[derive(Debug, Default)]
pub struct NoopDelay {
    /// Total requested delay in nanoseconds.
    pub total_ns: u64,
}

impl NoopDelay {
    /// Creates a zeroed delay.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CutState;

    // =========================================================================
    // MockCarriage Tests
    // =========================================================================

    #[test]
    fn mock_carriage_default() {
        let carriage = MockCarriage::new();
        assert_eq!(carriage.position(), 0);
        assert!(carriage.moves.is_empty());
        assert!(carriage.abort_at.is_none());
    }

    #[test]
    fn mock_carriage_tracks_direction() {
        let mut carriage = MockCarriage::new();
        carriage.move_carriage(300, Direction::Toward).unwrap();
        carriage.move_carriage(100, Direction::Away).unwrap();
        assert_eq!(carriage.position(), 200);
        assert_eq!(carriage.total_requested(), 400);
    }

    #[test]
    fn mock_carriage_abort_is_relative_and_single_shot() {
        let mut carriage = MockCarriage::new();
        carriage.move_carriage(10, Direction::Toward).unwrap();

        carriage.abort_after(0, 4);
        assert_eq!(
            carriage.move_carriage(10, Direction::Toward).unwrap(),
            MoveOutcome::AbortedEarly { travelled: 4 }
        );
        assert_eq!(
            carriage.move_carriage(10, Direction::Toward).unwrap(),
            MoveOutcome::Completed
        );
        assert_eq!(carriage.position(), 24);
    }

    #[test]
    fn mock_carriage_abort_capped_at_request() {
        let mut carriage = MockCarriage::new();
        carriage.abort_after(0, 50);
        assert_eq!(
            carriage.move_carriage(20, Direction::Toward).unwrap(),
            MoveOutcome::AbortedEarly { travelled: 20 }
        );
    }

    #[test]
    fn mock_carriage_fail_next() {
        let mut carriage = MockCarriage::new();
        carriage.fail_next = true;
        assert!(carriage.move_carriage(10, Direction::Toward).is_err());
        assert!(carriage.moves.is_empty());
        assert!(carriage.move_carriage(10, Direction::Toward).is_ok());
    }

    // =========================================================================
    // MockControls Tests
    // =========================================================================

    #[test]
    fn mock_controls_fifo() {
        let mut controls = MockControls::new();
        controls.queue(ControlEvents::step_up());
        controls.queue_advances(2);

        assert!(controls.poll_controls().step_up);
        assert!(controls.poll_controls().advance);
        assert!(controls.poll_controls().advance);
        assert!(controls.poll_controls().is_empty());
        assert_eq!(controls.poll_count, 4);
    }

    // =========================================================================
    // MockStore Tests
    // =========================================================================

    #[test]
    fn mock_store_failure_is_single_shot() {
        let mut store = MockStore::with_config(JigConfig::default());
        store.fail_next = true;
        assert!(store.load().is_err());
        assert!(store.load().unwrap().is_some());
    }

    // =========================================================================
    // MockDisplay Tests
    // =========================================================================

    #[test]
    fn mock_display_default() {
        let display = MockDisplay::new();
        assert!(display.last_status.is_none());
        assert_eq!(display.render_count, 0);
        assert!(display.last_message.is_none());
        assert!(!display.initialized);
    }

    #[test]
    fn mock_display_render() {
        let mut display = MockDisplay::new();
        display.init().unwrap();

        let status = JigStatus {
            state: CutState::CuttingValley,
            remaining_cut: 382,
            ..JigStatus::default()
        };
        display.render(&status).unwrap();

        assert_eq!(display.render_count, 1);
        assert_eq!(display.last_status.unwrap().remaining_cut, 382);
    }

    #[test]
    fn mock_display_message_and_clear() {
        let mut display = MockDisplay::new();
        display.show_message("Limit hit", Some("40/120")).unwrap();
        assert_eq!(
            display.last_message,
            Some(("Limit hit".into(), Some("40/120".into())))
        );
        display.clear().unwrap();
        assert!(display.last_message.is_none());
    }

    // =========================================================================
    // embedded-hal Mock Tests
    // =========================================================================

    #[test]
    fn mock_pin_counts_rising_edges() {
        let mut pin = MockPin::new();
        pin.set_high().unwrap();
        pin.set_high().unwrap();
        pin.set_low().unwrap();
        pin.set_high().unwrap();
        assert_eq!(pin.rising_edges, 2);
        assert!(pin.high);
    }

    #[test]
    fn mock_limit_switch_trips_and_latches() {
        let mut limit = MockLimitSwitch::tripping_after(2);
        assert!(!limit.is_high().unwrap());
        assert!(!limit.is_high().unwrap());
        assert!(limit.is_high().unwrap());
        assert!(!limit.is_low().unwrap());

        let mut never = MockLimitSwitch::new();
        assert!(never.is_low().unwrap());
    }

    #[test]
    fn noop_delay_totals() {
        let mut delay = NoopDelay::new();
        delay.delay_us(400);
        delay.delay_us(400);
        assert_eq!(delay.total_ns, 800_000);
    }
}
