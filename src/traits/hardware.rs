//! Hardware abstraction traits for carriage motion and operator controls.
//!
//! The cutting core never touches GPIO. It asks a [`CarriageDriver`] to move
//! the carriage a distance and reads debounced, edge-triggered button events
//! from a [`ControlInput`].
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`CarriageDriver`] | Blocking "move N thou in direction D" |
//! | [`ControlInput`] | One event per physical button press |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. [`crate::hal::StepperCarriage`] implements
//! [`CarriageDriver`] on top of any `embedded-hal` step/dir driver.
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::traits::{CarriageDriver, Direction, MoveOutcome};
//! use rs_boxjig::hal::MockCarriage;
//!
//! let mut carriage = MockCarriage::new();
//! let outcome = carriage.move_carriage(120, Direction::Toward).unwrap();
//! assert_eq!(outcome, MoveOutcome::Completed);
//! assert_eq!(carriage.position(), 120);
//! ```

/// Direction of carriage travel.
///
/// # Default
///
/// Defaults to [`Toward`](Self::Toward), the indexing direction of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Indexing direction: carries the stock edge past the blade, valley
    /// after valley.
    #[default]
    Toward,
    /// Back toward the start of the stock.
    Away,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_boxjig::Direction;
    ///
    /// assert_eq!(Direction::Toward.as_str(), "toward");
    /// assert_eq!(Direction::Away.as_str(), "away");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Toward => "toward",
            Direction::Away => "away",
        }
    }

    /// The opposite direction.
    #[inline]
    pub const fn reversed(&self) -> Self {
        match self {
            Direction::Toward => Direction::Away,
            Direction::Away => Direction::Toward,
        }
    }
}

/// Result of a carriage move that did not fail outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The full requested distance was travelled.
    Completed,
    /// An external stop (limit switch) ended the move early.
    AbortedEarly {
        /// Distance actually covered before the stop (thou).
        travelled: u32,
    },
}

impl MoveOutcome {
    /// True if the whole distance was travelled.
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, MoveOutcome::Completed)
    }

    /// Distance covered, given the distance that was requested.
    ///
    /// Early-abort reports are capped at `requested`.
    #[inline]
    pub fn travelled(&self, requested: u32) -> u32 {
        match self {
            MoveOutcome::Completed => requested,
            MoveOutcome::AbortedEarly { travelled } => (*travelled).min(requested),
        }
    }
}

/// Carriage motion trait - abstracts the stepper-driven lead screw.
///
/// Moves are blocking: the call returns only once every step has been issued
/// or an external stop condition cut the move short.
///
/// # Implementation Notes
///
/// - An early stop is not an error; report it as [`MoveOutcome::AbortedEarly`]
///   with the distance that was actually covered
/// - Reserve `Err` for driver faults (pin errors, bus failures)
/// - A zero-distance move should return [`MoveOutcome::Completed`] without
///   touching the hardware
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_boxjig::traits::{CarriageDriver, Direction, MoveOutcome};
///
/// struct MyCarriage { /* hardware handles */ }
///
/// impl CarriageDriver for MyCarriage {
///     type Error = ();
///
///     fn move_carriage(&mut self, distance_thou: u32, dir: Direction) -> Result<MoveOutcome, ()> {
///         // Set DIR pin, pulse STEP pin, watch the limit switch...
///         Ok(MoveOutcome::Completed)
///     }
/// }
/// ```
pub trait CarriageDriver {
    /// Error type for motion operations.
    type Error;

    /// Move the carriage `distance_thou` thousandths of an inch.
    fn move_carriage(
        &mut self,
        distance_thou: u32,
        direction: Direction,
    ) -> Result<MoveOutcome, Self::Error>;
}

/// Edge-triggered control events from one poll.
///
/// Each flag is set at most once per physical press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlEvents {
    /// Advance button: next cut pass or relocation.
    pub advance: bool,
    /// Back button: abort the run.
    pub back: bool,
    /// Step-up button.
    pub step_up: bool,
    /// Step-down button.
    pub step_down: bool,
}

impl ControlEvents {
    /// No buttons pressed.
    pub const NONE: Self = Self {
        advance: false,
        back: false,
        step_up: false,
        step_down: false,
    };

    /// Only the advance button.
    pub const fn advance() -> Self {
        Self {
            advance: true,
            ..Self::NONE
        }
    }

    /// Only the back button.
    pub const fn back() -> Self {
        Self {
            back: true,
            ..Self::NONE
        }
    }

    /// Only the step-up button.
    pub const fn step_up() -> Self {
        Self {
            step_up: true,
            ..Self::NONE
        }
    }

    /// Only the step-down button.
    pub const fn step_down() -> Self {
        Self {
            step_down: true,
            ..Self::NONE
        }
    }

    /// True if nothing was pressed.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        !(self.advance || self.back || self.step_up || self.step_down)
    }
}

/// Operator button input trait.
///
/// Implementations debounce the raw inputs and report presses, not levels:
/// holding a button down yields one event, not one per poll.
pub trait ControlInput {
    /// Returns the presses seen since the last poll.
    fn poll_controls(&mut self) -> ControlEvents;
}
