//! # rs-boxjig
//!
//! Motion sequencing for a stepper-driven finger joint ("box joint") jig.
//! The operator pushes the sled through the saw blade and presses a button;
//! the jig moves the stock by the next precomputed offset, valley after
//! valley, until both mating boards are cut.
//!
//! ## Features
//!
//! - **Joint geometry**: kerf, slop and slot widths become cut and move distances
//! - **Uniform or patterned joints**: equal slots, or a programmed width sequence
//! - **Bounded cut passes**: wide valleys are nibbled out `max_advance` at a time
//! - **Mating boards**: cut-first (positive) and move-first (negative) pieces
//! - **Limit-stop aware**: partial moves never count as complete
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `units` - Thou to stepper steps
//! - `geometry` - Distance quadruple for a valley/finger pair
//! - `pattern` - Programmed slot widths and pair resolution
//! - `session` - Remaining-distance bookkeeping for one run
//! - `controller` - Cut-pass state machine that drives the carriage
//! - `jig` - Operator loop tying buttons, controller and display together
//! - `config` / `persist` - Settings and their storage
//! - `traits` - Hardware, storage and display abstractions
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_boxjig::{
//!     AdvanceOutcome, CutController, CutState,
//!     config::JointParameters,
//!     hal::MockCarriage,
//!     pattern::Piece,
//! };
//!
//! let params = JointParameters::default()
//!     .with_kerf(125)
//!     .with_slop(2)
//!     .with_max_advance(100)
//!     .with_slot_width(250);
//!
//! let mut controller = CutController::new(MockCarriage::new(), params);
//! controller.start(Piece::Positive).unwrap();
//!
//! // 252 thou of valley: 100 + 100 + 52
//! for _ in 0..3 {
//!     controller.advance().unwrap();
//! }
//! assert_eq!(controller.state(), CutState::ReadyToAdvance);
//! assert_eq!(
//!     controller.advance().unwrap(),
//!     AdvanceOutcome::Relocated { distance: 373 }
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Jig settings, validation and load/save through a store.
pub mod config;
/// Cut-pass controller that turns advance presses into carriage moves.
pub mod controller;
/// Joint geometry: cut and move distances for a valley/finger pair.
pub mod geometry;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Operator loop over controls, controller and display.
pub mod jig;
/// Programmed slot width patterns.
pub mod pattern;
/// Per-run remaining-distance bookkeeping.
pub mod session;
/// Core traits for hardware, storage and display abstraction.
pub mod traits;
/// Stepper calibration and unit conversion.
pub mod units;

/// JSON blob persistence of the jig configuration.
#[cfg(feature = "serde-json-core")]
pub mod persist;

// Re-exports for convenience
pub use config::{BoardConfig, ConfigError, JigConfig, JointParameters, MotionConfig, Sizing};
pub use controller::{AdvanceOutcome, CutController, CutError, JigStatus};
pub use geometry::{compute_quadruple, DistanceQuadruple, GeometryError};
pub use jig::{Jig, PollEvent};
pub use pattern::{ExhaustionPolicy, Piece, SlotPair, SlotPattern, MAX_SLOTS};
pub use session::{CutSession, CutState};
pub use traits::{
    CarriageDriver, ConfigStore, ControlEvents, ControlInput, Direction, JigDisplay, MoveOutcome,
};
pub use units::StepsPerThou;
