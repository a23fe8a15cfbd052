//! Cut-pass controller that drives the carriage through a joint.
//!
//! This module provides [`CutController`], the central component that owns
//! the carriage driver and the active [`CutSession`], turning each advance
//! press into exactly one bounded motion.
//!
//! # Overview
//!
//! The controller:
//! - Starts a session for the selected piece with validated parameters
//! - Issues one cut pass or one relocation per [`advance`](CutController::advance)
//! - Deducts only the travel a move actually completed
//! - Discards the session on [`abort`](CutController::abort)
//! - Provides [`JigStatus`] snapshots for the display
//!
//! # Example
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
//!     .with_kerf(123)
//!     .with_slop(2)
//!     .with_max_advance(120)
//!     .with_slot_width(500);
//!
//! let mut controller = CutController::new(MockCarriage::new(), params);
//! controller.start(Piece::Positive).unwrap();
//!
//! // Five passes clear the first valley: 120 + 120 + 120 + 120 + 22
//! for _ in 0..5 {
//!     controller.advance().unwrap();
//! }
//! assert_eq!(controller.state(), CutState::ReadyToAdvance);
//!
//! // The next press relocates to the following valley
//! let outcome = controller.advance().unwrap();
//! assert_eq!(outcome, AdvanceOutcome::Relocated { distance: 621 });
//! ```
//!
//! # Motion Aborts
//!
//! A move stopped early by the limit switch is an error for the caller,
//! but the session stays consistent:
//!
//! ```rust
//! use rs_boxjig::{CutController, CutError, CutState, hal::MockCarriage, pattern::Piece};
//! use rs_boxjig::config::JointParameters;
//!
//! let params = JointParameters::default().with_max_advance(120).with_slot_width(500);
//! let mut controller = CutController::new(MockCarriage::new(), params);
//! controller.start(Piece::Positive).unwrap();
//!
//! controller.driver_mut().abort_after(0, 40);
//! let err = controller.advance().unwrap_err();
//! assert!(matches!(err, CutError::MoveAborted { requested: 120, travelled: 40 }));
//! assert_eq!(controller.state(), CutState::CuttingValley);
//! assert_eq!(controller.status().remaining_cut, 502 - 40);
//! ```

use thiserror::Error;

use crate::config::{ConfigError, JointParameters};
use crate::geometry::GeometryError;
use crate::pattern::{Piece, SlotPair};
use crate::session::{CutSession, CutState};
use crate::traits::{CarriageDriver, Direction, MoveOutcome};

/// Errors surfaced by [`CutController`].
#[derive(Error, Debug)]
pub enum CutError<E> {
    /// Advance pressed with no session running.
    #[error("no cutting session is running")]
    NotRunning,
    /// Operation needs the controller idle.
    #[error("a cutting session is already running")]
    SessionActive,
    /// Limit stop ended the move early; only `travelled` was deducted.
    #[error("move stopped after {travelled} of {requested} thou")]
    MoveAborted {
        /// Distance commanded (thou).
        requested: u32,
        /// Distance actually covered (thou).
        travelled: u32,
    },
    /// Carriage driver fault.
    #[error("carriage driver failed: {0:?}")]
    Driver(E),
    /// Parameters rejected at session start.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Distance derivation failed mid-session.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// What a single advance press did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// One bounded cut pass.
    CutPass {
        /// Pass length (thou).
        distance: u32,
        /// Cut travel still left in this valley (thou).
        remaining: u32,
    },
    /// Relocation to the next valley.
    Relocated {
        /// Move length (thou).
        distance: u32,
    },
    /// Nothing left to cut; no motion was issued.
    Complete,
}

/// Cut-pass controller.
///
/// Owns the carriage driver and at most one [`CutSession`]. The joint
/// parameters are copied into each session at start, so changing them with
/// [`set_params`](Self::set_params) never affects a run in progress.
///
/// # Type Parameter
///
/// - `D`: The carriage driver implementation ([`CarriageDriver`] trait)
pub struct CutController<D: CarriageDriver> {
    driver: D,
    params: JointParameters,
    session: Option<CutSession>,
}

impl<D: CarriageDriver> CutController<D> {
    /// Create a new, idle controller
    pub fn new(driver: D, params: JointParameters) -> Self {
        Self {
            driver,
            params,
            session: None,
        }
    }

    /// Starts a run for `piece`.
    ///
    /// A finished run is replaced; a run still in progress must be aborted
    /// first.
    pub fn start(&mut self, piece: Piece) -> Result<CutState, CutError<D::Error>> {
        if self.is_running() {
            return Err(CutError::SessionActive);
        }
        let session = CutSession::start(&self.params, piece).inspect_err(|e| {
            log::warn!("cannot start {} piece: {}", piece.as_str(), e);
        })?;
        log::info!(
            "session started: {} piece, cut {} move {}",
            piece.as_str(),
            session.remaining_cut(),
            session.remaining_move()
        );
        let state = session.state();
        self.session = Some(session);
        Ok(state)
    }

    /// Handles one advance press.
    ///
    /// Issues a single cut pass of at most `max_advance`, or the pending
    /// relocation, and blocks until the carriage stops.
    ///
    /// # Errors
    ///
    /// - [`CutError::NotRunning`] when idle
    /// - [`CutError::MoveAborted`] when the move stopped early; the session
    ///   keeps the untravelled remainder for the next press
    /// - [`CutError::Driver`] on a driver fault; nothing is deducted
    pub fn advance(&mut self) -> Result<AdvanceOutcome, CutError<D::Error>> {
        let session = self.session.as_mut().ok_or(CutError::NotRunning)?;

        if let Some(pass) = session.next_pass() {
            let outcome = self
                .driver
                .move_carriage(pass, Direction::Toward)
                .map_err(CutError::Driver)?;
            let travelled = outcome.travelled(pass);
            session.record_cut(travelled)?;
            if !outcome.is_complete() {
                log::warn!("cut pass stopped after {} of {} thou", travelled, pass);
                return Err(CutError::MoveAborted {
                    requested: pass,
                    travelled,
                });
            }
            log::debug!("cut pass {} thou, {} left", pass, session.remaining_cut());
            return Ok(AdvanceOutcome::CutPass {
                distance: pass,
                remaining: session.remaining_cut(),
            });
        }

        if let Some(distance) = session.pending_move() {
            let outcome = self
                .driver
                .move_carriage(distance, Direction::Toward)
                .map_err(CutError::Driver)?;
            let travelled = outcome.travelled(distance);
            session.record_move(travelled)?;
            if !outcome.is_complete() {
                log::warn!("relocation stopped after {} of {} thou", travelled, distance);
                return Err(CutError::MoveAborted {
                    requested: distance,
                    travelled,
                });
            }
            log::debug!("relocated {} thou", distance);
            if session.state() == CutState::Complete {
                log::info!("session complete after {} valleys", session.valleys_cut());
            }
            return Ok(AdvanceOutcome::Relocated { distance });
        }

        Ok(AdvanceOutcome::Complete)
    }

    /// Discards the session and returns to idle.
    ///
    /// Partial progress is not kept anywhere.
    pub fn abort(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!(
                "session aborted: {} piece after {} valleys",
                session.piece().as_str(),
                session.valleys_cut()
            );
        }
    }

    /// Moves the carriage by hand while no run is in progress.
    pub fn jog(
        &mut self,
        direction: Direction,
        distance: u32,
    ) -> Result<MoveOutcome, CutError<D::Error>> {
        if self.is_running() {
            return Err(CutError::SessionActive);
        }
        log::debug!("jog {} thou {}", distance, direction.as_str());
        self.driver
            .move_carriage(distance, direction)
            .map_err(CutError::Driver)
    }

    /// Replaces the joint parameters used by the next run.
    ///
    /// Rejected while a run is in progress; configuration only changes at
    /// session boundaries.
    pub fn set_params(&mut self, params: JointParameters) -> Result<(), CutError<D::Error>> {
        if self.is_running() {
            return Err(CutError::SessionActive);
        }
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Joint parameters for the next run
    pub fn params(&self) -> &JointParameters {
        &self.params
    }

    /// Current controller state
    pub fn state(&self) -> CutState {
        self.session
            .as_ref()
            .map_or(CutState::Idle, CutSession::state)
    }

    /// True while a run is in progress (started and not complete)
    pub fn is_running(&self) -> bool {
        !matches!(self.state(), CutState::Idle | CutState::Complete)
    }

    /// Active session, if any
    pub fn session(&self) -> Option<&CutSession> {
        self.session.as_ref()
    }

    /// Get the carriage driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get the carriage driver mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consumes the controller, returning the carriage driver
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Get the current status for the display
    pub fn status(&self) -> JigStatus {
        match &self.session {
            None => JigStatus::default(),
            Some(session) => JigStatus {
                state: session.state(),
                piece: Some(session.piece()),
                remaining_cut: session.remaining_cut(),
                remaining_move: session.remaining_move(),
                valleys_cut: session.valleys_cut(),
                pair: Some(session.pair()),
                first_pass: session.is_first_pass(),
            },
        }
    }
}

/// Status snapshot for the display.
///
/// # Example
///
/// ```rust
/// use rs_boxjig::{CutController, CutState, hal::MockCarriage};
/// use rs_boxjig::config::JointParameters;
///
/// let controller = CutController::new(MockCarriage::new(), JointParameters::default());
///
/// let status = controller.status();
/// assert_eq!(status.state, CutState::Idle);
/// assert!(status.piece.is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JigStatus {
    /// Controller state.
    pub state: CutState,
    /// Board being cut, if a session exists. [`Jig`](crate::jig::Jig)
    /// fills in the selected board while idle.
    pub piece: Option<Piece>,
    /// Cut travel left in the current valley (thou).
    pub remaining_cut: u32,
    /// Relocation pending after the current valley (thou).
    pub remaining_move: u32,
    /// Valleys finished this session.
    pub valleys_cut: u32,
    /// Active valley/finger pair.
    pub pair: Option<SlotPair>,
    /// True while the first pair is active.
    pub first_pass: bool,
}
