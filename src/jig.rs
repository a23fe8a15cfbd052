//! Operator loop: buttons in, carriage moves and status out.
//!
//! [`Jig`] is the body of the cooperative main loop. Each
//! [`poll`](Jig::poll) reads one batch of edge-triggered button events,
//! applies at most one action to the [`CutController`], and renders the
//! resulting status. Motion blocks, so a back press only takes effect on
//! the poll after a move returns.
//!
//! | Button | Idle / complete | Running |
//! |--------|-----------------|---------|
//! | advance | start a run for the selected piece | next pass or relocation |
//! | back | switch to the mating board (complete: back to idle) | abort the run |
//! | step up | jog toward | ignored |
//! | step down | jog away | ignored |
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::config::JigConfig;
//! use rs_boxjig::hal::{MockCarriage, MockControls, MockDisplay};
//! use rs_boxjig::jig::{Jig, PollEvent};
//! use rs_boxjig::traits::ControlEvents;
//! use rs_boxjig::CutState;
//!
//! let mut jig = Jig::new(
//!     MockCarriage::new(),
//!     MockControls::new(),
//!     MockDisplay::new(),
//!     &JigConfig::default(),
//! );
//! jig.init().unwrap();
//!
//! jig.controls_mut().queue(ControlEvents::advance());
//! assert!(matches!(jig.poll().unwrap(), PollEvent::Started(_)));
//! assert_eq!(jig.state(), CutState::CuttingValley);
//! ```

use core::fmt::Write as _;

use crate::config::JigConfig;
use crate::controller::{AdvanceOutcome, CutController, CutError, JigStatus};
use crate::pattern::Piece;
use crate::session::CutState;
use crate::traits::{CarriageDriver, ControlInput, Direction, JigDisplay, MoveOutcome};

/// What one [`Jig::poll`] did.
#[derive(Debug)]
pub enum PollEvent<E> {
    /// No button pressed, or the press was ignored.
    Nothing,
    /// A run was started.
    Started(Piece),
    /// An advance press was handled.
    Advanced(AdvanceOutcome),
    /// The run was aborted.
    Aborted,
    /// Back pressed while idle selected the other board.
    PieceSelected(Piece),
    /// The carriage was jogged by hand.
    Jogged {
        /// Jog direction.
        direction: Direction,
        /// Jog result.
        outcome: MoveOutcome,
    },
    /// The action failed; the operator has been shown a message.
    Failed(CutError<E>),
}

/// Jig runner tying controls, controller and display together.
pub struct Jig<D: CarriageDriver, C: ControlInput, S: JigDisplay> {
    controller: CutController<D>,
    controls: C,
    display: S,
    piece: Piece,
    jog_step: u32,
}

impl<D, C, S> Jig<D, C, S>
where
    D: CarriageDriver,
    D::Error: core::fmt::Debug,
    C: ControlInput,
    S: JigDisplay,
{
    /// Creates an idle jig set up from `config`.
    ///
    /// The configuration is validated when a run starts, not here.
    pub fn new(driver: D, controls: C, display: S, config: &JigConfig) -> Self {
        Self {
            controller: CutController::new(driver, config.joint.clone()),
            controls,
            display,
            piece: Piece::default(),
            jog_step: config.motion.jog_step,
        }
    }

    /// Initializes the display and shows the idle status.
    pub fn init(&mut self) -> Result<(), S::Error> {
        self.display.init()?;
        self.display.clear()?;
        self.display.render(&self.status())
    }

    /// Handles one batch of button events.
    ///
    /// Back wins over advance, and advance over the step buttons, when
    /// several arrive in the same poll.
    ///
    /// # Errors
    ///
    /// Only display errors are returned; controller failures are shown to
    /// the operator and reported as [`PollEvent::Failed`].
    pub fn poll(&mut self) -> Result<PollEvent<D::Error>, S::Error> {
        let events = self.controls.poll_controls();
        if events.is_empty() {
            return Ok(PollEvent::Nothing);
        }

        let result = if events.back {
            self.back()
        } else if events.advance {
            self.advance()
        } else if events.step_up {
            self.jog(Direction::Toward)
        } else {
            self.jog(Direction::Away)
        };

        match result {
            Ok(event) => {
                self.display.render(&self.status())?;
                if let PollEvent::PieceSelected(piece) = &event {
                    let label = match piece {
                        Piece::Positive => "cut first",
                        Piece::Negative => "move first",
                    };
                    self.display.show_message(piece.as_str(), Some(label))?;
                }
                Ok(event)
            }
            Err(e) => {
                self.report(&e)?;
                Ok(PollEvent::Failed(e))
            }
        }
    }

    fn back(&mut self) -> Result<PollEvent<D::Error>, CutError<D::Error>> {
        if self.controller.state() == CutState::Idle {
            self.piece = self.piece.mate();
            log::info!("{} board selected", self.piece.as_str());
            return Ok(PollEvent::PieceSelected(self.piece));
        }
        self.controller.abort();
        Ok(PollEvent::Aborted)
    }

    fn advance(&mut self) -> Result<PollEvent<D::Error>, CutError<D::Error>> {
        if self.controller.is_running() {
            return self.controller.advance().map(PollEvent::Advanced);
        }
        self.controller.start(self.piece)?;
        Ok(PollEvent::Started(self.piece))
    }

    fn jog(&mut self, direction: Direction) -> Result<PollEvent<D::Error>, CutError<D::Error>> {
        if self.controller.is_running() {
            log::debug!("jog ignored during a run");
            return Ok(PollEvent::Nothing);
        }
        let outcome = self.controller.jog(direction, self.jog_step)?;
        Ok(PollEvent::Jogged { direction, outcome })
    }

    fn report(&mut self, error: &CutError<D::Error>) -> Result<(), S::Error> {
        log::warn!("{}", error);
        match error {
            CutError::MoveAborted {
                requested,
                travelled,
            } => {
                let mut detail: heapless::String<32> = heapless::String::new();
                // Two u32 values and the unit always fit
                let _ = write!(detail, "{}/{} thou", travelled, requested);
                self.display.show_message("Limit stop", Some(&detail))
            }
            CutError::Driver(_) => self.display.show_message("Motor fault", None),
            CutError::Config(_) | CutError::Geometry(_) => {
                self.display.show_message("Check settings", None)
            }
            CutError::NotRunning | CutError::SessionActive => {
                self.display.show_message("Not ready", None)
            }
        }
    }

    /// Selects the board for the next run.
    ///
    /// Ignored while a run is in progress.
    pub fn select_piece(&mut self, piece: Piece) -> bool {
        if self.controller.is_running() {
            return false;
        }
        self.piece = piece;
        true
    }

    /// Applies a freshly loaded configuration between runs.
    pub fn apply_config(&mut self, config: &JigConfig) -> Result<(), CutError<D::Error>> {
        self.controller.set_params(config.joint.clone())?;
        self.jog_step = config.motion.jog_step;
        Ok(())
    }

    /// Controller status, showing the selected board while idle.
    pub fn status(&self) -> JigStatus {
        let mut status = self.controller.status();
        if status.piece.is_none() {
            status.piece = Some(self.piece);
        }
        status
    }

    /// Board selected for the next run
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// Current controller state
    pub fn state(&self) -> CutState {
        self.controller.state()
    }

    /// Get the controller
    pub fn controller(&self) -> &CutController<D> {
        &self.controller
    }

    /// Get the controller mutably
    pub fn controller_mut(&mut self) -> &mut CutController<D> {
        &mut self.controller
    }

    /// Get the control input mutably
    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    /// Get the display
    pub fn display(&self) -> &S {
        &self.display
    }
}
