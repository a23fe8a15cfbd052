//! Cut session bookkeeping: remaining distances and pair sequencing.
//!
//! A [`CutSession`] is the pure half of the cut-pass controller. It knows
//! how far is left to cut in the current valley, how far the next relocation
//! is, and which valley/finger pair comes next. It never moves hardware;
//! [`CutController`](crate::CutController) issues the motion and reports the
//! travel back with [`record_cut`](CutSession::record_cut) and
//! [`record_move`](CutSession::record_move).
//!
//! # State flow
//!
//! ```text
//!              start(Positive)                 start(Negative)
//!                    |                               |
//!                    v                               v
//!   +------> CuttingValley --remaining cut 0--> ReadyToAdvance
//!   |                                                |
//!   +------------- next pair loaded <--- move done --+
//!                                                    |
//!                                   pattern exhausted v
//!                                                 Complete
//! ```
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::config::JointParameters;
//! use rs_boxjig::pattern::Piece;
//! use rs_boxjig::session::CutSession;
//! use rs_boxjig::CutState;
//!
//! let params = JointParameters::default()
//!     .with_kerf(123)
//!     .with_slop(2)
//!     .with_max_advance(120)
//!     .with_slot_width(500);
//!
//! let mut session = CutSession::start(&params, Piece::Positive).unwrap();
//! assert_eq!(session.remaining_cut(), 502);
//!
//! while let Some(pass) = session.next_pass() {
//!     session.record_cut(pass).unwrap();
//! }
//! assert_eq!(session.state(), CutState::ReadyToAdvance);
//! assert_eq!(session.remaining_move(), 621);
//! ```

use crate::config::{ConfigError, JointParameters, Sizing};
use crate::geometry::{self, compute_quadruple, GeometryError};
use crate::pattern::{ExhaustionPolicy, PatternCursor, PatternError, Piece, SlotPair, SlotPattern};

/// Controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CutState {
    /// No session; the operator is in the menu.
    #[default]
    Idle,
    /// Cut passes remain in the current valley.
    CuttingValley,
    /// Valley finished; the relocation move is pending.
    ReadyToAdvance,
    /// The pattern ran out; nothing more to cut.
    Complete,
}

impl CutState {
    /// Returns the state as a short display string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CutState::Idle => "idle",
            CutState::CuttingValley => "cutting",
            CutState::ReadyToAdvance => "advance",
            CutState::Complete => "complete",
        }
    }
}

/// Where the next valley/finger pair comes from.
#[derive(Clone, Debug)]
enum PairSource {
    Uniform {
        width: u32,
        leading_finger: bool,
    },
    Pattern {
        pattern: SlotPattern,
        cursor: PatternCursor,
        policy: ExhaustionPolicy,
    },
}

impl PairSource {
    fn new(params: &JointParameters, piece: Piece) -> Self {
        match &params.sizing {
            Sizing::Uniform { slot_width } => PairSource::Uniform {
                width: *slot_width,
                leading_finger: piece == Piece::Negative,
            },
            Sizing::Pattern(pattern) => PairSource::Pattern {
                pattern: pattern.clone(),
                cursor: PatternCursor::start(piece),
                policy: params.exhaustion,
            },
        }
    }

    fn next(&mut self) -> Option<SlotPair> {
        match self {
            PairSource::Uniform {
                width,
                leading_finger,
            } => {
                if core::mem::take(leading_finger) {
                    Some(SlotPair {
                        valley: None,
                        finger: Some(*width),
                    })
                } else {
                    Some(SlotPair::uniform(*width))
                }
            }
            PairSource::Pattern {
                pattern,
                cursor,
                policy,
            } => {
                let (pair, next) = pattern.next_pair(*cursor, *policy)?;
                *cursor = next;
                Some(pair)
            }
        }
    }

    fn cursor(&self) -> Option<PatternCursor> {
        match self {
            PairSource::Uniform { .. } => None,
            PairSource::Pattern { cursor, .. } => Some(*cursor),
        }
    }
}

/// Mutable state of one cutting run.
///
/// Created by [`start`](Self::start), advanced by the controller, and
/// discarded on abort. Holds its own copy of the joint parameters so the
/// stored configuration can change without affecting a run in progress.
#[derive(Clone, Debug)]
pub struct CutSession {
    piece: Piece,
    kerf: u32,
    slop: u32,
    max_advance: u32,
    source: PairSource,
    pair: SlotPair,
    is_first_pass: bool,
    remaining_cut: u32,
    remaining_move: u32,
    valleys_cut: u32,
    state: CutState,
}

impl CutSession {
    /// Starts a run for `piece`.
    ///
    /// Cut-first boards begin in [`CutState::CuttingValley`] with the
    /// initial cut distance. Move-first boards begin in
    /// [`CutState::ReadyToAdvance`] with no cut and the initial move.
    ///
    /// # Errors
    ///
    /// Rejects parameters that fail [`JointParameters::validate`].
    pub fn start(params: &JointParameters, piece: Piece) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut source = PairSource::new(params, piece);
        let pair = source.next().ok_or(PatternError::Empty)?;

        let mut session = Self {
            piece,
            kerf: params.kerf,
            slop: params.slop,
            max_advance: params.max_advance,
            source,
            pair,
            is_first_pass: true,
            remaining_cut: 0,
            remaining_move: 0,
            valleys_cut: 0,
            state: CutState::CuttingValley,
        };
        session.load_pair(pair)?;
        Ok(session)
    }

    /// Length of the next bounded cut pass, if cutting.
    ///
    /// Never exceeds the configured max advance.
    pub fn next_pass(&self) -> Option<u32> {
        match self.state {
            CutState::CuttingValley => Some(self.remaining_cut.min(self.max_advance)),
            _ => None,
        }
    }

    /// Pending relocation distance, if a valley is finished.
    pub fn pending_move(&self) -> Option<u32> {
        match self.state {
            CutState::ReadyToAdvance => Some(self.remaining_move),
            _ => None,
        }
    }

    /// Accounts for `travelled` thou of cut travel.
    ///
    /// Only actual travel is deducted, so a pass cut short by a limit stop
    /// leaves the remainder for the next press. Ignored outside
    /// [`CutState::CuttingValley`].
    pub fn record_cut(&mut self, travelled: u32) -> Result<(), GeometryError> {
        if self.state != CutState::CuttingValley {
            return Ok(());
        }
        self.remaining_cut = self.remaining_cut.saturating_sub(travelled);
        if self.remaining_cut == 0 {
            self.finish_valley();
        }
        Ok(())
    }

    /// Accounts for `travelled` thou of relocation.
    ///
    /// When the relocation is complete the next pair is loaded with the
    /// subsequent distances, or the session completes if the pattern is
    /// exhausted.
    pub fn record_move(&mut self, travelled: u32) -> Result<(), GeometryError> {
        if self.state != CutState::ReadyToAdvance {
            return Ok(());
        }
        self.remaining_move = self.remaining_move.saturating_sub(travelled);
        if self.remaining_move > 0 {
            return Ok(());
        }

        self.is_first_pass = false;
        match self.source.next() {
            Some(pair) => self.load_pair(pair),
            None => {
                self.state = CutState::Complete;
                Ok(())
            }
        }
    }

    fn load_pair(&mut self, pair: SlotPair) -> Result<(), GeometryError> {
        let (cut, relocation) = self.distances_for(pair)?;
        self.pair = pair;
        self.remaining_cut = cut;
        self.remaining_move = relocation;

        if pair.valley.is_some() && cut > 0 {
            self.state = CutState::CuttingValley;
        } else if pair.valley.is_some() {
            // Kerf-wide valley, already cleared by the seating pass.
            self.finish_valley();
        } else {
            self.state = CutState::ReadyToAdvance;
        }
        log::debug!(
            "pair {:?}/{:?}: cut {} move {}",
            pair.valley,
            pair.finger,
            cut,
            relocation
        );
        Ok(())
    }

    fn finish_valley(&mut self) {
        self.valleys_cut += 1;
        self.state = if self.pair.finger.is_some() {
            CutState::ReadyToAdvance
        } else {
            CutState::Complete
        };
    }

    fn distances_for(&self, pair: SlotPair) -> Result<(u32, u32), GeometryError> {
        let (kerf, slop) = (self.kerf, self.slop);
        match (pair.valley, pair.finger) {
            (Some(valley), Some(finger)) => {
                Ok(compute_quadruple(valley, finger, kerf, slop)?.select(self.is_first_pass))
            }
            (None, Some(finger)) => Ok((0, geometry::move_distance(finger, kerf, slop)?)),
            (Some(valley), None) => {
                let (initial, subsequent) = geometry::cut_distances(valley, kerf, slop)?;
                Ok((if self.is_first_pass { initial } else { subsequent }, 0))
            }
            (None, None) => Ok((0, 0)),
        }
    }

    /// Current state (never [`CutState::Idle`]).
    #[inline]
    pub fn state(&self) -> CutState {
        self.state
    }

    /// Board being cut.
    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// Active valley/finger pair.
    #[inline]
    pub fn pair(&self) -> SlotPair {
        self.pair
    }

    /// True while the first pair of the run is active.
    #[inline]
    pub fn is_first_pass(&self) -> bool {
        self.is_first_pass
    }

    /// Cut travel left in the current valley (thou).
    #[inline]
    pub fn remaining_cut(&self) -> u32 {
        self.remaining_cut
    }

    /// Relocation left after the current valley (thou).
    #[inline]
    pub fn remaining_move(&self) -> u32 {
        self.remaining_move
    }

    /// Valleys finished so far.
    #[inline]
    pub fn valleys_cut(&self) -> u32 {
        self.valleys_cut
    }

    /// Pattern read position, for patterned runs.
    #[inline]
    pub fn pattern_cursor(&self) -> Option<PatternCursor> {
        self.source.cursor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform() -> JointParameters {
        JointParameters::default()
            .with_kerf(123)
            .with_slop(2)
            .with_max_advance(120)
            .with_slot_width(500)
    }

    fn patterned(policy: ExhaustionPolicy) -> JointParameters {
        JointParameters::default()
            .with_kerf(100)
            .with_slop(0)
            .with_max_advance(1000)
            .with_pattern(SlotPattern::from_widths(&[200, 300, 450, 300, 200]).unwrap())
            .with_exhaustion(policy)
    }

    fn finish_valley(session: &mut CutSession) -> u32 {
        let mut passes = 0;
        while let Some(pass) = session.next_pass() {
            session.record_cut(pass).unwrap();
            passes += 1;
        }
        passes
    }

    fn relocate(session: &mut CutSession) {
        let distance = session.pending_move().unwrap();
        session.record_move(distance).unwrap();
    }

    // =========================================================================
    // Start
    // =========================================================================

    #[test]
    fn positive_start_seeds_initial_cut() {
        let session = CutSession::start(&uniform(), Piece::Positive).unwrap();
        assert_eq!(session.state(), CutState::CuttingValley);
        assert_eq!(session.remaining_cut(), 502);
        assert_eq!(session.remaining_move(), 621);
        assert!(session.is_first_pass());
        assert_eq!(session.pattern_cursor(), None);
    }

    #[test]
    fn negative_start_skips_cut() {
        let session = CutSession::start(&uniform(), Piece::Negative).unwrap();
        assert_eq!(session.state(), CutState::ReadyToAdvance);
        assert_eq!(session.remaining_cut(), 0);
        assert_eq!(session.pending_move(), Some(621));
        assert_eq!(session.next_pass(), None);
    }

    #[test]
    fn invalid_parameters_rejected() {
        let params = uniform().with_kerf(0);
        assert!(CutSession::start(&params, Piece::Positive).is_err());
    }

    // =========================================================================
    // Passes
    // =========================================================================

    #[test]
    fn passes_bounded_by_max_advance() {
        let mut session = CutSession::start(&uniform(), Piece::Positive).unwrap();
        let mut passes = Vec::new();
        while let Some(pass) = session.next_pass() {
            passes.push(pass);
            session.record_cut(pass).unwrap();
        }
        assert_eq!(passes, [120, 120, 120, 120, 22]);
        assert_eq!(session.state(), CutState::ReadyToAdvance);
        assert_eq!(session.valleys_cut(), 1);
    }

    #[test]
    fn subsequent_valley_is_one_kerf_shorter() {
        let mut session = CutSession::start(&uniform(), Piece::Positive).unwrap();
        finish_valley(&mut session);
        relocate(&mut session);

        assert!(!session.is_first_pass());
        assert_eq!(session.state(), CutState::CuttingValley);
        assert_eq!(session.remaining_cut(), 379);
        assert_eq!(session.remaining_move(), 621);
    }

    #[test]
    fn partial_travel_only_deducts_actual() {
        let mut session = CutSession::start(&uniform(), Piece::Positive).unwrap();
        session.record_cut(50).unwrap();
        assert_eq!(session.remaining_cut(), 452);
        assert_eq!(session.next_pass(), Some(120));
    }

    #[test]
    fn partial_relocation_keeps_pair() {
        let mut session = CutSession::start(&uniform(), Piece::Negative).unwrap();
        session.record_move(600).unwrap();
        assert_eq!(session.state(), CutState::ReadyToAdvance);
        assert_eq!(session.pending_move(), Some(21));
        session.record_move(21).unwrap();
        assert_eq!(session.state(), CutState::CuttingValley);
    }

    #[test]
    fn records_ignored_in_wrong_state() {
        let mut session = CutSession::start(&uniform(), Piece::Negative).unwrap();
        session.record_cut(100).unwrap();
        assert_eq!(session.pending_move(), Some(621));

        let mut session = CutSession::start(&uniform(), Piece::Positive).unwrap();
        session.record_move(100).unwrap();
        assert_eq!(session.remaining_move(), 621);
    }

    #[test]
    fn negative_first_valley_uses_subsequent_cut() {
        let mut session = CutSession::start(&uniform(), Piece::Negative).unwrap();
        relocate(&mut session);
        assert_eq!(session.remaining_cut(), 379);
    }

    #[test]
    fn kerf_wide_valley_goes_straight_to_advance() {
        let params = JointParameters::default()
            .with_kerf(125)
            .with_slop(0)
            .with_slot_width(125);
        let mut session = CutSession::start(&params, Piece::Positive).unwrap();
        // First valley still needs its full width.
        assert_eq!(finish_valley(&mut session), 2);
        relocate(&mut session);
        assert_eq!(session.state(), CutState::ReadyToAdvance);
        assert_eq!(session.valleys_cut(), 2);
    }

    // =========================================================================
    // Patterns
    // =========================================================================

    #[test]
    fn pattern_pairs_drive_distances() {
        let mut session =
            CutSession::start(&patterned(ExhaustionPolicy::Wrap), Piece::Positive).unwrap();
        assert_eq!(session.pair(), SlotPair::new(200, 300));
        assert_eq!(session.remaining_cut(), 200);
        assert_eq!(session.remaining_move(), 400);

        finish_valley(&mut session);
        relocate(&mut session);
        assert_eq!(session.pair(), SlotPair::new(450, 300));
        assert_eq!(session.remaining_cut(), 350);

        finish_valley(&mut session);
        relocate(&mut session);
        assert_eq!(session.pair(), SlotPair::new(200, 200));
    }

    #[test]
    fn negative_pattern_stop_completes() {
        let mut session =
            CutSession::start(&patterned(ExhaustionPolicy::Stop), Piece::Negative).unwrap();
        assert_eq!(session.pending_move(), Some(300));

        relocate(&mut session);
        assert_eq!(session.pair(), SlotPair::new(300, 450));
        finish_valley(&mut session);
        relocate(&mut session);
        assert_eq!(session.pair(), SlotPair::new(300, 200));
        finish_valley(&mut session);
        relocate(&mut session);

        assert_eq!(session.state(), CutState::Complete);
        assert_eq!(session.valleys_cut(), 2);
        assert_eq!(session.next_pass(), None);
        assert_eq!(session.pending_move(), None);
    }

    #[test]
    fn negative_pattern_wrap_continues() {
        let mut session =
            CutSession::start(&patterned(ExhaustionPolicy::Wrap), Piece::Negative).unwrap();
        for _ in 0..2 {
            relocate(&mut session);
            finish_valley(&mut session);
        }
        relocate(&mut session);
        assert_eq!(session.state(), CutState::CuttingValley);
        assert_eq!(session.pair(), SlotPair::new(200, 300));
    }

    #[test]
    fn trailing_lone_valley_completes_after_cut() {
        let params = patterned(ExhaustionPolicy::Stop)
            .with_pattern(SlotPattern::from_widths(&[200, 300, 400, 500]).unwrap());
        let mut session = CutSession::start(&params, Piece::Negative).unwrap();
        relocate(&mut session);
        finish_valley(&mut session);
        relocate(&mut session);
        assert_eq!(
            session.pair(),
            SlotPair {
                valley: Some(500),
                finger: None
            }
        );
        finish_valley(&mut session);
        assert_eq!(session.state(), CutState::Complete);
    }

    #[test]
    fn cut_state_strings() {
        assert_eq!(CutState::default(), CutState::Idle);
        assert_eq!(CutState::ReadyToAdvance.as_str(), "advance");
    }
}
