//! Programmed slot patterns for non-uniform joints.
//!
//! A [`SlotPattern`] is an ordered list of widths read two at a time as
//! valley/finger pairs. The two mating boards read the same list with a
//! one-entry offset:
//!
//! - [`Piece::Positive`] (cut-first) pairs entries `(0,1)`, `(2,3)`, ...
//! - [`Piece::Negative`] (move-first) starts with a lone finger at entry 0,
//!   then pairs `(1,2)`, `(3,4)`, ...
//!
//! so every valley on one board lines up with a finger of the same width on
//! the other.
//!
//! # Running off the end
//!
//! The positive board always wraps back to entry 0 when a pair reaches past
//! the last entry. For the negative board the behaviour is an
//! [`ExhaustionPolicy`]: wrap the same way, or stop and end the session.
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::pattern::{ExhaustionPolicy, PatternCursor, Piece, SlotPair, SlotPattern};
//!
//! let pattern = SlotPattern::from_widths(&[200, 300, 450, 300, 200]).unwrap();
//! let mut cursor = PatternCursor::start(Piece::Positive);
//!
//! let mut pairs = Vec::new();
//! for _ in 0..3 {
//!     let (pair, next) = pattern.next_pair(cursor, ExhaustionPolicy::Wrap).unwrap();
//!     pairs.push(pair);
//!     cursor = next;
//! }
//! assert_eq!(
//!     pairs,
//!     [SlotPair::new(200, 300), SlotPair::new(450, 300), SlotPair::new(200, 200)]
//! );
//! ```

use heapless::Vec as HVec;
use thiserror::Error;

/// Maximum number of programmed widths in a pattern.
pub const MAX_SLOTS: usize = 32;

/// Errors raised while building or editing a pattern.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// A pattern needs at least one width.
    #[error("slot pattern is empty")]
    Empty,
    /// More widths than [`MAX_SLOTS`].
    #[error("slot pattern holds at most {max} widths")]
    TooLong {
        /// Capacity of the pattern.
        max: usize,
    },
    /// Zero is not a usable slot width.
    #[error("slot width at index {index} is zero")]
    ZeroWidth {
        /// Offending position.
        index: usize,
    },
    /// Edit outside the populated range.
    #[error("index {index} is outside a pattern of {len} widths")]
    OutOfRange {
        /// Requested position.
        index: usize,
        /// Current pattern length.
        len: usize,
    },
}

/// Which of the two mating boards is being cut.
///
/// # Default
///
/// Defaults to [`Positive`](Self::Positive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Piece {
    /// Cut-first board: the run opens with a valley at the stock edge.
    #[default]
    Positive,
    /// Move-first board: the run opens with a finger at the stock edge.
    Negative,
}

impl Piece {
    /// Returns the piece as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Piece::Positive => "positive",
            Piece::Negative => "negative",
        }
    }

    /// The mating board.
    #[inline]
    pub const fn mate(&self) -> Self {
        match self {
            Piece::Positive => Piece::Negative,
            Piece::Negative => Piece::Positive,
        }
    }
}

/// What the negative board does when its pairs run past the last width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExhaustionPolicy {
    /// Continue from entry 0, repeating the pattern.
    #[default]
    Wrap,
    /// End the session after the last programmed width.
    Stop,
}

/// One valley/finger pair resolved from a pattern.
///
/// `valley` is `None` for the leading finger of a negative board; `finger`
/// is `None` for the trailing valley of a negative board that stops at the
/// end of its pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotPair {
    /// Valley width to cut, if any.
    pub valley: Option<u32>,
    /// Finger width to leave, if any.
    pub finger: Option<u32>,
}

impl SlotPair {
    /// A full valley + finger pair.
    pub const fn new(valley: u32, finger: u32) -> Self {
        Self {
            valley: Some(valley),
            finger: Some(finger),
        }
    }

    /// Same width for valley and finger.
    pub const fn uniform(width: u32) -> Self {
        Self::new(width, width)
    }
}

/// Per-session read position in a pattern.
///
/// Cheap to copy; the pattern itself is never modified by reading it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternCursor {
    piece: Piece,
    /// Index of the next valley. `None` while a negative board's leading
    /// finger is still pending.
    next_valley: Option<usize>,
}

impl PatternCursor {
    /// Cursor at the start of a run for `piece`.
    pub const fn start(piece: Piece) -> Self {
        let next_valley = match piece {
            Piece::Positive => Some(0),
            Piece::Negative => None,
        };
        Self { piece, next_valley }
    }

    /// The board this cursor reads for.
    #[inline]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// Index of the next valley, or `None` before a negative board's leading finger.
    #[inline]
    pub const fn position(&self) -> Option<usize> {
        self.next_valley
    }
}

/// Bounded, ordered list of non-zero slot widths in thou.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SlotPattern {
    widths: HVec<u32, MAX_SLOTS>,
}

impl SlotPattern {
    /// Creates an empty pattern.
    pub const fn new() -> Self {
        Self { widths: HVec::new() }
    }

    /// Builds a pattern from explicit widths.
    ///
    /// # Errors
    ///
    /// Rejects zero widths and more than [`MAX_SLOTS`] entries.
    pub fn from_widths(widths: &[u32]) -> Result<Self, PatternError> {
        let mut pattern = Self::new();
        for &width in widths {
            pattern.push(width)?;
        }
        Ok(pattern)
    }

    /// Reads a zero-terminated table as stored by fixed-array firmware.
    ///
    /// Stops at the first zero or after [`MAX_SLOTS`] entries, whichever
    /// comes first. Never fails.
    pub fn from_sentinel(raw: &[u32]) -> Self {
        let mut pattern = Self::new();
        for &width in raw.iter().take(MAX_SLOTS).take_while(|&&w| w != 0) {
            // Capacity is MAX_SLOTS and the iterator is capped at that.
            let _ = pattern.widths.push(width);
        }
        pattern
    }

    /// Writes the pattern as a zero-padded fixed table.
    pub fn to_sentinel(&self) -> [u32; MAX_SLOTS] {
        let mut raw = [0u32; MAX_SLOTS];
        raw[..self.widths.len()].copy_from_slice(&self.widths);
        raw
    }

    /// Appends a width.
    pub fn push(&mut self, width: u32) -> Result<(), PatternError> {
        if width == 0 {
            return Err(PatternError::ZeroWidth {
                index: self.widths.len(),
            });
        }
        self.widths
            .push(width)
            .map_err(|_| PatternError::TooLong { max: MAX_SLOTS })
    }

    /// Replaces the width at `index`.
    pub fn set(&mut self, index: usize, width: u32) -> Result<(), PatternError> {
        if width == 0 {
            return Err(PatternError::ZeroWidth { index });
        }
        let len = self.widths.len();
        let slot = self
            .widths
            .get_mut(index)
            .ok_or(PatternError::OutOfRange { index, len })?;
        *slot = width;
        Ok(())
    }

    /// Removes and returns the last width.
    pub fn remove_last(&mut self) -> Option<u32> {
        self.widths.pop()
    }

    /// Number of programmed widths.
    #[inline]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// True if no widths are programmed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Width at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.widths.get(index).copied()
    }

    /// Programmed widths in order.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.widths
    }

    /// Iterates the programmed widths.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.widths.iter().copied()
    }

    /// Checks every entry is usable.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.widths.is_empty() {
            return Err(PatternError::Empty);
        }
        match self.widths.iter().position(|&w| w == 0) {
            Some(index) => Err(PatternError::ZeroWidth { index }),
            None => Ok(()),
        }
    }

    /// Resolves the pair at `cursor` and the cursor for the pair after it.
    ///
    /// Returns `None` once the pattern is exhausted, which only happens for
    /// an empty pattern or a negative board under [`ExhaustionPolicy::Stop`].
    pub fn next_pair(
        &self,
        cursor: PatternCursor,
        policy: ExhaustionPolicy,
    ) -> Option<(SlotPair, PatternCursor)> {
        let len = self.widths.len();
        if len == 0 {
            return None;
        }

        let Some(valley_index) = cursor.next_valley else {
            let pair = SlotPair {
                valley: None,
                finger: Some(self.widths[0]),
            };
            return Some((
                pair,
                PatternCursor {
                    next_valley: Some(1),
                    ..cursor
                },
            ));
        };

        let wraps = cursor.piece == Piece::Positive || policy == ExhaustionPolicy::Wrap;
        if wraps {
            let pair = SlotPair::new(
                self.widths[valley_index % len],
                self.widths[(valley_index + 1) % len],
            );
            let next = PatternCursor {
                next_valley: Some((valley_index + 2) % len),
                ..cursor
            };
            return Some((pair, next));
        }

        let valley = self.get(valley_index)?;
        let pair = SlotPair {
            valley: Some(valley),
            finger: self.get(valley_index + 1),
        };
        Some((
            pair,
            PatternCursor {
                next_valley: Some(valley_index + 2),
                ..cursor
            },
        ))
    }
}
