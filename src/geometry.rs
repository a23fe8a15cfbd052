//! Joint geometry: turning slot widths into carriage distances.
//!
//! Each valley/finger pair on a board maps to two carriage motions: the
//! *cut* travel that widens the valley pass by pass, and the *move* that
//! relocates the blade across the finger to the start of the next valley.
//!
//! # First vs. subsequent pairs
//!
//! At the start of a run the blade sits flush against the stock edge, so the
//! first push removes no wood and the first valley needs its full width of
//! travel. Every later valley starts with the blade already seated one kerf
//! into it, so its cut travel is one kerf shorter:
//!
//! | Distance | Formula |
//! |----------|---------|
//! | initial cut | `valley + slop` |
//! | subsequent cut | `valley + slop - kerf` |
//! | move (both) | `finger - slop + kerf` |
//!
//! Slop widens every valley and narrows every finger by the same amount, so
//! the valley+finger pitch stays constant and mating boards stay aligned.
//!
//! # Example
//!
//! ```rust
//! use rs_boxjig::geometry::compute_quadruple;
//!
//! let q = compute_quadruple(500, 500, 123, 2).unwrap();
//! assert_eq!(q.initial_cut, 502);
//! assert_eq!(q.subsequent_cut, 379);
//! assert_eq!(q.initial_move, 621);
//! assert_eq!(q.subsequent_move, 621);
//! ```

use thiserror::Error;

/// Joint parameter combinations that produce no physically valid motion.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The blade must remove material.
    #[error("kerf must be greater than zero")]
    ZeroKerf,

    /// Subsequent cut distance would be negative.
    #[error("valley {valley} plus slop {slop} is narrower than the {kerf} kerf")]
    ValleyNarrowerThanKerf {
        /// Valley width (thou).
        valley: u32,
        /// Kerf (thou).
        kerf: u32,
        /// Slop (thou).
        slop: u32,
    },

    /// Relocation move would be zero or negative.
    #[error("finger {finger} plus kerf {kerf} does not exceed slop {slop}")]
    FingerTooNarrow {
        /// Finger width (thou).
        finger: u32,
        /// Kerf (thou).
        kerf: u32,
        /// Slop (thou).
        slop: u32,
    },

    /// A distance does not fit in 32 bits.
    #[error("distance overflows")]
    Overflow,
}

/// The four carriage distances for one valley/finger pair.
///
/// Only one half is used for a given pair: the `initial_*` values for the
/// very first pair of a run, the `subsequent_*` values afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceQuadruple {
    /// Cut travel for the first valley of a run.
    pub initial_cut: u32,
    /// Relocation after the first valley of a run.
    pub initial_move: u32,
    /// Cut travel for every later valley.
    pub subsequent_cut: u32,
    /// Relocation after every later valley.
    pub subsequent_move: u32,
}

impl DistanceQuadruple {
    /// Returns `(cut, move)` for the first pair or a subsequent pair.
    #[inline]
    pub const fn select(&self, first: bool) -> (u32, u32) {
        if first {
            (self.initial_cut, self.initial_move)
        } else {
            (self.subsequent_cut, self.subsequent_move)
        }
    }
}

/// Computes all four distances for a valley/finger pair.
///
/// Pure function: identical inputs always give identical output. Uniform
/// joints pass the slot width as both `valley` and `finger`.
///
/// # Errors
///
/// Rejects combinations that would need negative cut travel or a
/// non-positive relocation instead of letting the arithmetic wrap.
pub fn compute_quadruple(
    valley: u32,
    finger: u32,
    kerf: u32,
    slop: u32,
) -> Result<DistanceQuadruple, GeometryError> {
    let (initial_cut, subsequent_cut) = cut_distances(valley, kerf, slop)?;
    let relocation = move_distance(finger, kerf, slop)?;

    Ok(DistanceQuadruple {
        initial_cut,
        initial_move: relocation,
        subsequent_cut,
        subsequent_move: relocation,
    })
}

/// Cut travel for a valley as `(initial, subsequent)`.
///
/// A subsequent cut of zero is valid: the valley is exactly one kerf wide
/// and the blade's seating pass already cleared it.
pub fn cut_distances(valley: u32, kerf: u32, slop: u32) -> Result<(u32, u32), GeometryError> {
    if kerf == 0 {
        return Err(GeometryError::ZeroKerf);
    }
    let initial = valley.checked_add(slop).ok_or(GeometryError::Overflow)?;
    let subsequent =
        initial
            .checked_sub(kerf)
            .ok_or(GeometryError::ValleyNarrowerThanKerf { valley, kerf, slop })?;
    Ok((initial, subsequent))
}

/// Relocation that carries the blade across a finger to the next valley.
pub fn move_distance(finger: u32, kerf: u32, slop: u32) -> Result<u32, GeometryError> {
    if kerf == 0 {
        return Err(GeometryError::ZeroKerf);
    }
    let span = finger.checked_add(kerf).ok_or(GeometryError::Overflow)?;
    match span.checked_sub(slop) {
        Some(distance) if distance > 0 => Ok(distance),
        _ => Err(GeometryError::FingerTooNarrow { finger, kerf, slop }),
    }
}
