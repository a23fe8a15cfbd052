//! Display abstraction for jig status.
//!
//! This module defines the [`JigDisplay`] trait. Layout, fonts and menus
//! belong to the implementation; the jig only pushes status snapshots and
//! short operator messages.

use crate::JigStatus;

/// Display trait for rendering jig status.
///
/// Implementors provide hardware-specific rendering for character LCDs,
/// OLEDs, or a log sink for desktop runs.
///
/// # Example
///
/// ```ignore
/// use rs_boxjig::traits::JigDisplay;
/// use rs_boxjig::JigStatus;
///
/// struct MyDisplay { /* ... */ }
///
/// impl JigDisplay for MyDisplay {
///     type Error = ();
///
///     fn init(&mut self) -> Result<(), ()> { Ok(()) }
///     fn clear(&mut self) -> Result<(), ()> { Ok(()) }
///     fn render(&mut self, status: &JigStatus) -> Result<(), ()> {
///         // Show state, remaining cut, valley count...
///         Ok(())
///     }
///     fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
///         Ok(())
///     }
/// }
/// ```
pub trait JigDisplay {
    /// Error type for display operations.
    type Error;

    /// Initializes the display hardware.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Clears the display.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Renders the current jig status.
    ///
    /// Called after every handled control event.
    fn render(&mut self, status: &JigStatus) -> Result<(), Self::Error>;

    /// Shows a short message, typically an error for the operator.
    ///
    /// # Arguments
    ///
    /// * `line1` - First line of text
    /// * `line2` - Optional second line of text
    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error>;
}
