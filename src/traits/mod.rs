//! Trait definitions for hardware, storage and display abstraction.
//!
//! This module defines the seams between the cutting core and the outside
//! world so the same sequencing logic runs against real hardware and
//! desktop mocks.
//!
//! # Submodules
//!
//! - `hardware`: Carriage motion and operator controls
//! - `storage`: Persistent configuration
//! - `display`: Status rendering
//!
//! # Hardware Abstraction
//!
//! - [`CarriageDriver`]: blocking "move N thou" with early-stop reporting
//! - [`ControlInput`]: edge-triggered button events
//! - [`ConfigStore`]: load/save of the complete configuration
//! - [`JigDisplay`]: status and message output

pub mod display;
pub mod hardware;
pub mod storage;

pub use display::*;
pub use hardware::*;
pub use storage::*;
