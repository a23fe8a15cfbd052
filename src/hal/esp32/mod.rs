//! ESP32-C3 SuperMini hardware abstraction layer for the box joint jig.
//!
//! This module provides hardware implementations for an ESP32-C3 SuperMini
//! driving the jig's lead-screw stepper through a step/dir driver.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Stepper Driver**: TB6600 or any step/dir driver
//! - **Limit Switch**: normally open, to GND
//! - **Controls**: four momentary push buttons
//! - **Storage**: NVS partition
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod carriage;
mod controls;
mod nvs;

pub use carriage::{new_carriage, Esp32Carriage};
pub use controls::Esp32Controls;
pub use nvs::{Esp32NvsStore, NvsStoreError};

/// Pin assignments for SuperMini ESP32-C3.
pub mod pins {
    // =========================================================================
    // Stepper Driver
    // =========================================================================

    /// Step pulse output (PUL+)
    pub const STEP: i32 = 2;

    /// Direction output (DIR+)
    pub const DIR: i32 = 3;

    /// Limit switch input (active low, internal pull-up)
    pub const LIMIT: i32 = 4;

    // =========================================================================
    // Operator Buttons (active low, internal pull-ups)
    // =========================================================================

    /// Advance: next cut pass or relocation
    pub const BTN_ADVANCE: i32 = 5;

    /// Back: abort the run
    pub const BTN_BACK: i32 = 6;

    /// Step up: jog toward the blade
    pub const BTN_STEP_UP: i32 = 7;

    /// Step down: jog away from the blade
    pub const BTN_STEP_DOWN: i32 = 10;
}
