//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `stepper`: Step/dir carriage over any `embedded-hal` 1.0 pins
//! - `console`: Status display on the `log` facade
//! - `esp32`: ESP32-C3 SuperMini buttons, stepper pins and NVS (requires `esp32` feature)

pub mod console;
pub mod mock;
pub mod stepper;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use console::LogDisplay;
pub use mock::*;
pub use stepper::{StepperCarriage, StepperError};

#[cfg(feature = "esp32")]
pub use esp32::*;
