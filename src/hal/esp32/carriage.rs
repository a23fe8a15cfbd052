//! Stepper carriage wiring for ESP32.
//!
//! The step/dir driver (TB6600 or similar) and the limit switch are plain
//! GPIO, so the generic [`StepperCarriage`] does the work; this module only
//! configures the pins.
//!
//! # Wiring
//!
//! - STEP (PUL+) → GPIO2
//! - DIR (DIR+) → GPIO3
//! - Limit switch → GPIO4, normally open to GND (internal pull-up)

use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};

use crate::config::MotionConfig;
use crate::hal::StepperCarriage;

/// Step/dir carriage on ESP32 GPIO with busy-wait pulse timing.
pub type Esp32Carriage<'d> = StepperCarriage<
    PinDriver<'d, AnyOutputPin, Output>,
    PinDriver<'d, AnyOutputPin, Output>,
    PinDriver<'d, AnyIOPin, Input>,
    Ets,
>;

/// Configures the STEP, DIR and limit pins.
///
/// The limit input is pulled up and treated as active low.
///
/// # Example
///
/// ```ignore
/// use rs_boxjig::hal::esp32::new_carriage;
///
/// let peripherals = Peripherals::take()?;
/// let carriage = new_carriage(
///     peripherals.pins.gpio2.into(),
///     peripherals.pins.gpio3.into(),
///     peripherals.pins.gpio4.into(),
///     &config.motion,
/// )?;
/// ```
///
/// # Errors
///
/// Returns an error if GPIO initialization fails.
pub fn new_carriage<'d>(
    step: AnyOutputPin,
    dir: AnyOutputPin,
    limit: AnyIOPin,
    motion: &MotionConfig,
) -> Result<Esp32Carriage<'d>, esp_idf_hal::sys::EspError> {
    let mut step = PinDriver::output(step)?;
    step.set_low()?;
    let dir = PinDriver::output(dir)?;
    let mut limit = PinDriver::input(limit)?;
    limit.set_pull(Pull::Up)?;

    Ok(StepperCarriage::new(step, dir, limit, Ets, motion).with_limit_active_low())
}
