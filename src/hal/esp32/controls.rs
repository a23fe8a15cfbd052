//! Four-button operator panel for ESP32.
//!
//! Momentary push buttons wired to ground with the internal pull-ups
//! enabled, so a pressed button reads low.
//!
//! # Wiring
//!
//! - ADVANCE → GPIO5
//! - BACK → GPIO6
//! - STEP UP → GPIO7
//! - STEP DOWN → GPIO10
//! - Other side of each button → GND

use crate::traits::{ControlEvents, ControlInput};
use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};

/// One active-low button with press-edge detection.
struct Button<'d> {
    pin: PinDriver<'d, AnyIOPin, Input>,
    /// Pressed level seen on the previous poll
    last: bool,
}

impl<'d> Button<'d> {
    fn new(pin: AnyIOPin) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut pin = PinDriver::input(pin)?;
        pin.set_pull(Pull::Up)?;
        // A button held at boot must be released before it counts
        let last = pin.is_low();
        Ok(Self { pin, last })
    }

    /// True once per press, on the released-to-pressed transition.
    fn pressed_edge(&mut self) -> bool {
        let pressed = self.pin.is_low();
        let edge = pressed && !self.last;
        self.last = pressed;
        edge
    }
}

/// Operator buttons for ESP32.
///
/// Call [`poll_controls`](ControlInput::poll_controls) every loop
/// iteration (e.g., every 20ms); the loop period doubles as debounce time.
///
/// # Example
///
/// ```ignore
/// use rs_boxjig::hal::esp32::Esp32Controls;
/// use rs_boxjig::traits::ControlInput;
///
/// let peripherals = Peripherals::take()?;
/// let mut controls = Esp32Controls::new(
///     peripherals.pins.gpio5.into(),  // ADVANCE
///     peripherals.pins.gpio6.into(),  // BACK
///     peripherals.pins.gpio7.into(),  // STEP UP
///     peripherals.pins.gpio10.into(), // STEP DOWN
/// )?;
///
/// loop {
///     let events = controls.poll_controls();
///     if events.advance {
///         println!("Advance!");
///     }
/// }
/// ```
pub struct Esp32Controls<'d> {
    advance: Button<'d>,
    back: Button<'d>,
    step_up: Button<'d>,
    step_down: Button<'d>,
}

impl<'d> Esp32Controls<'d> {
    /// Configures the four button inputs with pull-ups.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(
        advance: AnyIOPin,
        back: AnyIOPin,
        step_up: AnyIOPin,
        step_down: AnyIOPin,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        Ok(Self {
            advance: Button::new(advance)?,
            back: Button::new(back)?,
            step_up: Button::new(step_up)?,
            step_down: Button::new(step_down)?,
        })
    }
}

impl ControlInput for Esp32Controls<'_> {
    fn poll_controls(&mut self) -> ControlEvents {
        ControlEvents {
            advance: self.advance.pressed_edge(),
            back: self.back.pressed_edge(),
            step_up: self.step_up.pressed_edge(),
            step_down: self.step_down.pressed_edge(),
        }
    }
}
