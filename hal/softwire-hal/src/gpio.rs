//! GPIO pin abstractions
//!
//! The bit-banged bus needs pins that can be switched between a driven
//! output and a (possibly pulled-up) input at runtime. Pins are addressed by
//! an identifier so one implementation can serve both bus lines.

/// Electrical mode of a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Push-pull output driving the output latch value
    Output,
    /// Floating input (external pull-up expected)
    Input,
    /// Input with the platform's internal pull-up enabled
    InputPullup,
}

/// Runtime-configurable digital pins
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip. Mode changes are expected to be cheap enough to be
/// performed once per bus half-period.
pub trait PinControl {
    /// Pin identifier (GPIO number, line enum, ...)
    type Pin: Copy;

    /// Switch the pin to the given mode
    fn set_pin_mode(&mut self, pin: Self::Pin, mode: PinMode);

    /// Set the output latch of the pin
    ///
    /// The level only appears on the pin while it is in [`PinMode::Output`].
    fn write_output(&mut self, pin: Self::Pin, high: bool);

    /// Read the current logic level of the pin
    ///
    /// Takes `&mut self` because some platforms need to touch registers
    /// to sample the input.
    fn read_input(&mut self, pin: Self::Pin) -> bool;
}

impl<T: PinControl + ?Sized> PinControl for &mut T {
    type Pin = T::Pin;

    fn set_pin_mode(&mut self, pin: Self::Pin, mode: PinMode) {
        T::set_pin_mode(self, pin, mode)
    }

    fn write_output(&mut self, pin: Self::Pin, high: bool) {
        T::write_output(self, pin, high)
    }

    fn read_input(&mut self, pin: Self::Pin) -> bool {
        T::read_input(self, pin)
    }
}
