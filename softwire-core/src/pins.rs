//! Open-drain pin emulation
//!
//! Most GPIO blocks only offer push-pull outputs. A bus line must never be
//! driven high (a slave may be pulling it low at the same time), so a line
//! is either driven low as an output or released as an input and left to
//! the pull-up resistor.

use softwire_hal::{InterruptControl, PinControl, PinMode};

/// Bus lines of one software I2C bus
///
/// Holds the pin identifiers, the pull-up-assist flag and the platform
/// resources needed to switch pin modes.
pub struct OpenDrain<P: PinControl, I> {
    pins: P,
    irq: I,
    sda: P::Pin,
    scl: P::Pin,
    /// Use the internal pull-up when releasing a line
    pullup: bool,
}

impl<P: PinControl, I: InterruptControl> OpenDrain<P, I> {
    /// Create the line pair
    ///
    /// Pins are left untouched until the first release or drive.
    pub fn new(pins: P, irq: I, sda: P::Pin, scl: P::Pin, pullup: bool) -> Self {
        Self {
            pins,
            irq,
            sda,
            scl,
            pullup,
        }
    }

    /// Data pin identifier
    pub fn sda(&self) -> P::Pin {
        self.sda
    }

    /// Clock pin identifier
    pub fn scl(&self) -> P::Pin {
        self.scl
    }

    /// Whether released lines use the internal pull-up
    pub fn pullup_assist(&self) -> bool {
        self.pullup
    }

    /// Release a line so the pull-up takes it high
    pub fn release(&mut self, pin: P::Pin) {
        let mode = if self.pullup {
            PinMode::InputPullup
        } else {
            PinMode::Input
        };
        let _guard = self.irq.masked();
        self.pins.set_pin_mode(pin, mode);
    }

    /// Actively drive a line low
    pub fn drive_low(&mut self, pin: P::Pin) {
        let _guard = self.irq.masked();
        if self.pullup {
            // Enabling the pull-up may have set the output latch high
            self.pins.write_output(pin, false);
        }
        self.pins.set_pin_mode(pin, PinMode::Output);
    }

    /// Current logic level of a line
    pub fn read(&mut self, pin: P::Pin) -> bool {
        self.pins.read_input(pin)
    }

    /// Clear the output latch without touching the pin mode
    ///
    /// Without pull-up assist, [`OpenDrain::drive_low`] relies on the latch
    /// already being low.
    pub fn prime_low(&mut self, pin: P::Pin) {
        self.pins.write_output(pin, false);
    }

    pub(crate) fn sda_high(&mut self) {
        self.release(self.sda);
    }

    pub(crate) fn sda_low(&mut self) {
        self.drive_low(self.sda);
    }

    pub(crate) fn scl_high(&mut self) {
        self.release(self.scl);
    }

    pub(crate) fn scl_low(&mut self) {
        self.drive_low(self.scl);
    }

    pub(crate) fn set_sda(&mut self, high: bool) {
        if high {
            self.sda_high();
        } else {
            self.sda_low();
        }
    }

    pub(crate) fn sda_is_high(&mut self) -> bool {
        self.read(self.sda)
    }

    pub(crate) fn scl_is_high(&mut self) -> bool {
        self.read(self.scl)
    }

    /// Give back the platform resources
    pub fn release_resources(self) -> (P, I) {
        (self.pins, self.irq)
    }
}
