//! Bus lines on RP2040 GPIOs
//!
//! Both lines are `Flex` pins so they can switch between input and output
//! at runtime. The RP2040 keeps the output level separate from the pull
//! configuration, so releasing a line never touches the output latch.

use embassy_rp::gpio::{AnyPin, Flex, Level, Pull};
use embassy_rp::Peri;
use softwire_hal::{PinControl, PinMode};

/// Line of the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Data
    Sda,
    /// Clock
    Scl,
}

/// SDA and SCL pins of one bus
pub struct FlexLines<'d> {
    sda: Flex<'d>,
    scl: Flex<'d>,
}

impl<'d> FlexLines<'d> {
    /// Take both pins, leaving them as inputs with the latch low
    pub fn new(sda: Peri<'d, AnyPin>, scl: Peri<'d, AnyPin>) -> Self {
        let mut lines = Self {
            sda: Flex::new(sda),
            scl: Flex::new(scl),
        };
        for line in [Line::Sda, Line::Scl] {
            let pin = lines.pin(line);
            pin.set_low();
            pin.set_as_input();
        }
        lines
    }

    fn pin(&mut self, line: Line) -> &mut Flex<'d> {
        match line {
            Line::Sda => &mut self.sda,
            Line::Scl => &mut self.scl,
        }
    }
}

impl PinControl for FlexLines<'_> {
    type Pin = Line;

    fn set_pin_mode(&mut self, line: Line, mode: PinMode) {
        let pin = self.pin(line);
        match mode {
            PinMode::Output => pin.set_as_output(),
            PinMode::Input => {
                pin.set_pull(Pull::None);
                pin.set_as_input();
            }
            PinMode::InputPullup => {
                pin.set_pull(Pull::Up);
                pin.set_as_input();
            }
        }
    }

    fn write_output(&mut self, line: Line, high: bool) {
        self.pin(line).set_level(Level::from(high));
    }

    fn read_input(&mut self, line: Line) -> bool {
        self.pin(line).is_high()
    }
}
