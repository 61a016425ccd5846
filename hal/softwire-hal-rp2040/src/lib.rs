//! RP2040 platform layer for the software I2C bus
//!
//! Implements the `softwire-hal` traits on top of embassy-rp:
//!
//! - [`gpio::FlexLines`] - SDA/SCL as runtime-switchable `Flex` pins
//! - [`interrupt::CortexMInterrupts`] - PRIMASK based interrupt masking
//! - blocking microsecond delays from `embassy_time::Delay`
//!
//! Any two GPIOs can carry the bus, which leaves both I2C blocks free for
//! other pins.

#![no_std]

pub mod gpio;
pub mod interrupt;

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;
use embassy_time::Delay;
use softwire_core::config::DEFAULT_BUFFER_CAPACITY;
use softwire_core::{BusConfig, SoftWire};

pub use gpio::{FlexLines, Line};
pub use interrupt::CortexMInterrupts;

/// Software I2C bus on two RP2040 GPIOs
pub type Rp2040Bus<'d, const N: usize = DEFAULT_BUFFER_CAPACITY> =
    SoftWire<FlexLines<'d>, CortexMInterrupts, Delay, N>;

/// Build a bus with default timing
///
/// Set `pullup` on boards without external pull-up resistors; the
/// internal ones (~50 kΩ) only suit short wires and slow clocks.
pub fn new_bus<'d>(sda: Peri<'d, AnyPin>, scl: Peri<'d, AnyPin>, pullup: bool) -> Rp2040Bus<'d> {
    new_bus_with_config(sda, scl, pullup, BusConfig::default())
}

/// Build a bus with explicit timing
pub fn new_bus_with_config<'d>(
    sda: Peri<'d, AnyPin>,
    scl: Peri<'d, AnyPin>,
    pullup: bool,
    config: BusConfig,
) -> Rp2040Bus<'d> {
    SoftWire::with_config(
        FlexLines::new(sda, scl),
        CortexMInterrupts,
        Delay,
        Line::Sda,
        Line::Scl,
        pullup,
        config,
    )
}
