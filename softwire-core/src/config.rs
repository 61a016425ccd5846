//! Bus configuration
//!
//! Compile-time defaults and the runtime timing configuration of a bus.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default receive buffer capacity in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 32;

/// Default half-period of the bus clock in microseconds (~100 kHz)
pub const DEFAULT_BIT_DELAY_US: u32 = 4;

/// Default number of start attempts made by a start-wait
pub const DEFAULT_START_WAIT_RETRIES: u32 = 5000;

/// Largest internal register address, in bytes
pub const MAX_INTERNAL_ADDRESS_SIZE: u8 = 3;

/// R/W bit for a read transfer
pub const I2C_READ: u8 = 1;

/// R/W bit for a write transfer
pub const I2C_WRITE: u8 = 0;

/// Timing configuration of a software I2C bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Delay unit in microseconds; a clock high phase lasts one unit
    pub bit_delay_us: u32,
    /// Start attempts before a start-wait gives up (0 behaves like 1)
    pub start_wait_retries: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BusConfig {
    /// Roughly standard mode (100 kHz) timing
    pub const STANDARD: Self = Self {
        bit_delay_us: DEFAULT_BIT_DELAY_US,
        start_wait_retries: DEFAULT_START_WAIT_RETRIES,
    };

    /// Set the delay unit
    pub const fn with_bit_delay_us(mut self, bit_delay_us: u32) -> Self {
        self.bit_delay_us = bit_delay_us;
        self
    }

    /// Set the start-wait retry bound
    pub const fn with_start_wait_retries(mut self, retries: u32) -> Self {
        self.start_wait_retries = retries;
        self
    }

    /// Full delay unit in nanoseconds
    pub(crate) fn delay_ns(&self) -> u32 {
        self.bit_delay_us.saturating_mul(1000)
    }

    /// Half delay unit in nanoseconds
    pub(crate) fn half_delay_ns(&self) -> u32 {
        self.delay_ns() / 2
    }
}
