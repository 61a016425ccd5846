//! Bit-level protocol engine
//!
//! Generates start, repeated-start and stop conditions and shifts single
//! bytes in and out. All timing is expressed in units of the configured
//! bit delay `D`: a clock high phase lasts `D`, the acknowledge bit is
//! split into two `D/2` halves.
//!
//! ```text
//!          start        bit 7      bit 6             ack        stop
//! SDA  ‾‾‾‾\______X‾‾‾‾‾‾‾‾‾‾X__________X ... X‾‾‾\___/‾‾‾‾\_______/‾‾‾
//! SCL  ‾‾‾‾‾‾‾‾\_____/‾‾‾‾\_____/‾‾‾‾\_____ ... __/‾‾\______/‾‾‾‾‾‾‾‾
//! ```
//!
//! The engine never touches transaction state; sequencing lives in
//! [`crate::controller`].

use embedded_hal::delay::DelayNs;
use softwire_hal::{InterruptControl, PinControl};

use crate::config::BusConfig;
use crate::error::InitError;
use crate::pins::OpenDrain;

/// Bit-banging protocol engine
pub struct Engine<P: PinControl, I, D> {
    lines: OpenDrain<P, I>,
    delay: D,
    config: BusConfig,
}

impl<P, I, D> Engine<P, I, D>
where
    P: PinControl,
    I: InterruptControl,
    D: DelayNs,
{
    /// Create an engine driving the given lines
    pub fn new(lines: OpenDrain<P, I>, delay: D, config: BusConfig) -> Self {
        Self {
            lines,
            delay,
            config,
        }
    }

    /// Timing configuration
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Access the line pair
    pub fn lines(&mut self) -> &mut OpenDrain<P, I> {
        &mut self.lines
    }

    fn wait(&mut self) {
        let ns = self.config.delay_ns();
        self.delay.delay_ns(ns);
    }

    fn wait_half(&mut self) {
        let ns = self.config.half_delay_ns();
        self.delay.delay_ns(ns);
    }

    /// Put both lines in the released state and check that they read high
    ///
    /// Fails if either line stays low, which means another device holds it
    /// or the pull-ups are missing.
    pub fn init(&mut self) -> Result<(), InitError> {
        let (sda, scl) = (self.lines.sda(), self.lines.scl());
        self.lines.prime_low(sda);
        self.lines.prime_low(scl);
        self.lines.sda_high();
        self.lines.scl_high();

        let sda_low = !self.lines.sda_is_high();
        let scl_low = !self.lines.scl_is_high();
        if sda_low || scl_low {
            warn!("bus stuck: sda low {}, scl low {}", sda_low, scl_low);
            return Err(InitError::BusStuck { sda_low, scl_low });
        }
        Ok(())
    }

    /// Issue a start condition and send the address byte
    ///
    /// `address` is the full 8-bit address byte, R/W bit included.
    /// Returns true if the slave acknowledged.
    pub fn start(&mut self, address: u8) -> bool {
        self.lines.sda_low();
        self.wait();
        self.lines.scl_low();
        self.write(address)
    }

    /// Issue a repeated start condition and send the address byte
    ///
    /// Used while the bus is still claimed from a previous phase.
    pub fn rep_start(&mut self, address: u8) -> bool {
        self.idle();
        self.start(address)
    }

    /// Release both lines and wait one delay unit
    pub fn idle(&mut self) {
        self.lines.sda_high();
        self.lines.scl_high();
        self.wait();
    }

    /// Retry [`Engine::start`] until the slave acknowledges
    ///
    /// A stop is issued after every failed attempt. Gives up after the
    /// configured number of attempts.
    pub fn start_wait(&mut self, address: u8) -> bool {
        let mut retries = self.config.start_wait_retries;
        while !self.start(address) {
            self.stop();
            retries = retries.saturating_sub(1);
            if retries == 0 {
                warn!("start-wait gave up on address byte {:#x}", address);
                return false;
            }
        }
        true
    }

    /// Issue a stop condition, freeing the bus
    pub fn stop(&mut self) {
        self.lines.sda_low();
        self.wait();
        self.lines.scl_high();
        self.wait();
        self.lines.sda_high();
        self.wait();
    }

    /// Shift out one byte, MSB first, and sample the acknowledge bit
    ///
    /// Returns true if the slave pulled the data line low.
    pub fn write(&mut self, value: u8) -> bool {
        for bit in (0..8).rev() {
            self.lines.set_sda(value & (1 << bit) != 0);
            self.lines.scl_high();
            self.wait();
            self.lines.scl_low();
        }

        self.lines.sda_high();
        self.lines.scl_high();
        self.wait_half();
        let nack = self.lines.sda_is_high();
        self.lines.scl_low();
        self.wait_half();
        self.lines.sda_low();
        !nack
    }

    /// Shift in one byte, MSB first
    ///
    /// Acknowledges the byte unless `last` is set, in which case a NACK
    /// tells the slave to stop sending.
    pub fn read(&mut self, last: bool) -> u8 {
        let mut value = 0u8;
        self.lines.sda_high();
        for _ in 0..8 {
            value <<= 1;
            self.wait();
            self.lines.scl_high();
            if self.lines.sda_is_high() {
                value |= 1;
            }
            self.lines.scl_low();
        }

        // NACK leaves the line released
        self.lines.set_sda(last);
        self.lines.scl_high();
        self.wait_half();
        self.lines.scl_low();
        self.wait_half();
        self.lines.sda_low();
        value
    }

    /// Give back the platform resources
    pub fn release(self) -> (P, I, D) {
        let (pins, irq) = self.lines.release_resources();
        (pins, irq, self.delay)
    }
}
