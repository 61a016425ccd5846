//! Transfer controller
//!
//! Sequences engine primitives into Wire-style transactions and keeps the
//! transaction state: whether the bus is claimed (no stop sent yet) and
//! the first error of the current transaction.
//!
//! # Example
//!
//! ```ignore
//! let mut bus: SoftWire<_, _, _> = SoftWire::new(pins, irq, delay, SDA, SCL, false);
//! bus.initialize()?;
//!
//! // Write register 0x10
//! bus.begin_transmission(0x50);
//! bus.write_bytes(&[0x10, 0xAB]);
//! bus.end_transmission()?;
//!
//! // Read it back through a repeated start
//! if bus.request_register(0x50, 1, 0x10, 1, true) == 1 {
//!     let value = bus.read();
//! }
//! ```

use embedded_hal::delay::DelayNs;
use softwire_hal::{InterruptControl, PinControl};

use crate::buffer::RxBuffer;
use crate::config::{
    BusConfig, DEFAULT_BUFFER_CAPACITY, I2C_READ, I2C_WRITE, MAX_INTERNAL_ADDRESS_SIZE,
};
use crate::engine::Engine;
use crate::error::{InitError, TransferError};
use crate::pins::OpenDrain;

/// Software I2C bus handle
///
/// `N` is the receive buffer capacity, i.e. the largest read a single
/// [`SoftWire::request_from`] can deliver.
pub struct SoftWire<P: PinControl, I, D, const N: usize = DEFAULT_BUFFER_CAPACITY> {
    engine: Engine<P, I, D>,
    /// Bus claimed: a start was sent and no stop followed yet
    in_transmission: bool,
    /// First error of the current transaction
    last_error: Option<TransferError>,
    rx: RxBuffer<N>,
}

impl<P, I, D, const N: usize> SoftWire<P, I, D, N>
where
    P: PinControl,
    I: InterruptControl,
    D: DelayNs,
{
    /// Create a bus handle with default timing
    ///
    /// # Arguments
    /// - `sda`, `scl`: data and clock pin identifiers
    /// - `pullup`: release lines with the internal pull-up enabled, for
    ///   boards without external resistors
    pub fn new(pins: P, irq: I, delay: D, sda: P::Pin, scl: P::Pin, pullup: bool) -> Self {
        Self::with_config(pins, irq, delay, sda, scl, pullup, BusConfig::default())
    }

    /// Create a bus handle with explicit timing
    pub fn with_config(
        pins: P,
        irq: I,
        delay: D,
        sda: P::Pin,
        scl: P::Pin,
        pullup: bool,
        config: BusConfig,
    ) -> Self {
        let lines = OpenDrain::new(pins, irq, sda, scl, pullup);
        Self {
            engine: Engine::new(lines, delay, config),
            in_transmission: false,
            last_error: None,
            rx: RxBuffer::new(),
        }
    }

    /// Reset the transaction state and release both lines
    ///
    /// Fails if a line stays low. The caller decides whether to retry.
    pub fn initialize(&mut self) -> Result<(), InitError> {
        self.rx.clear();
        self.last_error = None;
        self.in_transmission = false;
        self.engine.init()
    }

    /// Address a device for writing
    ///
    /// Uses a repeated start when the bus is still claimed.
    pub fn begin_transmission(&mut self, address: u8) {
        let acked = self.address(address, I2C_WRITE);
        self.last_error = if acked {
            None
        } else {
            debug!("address {:#x} not acknowledged", address);
            Some(TransferError::NackOnAddress)
        };
        self.in_transmission = true;
    }

    /// Address a device for writing, polling until it acknowledges
    ///
    /// For devices that are busy after power-up or during an internal
    /// write cycle. Gives up after the configured start-wait retries.
    pub fn begin_transmission_wait(&mut self, address: u8) {
        if self.in_transmission {
            self.engine.idle();
        }
        let acked = self.engine.start_wait((address << 1) | I2C_WRITE);
        self.last_error = if acked {
            None
        } else {
            Some(TransferError::NackOnAddress)
        };
        self.in_transmission = true;
    }

    /// Address a device and mark the bus claimed
    pub(crate) fn claim(&mut self, address: u8, rw: u8) -> bool {
        let acked = self.address(address, rw);
        self.in_transmission = true;
        acked
    }

    fn address(&mut self, address: u8, rw: u8) -> bool {
        let byte = (address << 1) | rw;
        if self.in_transmission {
            self.engine.rep_start(byte)
        } else {
            self.engine.start(byte)
        }
    }

    /// Send one data byte
    ///
    /// Returns the number of bytes acknowledged (0 or 1). A NACK is
    /// recorded unless an earlier error is already pending.
    pub fn write(&mut self, byte: u8) -> usize {
        if self.engine.write(byte) {
            1
        } else {
            if self.last_error.is_none() {
                debug!("data byte {:#x} not acknowledged", byte);
                self.last_error = Some(TransferError::NackOnData);
            }
            0
        }
    }

    /// Send every byte of `data`
    ///
    /// Keeps going after a NACK; returns the number of acknowledged bytes.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        data.iter().map(|&b| self.write(b)).sum()
    }

    /// Finish the transaction with a stop condition
    pub fn end_transmission(&mut self) -> Result<(), TransferError> {
        self.end_transmission_with(true)
    }

    /// Finish the transaction
    ///
    /// Returns the first error of the transaction. Without `send_stop` the
    /// bus stays claimed and the next addressing uses a repeated start.
    pub fn end_transmission_with(&mut self, send_stop: bool) -> Result<(), TransferError> {
        let result = match self.last_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        };
        if send_stop {
            self.engine.stop();
            self.in_transmission = false;
        }
        result
    }

    /// Read `quantity` bytes into the receive buffer, then send a stop
    ///
    /// Returns the number of bytes available.
    pub fn request_from(&mut self, address: u8, quantity: usize) -> usize {
        self.request_register(address, quantity, 0, 0, true)
    }

    /// Read `quantity` bytes into the receive buffer
    pub fn request_from_with(&mut self, address: u8, quantity: usize, send_stop: bool) -> usize {
        self.request_register(address, quantity, 0, 0, send_stop)
    }

    /// Read `quantity` bytes starting at an internal register address
    ///
    /// The low `internal_address_size` bytes (at most 3) of
    /// `internal_address` are written MSB first before the read, joined
    /// to it by a repeated start. `quantity` is clamped to the buffer
    /// capacity. Returns the number of bytes available, 0 on any
    /// addressing failure.
    pub fn request_register(
        &mut self,
        address: u8,
        quantity: usize,
        internal_address: u32,
        internal_address_size: u8,
        send_stop: bool,
    ) -> usize {
        self.last_error = None;

        if internal_address_size > 0 {
            self.begin_transmission(address);
            let size = internal_address_size.min(MAX_INTERNAL_ADDRESS_SIZE);
            for i in (0..size).rev() {
                self.write((internal_address >> (u32::from(i) * 8)) as u8);
            }
            // Register phase errors are dropped, the read phase reports its own
            let _ = self.end_transmission_with(false);
        }

        let quantity = if quantity > N {
            trace!("request of {} bytes clamped to {}", quantity, N);
            N
        } else {
            quantity
        };

        if !self.address(address, I2C_READ) && self.last_error.is_none() {
            debug!("address {:#x} not acknowledged for read", address);
            self.last_error = Some(TransferError::NackOnAddress);
        }
        self.in_transmission = true;

        let mut bytes = [0u8; N];
        for (i, slot) in bytes.iter_mut().take(quantity).enumerate() {
            *slot = self.engine.read(i + 1 == quantity);
        }

        let valid = if self.last_error.is_some() { 0 } else { quantity };
        self.rx.fill(&bytes[..valid]);

        if send_stop {
            self.in_transmission = false;
            self.engine.stop();
        }
        trace!("request from {:#x}: {} bytes", address, valid);
        valid
    }

    /// Check whether a device acknowledges its address
    pub fn probe(&mut self, address: u8) -> bool {
        self.begin_transmission(address);
        self.end_transmission().is_ok()
    }

    /// Bytes left in the receive buffer
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Take the next received byte, `None` when drained
    pub fn read(&mut self) -> Option<u8> {
        self.rx.read()
    }

    /// Look at the next received byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }

    /// Writes are synchronous; nothing to flush
    pub fn flush(&mut self) {}

    /// Whether the bus is claimed (no stop sent since the last start)
    pub fn is_transmitting(&self) -> bool {
        self.in_transmission
    }

    /// First error of the current transaction, if any
    pub fn last_error(&self) -> Option<TransferError> {
        self.last_error
    }

    /// Timing configuration
    pub fn config(&self) -> &BusConfig {
        self.engine.config()
    }

    pub(crate) fn engine(&mut self) -> &mut Engine<P, I, D> {
        &mut self.engine
    }

    pub(crate) fn rx(&mut self) -> &mut RxBuffer<N> {
        &mut self.rx
    }

    /// Give back the platform resources
    pub fn release(self) -> (P, I, D) {
        self.engine.release()
    }
}
