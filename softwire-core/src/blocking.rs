//! Trait implementations for the ecosystem
//!
//! - [`embedded_hal::i2c::I2c`] so device drivers written against
//!   embedded-hal 1.0 can use the software bus
//! - [`softwire_hal::I2cBus`] for application code
//! - [`embedded_io::Read`] draining the receive buffer filled by
//!   [`SoftWire::request_from`]
//!
//! The embedded-hal path runs its own transaction: reads go straight into
//! the caller's buffers (no capacity limit) and the transaction always
//! ends with a stop.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
use softwire_hal::{I2cBus, InterruptControl, PinControl};

use crate::config::{I2C_READ, I2C_WRITE};
use crate::controller::SoftWire;
use crate::error::TransferError;

impl<P, I, D, const N: usize> SoftWire<P, I, D, N>
where
    P: PinControl,
    I: InterruptControl,
    D: DelayNs,
{
    fn run_operations(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), TransferError> {
        if operations.iter().all(is_empty_read) {
            // Nothing to clock: address the device for write only, like a scan
            return if self.claim(address, I2C_WRITE) {
                Ok(())
            } else {
                Err(TransferError::NackOnAddress)
            };
        }

        // Direction of the previous operation, None before the first
        let mut reading: Option<bool> = None;

        for i in 0..operations.len() {
            if is_empty_read(&operations[i]) {
                continue;
            }
            let next_is_read = matches!(
                operations[i + 1..].iter().find(|op| !is_empty_read(op)),
                Some(Operation::Read(_))
            );

            match &mut operations[i] {
                Operation::Write(bytes) => {
                    if reading != Some(false) {
                        if !self.claim(address, I2C_WRITE) {
                            return Err(TransferError::NackOnAddress);
                        }
                        reading = Some(false);
                    }
                    for &byte in bytes.iter() {
                        if !self.engine().write(byte) {
                            return Err(TransferError::NackOnData);
                        }
                    }
                }
                Operation::Read(buf) => {
                    if reading != Some(true) {
                        if !self.claim(address, I2C_READ) {
                            return Err(TransferError::NackOnAddress);
                        }
                        reading = Some(true);
                    }
                    let len = buf.len();
                    for (j, slot) in buf.iter_mut().enumerate() {
                        // Only the end of a contiguous read run is NACKed
                        let last = j + 1 == len && !next_is_read;
                        *slot = self.engine().read(last);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Zero-length reads clock nothing and do not split a read run
fn is_empty_read(op: &Operation<'_>) -> bool {
    matches!(op, Operation::Read(buf) if buf.is_empty())
}

impl<P, I, D, const N: usize> embedded_hal::i2c::ErrorType for SoftWire<P, I, D, N>
where
    P: PinControl,
    I: InterruptControl,
    D: DelayNs,
{
    type Error = TransferError;
}

impl<P, I, D, const N: usize> I2c<SevenBitAddress> for SoftWire<P, I, D, N>
where
    P: PinControl,
    I: InterruptControl,
    D: DelayNs,
{
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), TransferError> {
        let result = self.run_operations(address, operations);
        if let Err(err) = result {
            debug!("transaction with {:#x} failed: {}", address, err.code());
        }
        // Always release the bus; the Wire error slot is reset with it
        let _ = self.end_transmission_with(true);
        result
    }
}

impl<P, I, D, const N: usize> I2cBus for SoftWire<P, I, D, N>
where
    P: PinControl,
    I: InterruptControl,
    D: DelayNs,
{
    type Error = TransferError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), TransferError> {
        I2c::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), TransferError> {
        I2c::read(self, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), TransferError> {
        I2c::write_read(self, address, write_data, read_buf)
    }
}

impl<P, I, D, const N: usize> embedded_io::ErrorType for SoftWire<P, I, D, N>
where
    P: PinControl,
    I: InterruptControl,
    D: DelayNs,
{
    type Error = Infallible;
}

impl<P, I, D, const N: usize> embedded_io::Read for SoftWire<P, I, D, N>
where
    P: PinControl,
    I: InterruptControl,
    D: DelayNs,
{
    /// Copy received bytes; returns 0 once the buffer is drained
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        Ok(self.rx().read_into(buf))
    }
}
