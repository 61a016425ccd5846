//! I2C bus abstractions
//!
//! Provides a Result-based I2C master trait for application code that does
//! not want to deal with the Wire-style transaction state of the
//! bit-banged controller.

/// I2C bus master
///
/// Every call is one complete transaction: it starts, addresses the
/// device, transfers, and always ends with a stop, even on error.
pub trait I2cBus {
    /// Why a transaction failed (address or data not acknowledged)
    type Error;

    /// Send `data` to the device at 7-bit `address`
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` from the device; the last byte is not acknowledged
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send `write_data`, then read into `read_buf` after a repeated start
    ///
    /// The usual register access: `write_data` holds the register pointer.
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Read a single register through a one-byte register pointer
    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.write_read(address, &[register], &mut buf)?;
        Ok(buf[0])
    }
}
