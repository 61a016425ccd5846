//! Error types
//!
//! Transfer errors share the numeric code space of the Arduino Wire API
//! (0 = success), so callers porting Wire code can keep comparing codes.

use core::fmt;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

/// Error recorded during a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TransferError {
    /// Data did not fit the transmit buffer (reserved, never produced here)
    DataTooLong = 1,
    /// The slave did not acknowledge its address
    NackOnAddress = 2,
    /// The slave did not acknowledge a data byte
    NackOnData = 3,
}

impl TransferError {
    /// Wire-compatible status code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a Wire status code back to an error
    ///
    /// Returns `None` for 0 (success) and for unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(TransferError::DataTooLong),
            2 => Some(TransferError::NackOnAddress),
            3 => Some(TransferError::NackOnData),
            _ => None,
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::DataTooLong => f.write_str("data too long"),
            TransferError::NackOnAddress => f.write_str("address not acknowledged"),
            TransferError::NackOnData => f.write_str("data not acknowledged"),
        }
    }
}

impl embedded_hal::i2c::Error for TransferError {
    fn kind(&self) -> ErrorKind {
        match self {
            TransferError::DataTooLong => ErrorKind::Overrun,
            TransferError::NackOnAddress => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            TransferError::NackOnData => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
        }
    }
}

/// Bus initialization failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// A line stayed low after being released
    ///
    /// Another device is holding it, or the pull-ups are missing.
    BusStuck {
        /// Data line read low
        sda_low: bool,
        /// Clock line read low
        scl_low: bool,
    },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::BusStuck { sda_low, scl_low } => write!(
                f,
                "bus stuck (sda low: {}, scl low: {})",
                sda_low, scl_low
            ),
        }
    }
}
