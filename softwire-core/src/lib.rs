//! Bit-banged I2C master
//!
//! Drives an I2C bus through two ordinary GPIO pins, for boards where the
//! hardware controller is missing, busy, or not routed to the wanted pins.
//!
//! The crate is layered bottom-up:
//!
//! - [`pins`] - open-drain emulation on push-pull GPIOs, with optional
//!   internal pull-up assist and interrupt-masked mode switches
//! - [`engine`] - start, repeated start, stop, byte write with ACK
//!   sampling, byte read with ACK/NACK
//! - [`controller`] - Wire-style transactions ([`SoftWire`]) tracking the
//!   claimed-bus state and the first error of a transaction
//! - [`buffer`] - receive buffer with read cursor
//!
//! Platform access goes through the `softwire-hal` traits and
//! [`embedded_hal::delay::DelayNs`]. Everything is blocking: a call
//! returns when its bus activity is complete.
//!
//! Not supported: multi-master arbitration, clock stretching, slave mode.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible in the other modules
mod fmt;

pub mod blocking;
pub mod buffer;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod pins;

#[cfg(test)]
mod sim;

pub use buffer::RxBuffer;
pub use config::BusConfig;
pub use controller::SoftWire;
pub use engine::Engine;
pub use error::{InitError, TransferError};
pub use pins::OpenDrain;
