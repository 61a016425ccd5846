//! Softwire Hardware Abstraction Layer
//!
//! This crate defines the platform boundary consumed by the bit-banged I2C
//! master in `softwire-core`. Chip-specific crates implement these traits on
//! top of their GPIO drivers so the same protocol code runs on any target
//! that can switch a pin between input and output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (softwire-demo, etc.)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-core (protocol + transfers)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ softwire-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::PinControl`] - Pin mode switching and digital I/O
//! - [`interrupt::InterruptControl`] - Global interrupt masking
//! - [`i2c::I2cBus`] - I2C master operations
//!
//! Microsecond delays use [`embedded_hal::delay::DelayNs`] directly.
//!
//! [`embedded_hal::delay::DelayNs`]: https://docs.rs/embedded-hal/1.0/embedded_hal/delay/trait.DelayNs.html

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod interrupt;

// Re-export key traits at crate root for convenience
pub use gpio::{PinControl, PinMode};
pub use i2c::I2cBus;
pub use interrupt::{InterruptControl, MaskGuard};
