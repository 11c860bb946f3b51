//! This is a platform-agnostic Rust driver for the I2C electrical
//! conductivity / salinity probe based on the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//!
//! The same driver serves microcontrollers and single-board computers:
//! anything providing [`embedded_hal::i2c::I2c`] and
//! [`embedded_hal::delay::DelayNs`] will do.

#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

pub mod blocking;
pub mod config;
mod error;
pub mod measurement;
pub mod registers;
pub mod rounding;
pub mod transport;

#[cfg(test)]
mod sim;

pub use config::{Address, Config};
pub use error::Error;
pub use registers::{DualPoint, Legacy, Profile};
