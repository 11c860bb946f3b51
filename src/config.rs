//! Device address and per-platform bus description.
//!
//! Bringing the bus up is the caller's job; [`Config`] only records and
//! validates what a platform needs so that the values can be checked once,
//! before any driver is constructed.

use crate::Error;

/// A validated 7-bit I2C address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// Factory default address of the probe.
    pub const DEFAULT: Address = Address(0x3c);

    /// Validate a 7-bit address. The reserved ranges `0x00..=0x07` and
    /// `0x78..=0x7f` are rejected.
    ///
    /// # Errors
    ///
    /// `Error::InvalidAddress` when `addr` is not a usable 7-bit address
    pub fn new<E>(addr: u8) -> Result<Self, Error<E>> {
        if (0x08..=0x77).contains(&addr) {
            Ok(Self(addr))
        } else {
            Err(Error::InvalidAddress(addr))
        }
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<Address> for u8 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

/// Bus parameters of the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Platform {
    /// Microcontroller with the bus on two GPIO pins.
    Microcontroller {
        /// Data pin number.
        sda: u8,

        /// Clock pin number.
        scl: u8,

        /// Bus clock in Hz.
        frequency: u32,
    },

    /// Single-board computer with a kernel I2C adapter, `/dev/i2c-<bus>`.
    SingleBoard {
        /// Adapter number.
        bus: u8,
    },
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SDA and SCL name the same pin.
    SharedPin(u8),

    /// Bus clock outside 10 kHz ..= 1 MHz.
    Frequency(u32),

    /// Not a usable 7-bit device address.
    Address(u8),
}

/// Everything needed to reach one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    platform: Platform,
    address: Address,
}

impl Config {
    /// Standard mode bus clock.
    pub const STANDARD_FREQUENCY: u32 = 100_000;

    /// Adapter used by the single-board reference setup.
    pub const DEFAULT_BUS: u8 = 3;

    /// Microcontroller bus on the given pins at 100 kHz, default address.
    ///
    /// # Errors
    ///
    /// `ConfigError::SharedPin` when both lines are mapped to the same pin
    pub fn microcontroller(sda: u8, scl: u8) -> Result<Self, ConfigError> {
        Self::new(
            Platform::Microcontroller {
                sda,
                scl,
                frequency: Self::STANDARD_FREQUENCY,
            },
            u8::from(Address::DEFAULT),
        )
    }

    /// Single-board computer adapter `bus`, default address.
    #[must_use]
    pub fn single_board(bus: u8) -> Self {
        Self {
            platform: Platform::SingleBoard { bus },
            address: Address::DEFAULT,
        }
    }

    /// Validate a platform description together with a device address.
    ///
    /// # Errors
    ///
    /// `ConfigError` naming the first invalid field
    pub fn new(platform: Platform, address: u8) -> Result<Self, ConfigError> {
        if let Platform::Microcontroller { sda, scl, frequency } = platform {
            if sda == scl {
                return Err(ConfigError::SharedPin(sda));
            }
            if !(10_000..=1_000_000).contains(&frequency) {
                return Err(ConfigError::Frequency(frequency));
            }
        }

        let address = Address::new::<()>(address).map_err(|_| ConfigError::Address(address))?;
        Ok(Self { platform, address })
    }

    /// Use another device address.
    ///
    /// # Errors
    ///
    /// `ConfigError::Address` when `address` is not a usable 7-bit address
    pub fn with_address(self, address: u8) -> Result<Self, ConfigError> {
        Self::new(self.platform, address)
    }

    /// Bus parameters.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Device address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::single_board(Self::DEFAULT_BUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_address() {
        assert_eq!(u8::from(Address::default()), 0x3c);
        assert_eq!(Config::default().address(), Address::DEFAULT);
        assert_eq!(Config::default().platform(), Platform::SingleBoard { bus: 3 });
    }

    #[test]
    fn reject_reserved_addresses() {
        assert_eq!(Address::new::<()>(0x07), Err(Error::InvalidAddress(0x07)));
        assert_eq!(Address::new::<()>(0x78), Err(Error::InvalidAddress(0x78)));
        assert_eq!(Address::new::<()>(0x80), Err(Error::InvalidAddress(0x80)));
        assert!(Address::new::<()>(0x3d).is_ok());
    }

    #[test]
    fn microcontroller_pins_must_differ() {
        assert_eq!(Config::microcontroller(4, 4), Err(ConfigError::SharedPin(4)));

        let cfg = Config::microcontroller(21, 22).unwrap();
        assert_eq!(
            cfg.platform(),
            Platform::Microcontroller {
                sda: 21,
                scl: 22,
                frequency: 100_000
            }
        );
    }

    #[test]
    fn validate_frequency_and_address() {
        let platform = Platform::Microcontroller {
            sda: 0,
            scl: 1,
            frequency: 5_000_000,
        };
        assert_eq!(Config::new(platform, 0x3c), Err(ConfigError::Frequency(5_000_000)));

        let cfg = Config::single_board(1);
        assert_eq!(cfg.with_address(0xff), Err(ConfigError::Address(0xff)));
        assert_eq!(u8::from(cfg.with_address(0x3d).unwrap().address()), 0x3d);
    }
}
