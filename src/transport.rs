//! Register transport: byte and float register access, task commands and
//! the fixed settle delays.
//!
//! Every bus write is followed by [`SETTLE_TIME_MS`]. Commands instead wait
//! for their own [`Command::delay_ms`], after which the result registers are
//! assumed valid. The device has no completion flag, so a slower device
//! simply yields the previous value.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::registers::{Command, Field, Width, SETTLE_TIME_MS};
use crate::rounding::round_wire;
use crate::{Address, Error};

/// Exclusive session with one probe on the bus.
pub struct Transport<I2C: I2c, DELAY: DelayNs> {
    /// The concrete I2C bus implementation
    i2c: I2C,

    /// The concrete [`embedded_hal::delay::DelayNs`] implementation
    delay: DELAY,

    /// The I2C address.
    addr: u8,
}

impl<I2C: I2c, DELAY: DelayNs> Transport<I2C, DELAY> {
    /// Take ownership of the bus for the probe at `addr`.
    pub fn new(i2c: I2C, delay: DELAY, addr: Address) -> Self {
        Self {
            i2c,
            delay,
            addr: addr.into(),
        }
    }

    /// Destroy the transport, return the I2C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Current device address.
    #[must_use]
    pub fn address(&self) -> u8 {
        self.addr
    }

    pub(crate) fn set_address(&mut self, addr: Address) {
        self.addr = addr.into();
    }

    /// Read a float register, rounded to 7 significant digits.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn read_float<F: Field>(&mut self, field: F) -> Result<f32, Error<I2C::Error>> {
        debug_assert_eq!(field.width(), Width::Float, "{field:?} is not a float register");

        let mut bytes = [0; 4];
        self.select(field.offset())?;
        self.i2c.read(self.addr, &mut bytes).map_err(Error::Bus)?;
        Ok(round_wire(f32::from_be_bytes(bytes)))
    }

    /// Round `value` to 7 significant digits and write it to a float
    /// register in a single transaction.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn write_float<F: Field>(&mut self, field: F, value: f32) -> Result<(), Error<I2C::Error>> {
        debug_assert_eq!(field.width(), Width::Float, "{field:?} is not a float register");

        let mut data = [0; 5];
        data[0] = field.offset();
        data[1..].copy_from_slice(&round_wire(value).to_be_bytes());

        self.i2c.write(self.addr, &data).map_err(Error::Bus)?;
        self.delay.delay_ms(SETTLE_TIME_MS);
        Ok(())
    }

    /// Read a single byte register.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn read_byte<F: Field>(&mut self, field: F) -> Result<u8, Error<I2C::Error>> {
        debug_assert_eq!(field.width(), Width::Byte, "{field:?} is not a byte register");

        let mut byte = [0; 1];
        self.select(field.offset())?;
        self.i2c.read(self.addr, &mut byte).map_err(Error::Bus)?;
        Ok(byte[0])
    }

    /// Write a single byte register.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn write_byte<F: Field>(&mut self, field: F, value: u8) -> Result<(), Error<I2C::Error>> {
        debug_assert_eq!(field.width(), Width::Byte, "{field:?} is not a byte register");

        self.i2c.write(self.addr, &[field.offset(), value]).map_err(Error::Bus)?;
        self.delay.delay_ms(SETTLE_TIME_MS);
        Ok(())
    }

    /// Write `command` to the task register and block for as long as the
    /// device needs to carry it out.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn send_command<C: Command>(&mut self, command: C) -> Result<(), Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("task {=u8} -> {=u8:#x}", command.code(), self.addr);

        self.i2c
            .write(self.addr, &[C::TASK_REGISTER, command.code()])
            .map_err(Error::Bus)?;
        self.delay.delay_ms(command.delay_ms());
        Ok(())
    }

    /// Block for `ms` milliseconds.
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Point the device's register cursor at `offset`.
    fn select(&mut self, offset: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.addr, &[offset]).map_err(Error::Bus)?;
        self.delay.delay_ms(SETTLE_TIME_MS);
        Ok(())
    }
}
