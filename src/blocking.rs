//! EC/salinity probe blocking API

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
#[cfg(feature = "embedded-sensors-hal")]
use embedded_sensors_hal::sensor;
#[cfg(feature = "embedded-sensors-hal")]
use embedded_sensors_hal::temperature::{DegreesCelsius, TemperatureSensor};

use crate::measurement::{is_absent, Conductivity, Salinity, Temperature};
use crate::measurement::{TEMP_COEFFICIENT_EC, TEMP_COEFFICIENT_SALINITY};
use crate::registers::{dual_point, legacy, ConfigRegister, DualPoint, Legacy, Profile};
use crate::registers::TEMP_MEASUREMENT_TIME_MS;
use crate::transport::Transport;
use crate::{Address, Config, Error};

/// EC/salinity probe blocking device driver, for the firmware layout `P`.
pub struct EcSalinity<I2C: I2c, DELAY: DelayNs, P: Profile> {
    /// Register access to the probe.
    transport: Transport<I2C, DELAY>,

    /// Last conductivity measurement.
    conductivity: Conductivity,

    /// Last temperature measured or set.
    temperature: Temperature,

    profile: PhantomData<P>,
}

type Result<T, I2C> = core::result::Result<T, Error<<I2C as embedded_hal::i2c::ErrorType>::Error>>;

impl<I2C: I2c, DELAY: DelayNs, P: Profile> EcSalinity<I2C, DELAY, P> {
    /// Create a new driver instance for the probe at `addr`.
    pub fn new(i2c: I2C, delay: DELAY, addr: Address) -> Self {
        Self {
            transport: Transport::new(i2c, delay, addr),
            conductivity: Conductivity::default(),
            temperature: Temperature::default(),
            profile: PhantomData,
        }
    }

    /// Create a new driver instance responding to the factory address `0x3c`.
    pub fn new_with_default_address(i2c: I2C, delay: DELAY) -> Self {
        Self::new(i2c, delay, Address::DEFAULT)
    }

    /// Create a new driver instance for the device described by `config`.
    pub fn from_config(i2c: I2C, delay: DELAY, config: &Config) -> Self {
        Self::new(i2c, delay, config.address())
    }

    /// Destroy the driver instance, return the I2C bus instance.
    pub fn destroy(self) -> I2C {
        self.transport.destroy()
    }

    /// Current I2C address.
    #[must_use]
    pub fn address(&self) -> u8 {
        self.transport.address()
    }

    /// Name of the register layout in use.
    #[must_use]
    pub fn profile(&self) -> &'static str {
        P::NAME
    }

    /// Result of the last conductivity measurement.
    #[must_use]
    pub fn last_conductivity(&self) -> Conductivity {
        self.conductivity
    }

    /// Last temperature measured or set.
    #[must_use]
    pub fn last_temperature(&self) -> Temperature {
        self.temperature
    }

    /// Measure fresh-water conductivity, taking a new temperature reading
    /// first when temperature compensation is enabled.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn measure_ec(&mut self) -> Result<Conductivity, I2C> {
        let new_temp = self.using_temperature_compensation()?;
        self.measure(P::MEASURE_EC, TEMP_COEFFICIENT_EC, new_temp)
    }

    /// Measure salinity, taking a new temperature reading first when
    /// temperature compensation is enabled.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn measure_salinity(&mut self) -> Result<Salinity, I2C> {
        let new_temp = self.using_temperature_compensation()?;
        let ec = self.measure(P::MEASURE_SALINITY, TEMP_COEFFICIENT_SALINITY, new_temp)?;
        Ok(ec.salinity)
    }

    /// Measure temperature. `-127 °C` means the sensor is disconnected.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn measure_temp(&mut self) -> Result<Temperature, I2C> {
        self.transport.send_command(P::MEASURE_TEMP)?;
        let celsius = self.transport.read_float(P::TEMPERATURE)?;

        self.temperature = Temperature::from_celsius(celsius);
        Ok(self.temperature)
    }

    /// Set the temperature the device uses for compensation.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn set_temp(&mut self, celsius: f32) -> Result<(), I2C> {
        self.transport.write_float(P::TEMPERATURE, celsius)?;
        self.temperature = Temperature::from_celsius(celsius);
        Ok(())
    }

    /// Read the temperature constant.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn temp_constant(&mut self) -> Result<u8, I2C> {
        self.transport.read_byte(P::TEMP_CONSTANT)
    }

    /// Compensate to a fixed temperature instead of the measured one. On the
    /// dual-point firmware `0xff` restores the measured temperature.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn set_temp_constant(&mut self, celsius: u8) -> Result<(), I2C> {
        self.transport.write_byte(P::TEMP_CONSTANT, celsius)
    }

    /// Enable or disable temperature compensation.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn use_temperature_compensation(&mut self, on: bool) -> Result<(), I2C> {
        let mut config = self.config()?;
        config.set_compensating(on);
        self.set_config(config)
    }

    /// Whether temperature compensation is enabled.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn using_temperature_compensation(&mut self) -> Result<bool, I2C> {
        Ok(self.config()?.compensating())
    }

    /// Read the hardware version.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn version(&mut self) -> Result<u8, I2C> {
        self.transport.read_byte(P::VERSION)
    }

    /// Whether a probe answers at the current address. An absent device
    /// reads back `0xff`.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn connected(&mut self) -> Result<bool, I2C> {
        Ok(self.version()? != 0xff)
    }

    /// Permanently change the device address. A forgotten address can only
    /// be recovered with a bus scan.
    ///
    /// # Errors
    ///
    /// `Error::InvalidAddress` when `addr` is not a usable 7-bit address,
    /// `Error::Bus` when the I2C transaction fails
    pub fn set_i2c_address(&mut self, addr: u8) -> Result<(), I2C> {
        let new = Address::new::<I2C::Error>(addr)?;

        self.transport.write_float(P::ADDRESS_ARGUMENT, f32::from(addr))?;
        self.transport.send_command(P::CHANGE_ADDRESS)?;
        self.transport.set_address(new);
        Ok(())
    }

    /// Clear all stored calibration to NaN, restore the default temperature
    /// constant and disable every mode bit.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn reset(&mut self) -> Result<(), I2C> {
        for &reg in P::CALIBRATION {
            self.transport.write_float(reg, f32::NAN)?;
        }
        self.set_temp_constant(P::RESET_TEMP_CONSTANT)?;

        let mut config = self.config()?;
        config.clear_modes();
        self.set_config(config)
    }

    fn measure(&mut self, command: P::Command, coefficient: f32, new_temp: bool) -> Result<Conductivity, I2C> {
        if new_temp {
            self.measure_temp()?;
        }
        if let Some(reg) = P::TEMP_COEFFICIENT {
            self.transport.write_float(reg, coefficient)?;
        }

        self.transport.send_command(command)?;
        let ms = self.transport.read_float(P::CONDUCTIVITY)?;
        let raw = match P::RAW_COUNT {
            Some(reg) => self.transport.read_float(reg)?,
            None => ms,
        };

        self.conductivity = if is_absent(raw) || ms.is_infinite() {
            Conductivity::none()
        } else {
            let psu = self.transport.read_float(P::SALINITY)?;
            Conductivity::new(ms, psu)
        };
        Ok(self.conductivity)
    }

    fn config(&mut self) -> Result<P::Config, I2C> {
        let raw = self.transport.read_byte(P::CONFIG)?;
        Ok(P::Config::from(raw))
    }

    fn set_config(&mut self, config: P::Config) -> Result<(), I2C> {
        self.transport.write_byte(P::CONFIG, config.into())
    }
}

impl<I2C: I2c, DELAY: DelayNs> EcSalinity<I2C, DELAY, Legacy> {
    /// Read the firmware version.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn firmware_version(&mut self) -> Result<u8, I2C> {
        self.transport.read_byte(legacy::Register::FirmwareVersion)
    }

    /// Measure fresh-water conductivity, optionally taking a new temperature
    /// reading first.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn measure_ec_with(&mut self, new_temp: bool) -> Result<Conductivity, I2C> {
        self.measure(legacy::Command::MeasureEc, TEMP_COEFFICIENT_EC, new_temp)
    }

    /// Measure in seawater mode, optionally taking a new temperature
    /// reading first.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn measure_sw_with(&mut self, new_temp: bool) -> Result<Conductivity, I2C> {
        self.measure(legacy::Command::MeasureSw, TEMP_COEFFICIENT_SALINITY, new_temp)
    }

    /// Calibrate against a fresh-water solution of `solution` mS.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_ec(&mut self, solution: f32) -> Result<(), I2C> {
        self.transport.write_float(legacy::Register::Solution, solution)?;
        self.transport.send_command(legacy::Command::CalibrateEc)
    }

    /// Calibrate against a seawater solution of `solution` mS.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_sw(&mut self, solution: f32) -> Result<(), I2C> {
        self.transport.write_float(legacy::Register::Solution, solution)?;
        self.transport.send_command(legacy::Command::CalibrateSw)
    }

    /// Read the fresh-water calibration.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibration_ec(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(legacy::Register::CalibrationEc)
    }

    /// Read the seawater calibration.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibration_sw(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(legacy::Register::CalibrationSw)
    }

    /// Read a float from the device's EEPROM.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn read_eeprom(&mut self, addr: u16) -> Result<f32, I2C> {
        self.transport.write_float(legacy::Register::Solution, f32::from(addr))?;
        self.transport.send_command(legacy::Command::EepromRead)?;
        self.transport.read_float(legacy::Register::Buffer)
    }

    /// Write a float to the device's EEPROM.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn write_eeprom(&mut self, addr: u16, value: f32) -> Result<(), I2C> {
        self.transport.write_float(legacy::Register::Solution, f32::from(addr))?;
        self.transport.write_float(legacy::Register::Buffer, value)?;
        self.transport.send_command(legacy::Command::EepromWrite)
    }
}

impl<I2C: I2c, DELAY: DelayNs> EcSalinity<I2C, DELAY, DualPoint> {
    /// Measure conductivity compensated with `coefficient`, optionally
    /// taking a new temperature reading first.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn measure_ec_with(&mut self, coefficient: f32, new_temp: bool) -> Result<Conductivity, I2C> {
        self.measure(dual_point::Command::MeasureEc, coefficient, new_temp)
    }

    /// Single-point calibration against a solution of `solution` mS. The
    /// resulting offset is stored in the device's EEPROM.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_probe(&mut self, solution: f32, coefficient: f32) -> Result<(), I2C> {
        self.calibrate(dual_point::Command::CalibrateProbe, solution, coefficient)
    }

    /// Record the low dual-point reading against a solution of `solution` mS.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_probe_low(&mut self, solution: f32, coefficient: f32) -> Result<(), I2C> {
        self.calibrate(dual_point::Command::CalibrateLow, solution, coefficient)
    }

    /// Record the high dual-point reading against a solution of `solution` mS.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_probe_high(&mut self, solution: f32, coefficient: f32) -> Result<(), I2C> {
        self.calibrate(dual_point::Command::CalibrateHigh, solution, coefficient)
    }

    /// Record the reading of the dry probe.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_dry(&mut self) -> Result<(), I2C> {
        self.transport.send_command(dual_point::Command::CalibrateDry)
    }

    /// Read the dry calibration.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_dry_value(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(dual_point::Register::Dry)
    }

    /// Write all four dual-point calibration values.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn set_dual_point_calibration(
        &mut self,
        ref_low: f32,
        ref_high: f32,
        read_low: f32,
        read_high: f32,
    ) -> Result<(), I2C> {
        self.transport.write_float(dual_point::Register::ReferenceLow, ref_low)?;
        self.transport.write_float(dual_point::Register::ReferenceHigh, ref_high)?;
        self.transport.write_float(dual_point::Register::ReadingLow, read_low)?;
        self.transport.write_float(dual_point::Register::ReadingHigh, read_high)?;
        self.transport.delay_ms(TEMP_MEASUREMENT_TIME_MS);
        Ok(())
    }

    /// Read the dual-point high reference.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_high_reference(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(dual_point::Register::ReferenceHigh)
    }

    /// Read the dual-point low reference.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_low_reference(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(dual_point::Register::ReferenceLow)
    }

    /// Read the dual-point high reading.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_high_reading(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(dual_point::Register::ReadingHigh)
    }

    /// Read the dual-point low reading.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_low_reading(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(dual_point::Register::ReadingLow)
    }

    /// Set the cell constant.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn set_k(&mut self, k: f32) -> Result<(), I2C> {
        self.transport.write_float(dual_point::Register::K, k)
    }

    /// Read the cell constant.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn k(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(dual_point::Register::K)
    }

    /// Set the single-point calibration offset.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn set_calibrate_offset(&mut self, offset: f32) -> Result<(), I2C> {
        self.transport.write_float(dual_point::Register::CalibrationOffset, offset)
    }

    /// Read the single-point calibration offset.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn calibrate_offset(&mut self) -> Result<f32, I2C> {
        self.transport.read_float(dual_point::Register::CalibrationOffset)
    }

    /// Switch between dual-point and single-offset calibration.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn use_dual_point(&mut self, on: bool) -> Result<(), I2C> {
        let config = self.config()?.with_dual_point(on);
        self.set_config(config)
    }

    /// Whether dual-point calibration is in use.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails
    pub fn using_dual_point(&mut self) -> Result<bool, I2C> {
        Ok(self.config()?.dual_point())
    }

    /// Run a calibration command with dual-point mode off, then put the
    /// mode bit back the way it was.
    fn calibrate(&mut self, command: dual_point::Command, solution: f32, coefficient: f32) -> Result<(), I2C> {
        let config = self.config()?;
        let was_dual_point = config.dual_point();
        self.set_config(config.with_dual_point(false))?;

        self.transport.write_float(dual_point::Register::TempCoefficient, coefficient)?;
        self.transport.write_float(dual_point::Register::Solution, solution)?;
        self.transport.send_command(command)?;

        self.use_dual_point(was_dual_point)
    }
}

#[cfg(feature = "embedded-sensors-hal")]
impl<I2C: I2c, DELAY: DelayNs, P: Profile> sensor::ErrorType for EcSalinity<I2C, DELAY, P> {
    type Error = Error<I2C::Error>;
}

#[cfg(feature = "embedded-sensors-hal")]
impl<I2C: I2c, DELAY: DelayNs, P: Profile> TemperatureSensor for EcSalinity<I2C, DELAY, P> {
    fn temperature(&mut self) -> core::result::Result<DegreesCelsius, Self::Error> {
        self.measure_temp().map(|t| t.celsius)
    }
}
