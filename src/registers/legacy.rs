//! Register layout of the original EC/salinity firmware: EC and seawater
//! measurement modes, raw count register and EEPROM passthrough.
#![allow(missing_docs)]
use bilge::prelude::*;

use super::{sealed, ConfigRegister, Field, Profile, Width};
use super::{EC_MEASUREMENT_TIME_MS, SETTLE_TIME_MS, TEMP_MEASUREMENT_TIME_MS};

/// Register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Hardware version.
    Version,

    /// Firmware version.
    FirmwareVersion,

    /// Conductivity in mS.
    Conductivity,

    /// Salinity in PSU.
    Salinity,

    /// Temperature in °C.
    Temperature,

    /// Raw conductivity count. Zero means nothing was measured.
    RawCount,

    /// Calibration solution, also the EEPROM address argument.
    Solution,

    /// Fresh-water calibration result.
    CalibrationEc,

    /// Seawater calibration result.
    CalibrationSw,

    /// Temperature compensation constant.
    TempConstant,

    /// General purpose float buffer.
    Buffer,

    /// Configuration register.
    Config,

    /// Task register.
    Task,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Version => 0,
            Register::FirmwareVersion => 1,
            Register::Conductivity => 2,
            Register::Salinity => 6,
            Register::Temperature => 10,
            Register::RawCount => 14,
            Register::Solution => 18,
            Register::CalibrationEc => 22,
            Register::CalibrationSw => 26,
            Register::TempConstant => 30,
            Register::Buffer => 34,
            Register::Config => 38,
            Register::Task => 39,
        }
    }
}

impl Field for Register {
    fn offset(self) -> u8 {
        self.into()
    }

    fn width(self) -> Width {
        match self {
            Register::Version
            | Register::FirmwareVersion
            | Register::TempConstant
            | Register::Config
            | Register::Task => Width::Byte,
            _ => Width::Float,
        }
    }
}

/// Task register commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    MeasureEc,
    MeasureSw,
    MeasureTemp,
    CalibrateEc,
    CalibrateSw,
    ChangeAddress,
    EepromRead,
    EepromWrite,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::MeasureEc => 80,
            Command::MeasureSw => 40,
            Command::MeasureTemp => 20,
            Command::CalibrateEc => 10,
            Command::CalibrateSw => 8,
            Command::ChangeAddress => 4,
            Command::EepromRead => 2,
            Command::EepromWrite => 1,
        }
    }
}

impl super::Command for Command {
    const TASK_REGISTER: u8 = 39;

    fn code(self) -> u8 {
        self.into()
    }

    fn delay_ms(self) -> u32 {
        match self {
            Command::MeasureEc | Command::MeasureSw => EC_MEASUREMENT_TIME_MS,
            Command::MeasureTemp | Command::CalibrateEc | Command::CalibrateSw => TEMP_MEASUREMENT_TIME_MS,
            Command::ChangeAddress | Command::EepromRead | Command::EepromWrite => SETTLE_TIME_MS,
        }
    }
}

/// Configuration register.
#[bitsize(8)]
#[derive(DebugBits, FromBits, PartialEq, Clone, Copy)]
pub struct Config {
    /// Temperature compensation
    pub temperature_compensation: bool,

    reserved1_7: u7,
}

impl ConfigRegister for Config {
    fn compensating(&self) -> bool {
        self.temperature_compensation()
    }

    fn set_compensating(&mut self, on: bool) {
        self.set_temperature_compensation(on);
    }

    fn clear_modes(&mut self) {
        self.set_temperature_compensation(false);
    }
}

/// Original firmware layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Legacy;

impl sealed::Sealed for Legacy {}

impl Profile for Legacy {
    type Register = Register;
    type Command = Command;
    type Config = Config;

    const NAME: &'static str = "legacy";

    const VERSION: Register = Register::Version;
    const CONDUCTIVITY: Register = Register::Conductivity;
    const SALINITY: Register = Register::Salinity;
    const TEMPERATURE: Register = Register::Temperature;
    const TEMP_CONSTANT: Register = Register::TempConstant;
    const CONFIG: Register = Register::Config;
    const ADDRESS_ARGUMENT: Register = Register::Buffer;
    const RAW_COUNT: Option<Register> = Some(Register::RawCount);
    const TEMP_COEFFICIENT: Option<Register> = None;
    const CALIBRATION: &'static [Register] = &[Register::CalibrationEc, Register::CalibrationSw];
    const RESET_TEMP_CONSTANT: u8 = 25;

    const MEASURE_EC: Command = Command::MeasureEc;
    const MEASURE_SALINITY: Command = Command::MeasureSw;
    const MEASURE_TEMP: Command = Command::MeasureTemp;
    const CHANGE_ADDRESS: Command = Command::ChangeAddress;
}
