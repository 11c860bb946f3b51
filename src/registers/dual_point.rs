//! Register layout of the dual-point firmware: cell constant, single-offset
//! or dual-point calibration and dry calibration.
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

    /// Conductivity in mS.
    Conductivity,

    /// Temperature in °C.
    Temperature,

    /// Cell constant.
    K,

    /// Calibration solution, also the change-address argument.
    Solution,

    /// Temperature coefficient used by the next measurement or calibration.
    TempCoefficient,

    /// Dual-point high reference.
    ReferenceHigh,

    /// Dual-point low reference.
    ReferenceLow,

    /// Dual-point high reading.
    ReadingHigh,

    /// Dual-point low reading.
    ReadingLow,

    /// Single-point calibration offset.
    CalibrationOffset,

    /// Salinity in PSU.
    Salinity,

    /// Dry calibration reading.
    Dry,

    /// Temperature compensation constant.
    TempConstant,

    /// Configuration register.
    Config,

    /// Task register.
    Task,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Version => 0,
            Register::Conductivity => 1,
            Register::Temperature => 5,
            Register::K => 9,
            Register::Solution => 13,
            Register::TempCoefficient => 17,
            Register::ReferenceHigh => 21,
            Register::ReferenceLow => 25,
            Register::ReadingHigh => 29,
            Register::ReadingLow => 33,
            Register::CalibrationOffset => 37,
            Register::Salinity => 41,
            Register::Dry => 45,
            Register::TempConstant => 49,
            Register::Config => 50,
            Register::Task => 51,
        }
    }
}

impl Field for Register {
    fn offset(self) -> u8 {
        self.into()
    }

    fn width(self) -> Width {
        match self {
            Register::Version | Register::TempConstant | Register::Config | Register::Task => Width::Byte,
            _ => Width::Float,
        }
    }
}

/// Task register commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    MeasureEc,
    MeasureTemp,
    CalibrateProbe,
    CalibrateLow,
    CalibrateHigh,
    CalibrateDry,
    ChangeAddress,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::MeasureEc => 80,
            Command::MeasureTemp => 40,
            Command::CalibrateProbe => 20,
            Command::CalibrateLow => 10,
            Command::CalibrateHigh => 8,
            Command::CalibrateDry => 81,
            Command::ChangeAddress => 1,
        }
    }
}

impl super::Command for Command {
    const TASK_REGISTER: u8 = 51;

    fn code(self) -> u8 {
        self.into()
    }

    fn delay_ms(self) -> u32 {
        match self {
            Command::MeasureEc => EC_MEASUREMENT_TIME_MS,
            Command::MeasureTemp => TEMP_MEASUREMENT_TIME_MS,
            // calibration takes a conductivity and a temperature reading
            Command::CalibrateProbe | Command::CalibrateLow | Command::CalibrateHigh | Command::CalibrateDry => {
                EC_MEASUREMENT_TIME_MS + TEMP_MEASUREMENT_TIME_MS
            }
            Command::ChangeAddress => SETTLE_TIME_MS,
        }
    }
}

/// Configuration register.
#[bitsize(8)]
#[derive(DebugBits, FromBits, PartialEq, Clone, Copy)]
pub struct Config {
    /// Dual-point calibration. Mutually exclusive with the single offset.
    pub dual_point: bool,

    /// Temperature compensation
    pub temperature_compensation: bool,

    reserved2_7: u6,
}

impl Config {
    /// Configure dual-point mode.
    #[must_use]
    pub fn with_dual_point(mut self, on: bool) -> Self {
        self.set_dual_point(on);
        self
    }
}

impl ConfigRegister for Config {
    fn compensating(&self) -> bool {
        self.temperature_compensation()
    }

    fn set_compensating(&mut self, on: bool) {
        self.set_temperature_compensation(on);
    }

    fn clear_modes(&mut self) {
        self.set_dual_point(false);
        self.set_temperature_compensation(false);
    }
}

/// Dual-point firmware layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DualPoint;

impl sealed::Sealed for DualPoint {}

impl Profile for DualPoint {
    type Register = Register;
    type Command = Command;
    type Config = Config;

    const NAME: &'static str = "dual-point";

    const VERSION: Register = Register::Version;
    const CONDUCTIVITY: Register = Register::Conductivity;
    const SALINITY: Register = Register::Salinity;
    const TEMPERATURE: Register = Register::Temperature;
    const TEMP_CONSTANT: Register = Register::TempConstant;
    const CONFIG: Register = Register::Config;
    const ADDRESS_ARGUMENT: Register = Register::Solution;
    const RAW_COUNT: Option<Register> = None;
    const TEMP_COEFFICIENT: Option<Register> = Some(Register::TempCoefficient);
    const CALIBRATION: &'static [Register] = &[
        Register::K,
        Register::CalibrationOffset,
        Register::ReferenceHigh,
        Register::ReferenceLow,
        Register::ReadingHigh,
        Register::ReadingLow,
        Register::Dry,
    ];
    const RESET_TEMP_CONSTANT: u8 = 0;

    const MEASURE_EC: Command = Command::MeasureEc;
    const MEASURE_SALINITY: Command = Command::MeasureEc;
    const MEASURE_TEMP: Command = Command::MeasureTemp;
    const CHANGE_ADDRESS: Command = Command::ChangeAddress;
}
