//! Register maps and command tables.
//!
//! Two incompatible firmware layouts exist for this probe. Each one is a
//! marker type implementing [`Profile`], chosen once when the driver is
//! constructed.

use core::fmt::Debug;

pub mod dual_point;
pub mod legacy;

pub use dual_point::DualPoint;
pub use legacy::Legacy;

mod sealed {
    pub trait Sealed {}
}

/// Width of a register field in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Width {
    /// Single byte: version, config and command fields.
    Byte,

    /// IEEE-754 single precision float over four consecutive registers.
    Float,
}

impl Width {
    /// Number of bytes occupied on the bus.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Width::Byte => 1,
            Width::Float => 4,
        }
    }
}

/// A named register of a profile's map.
pub trait Field: Copy + Debug {
    /// Byte offset of the field.
    fn offset(self) -> u8;

    /// Width of the field.
    fn width(self) -> Width;
}

/// A task register command.
pub trait Command: Copy + Debug {
    /// Offset of the task register the command is written to.
    const TASK_REGISTER: u8;

    /// Code written to the task register.
    fn code(self) -> u8;

    /// Time the device needs to finish the command. There is no completion
    /// signal, so the driver always waits exactly this long.
    fn delay_ms(self) -> u32;
}

/// Config register bits shared by every profile.
pub trait ConfigRegister: Copy + Debug + From<u8> + Into<u8> {
    /// Temperature compensation enabled.
    fn compensating(&self) -> bool;

    /// Enable or disable temperature compensation.
    fn set_compensating(&mut self, on: bool);

    /// Clear every mode bit, as after a factory reset.
    fn clear_modes(&mut self);
}

/// A firmware register layout.
pub trait Profile: sealed::Sealed {
    /// Register names of this layout.
    type Register: Field + 'static;

    /// Task register commands of this layout.
    type Command: Command;

    /// Config register layout.
    type Config: ConfigRegister;

    /// Human readable profile name.
    const NAME: &'static str;

    /// Hardware version byte. `0xFF` means nothing answered.
    const VERSION: Self::Register;

    /// Measured conductivity in mS.
    const CONDUCTIVITY: Self::Register;

    /// Measured salinity in PSU.
    const SALINITY: Self::Register;

    /// Temperature in °C.
    const TEMPERATURE: Self::Register;

    /// Fixed compensation temperature.
    const TEMP_CONSTANT: Self::Register;

    /// Configuration bits.
    const CONFIG: Self::Register;

    /// Float argument of the change-address command.
    const ADDRESS_ARGUMENT: Self::Register;

    /// Raw count checked for an empty measurement. Without one the
    /// conductivity register itself is checked.
    const RAW_COUNT: Option<Self::Register>;

    /// Temperature coefficient written before each measurement, if the
    /// firmware takes one.
    const TEMP_COEFFICIENT: Option<Self::Register>;

    /// Calibration registers cleared to NaN by a reset.
    const CALIBRATION: &'static [Self::Register];

    /// Temperature constant restored by a reset.
    const RESET_TEMP_CONSTANT: u8;

    /// Start a fresh-water conductivity measurement.
    const MEASURE_EC: Self::Command;

    /// Start a measurement whose salinity reading is the one of interest.
    const MEASURE_SALINITY: Self::Command;

    /// Start a temperature measurement.
    const MEASURE_TEMP: Self::Command;

    /// Persist a new bus address.
    const CHANGE_ADDRESS: Self::Command;
}

/// Fixed settle delay after every bus write.
pub const SETTLE_TIME_MS: u32 = 10;

/// Time needed by a conductivity measurement.
pub const EC_MEASUREMENT_TIME_MS: u32 = 250;

/// Time needed by a temperature measurement.
pub const TEMP_MEASUREMENT_TIME_MS: u32 = 750;
