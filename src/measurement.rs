//! Measurement snapshots and the unit conversions derived from them.

/// Value every conductivity and salinity field takes when the probe
/// returned no measurement.
pub const NO_READING: f32 = -1.0;

/// Temperature reported by the probe when its sensor is disconnected.
pub const TEMPERATURE_DISCONNECTED: f32 = -127.0;

/// UNESCO practical salinity to parts-per-thousand factor.
pub const PSU_TO_PPT: f32 = 1.004_715;

/// Temperature coefficient for fresh-water EC measurements.
pub const TEMP_COEFFICIENT_EC: f32 = 0.019;

/// Temperature coefficient for salinity measurements.
pub const TEMP_COEFFICIENT_SALINITY: f32 = 0.021;

/// Salinity derived from a single conductivity measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Salinity {
    /// Practical salinity units.
    pub psu: f32,

    /// Parts per thousand.
    pub ppt: f32,

    /// Parts per million.
    pub ppm: f32,
}

impl Salinity {
    /// Derive every scale from a PSU reading.
    #[must_use]
    pub fn from_psu(psu: f32) -> Self {
        let ppt = psu * PSU_TO_PPT;
        Self { psu, ppt, ppm: ppt * 1000.0 }
    }

    fn none() -> Self {
        Self {
            psu: NO_READING,
            ppt: NO_READING,
            ppm: NO_READING,
        }
    }
}

/// One conductivity measurement with all of its unit conversions.
///
/// Every field is computed from the same register read; a snapshot is
/// never partially updated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Conductivity {
    /// Milli-Siemens.
    pub ms: f32,

    /// Micro-Siemens.
    pub us: f32,

    /// Siemens.
    pub s: f32,

    /// Total dissolved solids, 500 factor.
    pub ppm_500: f32,

    /// Total dissolved solids, 640 factor.
    pub ppm_640: f32,

    /// Total dissolved solids, 700 factor.
    pub ppm_700: f32,

    /// Salinity reported alongside the conductivity.
    pub salinity: Salinity,
}

impl Conductivity {
    /// Snapshot of a valid reading.
    #[must_use]
    pub fn new(ms: f32, salinity_psu: f32) -> Self {
        Self {
            ms,
            us: ms * 1000.0,
            s: ms / 1000.0,
            ppm_500: ms * 500.0,
            ppm_640: ms * 640.0,
            ppm_700: ms * 700.0,
            salinity: Salinity::from_psu(salinity_psu),
        }
    }

    /// Snapshot of a measurement that produced nothing: every field is
    /// [`NO_READING`].
    #[must_use]
    pub fn none() -> Self {
        Self {
            ms: NO_READING,
            us: NO_READING,
            s: NO_READING,
            ppm_500: NO_READING,
            ppm_640: NO_READING,
            ppm_700: NO_READING,
            salinity: Salinity::none(),
        }
    }

    /// `true` for a [`Conductivity::none`] snapshot.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.ms == NO_READING
    }
}

/// Whether a raw register value means "nothing measured".
#[must_use]
pub fn is_absent(raw: f32) -> bool {
    raw == 0.0 || raw.is_nan()
}

/// Temperature in both scales.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Temperature {
    /// Degrees Celsius.
    pub celsius: f32,

    /// Degrees Fahrenheit.
    pub fahrenheit: f32,
}

impl Temperature {
    /// Convert a Celsius reading. The disconnected sentinel is kept as is
    /// in both scales.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_celsius(celsius: f32) -> Self {
        let fahrenheit = if celsius == TEMPERATURE_DISCONNECTED {
            TEMPERATURE_DISCONNECTED
        } else {
            celsius * 9.0 / 5.0 + 32.0
        };

        Self { celsius, fahrenheit }
    }

    /// `true` when the probe reported its temperature sensor missing.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_disconnected(&self) -> bool {
        self.celsius == TEMPERATURE_DISCONNECTED
    }
}

/// Linear temperature compensation of a conductivity reading to
/// `reference_c`, for probes whose firmware leaves compensation to the host.
#[must_use]
pub fn compensate(ms: f32, coefficient: f32, temp_c: f32, reference_c: f32) -> f32 {
    ms / (1.0 + coefficient * (temp_c - reference_c))
}

/// Convert a raw conductivity count to mS with the power-law fit used by
/// probes calibrated against a curve instead of a single point.
///
/// A zero count gives infinity, which the driver reports as no reading.
#[must_use]
pub fn curve_ms(raw: f32) -> f32 {
    CURVE_SCALE * libm::powf(raw, CURVE_EXPONENT)
}

const CURVE_SCALE: f32 = 112_800_810.0;
const CURVE_EXPONENT: f32 = -2.122_233_5;

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn derived_units() {
        let ec = Conductivity::new(2.0, 35.0);
        assert_approx_eq!(ec.us, 2000.0);
        assert_approx_eq!(ec.s, 0.002);
        assert_approx_eq!(ec.ppm_500, 1000.0);
        assert_approx_eq!(ec.ppm_640, 1280.0);
        assert_approx_eq!(ec.ppm_700, 1400.0);
        assert_approx_eq!(ec.salinity.ppt, 35.165_03, 1e-4);
        assert_approx_eq!(ec.salinity.ppm, 35_165.03, 1e-1);
        assert!(!ec.is_none());
    }

    #[test]
    fn missing_reading_uses_sentinel_everywhere() {
        let ec = Conductivity::none();
        for v in [
            ec.ms,
            ec.us,
            ec.s,
            ec.ppm_500,
            ec.ppm_640,
            ec.ppm_700,
            ec.salinity.psu,
            ec.salinity.ppt,
            ec.salinity.ppm,
        ] {
            assert_eq!(v, -1.0);
        }
        assert!(ec.is_none());
    }

    #[test]
    fn absent_raw_values() {
        assert!(is_absent(0.0));
        assert!(is_absent(-0.0));
        assert!(is_absent(f32::NAN));
        assert!(!is_absent(0.001));
    }

    #[test]
    fn fahrenheit_conversion() {
        let t = Temperature::from_celsius(25.0);
        assert_approx_eq!(t.fahrenheit, 77.0);
        assert!(!t.is_disconnected());

        let t = Temperature::from_celsius(-40.0);
        assert_approx_eq!(t.fahrenheit, -40.0);
    }

    #[test]
    fn disconnected_sentinel_is_not_converted() {
        let t = Temperature::from_celsius(-127.0);
        assert_eq!(t.fahrenheit, -127.0);
        assert!(t.is_disconnected());
    }

    #[test]
    fn compensation_to_reference() {
        assert_approx_eq!(compensate(1.0, 0.019, 25.0, 25.0), 1.0);
        assert_approx_eq!(compensate(1.19, 0.019, 35.0, 25.0), 1.0);
    }

    #[test]
    fn curve_fit() {
        assert_approx_eq!(curve_ms(1000.0), 48.485, 1e-2);
        assert_approx_eq!(curve_ms(5000.0), 1.593, 1e-3);
        assert!(curve_ms(0.0).is_infinite());
    }
}
