//! Significant-digit rounding applied to every float crossing the bus.
//!
//! The probe stores single precision floats, so a value such as `1.01`
//! comes back as `1.00999999`. Rounding to a fixed number of significant
//! digits on both the way out and the way in hides that noise.

/// Number of significant digits kept on every float transfer.
pub const SIGNIFICANT_DIGITS: i32 = 7;

/// Decimal magnitude of `x`: the number of digits left of the decimal
/// point, or a negative count of leading fractional zeros plus one.
///
/// `magnitude(150.0) == 3`, `magnitude(0.05) == -1`. Zero, NaN and the
/// infinities all have magnitude `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn magnitude(x: f64) -> i32 {
    if x.is_nan() || x.is_infinite() || x == 0.0 {
        return 0;
    }

    libm::floor(libm::log10(libm::fabs(x))) as i32 + 1
}

/// Round `value` to `digits` significant digits, i.e. to `digits - magnitude(value)`
/// places after the decimal point. Ties round to even.
///
/// NaN, the infinities and zero pass through untouched.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_total_digits(value: f32, digits: i32) -> f32 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    let x = f64::from(value);
    let places = digits - magnitude(x);
    let rounded = if places >= 0 {
        let scale = libm::pow(10.0, f64::from(places));
        libm::rint(x * scale) / scale
    } else {
        let scale = libm::pow(10.0, f64::from(-places));
        libm::rint(x / scale) * scale
    };

    rounded as f32
}

/// [`round_total_digits`] with the wire precision of [`SIGNIFICANT_DIGITS`].
#[must_use]
pub fn round_wire(x: f32) -> f32 {
    round_total_digits(x, SIGNIFICANT_DIGITS)
}
