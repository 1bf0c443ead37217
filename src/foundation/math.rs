/// Floored integer division (rounds toward negative infinity).
pub(crate) fn floor_div(a: i64, b: i64) -> i64 {
    a.div_euclid(b) - i64::from(b < 0 && a.rem_euclid(b) != 0)
}

/// Floored modulo; the result has the sign of `b`.
pub(crate) fn floor_mod(a: i64, b: i64) -> i64 {
    a - floor_div(a, b) * b
}

/// Clamp to `[0, 1]`. NaN maps to `0`.
pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

pub(crate) fn channel_to_u8(v: f64) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}

pub(crate) fn channel_from_u8(v: u8) -> f64 {
    f64::from(v) / 255.0
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
