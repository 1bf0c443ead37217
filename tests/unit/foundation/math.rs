use super::*;

#[test]
fn floor_div_rounds_toward_negative_infinity() {
    assert_eq!(floor_div(7, 4), 1);
    assert_eq!(floor_div(-1, 4), -1);
    assert_eq!(floor_div(-4, 4), -1);
    assert_eq!(floor_div(-5, 4), -2);
    assert_eq!(floor_div(0, 4), 0);
}

#[test]
fn floor_mod_is_non_negative_for_positive_divisor() {
    assert_eq!(floor_mod(-1, 10), 9);
    assert_eq!(floor_mod(10, 10), 0);
    assert_eq!(floor_mod(-11, 10), 9);
    assert_eq!(floor_mod(23, 10), 3);
}

#[test]
fn clamp01_handles_non_finite_values() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(f64::INFINITY), 1.0);
    assert_eq!(clamp01(f64::NEG_INFINITY), 0.0);
    assert_eq!(clamp01(0.25), 0.25);
}

#[test]
fn quantized_levels_convert_exactly() {
    for v in 0..=255u8 {
        assert_eq!(channel_to_u8(channel_from_u8(v)), v);
    }
}
