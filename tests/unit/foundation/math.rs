use super::*;

#[test]
fn scaled_len_truncates_toward_negative_infinity() {
    assert_eq!(scaled_len(200.0, 0.1), 20);
    assert_eq!(scaled_len(25.0, 0.1), 2);
    assert_eq!(scaled_len(250.0, 0.1), 25);
    assert_eq!(scaled_len(7.0, 0.1), 0);
    assert_eq!(scaled_len(-25.0, 0.1), -3);
}

#[test]
fn scaled_len_absorbs_binary_rounding_just_below_integers() {
    // 0.29 * 100.0 is 28.999999999999996 in f64.
    assert_eq!(scaled_len(100.0, 0.29), 29);
    assert_eq!(scaled_len(1000.0, 0.12), 120);
}

#[test]
fn scaled_len_of_non_finite_is_zero() {
    assert_eq!(scaled_len(f64::NAN, 0.5), 0);
    assert_eq!(scaled_len(10.0, f64::INFINITY), 0);
}

#[test]
fn mul_div255_matches_rounded_product() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(200, 128), 100);
}
