//! Tests for transcendental and scientific commands.

use super::*;

const EPS: f64 = 1e-10;

// ============================================================================
// Angle Modes
// ============================================================================

#[test]
fn default_angle_mode_is_rad() {
    let c = ctx();
    assert_eq!(c.store().angle_mode().unwrap(), "RAD");
}

#[test]
fn deg_sets_angle_mode() {
    let c = eval("DEG");
    assert_eq!(c.store().angle_mode().unwrap(), "DEG");
    assert_eq!(c.get_setting("angle_mode").unwrap().unwrap(), "DEG");
}

#[test]
fn rad_restores_angle_mode() {
    let c = eval("DEG RAD");
    assert_eq!(c.store().angle_mode().unwrap(), "RAD");
}

#[test]
fn grad_sets_angle_mode() {
    let c = eval("GRAD");
    assert_eq!(c.store().angle_mode().unwrap(), "GRAD");
}

// ============================================================================
// Trig
// ============================================================================

#[test]
fn sin_zero() {
    assert_approx("0 SIN", 0.0, EPS);
}

#[test]
fn cos_zero() {
    assert_approx("0 COS", 1.0, EPS);
}

#[test]
fn tan_zero() {
    assert_approx("0 TAN", 0.0, EPS);
}

#[test]
fn sin_half_pi_in_rad() {
    assert_approx("PI 2 / SIN", 1.0, EPS);
}

#[test]
fn sin_90_in_deg() {
    assert_approx("DEG 90 SIN", 1.0, EPS);
}

#[test]
fn cos_180_in_deg() {
    assert_approx("DEG 180 COS", -1.0, EPS);
}

#[test]
fn sin_100_in_grad() {
    assert_approx("GRAD 100 SIN", 1.0, EPS);
}

#[test]
fn asin_one_in_rad() {
    assert_approx("1 ASIN", std::f64::consts::FRAC_PI_2, EPS);
}

#[test]
fn asin_one_in_deg() {
    assert_approx("DEG 1 ASIN", 90.0, EPS);
}

#[test]
fn acos_zero() {
    assert_approx("0 ACOS", std::f64::consts::FRAC_PI_2, EPS);
}

#[test]
fn atan_one() {
    assert_approx("1 ATAN", std::f64::consts::FRAC_PI_4, EPS);
}

#[test]
fn atan2_quarter_pi() {
    assert_approx("1 1 ATAN2", std::f64::consts::FRAC_PI_4, EPS);
}

#[test]
fn asin_out_of_domain_fails() {
    assert_error("2 ASIN", E_BAD_VALUE);
}

// ============================================================================
// Exp / Log
// ============================================================================

#[test]
fn exp_zero() {
    assert_approx("0 EXP", 1.0, EPS);
}

#[test]
fn exp_one() {
    assert_approx("1 EXP", std::f64::consts::E, EPS);
}

#[test]
fn ln_e() {
    assert_approx("E LN", 1.0, EPS);
}

#[test]
fn log_100() {
    assert_approx("100 LOG", 2.0, EPS);
}

#[test]
fn alog_2() {
    assert_approx("2 ALOG", 100.0, EPS);
}

#[test]
fn ln_of_negative_fails() {
    assert_error("-1 LN", E_BAD_VALUE);
}

#[test]
fn ln_of_zero_fails() {
    assert_error("0 LN", E_BAD_VALUE);
}

// ============================================================================
// SQRT and Constants
// ============================================================================

#[test]
fn sqrt_16() {
    assert_approx("16 SQRT", 4.0, EPS);
}

#[test]
fn sqrt_2() {
    assert_approx("2 SQRT", std::f64::consts::SQRT_2, EPS);
}

#[test]
fn sqrt_of_rational() {
    assert_approx("1 4 / SQRT", 0.5, EPS);
}

#[test]
fn sqrt_of_negative_fails() {
    assert_error("-4 SQRT", E_BAD_VALUE);
}

#[test]
fn pi_constant() {
    assert_approx("PI", std::f64::consts::PI, EPS);
}

#[test]
fn e_constant() {
    assert_approx("E", std::f64::consts::E, EPS);
}

#[test]
fn pi_carries_many_digits() {
    let c = eval("PI");
    let repr = c.repr_at(1).unwrap();
    assert!(repr.starts_with("3.14159265358979323846"));
    assert!(repr.len() > 40);
}

// ============================================================================
// Rounding
// ============================================================================

#[test]
fn floor_positive() {
    assert_top("3.7 FLOOR", "3");
}

#[test]
fn floor_negative() {
    assert_top("-3.2 FLOOR", "-4");
}

#[test]
fn ceil_positive() {
    assert_top("3.2 CEIL", "4");
}

#[test]
fn ceil_negative() {
    assert_top("-3.2 CEIL", "-3");
}

#[test]
fn ip_truncates() {
    assert_top("3.7 IP", "3");
    assert_top("-3.7 IP", "-3");
}

#[test]
fn fp_positive() {
    assert_top("3.7 FP", "0.7");
}

#[test]
fn fp_negative_keeps_sign() {
    assert_top("-3.7 FP", "-0.7");
}

#[test]
fn fp_of_integer_is_zero_real() {
    assert_top("5 FP", "0.");
}

#[test]
fn floor_of_integer_is_identity() {
    assert_top("5 FLOOR", "5");
}

#[test]
fn floor_of_rational() {
    assert_top("7 2 / FLOOR", "3");
}

// ============================================================================
// MIN / MAX / SIGN
// ============================================================================

#[test]
fn min_and_max() {
    assert_top("3 7 MIN", "3");
    assert_top("8 2 MIN", "2");
    assert_top("3 7 MAX", "7");
    assert_top("9 4 MAX", "9");
}

#[test]
fn min_promotes() {
    assert_top("1 2.5 MIN", "1.");
}

#[test]
fn min_rejects_complex() {
    assert_error("(1, 2) 3 MIN", E_BAD_TYPE);
}

#[test]
fn sign_values() {
    assert_top("42 SIGN", "1");
    assert_top("-17 SIGN", "-1");
    assert_top("0 SIGN", "0");
    assert_top("-2.5 SIGN", "-1");
    assert_top("-1 2 / SIGN", "-1");
}

// ============================================================================
// Combinatorics
// ============================================================================

#[test]
fn factorial_zero() {
    assert_top("0 !", "1");
}

#[test]
fn factorial_five() {
    assert_top("5 !", "120");
}

#[test]
fn factorial_is_arbitrary_precision() {
    assert_top("25 !", "15511210043330985984000000");
}

#[test]
fn factorial_of_negative_fails() {
    assert_error("-1 !", E_BAD_VALUE);
}

#[test]
fn comb() {
    assert_top("5 2 COMB", "10");
    assert_top("52 5 COMB", "2598960");
}

#[test]
fn perm() {
    assert_top("5 2 PERM", "20");
}

#[test]
fn comb_with_k_above_n_fails() {
    assert_error("2 5 COMB", E_BAD_VALUE);
}

// ============================================================================
// Percentage
// ============================================================================

#[test]
fn percent() {
    assert_approx("200 15 %", 30.0, EPS);
}

#[test]
fn percent_of_total() {
    assert_approx("200 25 %T", 12.5, EPS);
}

#[test]
fn percent_change() {
    assert_approx("100 120 %CH", 20.0, EPS);
}

#[test]
fn percent_of_zero_total_fails() {
    assert_error("0 25 %T", E_DIV_ZERO);
}

// ============================================================================
// Angle Conversion
// ============================================================================

#[test]
fn deg_to_rad() {
    assert_approx("180 D->R", std::f64::consts::PI, EPS);
}

#[test]
fn rad_to_deg() {
    assert_approx("PI R->D", 180.0, EPS);
}

#[test]
fn trig_accepts_integers() {
    assert_approx("4 SQRT", 2.0, EPS);
    assert_approx("0 SIN", 0.0, EPS);
}

#[test]
fn trig_rejects_complex() {
    assert_error("(1, 2) SIN", E_BAD_TYPE);
}
