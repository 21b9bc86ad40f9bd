//! Tests for Symbol evaluation through EVAL.

use super::*;

#[test]
fn simple_arithmetic() {
    assert_stack("'2+3' EVAL", &["5"]);
}

#[test]
fn precedence() {
    assert_top("'2+3*4' EVAL", "14");
}

#[test]
fn parentheses() {
    assert_top("'(2+3)*(4-1)' EVAL", "15");
}

#[test]
fn division_gives_rational() {
    assert_top("'7/2' EVAL", "7/2");
}

#[test]
fn power_gives_real() {
    assert_top("'2^10' EVAL", "1024.");
}

#[test]
fn power_is_right_associative() {
    // 2^(3^2) = 512, not (2^3)^2 = 64.
    assert_top("'2^3^2' EVAL", "512.");
}

#[test]
fn unary_minus() {
    assert_top("'-5+3' EVAL", "-2");
}

#[test]
fn global_variable() {
    let mut c = ctx();
    c.exec("5 'X' STO").unwrap();
    c.exec("'X^2' EVAL").unwrap();
    assert_eq!(c.repr_at(1).unwrap(), "25.");
}

#[test]
fn variable_product() {
    let mut c = ctx();
    c.exec("10 'X' STO").unwrap();
    c.exec("'X*X' EVAL").unwrap();
    assert_eq!(c.repr_at(1).unwrap(), "100");
}

#[test]
fn lowercase_names_reach_uppercase_variables() {
    let mut c = ctx();
    c.exec("3 'Y' STO").unwrap();
    c.exec("'y+1' EVAL").unwrap();
    assert_eq!(c.repr_at(1).unwrap(), "4");
}

#[test]
fn undefined_variable_fails() {
    assert_error("'NOPE+1' EVAL", E_UNDEFINED);
}

#[test]
fn division_by_zero_fails() {
    assert_error("'1/0' EVAL", E_DIV_ZERO);
}

#[test]
fn malformed_expression_fails() {
    assert_error("'1+' EVAL", E_STRUCTURAL);
}
