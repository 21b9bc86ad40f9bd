//! Tests for arithmetic commands.

use super::*;

// ============================================================================
// Binary Arithmetic
// ============================================================================

#[test]
fn integer_addition() {
    assert_stack("3 4 +", &["7"]);
}

#[test]
fn integer_subtraction() {
    assert_top("10 3 -", "7");
}

#[test]
fn integer_multiplication() {
    assert_top("6 7 *", "42");
}

#[test]
fn integer_division_produces_rational() {
    assert_stack("355 113 /", &["355/113"]);
}

#[test]
fn rational_division_collapses_whole_results() {
    // a b / b * round-trips to a, carried as a Rational.
    assert_top("7 3 / 3 *", "7");
}

#[test]
fn division_by_zero_fails() {
    assert_error("5 0 /", E_DIV_ZERO);
}

#[test]
fn division_by_zero_keeps_pre_state() {
    let mut c = ctx();
    assert!(c.exec("5 0 /").is_err());
    // Rolled back to the pre-state (empty) plus the error value.
    assert_eq!(c.depth().unwrap(), 1);
}

#[test]
fn mixed_addition_promotes_to_real() {
    assert_top("1 2.5 +", "3.5");
}

#[test]
fn rational_plus_integer() {
    assert_top("1 2 / 1 +", "3/2");
}

#[test]
fn complex_addition() {
    assert_top("(1, 2) (3, 4) +", "(4., 6.)");
}

#[test]
fn complex_multiplication() {
    assert_top("(1, 2) (3, 4) *", "(-5., 10.)");
}

#[test]
fn too_few_arguments() {
    assert_error("+", E_TOO_FEW);
}

// ============================================================================
// Unary Arithmetic
// ============================================================================

#[test]
fn neg() {
    assert_top("5 NEG", "-5");
}

#[test]
fn inv_integer_gives_rational() {
    assert_top("4 INV", "1/4");
}

#[test]
fn inv_rational() {
    assert_top("3 4 / INV", "4/3");
}

#[test]
fn inv_zero_fails() {
    assert_error("0 INV", E_DIV_ZERO);
}

#[test]
fn abs_negative() {
    assert_top("-7 ABS", "7");
}

#[test]
fn abs_complex_is_magnitude() {
    assert_top("(3, 4) ABS", "5.");
}

#[test]
fn modulo() {
    assert_top("10 3 MOD", "1");
}

#[test]
fn modulo_by_zero_fails() {
    assert_error("10 0 MOD", E_DIV_ZERO);
}

#[test]
fn modulo_requires_integers() {
    assert_error("1.5 2 MOD", E_BAD_TYPE);
}

#[test]
fn sq() {
    assert_top("7 SQ", "49");
}

#[test]
fn sq_negative() {
    assert_top("-4 SQ", "16");
}

// ============================================================================
// String Concatenation
// ============================================================================

#[test]
fn string_concatenation() {
    assert_top("\"hello\" \" world\" +", "\"hello world\"");
}

#[test]
fn empty_string_concatenation() {
    assert_top("\"\" \"\" +", "\"\"");
}

#[test]
fn string_plus_number_fails() {
    assert_error("\"hello\" 5 +", E_BAD_TYPE);
}

// ============================================================================
// Symbolic Composition
// ============================================================================

#[test]
fn name_plus_number_builds_symbol() {
    assert_top("'X' 1 +", "'X+1'");
}

#[test]
fn symbol_times_name_parenthesizes() {
    // X+1 binds looser than *, so it gets wrapped.
    assert_top("'X' 1 + 'Y' *", "'(X+1)*Y'");
}

#[test]
fn product_needs_no_parens_in_sum() {
    assert_top("'X' 'Y' * 1 +", "'X*Y+1'");
}

#[test]
fn neg_of_name_parenthesizes() {
    assert_top("'X' NEG", "'-(X)'");
}

#[test]
fn chained_ops() {
    assert_top("1 2 + 3 +", "6");
}

#[test]
fn rpn_grouping() {
    // 2 (3+4) *
    assert_top("2 3 4 + *", "14");
}
