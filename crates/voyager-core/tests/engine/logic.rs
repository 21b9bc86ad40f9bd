//! Tests for boolean, bitwise, and SAME commands.

use super::*;

// ============================================================================
// Boolean Logic
// ============================================================================

#[test]
fn and_truth_table() {
    assert_top("1 1 AND", "1");
    assert_top("1 0 AND", "0");
    assert_top("0 0 AND", "0");
}

#[test]
fn or_truth_table() {
    assert_top("0 1 OR", "1");
    assert_top("0 0 OR", "0");
}

#[test]
fn not_command() {
    assert_top("1 NOT", "0");
    assert_top("0 NOT", "1");
}

#[test]
fn xor_truth_table() {
    assert_top("1 0 XOR", "1");
    assert_top("1 1 XOR", "0");
}

#[test]
fn nonzero_is_true() {
    assert_top("5 3 AND", "1");
}

#[test]
fn and_requires_integers() {
    assert_error("1.0 1 AND", E_BAD_TYPE);
}

// ============================================================================
// Bitwise
// ============================================================================

#[test]
fn band() {
    // 1100 & 1010 = 1000
    assert_top("12 10 BAND", "8");
}

#[test]
fn bor() {
    assert_top("12 10 BOR", "14");
}

#[test]
fn bxor() {
    assert_top("12 10 BXOR", "6");
}

#[test]
fn bnot() {
    assert_top("0 BNOT", "-1");
    assert_top("5 BNOT", "-6");
}

#[test]
fn shift_left() {
    assert_top("1 4 SL", "16");
}

#[test]
fn shift_right() {
    assert_top("16 2 SR", "4");
}

#[test]
fn arithmetic_shift_right_preserves_sign() {
    assert_top("-16 2 ASR", "-4");
}

#[test]
fn band_requires_integers() {
    assert_error("1.0 1 BAND", E_BAD_TYPE);
}

// ============================================================================
// SAME
// ============================================================================

#[test]
fn same_identical_integers() {
    assert_top("42 42 SAME", "1");
}

#[test]
fn same_distinguishes_variants() {
    // Equal magnitude, different variant.
    assert_top("1 1.0 SAME", "0");
}

#[test]
fn same_strings() {
    assert_top("\"hello\" \"hello\" SAME", "1");
    assert_top("\"hello\" \"world\" SAME", "0");
}

#[test]
fn same_integer_vs_rational() {
    // 1 1 / is the Rational 1, which is not the Integer 1.
    assert_top("1 1 1 / SAME", "0");
}

#[test]
fn same_programs_by_token_display() {
    assert_top("\u{ab} 1 2 + \u{bb} << 1 2 + >> SAME", "1");
    assert_top("<< 1 2 + >> << 1 2 - >> SAME", "0");
}

#[test]
fn same_complex_is_deep() {
    assert_top("(1, 2) (1, 2) SAME", "1");
    assert_top("(1, 2) (1, 3) SAME", "0");
}
