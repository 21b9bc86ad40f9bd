//! Tests for structured control flow.

use super::*;

// ============================================================================
// IF / THEN / [ELSE] / END
// ============================================================================

#[test]
fn if_then_true() {
    assert_stack("1 IF 1 THEN 42 END", &["42", "1"]);
}

#[test]
fn if_then_false() {
    assert_stack("1 IF 0 THEN 42 END", &["1"]);
}

#[test]
fn if_then_else_true_branch() {
    assert_stack("IF 1 THEN 10 ELSE 20 END", &["10"]);
}

#[test]
fn if_then_else_false_branch() {
    assert_stack("IF 0 THEN 10 ELSE 20 END", &["20"]);
}

#[test]
fn nested_if() {
    assert_stack("IF 1 THEN IF 1 THEN 99 END END", &["99"]);
}

#[test]
fn if_condition_from_stack() {
    assert_stack("5 3 > IF 1 THEN \"big\" END", &["\"big\""]);
}

#[test]
fn truncated_if_is_structural_error() {
    assert_error("IF 1 THEN 2", E_STRUCTURAL);
}

#[test]
fn if_with_non_numeric_condition_fails() {
    assert_error("IF \"x\" THEN 1 END", E_BAD_TYPE);
}

// ============================================================================
// CASE
// ============================================================================

#[test]
fn case_first_match() {
    assert_stack("CASE 1 THEN 10 END 0 THEN 20 END END", &["10"]);
}

#[test]
fn case_second_match() {
    assert_stack("CASE 0 THEN 10 END 1 THEN 20 END END", &["20"]);
}

#[test]
fn case_default_clause() {
    assert_stack("CASE 0 THEN 10 END 0 THEN 20 END 99 END", &["99"]);
}

#[test]
fn case_no_match_no_default() {
    let c = eval("CASE 0 THEN 10 END 0 THEN 20 END END");
    assert_eq!(c.depth().unwrap(), 0);
}

#[test]
fn case_stops_after_first_match() {
    assert_stack("CASE 1 THEN 10 END 1 THEN 20 END END", &["10"]);
}

// ============================================================================
// FOR / NEXT and FOR / STEP
// ============================================================================

#[test]
fn for_next_basic() {
    assert_stack("1 5 FOR I I NEXT", &["5", "4", "3", "2", "1"]);
}

#[test]
fn for_next_zero_iterations() {
    let c = eval("5 1 FOR I I NEXT");
    assert_eq!(c.depth().unwrap(), 0);
}

#[test]
fn for_next_single_iteration() {
    assert_stack("3 3 FOR I I NEXT", &["3"]);
}

#[test]
fn for_step_by_two() {
    assert_stack("1 10 FOR I I 2 STEP", &["9", "7", "5", "3", "1"]);
}

#[test]
fn for_step_negative() {
    assert_stack("5 1 FOR I I -1 STEP", &["1", "2", "3", "4", "5"]);
}

#[test]
fn for_variable_is_integer() {
    assert_stack("1 1 FOR I I TYPE NEXT", &["0"]);
}

#[test]
fn for_with_real_bounds() {
    assert_stack("1.0 2.0 FOR I I NEXT", &["2.0", "1.0"]);
}

#[test]
fn for_needs_two_bounds() {
    assert_error("1 FOR I I NEXT", E_TOO_FEW);
}

// ============================================================================
// START / NEXT and START / STEP
// ============================================================================

#[test]
fn start_next_basic() {
    assert_stack("0 1 3 START 1 + NEXT", &["3"]);
}

#[test]
fn start_next_zero_iterations() {
    assert_stack("99 5 1 START 42 NEXT", &["99"]);
}

#[test]
fn start_step_by_two() {
    assert_stack("0 1 5 START 1 + 2 STEP", &["3"]);
}

// ============================================================================
// WHILE / REPEAT / END
// ============================================================================

#[test]
fn while_countdown() {
    assert_stack("5 WHILE DUP 0 > REPEAT 1 - END", &["0"]);
}

#[test]
fn while_false_on_first_test() {
    assert_stack("0 WHILE DUP 0 > REPEAT 1 - END", &["0"]);
}

// ============================================================================
// DO / UNTIL / END
// ============================================================================

#[test]
fn do_until_countdown() {
    assert_stack("5 DO 1 - DUP 0 == UNTIL END", &["0"]);
}

#[test]
fn do_until_runs_at_least_once() {
    assert_stack("0 DO 1 + 1 UNTIL END", &["1"]);
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn for_inside_if() {
    assert_stack("IF 1 THEN 0 1 3 FOR I I + NEXT END", &["6"]);
}

#[test]
fn if_inside_for() {
    // Keep only the even counters.
    assert_stack("1 4 FOR I IF I 2 MOD 0 == THEN I END NEXT", &["4", "2"]);
}

#[test]
fn for_inside_while() {
    assert_stack(
        "2 WHILE DUP 0 > REPEAT 0 1 2 FOR I I + NEXT SWAP 1 - END DROP",
        &["3", "3"],
    );
}

#[test]
fn loops_inside_programs() {
    assert_stack("<< 0 1 10 FOR I I + NEXT >> EVAL", &["55"]);
}
