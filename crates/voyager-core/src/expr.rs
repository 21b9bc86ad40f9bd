//! Infix expression evaluator for Symbol bodies.
//!
//! Pipeline: tokenize → shunting-yard (infix to RPN) → RPN evaluation.
//! Names resolve against the interpreter's local frames first (with
//! their source-literal case), then uppercased against the current
//! directory. Numeric operations follow the promotion tower; `^`
//! computes through `f64` and yields a Real.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::numeric::{self, BinOp};
use crate::value::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
enum ExprToken {
    Number(String),
    Name(String),
    Op(String),
    LParen,
    RParen,
}

fn malformed() -> EngineError {
    EngineError::Structural("Malformed expression".into())
}

/// Scan a numeric literal starting at `i` (digits, one dot, one
/// exponent with optional sign). Returns the end index.
fn scan_number(bytes: &[u8], mut i: usize, mut has_dot: bool) -> usize {
    let mut has_e = false;
    while i < bytes.len() {
        match bytes[i] {
            c if c.is_ascii_digit() => i += 1,
            b'.' if !has_dot && !has_e => {
                has_dot = true;
                i += 1;
            }
            b'E' | b'e' if !has_e => {
                has_e = true;
                i += 1;
                if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
                    i += 1;
                }
            }
            _ => break,
        }
    }
    i
}

fn tokenize(expr: &str) -> Result<Vec<ExprToken>> {
    let bytes = expr.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let c = bytes[i];
        match c {
            b' ' | b'\t' => i += 1,
            b'(' => {
                tokens.push(ExprToken::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(ExprToken::RParen);
                i += 1;
            }
            b'+' | b'*' | b'/' | b'^' => {
                tokens.push(ExprToken::Op((c as char).to_string()));
                i += 1;
            }
            b'-' => {
                // Unary at the start, after an operator, or after '('.
                let unary = matches!(
                    tokens.last(),
                    None | Some(ExprToken::Op(_)) | Some(ExprToken::LParen)
                );
                if unary
                    && i + 1 < len
                    && (bytes[i + 1].is_ascii_digit() || bytes[i + 1] == b'.')
                {
                    // Negative number literal.
                    let end = scan_number(bytes, i + 1, false);
                    tokens.push(ExprToken::Number(expr[i..end].to_string()));
                    i = end;
                } else if unary {
                    tokens.push(ExprToken::Op("NEG".into()));
                    i += 1;
                } else {
                    tokens.push(ExprToken::Op("-".into()));
                    i += 1;
                }
            }
            c if c.is_ascii_digit() || c == b'.' => {
                let end = scan_number(bytes, i + 1, c == b'.');
                tokens.push(ExprToken::Number(expr[i..end].to_string()));
                i = end;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = i;
                i += 1;
                while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push(ExprToken::Name(expr[start..i].to_string()));
            }
            other => {
                return Err(EngineError::Structural(format!(
                    "Unexpected character in expression: {}",
                    other as char
                )))
            }
        }
    }
    Ok(tokens)
}

fn precedence(op: &str) -> u8 {
    match op {
        "+" | "-" => 1,
        "*" | "/" => 2,
        "^" => 3,
        "NEG" => 4,
        _ => 0,
    }
}

fn is_right_assoc(op: &str) -> bool {
    op == "^" || op == "NEG"
}

/// Shunting-yard: infix to postfix.
fn to_rpn(tokens: Vec<ExprToken>) -> Result<Vec<ExprToken>> {
    let mut output = Vec::new();
    let mut ops: Vec<ExprToken> = Vec::new();

    for tok in tokens {
        match tok {
            ExprToken::Number(_) | ExprToken::Name(_) => output.push(tok),
            ExprToken::Op(ref op) => {
                loop {
                    let unwind = match ops.last() {
                        Some(ExprToken::Op(top)) => {
                            if is_right_assoc(op) {
                                precedence(top) > precedence(op)
                            } else {
                                precedence(top) >= precedence(op)
                            }
                        }
                        _ => false,
                    };
                    if !unwind {
                        break;
                    }
                    if let Some(top) = ops.pop() {
                        output.push(top);
                    }
                }
                ops.push(tok);
            }
            ExprToken::LParen => ops.push(tok),
            ExprToken::RParen => {
                loop {
                    match ops.pop() {
                        Some(ExprToken::LParen) => break,
                        Some(op) => output.push(op),
                        None => {
                            return Err(EngineError::Structural(
                                "Mismatched parentheses".into(),
                            ))
                        }
                    }
                }
            }
        }
    }

    while let Some(op) = ops.pop() {
        if op == ExprToken::LParen {
            return Err(EngineError::Structural("Mismatched parentheses".into()));
        }
        output.push(op);
    }
    Ok(output)
}

fn parse_number(s: &str) -> Result<Value> {
    if s.contains(['.', 'E', 'e']) {
        s.parse::<BigDecimal>()
            .map(Value::Real)
            .map_err(|_| malformed())
    } else {
        s.parse::<BigInt>()
            .map(Value::Integer)
            .map_err(|_| malformed())
    }
}

fn apply_binary(op: &str, a: Value, b: Value) -> Result<Value> {
    match op {
        "+" => numeric::binary_numeric(BinOp::Add, &a, &b),
        "-" => numeric::binary_numeric(BinOp::Sub, &a, &b),
        "*" => numeric::binary_numeric(BinOp::Mul, &a, &b),
        "/" => numeric::binary_numeric(BinOp::Div, &a, &b),
        "^" => {
            let base = numeric::to_f64(&a)?;
            let exp = numeric::to_f64(&b)?;
            Ok(Value::Real(numeric::decimal_from_f64(base.powf(exp))?))
        }
        _ => Err(EngineError::Runtime(format!("Unknown operator: {}", op))),
    }
}

fn eval_rpn(rpn: Vec<ExprToken>, ctx: &mut Context) -> Result<Value> {
    let mut stack: Vec<Value> = Vec::new();

    for tok in rpn {
        match tok {
            ExprToken::Number(s) => stack.push(parse_number(&s)?),
            ExprToken::Name(name) => {
                // Locals keep their source-literal case; the store
                // lookup is case-insensitive via uppercasing.
                let value = match ctx.resolve_local(&name) {
                    Some(v) => v,
                    None => {
                        let dir = ctx.store().current_dir()?;
                        ctx.store()
                            .recall_variable(dir, &name.to_uppercase())?
                            .ok_or_else(|| EngineError::UndefinedName(name.clone()))?
                    }
                };
                stack.push(value);
            }
            ExprToken::Op(op) => {
                if op == "NEG" {
                    let a = stack.pop().ok_or_else(malformed)?;
                    stack.push(numeric::negate(a)?);
                } else {
                    let b = stack.pop().ok_or_else(malformed)?;
                    let a = stack.pop().ok_or_else(malformed)?;
                    stack.push(apply_binary(&op, a, b)?);
                }
            }
            ExprToken::LParen | ExprToken::RParen => return Err(malformed()),
        }
    }

    if stack.len() != 1 {
        return Err(malformed());
    }
    stack.pop().ok_or_else(malformed)
}

/// Evaluate a Symbol's textual body to a single numeric value.
pub fn eval_expression(expr: &str, ctx: &mut Context) -> Result<Value> {
    let tokens = tokenize(expr)?;
    let rpn = to_rpn(tokens)?;
    eval_rpn(rpn, ctx)
}
