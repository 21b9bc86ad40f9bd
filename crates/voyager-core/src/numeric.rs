//! Numeric tower and promotion rules.
//!
//! The tower orders Integer < Rational < Real < Complex; binary
//! operations promote both operands to the higher rank before applying
//! the operation. Division of two Integers lifts the target rank to
//! Rational so exactness is preserved.

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::error::{EngineError, Result};
use crate::value::Value;

/// Rank in the promotion tower, or `None` for non-numeric values.
pub fn rank(v: &Value) -> Option<u8> {
    match v {
        Value::Integer(_) => Some(0),
        Value::Rational(_) => Some(1),
        Value::Real(_) => Some(2),
        Value::Complex(..) => Some(3),
        _ => None,
    }
}

pub fn is_numeric(v: &Value) -> bool {
    rank(v).is_some()
}

/// Nonzero in every sense: a Complex is truthy when either component is
/// nonzero. Non-numeric values are never truthy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Integer(i) => !i.is_zero(),
        Value::Rational(r) => !r.is_zero(),
        Value::Real(d) => !d.is_zero(),
        Value::Complex(re, im) => !re.is_zero() || !im.is_zero(),
        _ => false,
    }
}

/// Structurally zero numeric (used for division guards).
pub fn is_zero(v: &Value) -> bool {
    match v {
        Value::Integer(i) => i.is_zero(),
        Value::Rational(r) => r.is_zero(),
        Value::Real(d) => d.is_zero(),
        Value::Complex(re, im) => re.is_zero() && im.is_zero(),
        _ => false,
    }
}

/// Promote a numeric value up to the target rank.
pub fn promote(v: Value, target: u8) -> Value {
    let mut cur = v;
    loop {
        cur = match (rank(&cur), target) {
            (Some(r), t) if r >= t => return cur,
            (Some(0), _) => match cur {
                Value::Integer(i) => Value::Rational(BigRational::from_integer(i)),
                _ => unreachable!(),
            },
            (Some(1), _) => match cur {
                Value::Rational(r) => Value::Real(rational_to_decimal(&r)),
                _ => unreachable!(),
            },
            (Some(2), _) => match cur {
                Value::Real(d) => Value::Complex(d, BigDecimal::zero()),
                _ => unreachable!(),
            },
            _ => return cur,
        };
    }
}

/// Binary numeric operation applied after promotion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Promote both operands and apply the operation. Division checks the
/// divisor for structural zero before promotion so the caller can
/// restore its operands.
pub fn binary_numeric(op: BinOp, a: &Value, b: &Value) -> Result<Value> {
    let ra = rank(a).ok_or(EngineError::BadArgumentType)?;
    let rb = rank(b).ok_or(EngineError::BadArgumentType)?;

    if op == BinOp::Div && is_zero(b) {
        return Err(EngineError::DivisionByZero);
    }

    let mut target = ra.max(rb);
    // Integer / Integer stays exact as a Rational.
    if op == BinOp::Div && target == 0 {
        target = 1;
    }

    let pa = promote(a.clone(), target);
    let pb = promote(b.clone(), target);

    let out = match (pa, pb) {
        (Value::Integer(x), Value::Integer(y)) => match op {
            BinOp::Add => Value::Integer(x + y),
            BinOp::Sub => Value::Integer(x - y),
            BinOp::Mul => Value::Integer(x * y),
            BinOp::Div => unreachable!("integer division lifts to rational"),
        },
        (Value::Rational(x), Value::Rational(y)) => match op {
            BinOp::Add => Value::Rational(x + y),
            BinOp::Sub => Value::Rational(x - y),
            BinOp::Mul => Value::Rational(x * y),
            BinOp::Div => Value::Rational(x / y),
        },
        (Value::Real(x), Value::Real(y)) => match op {
            BinOp::Add => Value::Real(x + y),
            BinOp::Sub => Value::Real(x - y),
            BinOp::Mul => Value::Real(x * y),
            BinOp::Div => Value::Real(x / y),
        },
        (Value::Complex(ar, ai), Value::Complex(br, bi)) => match op {
            BinOp::Add => Value::Complex(ar + br, ai + bi),
            BinOp::Sub => Value::Complex(ar - br, ai - bi),
            BinOp::Mul => Value::Complex(&ar * &br - &ai * &bi, &ar * &bi + &ai * &br),
            BinOp::Div => {
                let denom = &br * &br + &bi * &bi;
                Value::Complex(
                    (&ar * &br + &ai * &bi) / &denom,
                    (&ai * &br - &ar * &bi) / &denom,
                )
            }
        },
        _ => unreachable!("operands promoted to the same rank"),
    };
    Ok(out)
}

/// Ordering after promotion. Complex values compare by their real
/// components only; equality is therefore not discriminating on the
/// imaginary parts. Deep equality is the SAME command's job.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering> {
    let ra = rank(a).ok_or(EngineError::BadArgumentType)?;
    let rb = rank(b).ok_or(EngineError::BadArgumentType)?;
    let target = ra.max(rb);
    let pa = promote(a.clone(), target);
    let pb = promote(b.clone(), target);
    let ord = match (&pa, &pb) {
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Rational(x), Value::Rational(y)) => x.cmp(y),
        (Value::Real(x), Value::Real(y)) => x.cmp(y),
        (Value::Complex(xr, _), Value::Complex(yr, _)) => xr.cmp(yr),
        _ => unreachable!("operands promoted to the same rank"),
    };
    Ok(ord)
}

/// Negate a numeric value in place of its own rank.
pub fn negate(v: Value) -> Result<Value> {
    match v {
        Value::Integer(i) => Ok(Value::Integer(-i)),
        Value::Rational(r) => Ok(Value::Rational(-r)),
        Value::Real(d) => Ok(Value::Real(-d)),
        Value::Complex(re, im) => Ok(Value::Complex(-re, -im)),
        _ => Err(EngineError::BadArgumentType),
    }
}

/// Convert Integer/Rational/Real to a decimal. Complex and non-numeric
/// values are type errors.
pub fn to_decimal(v: &Value) -> Result<BigDecimal> {
    match v {
        Value::Integer(i) => Ok(BigDecimal::from(i.clone())),
        Value::Rational(r) => Ok(rational_to_decimal(r)),
        Value::Real(d) => Ok(d.clone()),
        _ => Err(EngineError::BadArgumentType),
    }
}

/// Lossy bridge into machine floats for the transcendental commands.
pub fn to_f64(v: &Value) -> Result<f64> {
    let f = match v {
        Value::Integer(i) => i.to_f64(),
        Value::Rational(r) => r.to_f64(),
        Value::Real(d) => d.to_f64(),
        _ => None,
    };
    f.ok_or(EngineError::BadArgumentType)
}

/// Re-enter the decimal domain from a machine float using the shortest
/// round-trip form, so `sin(0.5)` does not drag sixty binary digits
/// onto the stack.
pub fn decimal_from_f64(x: f64) -> Result<BigDecimal> {
    if !x.is_finite() {
        return Err(EngineError::BadArgumentValue);
    }
    BigDecimal::from_str(&x.to_string()).map_err(|_| EngineError::BadArgumentValue)
}

fn rational_to_decimal(r: &BigRational) -> BigDecimal {
    BigDecimal::from(r.numer().clone()) / BigDecimal::from(r.denom().clone())
}

/// Truncate a decimal toward zero to a big integer.
pub fn trunc_to_bigint(d: &BigDecimal) -> BigInt {
    let (int_val, _) = d.with_scale(0).into_bigint_and_exponent();
    int_val
}
