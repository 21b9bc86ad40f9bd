//! Transcendental and scientific commands.
//!
//! Trig, logarithms, and powers round through `f64`; results re-enter
//! the decimal domain in shortest round-trip form. Rounding, sign, and
//! combinatorics stay exact. Forward trig converts its input from the
//! current angle mode to radians; inverse trig converts its output from
//! radians back to the current mode.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::numeric::{self, trunc_to_bigint};
use crate::value::Value;

/// 50 significant digits, matching the Real precision floor.
const PI_DIGITS: &str = "3.14159265358979323846264338327950288419716939937510";
const E_DIGITS: &str = "2.71828182845904523536028747135266249775724709369995";

pub fn register(reg: &mut CommandRegistry) {
    reg.register("DEG", |ctx| set_angle_mode(ctx, "DEG"));
    reg.register("RAD", |ctx| set_angle_mode(ctx, "RAD"));
    reg.register("GRAD", |ctx| set_angle_mode(ctx, "GRAD"));

    reg.register("SIN", |ctx| forward_trig(ctx, f64::sin));
    reg.register("COS", |ctx| forward_trig(ctx, f64::cos));
    reg.register("TAN", |ctx| forward_trig(ctx, f64::tan));
    reg.register("ASIN", |ctx| inverse_trig(ctx, f64::asin));
    reg.register("ACOS", |ctx| inverse_trig(ctx, f64::acos));
    reg.register("ATAN", |ctx| inverse_trig(ctx, f64::atan));
    reg.register("ATAN2", atan2);

    reg.register("EXP", |ctx| unary_f64(ctx, |x| Ok(x.exp())));
    reg.register("LN", |ctx| unary_f64(ctx, positive_only(f64::ln)));
    reg.register("LOG", |ctx| unary_f64(ctx, positive_only(f64::log10)));
    reg.register("ALOG", |ctx| unary_f64(ctx, |x| Ok(10f64.powf(x))));
    reg.register("SQRT", sqrt);

    reg.register("PI", |ctx| push_constant(ctx, PI_DIGITS));
    reg.register("E", |ctx| push_constant(ctx, E_DIGITS));

    reg.register("FLOOR", |ctx| round_to_integer(ctx, Rounding::Floor));
    reg.register("CEIL", |ctx| round_to_integer(ctx, Rounding::Ceil));
    reg.register("IP", |ctx| round_to_integer(ctx, Rounding::Trunc));
    reg.register("FP", fractional_part);

    reg.register("MIN", |ctx| extremum(ctx, std::cmp::Ordering::Less));
    reg.register("MAX", |ctx| extremum(ctx, std::cmp::Ordering::Greater));
    reg.register("SIGN", sign);

    reg.register("!", factorial);
    reg.register("COMB", comb);
    reg.register("PERM", perm);

    reg.register("%", percent);
    reg.register("%T", percent_of_total);
    reg.register("%CH", percent_change);

    reg.register("D\u{2192}R", |ctx| {
        unary_f64(ctx, |x| Ok(x * std::f64::consts::PI / 180.0))
    });
    reg.register("D->R", |ctx| {
        unary_f64(ctx, |x| Ok(x * std::f64::consts::PI / 180.0))
    });
    reg.register("R\u{2192}D", |ctx| {
        unary_f64(ctx, |x| Ok(x * 180.0 / std::f64::consts::PI))
    });
    reg.register("R->D", |ctx| {
        unary_f64(ctx, |x| Ok(x * 180.0 / std::f64::consts::PI))
    });
}

fn set_angle_mode(ctx: &mut Context, mode: &str) -> Result<()> {
    ctx.store_mut().set_meta("angle_mode", mode)
}

fn positive_only(f: fn(f64) -> f64) -> impl Fn(f64) -> Result<f64> {
    move |x| {
        if x <= 0.0 {
            Err(EngineError::BadArgumentValue)
        } else {
            Ok(f(x))
        }
    }
}

/// Pop one numeric operand, apply `f` over `f64`, push a Real. The
/// operand is restored on any failure, including domain errors
/// surfacing as non-finite results.
fn unary_f64(ctx: &mut Context, f: impl Fn(f64) -> Result<f64>) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    let result = numeric::to_f64(&a)
        .and_then(&f)
        .and_then(numeric::decimal_from_f64);
    match result {
        Ok(d) => ctx.push(Value::Real(d)),
        Err(e) => {
            ctx.push(a)?;
            Err(e)
        }
    }
}

fn forward_trig(ctx: &mut Context, f: fn(f64) -> f64) -> Result<()> {
    let mode = ctx.store().angle_mode()?;
    unary_f64(ctx, move |x| Ok(f(to_radians(x, &mode))))
}

fn inverse_trig(ctx: &mut Context, f: fn(f64) -> f64) -> Result<()> {
    let mode = ctx.store().angle_mode()?;
    unary_f64(ctx, move |x| Ok(from_radians(f(x), &mode)))
}

fn to_radians(x: f64, mode: &str) -> f64 {
    match mode {
        "DEG" => x * std::f64::consts::PI / 180.0,
        "GRAD" => x * std::f64::consts::PI / 200.0,
        _ => x,
    }
}

fn from_radians(x: f64, mode: &str) -> f64 {
    match mode {
        "DEG" => x * 180.0 / std::f64::consts::PI,
        "GRAD" => x * 200.0 / std::f64::consts::PI,
        _ => x,
    }
}

/// ( y x -- atan2(y, x) ) in the current angle mode.
fn atan2(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let mode = ctx.store().angle_mode()?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    let result = numeric::to_f64(&a).and_then(|y| {
        let x = numeric::to_f64(&b)?;
        numeric::decimal_from_f64(from_radians(y.atan2(x), &mode))
    });
    match result {
        Ok(d) => ctx.push(Value::Real(d)),
        Err(e) => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(e)
        }
    }
}

/// Exact decimal square root with a domain check; the result is
/// normalized so perfect squares display cleanly.
fn sqrt(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    let result = numeric::to_decimal(&a).and_then(|d| {
        d.sqrt()
            .map(|r| r.normalized())
            .ok_or(EngineError::BadArgumentValue)
    });
    match result {
        Ok(d) => ctx.push(Value::Real(d)),
        Err(e) => {
            ctx.push(a)?;
            Err(e)
        }
    }
}

fn push_constant(ctx: &mut Context, digits: &str) -> Result<()> {
    let d: BigDecimal = digits
        .parse()
        .map_err(|_| EngineError::Runtime("bad constant".into()))?;
    ctx.push(Value::Real(d))
}

enum Rounding {
    Floor,
    Ceil,
    Trunc,
}

/// FLOOR / CEIL / IP: Integers pass through, Reals and Rationals round
/// to an Integer.
fn round_to_integer(ctx: &mut Context, mode: Rounding) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    if let Value::Integer(_) = a {
        return ctx.push(a);
    }
    let result = numeric::to_decimal(&a).map(|d| {
        let trunc = trunc_to_bigint(&d);
        let back = BigDecimal::from(trunc.clone());
        match mode {
            Rounding::Floor if d < back => trunc - BigInt::from(1),
            Rounding::Ceil if d > back => trunc + BigInt::from(1),
            _ => trunc,
        }
    });
    match result {
        Ok(i) => ctx.push(Value::Integer(i)),
        Err(e) => {
            ctx.push(a)?;
            Err(e)
        }
    }
}

/// ( x -- frac(x) ) as a Real, carrying the sign of x.
fn fractional_part(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    if let Value::Integer(_) = a {
        return ctx.push(Value::Real(BigDecimal::zero()));
    }
    let result = numeric::to_decimal(&a).map(|d| {
        let ip = BigDecimal::from(trunc_to_bigint(&d));
        &d - &ip
    });
    match result {
        Ok(d) => ctx.push(Value::Real(d)),
        Err(e) => {
            ctx.push(a)?;
            Err(e)
        }
    }
}

/// MIN / MAX over the promoted pair; Complex has no ordering.
fn extremum(ctx: &mut Context, keep: std::cmp::Ordering) -> Result<()> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    if matches!(a, Value::Complex(..)) || matches!(b, Value::Complex(..)) {
        ctx.push(a)?;
        ctx.push(b)?;
        return Err(EngineError::BadArgumentType);
    }
    match numeric::compare(&a, &b) {
        Ok(ordering) => {
            let target = numeric::rank(&a)
                .unwrap_or(0)
                .max(numeric::rank(&b).unwrap_or(0));
            let chosen = if ordering == keep { a } else { b };
            ctx.push(numeric::promote(chosen, target))
        }
        Err(e) => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(e)
        }
    }
}

fn sign(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    let signum = match &a {
        Value::Integer(i) => Some(i.sign()),
        Value::Rational(r) => Some(r.numer().sign()),
        Value::Real(d) => Some(if d.is_zero() {
            Sign::NoSign
        } else if *d < BigDecimal::zero() {
            Sign::Minus
        } else {
            Sign::Plus
        }),
        _ => None,
    };
    match signum {
        Some(Sign::Minus) => ctx.push(Value::integer(-1)),
        Some(Sign::NoSign) => ctx.push(Value::integer(0)),
        Some(Sign::Plus) => ctx.push(Value::integer(1)),
        None => {
            ctx.push(a)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

/// Pop a non-negative Integer, restoring on failure.
fn pop_nonneg_integer(ctx: &mut Context) -> Result<BigInt> {
    let a = ctx.pop()?;
    match a {
        Value::Integer(i) => {
            if i.sign() == Sign::Minus {
                ctx.push(Value::Integer(i))?;
                Err(EngineError::BadArgumentValue)
            } else {
                Ok(i)
            }
        }
        other => {
            ctx.push(other)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

/// ( n -- n! )
fn factorial(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let n = pop_nonneg_integer(ctx)?;
    let mut result = BigInt::from(1);
    let mut i = BigInt::from(2);
    while i <= n {
        result *= &i;
        i += BigInt::from(1);
    }
    ctx.push(Value::Integer(result))
}

/// Pop `n k`, both non-negative Integers with k ≤ n; restore both on
/// failure.
fn pop_comb_args(ctx: &mut Context) -> Result<(BigInt, BigInt)> {
    require_depth(ctx, 2)?;
    let k_value = ctx.pop()?;
    let n_value = ctx.pop()?;
    let err = match (&n_value, &k_value) {
        (Value::Integer(n), Value::Integer(k)) => {
            if n.sign() == Sign::Minus || k.sign() == Sign::Minus || k > n {
                EngineError::BadArgumentValue
            } else {
                return Ok((n.clone(), k.clone()));
            }
        }
        _ => EngineError::BadArgumentType,
    };
    ctx.push(n_value)?;
    ctx.push(k_value)?;
    Err(err)
}

/// ( n k -- C(n, k) )
fn comb(ctx: &mut Context) -> Result<()> {
    let (n, mut k) = pop_comb_args(ctx)?;
    let n_minus_k = &n - &k;
    if k > n_minus_k {
        k = n_minus_k;
    }
    // result * (n - i) is always divisible by (i + 1) at each step.
    let mut result = BigInt::from(1);
    let mut i = BigInt::from(0);
    while i < k {
        result = result * (&n - &i) / (&i + BigInt::from(1));
        i += BigInt::from(1);
    }
    ctx.push(Value::Integer(result))
}

/// ( n k -- P(n, k) )
fn perm(ctx: &mut Context) -> Result<()> {
    let (n, k) = pop_comb_args(ctx)?;
    let mut result = BigInt::from(1);
    let mut i = BigInt::from(0);
    while i < k {
        result *= &n - &i;
        i += BigInt::from(1);
    }
    ctx.push(Value::Integer(result))
}

/// Shared body of the percentage commands: pop two numeric operands as
/// decimals, compute, and restore the original operands on failure.
fn percent_binary(
    ctx: &mut Context,
    f: fn(BigDecimal, BigDecimal) -> Result<BigDecimal>,
) -> Result<()> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    let result = numeric::to_decimal(&a).and_then(|x| {
        let y = numeric::to_decimal(&b)?;
        f(x, y)
    });
    match result {
        Ok(d) => ctx.push(Value::Real(d)),
        Err(e) => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(e)
        }
    }
}

/// ( x y -- x·y/100 )
fn percent(ctx: &mut Context) -> Result<()> {
    percent_binary(ctx, |x, y| Ok(x * y / BigDecimal::from(100)))
}

/// ( total x -- 100·x/total )
fn percent_of_total(ctx: &mut Context) -> Result<()> {
    percent_binary(ctx, |total, part| {
        if total.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        Ok(part / total * BigDecimal::from(100))
    })
}

/// ( old new -- 100·(new-old)/old )
fn percent_change(ctx: &mut Context) -> Result<()> {
    percent_binary(ctx, |old, new| {
        if old.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        Ok((&new - &old) / &old * BigDecimal::from(100))
    })
}
