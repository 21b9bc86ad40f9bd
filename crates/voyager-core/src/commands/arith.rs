//! Arithmetic commands: + - * / NEG INV ABS MOD SQ.
//!
//! `+` concatenates two Strings; mixing a String with anything else is
//! a type error rather than a stringification. When either operand is a
//! Name or Symbol the four algebraic operators compose a new Symbol
//! instead of computing, with precedence-aware parenthesization.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::numeric::{self, BinOp};
use crate::value::Value;

pub fn register(reg: &mut CommandRegistry) {
    reg.register("+", add);
    reg.register("-", sub);
    reg.register("*", mul);
    reg.register("/", div);
    reg.register("NEG", neg);
    reg.register("INV", inv);
    reg.register("ABS", abs);
    reg.register("MOD", modulo);
    reg.register("SQ", sq);
}

fn is_symbolic(v: &Value) -> bool {
    matches!(v, Value::Name(_) | Value::Symbol(_))
}

/// Operand text for symbolic composition: names and symbols contribute
/// their bare body, everything else its display form.
fn expr_text(v: &Value) -> String {
    match v {
        Value::Name(n) => n.clone(),
        Value::Symbol(s) => s.clone(),
        other => other.repr(),
    }
}

/// Whether `expr` must be parenthesized as an operand of an operator
/// with precedence `outer`: scan for the loosest top-level operator.
fn needs_parens(expr: &str, outer: u8) -> bool {
    let mut depth = 0u32;
    let mut min_prec = u8::MAX;
    for c in expr.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '+' | '-' if depth == 0 => min_prec = min_prec.min(1),
            '*' | '/' if depth == 0 => min_prec = min_prec.min(2),
            _ => {}
        }
    }
    min_prec < outer
}

fn symbolic_binary(a: &Value, b: &Value, op: &str) -> Value {
    let prec = if op == "+" || op == "-" { 1 } else { 2 };
    let mut sa = expr_text(a);
    let mut sb = expr_text(b);
    if needs_parens(&sa, prec) {
        sa = format!("({})", sa);
    }
    if needs_parens(&sb, prec) {
        sb = format!("({})", sb);
    }
    Value::Symbol(format!("{}{}{}", sa, op, sb))
}

/// Shared body of the four algebraic operators.
fn binary_op(ctx: &mut Context, op: BinOp, sym: &str) -> Result<()> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;

    if is_symbolic(&a) || is_symbolic(&b) {
        let composed = symbolic_binary(&a, &b, sym);
        return ctx.push(composed);
    }
    match numeric::binary_numeric(op, &a, &b) {
        Ok(result) => ctx.push(result),
        Err(e) => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(e)
        }
    }
}

fn add(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;

    match (&a, &b) {
        (Value::String(x), Value::String(y)) => {
            let joined = format!("{}{}", x, y);
            ctx.push(Value::String(joined))
        }
        (Value::String(_), _) | (_, Value::String(_)) => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(EngineError::BadArgumentType)
        }
        _ if is_symbolic(&a) || is_symbolic(&b) => {
            let composed = symbolic_binary(&a, &b, "+");
            ctx.push(composed)
        }
        _ => match numeric::binary_numeric(BinOp::Add, &a, &b) {
            Ok(result) => ctx.push(result),
            Err(e) => {
                ctx.push(a)?;
                ctx.push(b)?;
                Err(e)
            }
        },
    }
}

fn sub(ctx: &mut Context) -> Result<()> {
    binary_op(ctx, BinOp::Sub, "-")
}

fn mul(ctx: &mut Context) -> Result<()> {
    binary_op(ctx, BinOp::Mul, "*")
}

fn div(ctx: &mut Context) -> Result<()> {
    binary_op(ctx, BinOp::Div, "/")
}

fn neg(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    if is_symbolic(&a) {
        // Negation always parenthesizes its operand.
        let composed = Value::Symbol(format!("-({})", expr_text(&a)));
        return ctx.push(composed);
    }
    match numeric::negate(a.clone()) {
        Ok(result) => ctx.push(result),
        Err(e) => {
            ctx.push(a)?;
            Err(e)
        }
    }
}

fn inv(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    if numeric::is_zero(&a) {
        ctx.push(a)?;
        return Err(EngineError::DivisionByZero);
    }
    let result = match &a {
        Value::Integer(i) => Value::Rational(BigRational::new(BigInt::from(1), i.clone())),
        Value::Rational(r) => Value::Rational(r.recip()),
        Value::Real(d) => Value::Real(BigDecimal::from(1) / d),
        Value::Complex(re, im) => {
            let denom = re * re + im * im;
            Value::Complex(re / &denom, -(im / &denom))
        }
        _ => {
            ctx.push(a)?;
            return Err(EngineError::BadArgumentType);
        }
    };
    ctx.push(result)
}

fn abs(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    let result = match &a {
        Value::Integer(i) => Value::Integer(i.abs()),
        Value::Rational(r) => Value::Rational(r.abs()),
        Value::Real(d) => Value::Real(d.abs()),
        Value::Complex(re, im) => {
            // |z| = sqrt(re² + im²)
            let mag = (re * re + im * im).sqrt().unwrap_or_else(BigDecimal::zero);
            Value::Real(mag.normalized())
        }
        _ => {
            ctx.push(a)?;
            return Err(EngineError::BadArgumentType);
        }
    };
    ctx.push(result)
}

fn modulo(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    match (&a, &b) {
        (Value::Integer(x), Value::Integer(y)) => {
            if y.is_zero() {
                ctx.push(a)?;
                ctx.push(b)?;
                return Err(EngineError::DivisionByZero);
            }
            let result = Value::Integer(x % y);
            ctx.push(result)
        }
        _ => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

fn sq(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    match numeric::binary_numeric(BinOp::Mul, &a, &a) {
        Ok(result) => ctx.push(result),
        Err(e) => {
            ctx.push(a)?;
            Err(e)
        }
    }
}
