//! Boolean, bitwise, and structural-equality commands.
//!
//! AND OR NOT XOR treat Integers as booleans (zero vs nonzero) and
//! yield 0 or 1. BAND BOR BXOR BNOT SL SR ASR operate on Integer bit
//! patterns with two's-complement semantics. SAME is deep structural
//! equality: same variant and equal payload.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::value::Value;

pub fn register(reg: &mut CommandRegistry) {
    reg.register("AND", |ctx| bool_binary(ctx, |a, b| a && b));
    reg.register("OR", |ctx| bool_binary(ctx, |a, b| a || b));
    reg.register("XOR", |ctx| bool_binary(ctx, |a, b| a != b));
    reg.register("NOT", not);
    reg.register("BAND", |ctx| bit_binary(ctx, |a, b| a & b));
    reg.register("BOR", |ctx| bit_binary(ctx, |a, b| a | b));
    reg.register("BXOR", |ctx| bit_binary(ctx, |a, b| a ^ b));
    reg.register("BNOT", bnot);
    reg.register("SL", |ctx| shift(ctx, ShiftDir::Left));
    reg.register("SR", |ctx| shift(ctx, ShiftDir::Right));
    // Arithmetic shift right: big integers shift sign-preserving anyway.
    reg.register("ASR", |ctx| shift(ctx, ShiftDir::Right));
    reg.register("SAME", same);
}

/// Pop two Integer operands, restoring both on type mismatch.
fn pop_two_integers(ctx: &mut Context) -> Result<(BigInt, BigInt)> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    match (&a, &b) {
        (Value::Integer(x), Value::Integer(y)) => Ok((x.clone(), y.clone())),
        _ => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

fn pop_integer(ctx: &mut Context) -> Result<BigInt> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    match a {
        Value::Integer(x) => Ok(x),
        other => {
            ctx.push(other)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

fn bool_binary(ctx: &mut Context, op: fn(bool, bool) -> bool) -> Result<()> {
    let (a, b) = pop_two_integers(ctx)?;
    let result = op(!a.is_zero(), !b.is_zero());
    ctx.push(Value::integer(result as i64))
}

fn not(ctx: &mut Context) -> Result<()> {
    let a = pop_integer(ctx)?;
    ctx.push(Value::integer(a.is_zero() as i64))
}

fn bit_binary(ctx: &mut Context, op: fn(BigInt, BigInt) -> BigInt) -> Result<()> {
    let (a, b) = pop_two_integers(ctx)?;
    ctx.push(Value::Integer(op(a, b)))
}

fn bnot(ctx: &mut Context) -> Result<()> {
    let a = pop_integer(ctx)?;
    // Two's complement: !x == -x - 1.
    ctx.push(Value::Integer(-a - BigInt::from(1)))
}

enum ShiftDir {
    Left,
    Right,
}

fn shift(ctx: &mut Context, dir: ShiftDir) -> Result<()> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    let amount = match &b {
        Value::Integer(n) => n.to_usize(),
        _ => None,
    };
    match (&a, amount) {
        (Value::Integer(x), Some(n)) => {
            let shifted = match dir {
                ShiftDir::Left => x.clone() << n,
                ShiftDir::Right => x.clone() >> n,
            };
            ctx.push(Value::Integer(shifted))
        }
        (Value::Integer(_), None) if matches!(b, Value::Integer(_)) => {
            // Negative shift count.
            ctx.push(a)?;
            ctx.push(b)?;
            Err(EngineError::BadArgumentValue)
        }
        _ => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

/// ( a b -- 0|1 ) — same variant and equal payload. Numeric variants
/// compare by value within the variant; a promoted twin is not SAME.
fn same(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    let equal = a.type_tag() == b.type_tag() && a == b;
    ctx.push(Value::integer(equal as i64))
}
