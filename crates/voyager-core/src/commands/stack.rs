//! Stack manipulation commands.
//!
//! DUP DROP SWAP OVER ROT UNROT CLEAR DEPTH DUP2 DROP2, plus the
//! counted forms DUPN DROPN PICK ROLL ROLLD UNPICK which consume a
//! non-negative Integer count or 1-based level from the top of stack.

use num_traits::ToPrimitive;

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::value::Value;

pub fn register(reg: &mut CommandRegistry) {
    reg.register("DUP", dup);
    reg.register("DROP", drop);
    reg.register("SWAP", swap);
    reg.register("OVER", over);
    reg.register("ROT", rot);
    reg.register("UNROT", unrot);
    reg.register("CLEAR", clear);
    reg.register("DEPTH", depth);
    reg.register("DUP2", dup2);
    reg.register("DROP2", drop2);
    reg.register("DUPN", dupn);
    reg.register("DROPN", dropn);
    reg.register("PICK", pick);
    reg.register("ROLL", roll);
    reg.register("ROLLD", rolld);
    reg.register("UNPICK", unpick);
}

fn dup(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let top = ctx.peek(1)?;
    ctx.push(top)
}

fn drop(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    ctx.pop()?;
    Ok(())
}

fn swap(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let a = ctx.pop()?;
    let b = ctx.pop()?;
    ctx.push(a)?;
    ctx.push(b)
}

fn over(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let second = ctx.peek(2)?;
    ctx.push(second)
}

/// ( a b c -- b c a )
fn rot(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 3)?;
    let c = ctx.pop()?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    ctx.push(b)?;
    ctx.push(c)?;
    ctx.push(a)
}

/// ( a b c -- c a b )
fn unrot(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 3)?;
    let c = ctx.pop()?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    ctx.push(c)?;
    ctx.push(a)?;
    ctx.push(b)
}

fn clear(ctx: &mut Context) -> Result<()> {
    ctx.store_mut().clear_stack()
}

fn depth(ctx: &mut Context) -> Result<()> {
    let d = ctx.depth()?;
    ctx.push(Value::integer(d))
}

/// ( a b -- a b a b )
fn dup2(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let second = ctx.peek(2)?;
    let top = ctx.peek(1)?;
    ctx.push(second)?;
    ctx.push(top)
}

fn drop2(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    ctx.pop()?;
    ctx.pop()?;
    Ok(())
}

/// Pop the count/level operand the counted stack commands share. The
/// operand is pushed back before failing so the stack is untouched.
fn pop_count(ctx: &mut Context, min: i64) -> Result<i64> {
    require_depth(ctx, 1)?;
    let n_value = ctx.pop()?;
    let n = match &n_value {
        Value::Integer(i) => i.to_i64(),
        _ => None,
    };
    let Some(n) = n else {
        ctx.push(n_value)?;
        return Err(EngineError::BadArgumentType);
    };
    if n < min || ctx.depth()? < n {
        ctx.push(n_value)?;
        return Err(EngineError::TooFewArguments);
    }
    Ok(n)
}

/// ( x1..xn n -- x1..xn x1..xn )
fn dupn(ctx: &mut Context) -> Result<()> {
    let n = pop_count(ctx, 0)?;
    let mut items = Vec::with_capacity(n as usize);
    for level in (1..=n).rev() {
        items.push(ctx.peek(level)?);
    }
    for item in items {
        ctx.push(item)?;
    }
    Ok(())
}

/// ( x1..xn n -- )
fn dropn(ctx: &mut Context) -> Result<()> {
    let n = pop_count(ctx, 0)?;
    for _ in 0..n {
        ctx.pop()?;
    }
    Ok(())
}

/// ( ... xn ... x1 n -- ... xn ... x1 xn )
fn pick(ctx: &mut Context) -> Result<()> {
    let n = pop_count(ctx, 1)?;
    let picked = ctx.peek(n)?;
    ctx.push(picked)
}

/// Move the nth item to the top. ( xn xn-1 ... x1 n -- xn-1 ... x1 xn )
fn roll(ctx: &mut Context) -> Result<()> {
    let n = pop_count(ctx, 1)?;
    if n == 1 {
        return Ok(());
    }
    let mut saved = Vec::with_capacity(n as usize - 1);
    for _ in 0..n - 1 {
        saved.push(ctx.pop()?);
    }
    let target = ctx.pop()?;
    for item in saved.into_iter().rev() {
        ctx.push(item)?;
    }
    ctx.push(target)
}

/// Move the top item down to the nth position.
/// ( xn xn-1 ... x1 n -- x1 xn xn-1 ... x2 )
fn rolld(ctx: &mut Context) -> Result<()> {
    let n = pop_count(ctx, 1)?;
    if n == 1 {
        return Ok(());
    }
    let top = ctx.pop()?;
    let mut remaining = Vec::with_capacity(n as usize - 1);
    for _ in 0..n - 1 {
        remaining.push(ctx.pop()?);
    }
    ctx.push(top)?;
    for item in remaining.into_iter().rev() {
        ctx.push(item)?;
    }
    Ok(())
}

/// Replace the nth item with the object below the count.
/// ( ... xn ... x1 obj n -- ... obj ... x1 )
fn unpick(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let n_value = ctx.pop()?;
    let n = match &n_value {
        Value::Integer(i) => i.to_i64(),
        _ => None,
    };
    let Some(n) = n else {
        ctx.push(n_value)?;
        return Err(EngineError::BadArgumentType);
    };
    let obj = ctx.pop()?;
    if n < 1 || ctx.depth()? < n {
        ctx.push(obj)?;
        ctx.push(n_value)?;
        return Err(EngineError::TooFewArguments);
    }
    let mut saved = Vec::with_capacity(n as usize - 1);
    for _ in 0..n - 1 {
        saved.push(ctx.pop()?);
    }
    ctx.pop()?; // discard the replaced item
    ctx.push(obj)?;
    for item in saved.into_iter().rev() {
        ctx.push(item)?;
    }
    Ok(())
}
