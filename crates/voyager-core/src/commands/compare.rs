//! Comparison commands: == != < > <= >=.
//!
//! Operands promote through the numeric tower and the result is an
//! Integer 0 or 1. Complex operands compare by their real components
//! only; SAME is the discriminating equality.

use std::cmp::Ordering;

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::Result;
use crate::numeric;
use crate::value::Value;

pub fn register(reg: &mut CommandRegistry) {
    reg.register("==", |ctx| compare(ctx, |o| o == Ordering::Equal));
    reg.register("!=", |ctx| compare(ctx, |o| o != Ordering::Equal));
    reg.register("<", |ctx| compare(ctx, |o| o == Ordering::Less));
    reg.register(">", |ctx| compare(ctx, |o| o == Ordering::Greater));
    reg.register("<=", |ctx| compare(ctx, |o| o != Ordering::Greater));
    reg.register(">=", |ctx| compare(ctx, |o| o != Ordering::Less));
}

fn compare(ctx: &mut Context, pred: fn(Ordering) -> bool) -> Result<()> {
    require_depth(ctx, 2)?;
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    match numeric::compare(&a, &b) {
        Ok(ordering) => ctx.push(Value::integer(pred(ordering) as i64)),
        Err(e) => {
            ctx.push(a)?;
            ctx.push(b)?;
            Err(e)
        }
    }
}
