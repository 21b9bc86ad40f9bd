//! Program execution commands: EVAL IFT IFTE.
//!
//! EVAL dispatches on the popped variant: Programs execute, Names
//! recall then evaluate, Symbols run through the expression evaluator,
//! and anything else is pushed back unchanged.

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::expr;
use crate::numeric;
use crate::value::Value;

pub fn register(reg: &mut CommandRegistry) {
    reg.register("EVAL", eval);
    reg.register("IFT", ift);
    reg.register("IFTE", ifte);
}

fn eval(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    match a {
        Value::Program(tokens) => ctx.execute_tokens(&tokens),
        Value::Name(name) => {
            let dir = ctx.store().current_dir()?;
            match ctx.store().recall_variable(dir, &name)? {
                Some(Value::Program(tokens)) => ctx.execute_tokens(&tokens),
                Some(value) => ctx.push(value),
                None => {
                    ctx.push(Value::Name(name.clone()))?;
                    Err(EngineError::UndefinedName(name))
                }
            }
        }
        Value::Symbol(body) => {
            let result = expr::eval_expression(&body, ctx);
            match result {
                Ok(value) => ctx.push(value),
                Err(e) => {
                    ctx.push(Value::Symbol(body))?;
                    Err(e)
                }
            }
        }
        other => ctx.push(other),
    }
}

/// ( then-prog cond -- ... )
fn ift(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let cond = ctx.pop()?;
    let then_branch = ctx.pop()?;
    if numeric::is_truthy(&cond) {
        run_branch(ctx, then_branch)
    } else {
        Ok(())
    }
}

/// ( else-prog then-prog cond -- ... )
fn ifte(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 3)?;
    let cond = ctx.pop()?;
    let then_branch = ctx.pop()?;
    let else_branch = ctx.pop()?;
    let chosen = if numeric::is_truthy(&cond) {
        then_branch
    } else {
        else_branch
    };
    run_branch(ctx, chosen)
}

fn run_branch(ctx: &mut Context, branch: Value) -> Result<()> {
    match branch {
        Value::Program(tokens) => ctx.execute_tokens(&tokens),
        other => ctx.push(other),
    }
}
