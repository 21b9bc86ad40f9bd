//! Type inspection and conversion commands.
//!
//! TYPE pushes the numeric type tag. →NUM converts down the tower to a
//! Real, →STR renders the display form, and STR→ parses its String
//! operand and executes the resulting tokens in the current context.
//! Each arrow command has an ASCII spelling.

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::numeric;
use crate::parser;
use crate::value::Value;

pub fn register(reg: &mut CommandRegistry) {
    reg.register("TYPE", type_tag);
    reg.register("\u{2192}NUM", to_num);
    reg.register("->NUM", to_num);
    reg.register("\u{2192}STR", to_str);
    reg.register("->STR", to_str);
    reg.register("STR\u{2192}", str_eval);
    reg.register("STR->", str_eval);
}

fn type_tag(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    ctx.push(Value::integer(a.type_tag()))
}

fn to_num(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    match &a {
        Value::Real(_) => ctx.push(a),
        Value::Integer(_) | Value::Rational(_) => {
            let d = numeric::to_decimal(&a)?;
            ctx.push(Value::Real(d))
        }
        _ => {
            ctx.push(a)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

fn to_str(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    let s = a.repr();
    ctx.push(Value::String(s))
}

fn str_eval(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    match a {
        Value::String(s) => {
            let tokens = parser::parse(&s);
            ctx.execute_tokens(&tokens)
        }
        other => {
            ctx.push(other)?;
            Err(EngineError::BadArgumentType)
        }
    }
}
