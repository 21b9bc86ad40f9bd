//! String commands: SIZE HEAD TAIL SUB POS REPL NUM CHR.
//!
//! Strings are byte sequences; positions are 1-based. SUB clamps to the
//! string bounds and yields empty when start exceeds end; POS reports 0
//! when the needle is absent; REPL replaces the first occurrence only;
//! NUM/CHR convert between a leading byte and its 7-bit codepoint.

use num_traits::ToPrimitive;

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::value::Value;

pub fn register(reg: &mut CommandRegistry) {
    reg.register("SIZE", size);
    reg.register("HEAD", head);
    reg.register("TAIL", tail);
    reg.register("SUB", sub);
    reg.register("POS", pos);
    reg.register("REPL", repl);
    reg.register("NUM", num);
    reg.register("CHR", chr);
}

/// Pop a String operand, restoring it on type mismatch.
fn pop_string(ctx: &mut Context) -> Result<String> {
    let v = ctx.pop()?;
    match v {
        Value::String(s) => Ok(s),
        other => {
            ctx.push(other)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

fn size(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let s = pop_string(ctx)?;
    ctx.push(Value::integer(s.len() as i64))
}

fn head(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let s = pop_string(ctx)?;
    if s.is_empty() {
        ctx.push(Value::String(s))?;
        return Err(EngineError::BadArgumentValue);
    }
    let first = String::from_utf8_lossy(&s.as_bytes()[..1]).into_owned();
    ctx.push(Value::String(first))
}

fn tail(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let s = pop_string(ctx)?;
    if s.is_empty() {
        ctx.push(Value::String(s))?;
        return Err(EngineError::BadArgumentValue);
    }
    let rest = String::from_utf8_lossy(&s.as_bytes()[1..]).into_owned();
    ctx.push(Value::String(rest))
}

/// ( "string" start end -- "substring" ), 1-based inclusive, clamped.
fn sub(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 3)?;
    let end_value = ctx.pop()?;
    let start_value = ctx.pop()?;
    let str_value = ctx.pop()?;
    let args = match (&str_value, &start_value, &end_value) {
        (Value::String(s), Value::Integer(a), Value::Integer(b)) => {
            match (a.to_i64(), b.to_i64()) {
                (Some(a), Some(b)) => Some((s.clone(), a, b)),
                _ => None,
            }
        }
        _ => None,
    };
    let Some((s, start, end)) = args else {
        ctx.push(str_value)?;
        ctx.push(start_value)?;
        ctx.push(end_value)?;
        return Err(EngineError::BadArgumentType);
    };
    let start = start.max(1);
    let end = end.min(s.len() as i64);
    if start > end {
        return ctx.push(Value::String(String::new()));
    }
    let bytes = &s.as_bytes()[(start - 1) as usize..end as usize];
    ctx.push(Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// ( "string" "needle" -- position ), 0 when absent.
fn pos(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let needle_value = ctx.pop()?;
    let str_value = ctx.pop()?;
    match (&str_value, &needle_value) {
        (Value::String(s), Value::String(needle)) => {
            let found = s.find(needle.as_str()).map(|p| p as i64 + 1).unwrap_or(0);
            ctx.push(Value::integer(found))
        }
        _ => {
            ctx.push(str_value)?;
            ctx.push(needle_value)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

/// ( "string" "needle" "replacement" -- "result" ), first occurrence.
fn repl(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 3)?;
    let repl_value = ctx.pop()?;
    let needle_value = ctx.pop()?;
    let str_value = ctx.pop()?;
    match (&str_value, &needle_value, &repl_value) {
        (Value::String(s), Value::String(needle), Value::String(replacement)) => {
            let result = s.replacen(needle.as_str(), replacement, 1);
            ctx.push(Value::String(result))
        }
        _ => {
            ctx.push(str_value)?;
            ctx.push(needle_value)?;
            ctx.push(repl_value)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

/// ( "c..." -- codepoint ) of the first byte.
fn num(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let s = pop_string(ctx)?;
    match s.as_bytes().first() {
        Some(&byte) => ctx.push(Value::integer(byte as i64)),
        None => {
            ctx.push(Value::String(s))?;
            Err(EngineError::BadArgumentValue)
        }
    }
}

/// ( codepoint -- "c" ), 7-bit only.
fn chr(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let a = ctx.pop()?;
    match &a {
        Value::Integer(i) => match i.to_i64() {
            Some(c) if (0..=127).contains(&c) => {
                ctx.push(Value::String((c as u8 as char).to_string()))
            }
            _ => {
                ctx.push(a)?;
                Err(EngineError::BadArgumentValue)
            }
        },
        _ => {
            ctx.push(a)?;
            Err(EngineError::BadArgumentType)
        }
    }
}
