//! Directory and variable commands: STO RCL PURGE HOME PATH CRDIR VARS.
//!
//! Variables live in the current directory; STO upserts and RCL of a
//! never-stored name is an undefined-name error. Path traversal beyond
//! HOME is out of scope, so PATH always reports the root.

use super::{require_depth, CommandRegistry};
use crate::context::Context;
use crate::error::{EngineError, Result};
use crate::value::Value;

pub fn register(reg: &mut CommandRegistry) {
    reg.register("STO", sto);
    reg.register("RCL", rcl);
    reg.register("PURGE", purge);
    reg.register("HOME", home);
    reg.register("PATH", path);
    reg.register("CRDIR", crdir);
    reg.register("VARS", vars);
}

/// Pop a Name operand, restoring it on type mismatch.
fn pop_name(ctx: &mut Context) -> Result<String> {
    let v = ctx.pop()?;
    match v {
        Value::Name(n) => Ok(n),
        other => {
            ctx.push(other)?;
            Err(EngineError::BadArgumentType)
        }
    }
}

/// ( value 'name' -- )
fn sto(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 2)?;
    let name_value = ctx.pop()?;
    let value = ctx.pop()?;
    let Value::Name(name) = name_value else {
        ctx.push(value)?;
        ctx.push(name_value)?;
        return Err(EngineError::BadArgumentType);
    };
    let dir = ctx.store().current_dir()?;
    ctx.store_mut().store_variable(dir, &name, &value)
}

/// ( 'name' -- value )
fn rcl(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let name = pop_name(ctx)?;
    let dir = ctx.store().current_dir()?;
    match ctx.store().recall_variable(dir, &name)? {
        Some(value) => ctx.push(value),
        None => {
            ctx.push(Value::Name(name.clone()))?;
            Err(EngineError::UndefinedName(name))
        }
    }
}

/// ( 'name' -- ) — purging a missing name is not an error.
fn purge(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let name = pop_name(ctx)?;
    let dir = ctx.store().current_dir()?;
    ctx.store_mut().purge_variable(dir, &name)?;
    Ok(())
}

fn home(ctx: &mut Context) -> Result<()> {
    let home = ctx.store().home_dir_id()?;
    ctx.store_mut().set_current_dir(home)
}

fn path(ctx: &mut Context) -> Result<()> {
    ctx.push(Value::String("HOME".into()))
}

/// ( 'name' -- )
fn crdir(ctx: &mut Context) -> Result<()> {
    require_depth(ctx, 1)?;
    let name = pop_name(ctx)?;
    let dir = ctx.store().current_dir()?;
    ctx.store_mut().create_directory(dir, &name)?;
    Ok(())
}

/// ( -- "{ a b }" )
fn vars(ctx: &mut Context) -> Result<()> {
    let dir = ctx.store().current_dir()?;
    let names = ctx.store().list_variables(dir)?;
    let listing = format!("{{ {} }}", names.join(" "));
    ctx.push(Value::String(listing))
}
