//! Built-in command registry.
//!
//! Commands are named effects over the interpreter context, grouped by
//! family. Each command checks its arity before popping, and restores
//! popped operands before failing, so the stack a failed command leaves
//! behind is the stack it found.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::context::Context;
use crate::error::{EngineError, Result};

mod arith;
mod compare;
mod directory;
mod logic;
mod prog;
mod stack;
mod strings;
mod transcend;
mod types;

/// A built-in command implementation.
pub type CommandFn = fn(&mut Context) -> Result<()>;

/// Catalog of built-in commands, keyed by uppercase name.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandFn>,
}

impl CommandRegistry {
    /// Build the full catalog.
    pub fn new() -> CommandRegistry {
        let mut reg = CommandRegistry {
            commands: HashMap::new(),
        };
        stack::register(&mut reg);
        arith::register(&mut reg);
        compare::register(&mut reg);
        types::register(&mut reg);
        directory::register(&mut reg);
        prog::register(&mut reg);
        logic::register(&mut reg);
        transcend::register(&mut reg);
        strings::register(&mut reg);
        reg
    }

    /// The shared process-wide catalog.
    pub fn global() -> &'static CommandRegistry {
        static REGISTRY: OnceLock<CommandRegistry> = OnceLock::new();
        REGISTRY.get_or_init(CommandRegistry::new)
    }

    pub(crate) fn register(&mut self, name: &'static str, f: CommandFn) {
        self.commands.insert(name, f);
    }

    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<CommandFn> {
        self.commands.get(name).copied()
    }

    /// Sorted command names, for completion and diagnostics.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        CommandRegistry::new()
    }
}

/// Arity guard: fail before popping anything.
pub(crate) fn require_depth(ctx: &Context, n: i64) -> Result<()> {
    if ctx.depth()? < n {
        return Err(EngineError::TooFewArguments);
    }
    Ok(())
}
