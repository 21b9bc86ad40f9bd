//! Persistent RPL-style calculator engine.
//!
//! The engine turns textual input into tokens, evaluates them against a
//! persistent operand stack and variable store, and records a snapshot
//! history so every evaluation can be undone and redone. All state
//! lives behind a [`Context`] handle backed by a single SQLite
//! database; in-memory contexts are used for throwaway sessions and
//! tests.
//!
//! # Example
//!
//! ```
//! use voyager_core::Context;
//!
//! let mut ctx = Context::open_in_memory().unwrap();
//! ctx.exec("3 4 +").unwrap();
//! assert_eq!(ctx.depth().unwrap(), 1);
//! assert_eq!(ctx.repr_at(1).unwrap(), "7");
//!
//! ctx.undo().unwrap();
//! assert_eq!(ctx.depth().unwrap(), 0);
//! ```

pub mod commands;
pub mod context;
pub mod error;
pub mod expr;
pub mod numeric;
pub mod parser;
pub mod store;
pub mod value;

pub use commands::CommandRegistry;
pub use context::{Context, LocalFrame};
pub use error::{EngineError, Result};
pub use parser::parse;
pub use store::Store;
pub use value::{Token, Value};
