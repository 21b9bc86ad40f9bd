//! Engine error kinds.
//!
//! Every failure surfaced to the user maps to one of these variants.
//! Each variant carries a stable numeric code which is embedded in the
//! on-stack `Value::Error` produced when an evaluation fails.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Runtime error during parsing, evaluation, or storage access.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Too few stack items for a command's arity, or an out-of-range
    /// count/level operand.
    #[error("Too few arguments")]
    TooFewArguments,
    /// Operand variant unsupported by the command.
    #[error("Bad argument type")]
    BadArgumentType,
    /// Domain violation: log of a non-positive, sqrt of a negative,
    /// factorial of a negative, and the like.
    #[error("Bad argument value")]
    BadArgumentValue,
    #[error("Division by zero")]
    DivisionByZero,
    /// A name was recalled that was never stored.
    #[error("Undefined name '{0}'")]
    UndefinedName(String),
    /// Not a built-in, not a local, not a variable.
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    /// Malformed control flow or unbalanced delimiters.
    #[error("{0}")]
    Structural(String),
    /// Underlying database failure, including codec corruption.
    #[error("storage error: {0}")]
    Storage(String),
    /// Anything else.
    #[error("{0}")]
    Runtime(String),
}

impl EngineError {
    /// Stable numeric code surfaced in the on-stack error value.
    pub fn code(&self) -> i64 {
        match self {
            EngineError::TooFewArguments => 1,
            EngineError::BadArgumentType => 2,
            EngineError::BadArgumentValue => 3,
            EngineError::DivisionByZero => 4,
            EngineError::UndefinedName(_) => 5,
            EngineError::UnknownCommand(_) => 6,
            EngineError::Structural(_) => 7,
            EngineError::Storage(_) => 8,
            EngineError::Runtime(_) => 9,
        }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(e: rusqlite::Error) -> Self {
        EngineError::Storage(e.to_string())
    }
}
