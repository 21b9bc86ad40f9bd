//! Runtime value model.
//!
//! A `Value` is one of nine variants. The first four form the numeric
//! tower (see [`crate::numeric`] for promotion); the rest are the
//! non-numeric object kinds. Variant order fixes the type tag used by
//! the TYPE command and the on-disk discriminator, so it must not be
//! rearranged.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::error::{EngineError, Result};

/// A value on the stack, in a variable, or inside a program literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Arbitrary-precision signed integer.
    Integer(BigInt),
    /// Arbitrary-precision decimal.
    Real(BigDecimal),
    /// Normalized pair of big integers.
    Rational(BigRational),
    /// Pair of reals `(re, im)`.
    Complex(BigDecimal, BigDecimal),
    /// Byte string.
    String(String),
    /// Parsed program body.
    Program(Vec<Token>),
    /// Identifier bound (or to be bound) in a directory.
    Name(String),
    /// Error code plus message.
    Error { code: i64, message: String },
    /// Textual algebraic expression.
    Symbol(String),
}

/// One element of a program: a literal to push or a command to run.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Literal(Value),
    Command(String),
}

impl Value {
    /// Convenience constructor for small integers.
    pub fn integer(v: i64) -> Self {
        Value::Integer(BigInt::from(v))
    }

    /// Type tag exposed by TYPE and used as the on-disk discriminator.
    pub fn type_tag(&self) -> i64 {
        match self {
            Value::Integer(_) => 0,
            Value::Real(_) => 1,
            Value::Rational(_) => 2,
            Value::Complex(..) => 3,
            Value::String(_) => 4,
            Value::Program(_) => 5,
            Value::Name(_) => 6,
            Value::Error { .. } => 7,
            Value::Symbol(_) => 8,
        }
    }

    /// Display form, unambiguous and re-parseable where possible.
    pub fn repr(&self) -> String {
        match self {
            Value::Integer(v) => v.to_string(),
            Value::Real(v) => display_real(v),
            Value::Rational(v) => v.to_string(),
            Value::Complex(re, im) => {
                format!("({}, {})", display_real(re), display_real(im))
            }
            Value::String(s) => format!("\"{}\"", escape_string(s)),
            Value::Program(tokens) => format!("\u{ab} {} \u{bb}", repr_tokens(tokens)),
            Value::Name(n) => format!("'{}'", n),
            Value::Error { code, message } => format!("Error {}: {}", code, message),
            Value::Symbol(s) => format!("'{}'", s),
        }
    }

    /// Encode into the (tag, payload) pair stored in the `objects` table.
    pub fn encode(&self) -> (i64, String) {
        let data = match self {
            Value::Integer(v) => v.to_string(),
            Value::Real(v) => v.to_string(),
            Value::Rational(v) => format!("{}/{}", v.numer(), v.denom()),
            Value::Complex(re, im) => format!("{}|{}", re, im),
            Value::String(s) => s.clone(),
            Value::Program(tokens) => repr_tokens(tokens),
            Value::Name(n) => n.clone(),
            Value::Error { code, message } => format!("{}|{}", code, message),
            Value::Symbol(s) => s.clone(),
        };
        (self.type_tag(), data)
    }

    /// Decode a (tag, payload) pair read back from the store.
    pub fn decode(tag: i64, data: &str) -> Result<Value> {
        let corrupt = || EngineError::Storage(format!("undecodable object (tag {})", tag));
        match tag {
            0 => data.parse::<BigInt>().map(Value::Integer).map_err(|_| corrupt()),
            1 => data.parse::<BigDecimal>().map(Value::Real).map_err(|_| corrupt()),
            2 => match data.split_once('/') {
                Some((num, den)) => {
                    let num = num.parse::<BigInt>().map_err(|_| corrupt())?;
                    let den = den.parse::<BigInt>().map_err(|_| corrupt())?;
                    Ok(Value::Rational(BigRational::new(num, den)))
                }
                // Whole rationals were historically stored bare.
                None => data.parse::<BigInt>().map(Value::Integer).map_err(|_| corrupt()),
            },
            3 => {
                let (re, im) = data.split_once('|').ok_or_else(corrupt)?;
                let re = re.parse::<BigDecimal>().map_err(|_| corrupt())?;
                let im = im.parse::<BigDecimal>().map_err(|_| corrupt())?;
                Ok(Value::Complex(re, im))
            }
            4 => Ok(Value::String(data.to_string())),
            5 => Ok(Value::Program(crate::parser::parse(data))),
            6 => Ok(Value::Name(data.to_string())),
            7 => {
                let (code, message) = data.split_once('|').ok_or_else(corrupt)?;
                let code = code.parse::<i64>().map_err(|_| corrupt())?;
                Ok(Value::Error {
                    code,
                    message: message.to_string(),
                })
            }
            8 => Ok(Value::Symbol(data.to_string())),
            _ => Err(corrupt()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr())
    }
}

impl From<EngineError> for Value {
    fn from(e: EngineError) -> Self {
        Value::Error {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

/// Reals always carry a decimal point, even when the fractional part is
/// zero (`25.`), so they never display like integers.
fn display_real(v: &BigDecimal) -> String {
    let s = v.to_string();
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{}.", s)
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Space-joined display of a token slice, used for program bodies.
pub fn repr_tokens(tokens: &[Token]) -> String {
    let parts: Vec<String> = tokens
        .iter()
        .map(|t| match t {
            Token::Literal(v) => v.repr(),
            Token::Command(c) => c.clone(),
        })
        .collect();
    parts.join(" ")
}
