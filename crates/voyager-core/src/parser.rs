//! Tokenizer for calculator input.
//!
//! The parser is total: every input yields a (possibly empty) token
//! vector. Unterminated strings and programs close at end of input;
//! semantic misuse is reported later by the interpreter.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::value::{Token, Value};

const LAQUO: &[u8] = "\u{ab}".as_bytes(); // 0xC2 0xAB
const RAQUO: &[u8] = "\u{bb}".as_bytes(); // 0xC2 0xBB

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

/// Optional minus followed only by digits.
fn is_integer(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    !digits.is_empty() && digits.bytes().all(|c| c.is_ascii_digit())
}

/// Digits with a `.` and/or an `E`/`e` exponent (optional sign).
fn is_real(word: &str) -> bool {
    let body = word.strip_prefix('-').unwrap_or(word);
    if body.is_empty() {
        return false;
    }
    let mut has_dot = false;
    let mut has_e = false;
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                if has_dot || has_e {
                    return false;
                }
                has_dot = true;
            }
            b'E' | b'e' => {
                if has_e {
                    return false;
                }
                has_e = true;
                if i + 1 < bytes.len() && (bytes[i + 1] == b'+' || bytes[i + 1] == b'-') {
                    i += 1;
                }
            }
            c if c.is_ascii_digit() => {}
            _ => return false,
        }
        i += 1;
    }
    has_dot || has_e
}

fn prog_open_at(b: &[u8], i: usize) -> bool {
    b[i..].starts_with(LAQUO) || b[i..].starts_with(b"<<")
}

fn prog_close_at(b: &[u8], i: usize) -> bool {
    b[i..].starts_with(RAQUO) || b[i..].starts_with(b">>")
}

/// Parse input text into a token vector.
pub fn parse(input: &str) -> Vec<Token> {
    let b = input.as_bytes();
    let len = b.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        while i < len && is_whitespace(b[i]) {
            i += 1;
        }
        if i >= len {
            break;
        }

        // Program literal: « ... » or << ... >>, nesting honored.
        if prog_open_at(b, i) {
            i += 2;
            let mut nesting = 1;
            let mut body = Vec::new();
            while i < len && nesting > 0 {
                if prog_open_at(b, i) {
                    body.extend_from_slice(&b[i..i + 2]);
                    i += 2;
                    nesting += 1;
                } else if prog_close_at(b, i) {
                    nesting -= 1;
                    if nesting > 0 {
                        body.extend_from_slice(&b[i..i + 2]);
                    }
                    i += 2;
                } else {
                    body.push(b[i]);
                    i += 1;
                }
            }
            let body = String::from_utf8_lossy(&body);
            tokens.push(Token::Literal(Value::Program(parse(body.trim()))));
            continue;
        }

        // String literal with backslash escapes.
        if b[i] == b'"' {
            i += 1;
            let mut value = Vec::new();
            while i < len && b[i] != b'"' {
                if b[i] == b'\\' && i + 1 < len {
                    i += 1;
                    match b[i] {
                        b'n' => value.push(b'\n'),
                        b't' => value.push(b'\t'),
                        b'"' => value.push(b'"'),
                        b'\\' => value.push(b'\\'),
                        c => value.push(c),
                    }
                } else {
                    value.push(b[i]);
                }
                i += 1;
            }
            if i < len {
                i += 1; // closing "
            }
            tokens.push(Token::Literal(Value::String(
                String::from_utf8_lossy(&value).into_owned(),
            )));
            continue;
        }

        // Quoted name or symbol.
        if b[i] == b'\'' {
            i += 1;
            let start = i;
            while i < len && b[i] != b'\'' {
                i += 1;
            }
            let value = String::from_utf8_lossy(&b[start..i]).into_owned();
            if i < len {
                i += 1; // closing '
            }
            // Operator characters or spaces make it a Symbol.
            let has_ops = value
                .bytes()
                .any(|c| matches!(c, b'+' | b'-' | b'*' | b'/' | b'^' | b'=' | b' '));
            if has_ops {
                tokens.push(Token::Literal(Value::Symbol(value)));
            } else {
                tokens.push(Token::Literal(Value::Name(value)));
            }
            continue;
        }

        // Complex literal: (re, im) with numeric parts. Anything else
        // starting with '(' falls through to a bare word.
        if b[i] == b'(' {
            if let Some(close) = input[i..].find(')').map(|p| i + p) {
                let inner = &input[i + 1..close];
                if let Some((re_str, im_str)) = inner.split_once(',') {
                    let re = re_str.trim().parse::<BigDecimal>();
                    let im = im_str.trim().parse::<BigDecimal>();
                    if let (Ok(re), Ok(im)) = (re, im) {
                        tokens.push(Token::Literal(Value::Complex(re, im)));
                        i = close + 1;
                        continue;
                    }
                }
            }
        }

        // Bare word: number or command.
        let start = i;
        while i < len && !is_whitespace(b[i]) && !prog_open_at(b, i) && !prog_close_at(b, i) {
            i += 1;
        }
        let word = String::from_utf8_lossy(&b[start..i]).into_owned();

        if let (true, Ok(v)) = (is_integer(&word), word.parse::<BigInt>()) {
            tokens.push(Token::Literal(Value::Integer(v)));
        } else if is_real(&word) {
            // A trailing dot ("25.") is the canonical Real display form;
            // the decimal parser wants it trimmed.
            let parsed = word
                .parse::<BigDecimal>()
                .or_else(|_| word.trim_end_matches('.').parse::<BigDecimal>());
            match parsed {
                Ok(v) => tokens.push(Token::Literal(Value::Real(v))),
                Err(_) => tokens.push(Token::Command(word.to_uppercase())),
            }
        } else {
            // Case-insensitive command matching.
            tokens.push(Token::Command(word.to_uppercase()));
        }
    }

    tokens
}
