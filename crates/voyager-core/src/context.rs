//! Interpreter context.
//!
//! A `Context` owns the persistent store plus the process-lifetime
//! local-frame stack, and drives token execution: literals push,
//! structured keywords open blocks, the arrow form binds runstream
//! parameters, and everything else dispatches through the command
//! registry, the local frames, and the variable store, in that order.
//!
//! Every top-level evaluation is bracketed by exactly one transaction
//! and two stack snapshots (pre and post), which is what makes undo and
//! redo work.

use std::collections::HashMap;
use std::path::Path;

use bigdecimal::{BigDecimal, One, Zero};
use tracing::{debug, trace};

use crate::commands::CommandRegistry;
use crate::error::{EngineError, Result};
use crate::expr;
use crate::numeric::{self, trunc_to_bigint};
use crate::parser;
use crate::store::Store;
use crate::value::{Token, Value};

/// Local frame: name → value bindings introduced by the arrow form or a
/// FOR loop variable. Never persisted.
pub type LocalFrame = HashMap<String, Value>;

/// Interpreter context owning the store handle.
pub struct Context {
    store: Store,
    locals: Vec<LocalFrame>,
}

fn is_arrow(cmd: &str) -> bool {
    cmd == "->" || cmd == "\u{2192}"
}

/// Collect tokens from `*i` until one of `stops` appears at nesting
/// depth zero. Tracks which closer each opener expects: IF/CASE/WHILE/DO
/// close with END, FOR/START close with NEXT or STEP. Leaves `*i` on
/// the stop token.
fn collect_until(tokens: &[Token], i: &mut usize, stops: &[&str]) -> Result<Vec<Token>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Closer {
        End,
        Next,
    }
    let mut collected = Vec::new();
    let mut nest: Vec<Closer> = Vec::new();
    while *i < tokens.len() {
        let t = &tokens[*i];
        if let Token::Command(cmd) = t {
            if nest.is_empty() && stops.iter().any(|s| s == cmd) {
                return Ok(collected);
            }
            match cmd.as_str() {
                "IF" | "CASE" | "WHILE" | "DO" => nest.push(Closer::End),
                "FOR" | "START" => nest.push(Closer::Next),
                _ => {}
            }
            match (nest.last(), cmd.as_str()) {
                (Some(Closer::End), "END") => {
                    nest.pop();
                }
                (Some(Closer::Next), "NEXT" | "STEP") => {
                    nest.pop();
                }
                _ => {}
            }
        }
        collected.push(t.clone());
        *i += 1;
    }
    Err(EngineError::Structural(
        "Unexpected end of tokens in control structure".into(),
    ))
}

impl Context {
    /// Open a context backed by the database at `path`, or by an
    /// in-memory database when `path` is `None`.
    pub fn open(path: Option<&Path>) -> Result<Context> {
        Ok(Context {
            store: Store::open(path)?,
            locals: Vec::new(),
        })
    }

    /// Open a throwaway in-memory context.
    pub fn open_in_memory() -> Result<Context> {
        Context::open(None)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    // --- Stack conveniences for commands ---

    pub fn push(&mut self, value: Value) -> Result<()> {
        self.store.push(&value)
    }

    pub fn pop(&mut self) -> Result<Value> {
        self.store.pop()
    }

    pub fn peek(&self, level: i64) -> Result<Value> {
        self.store.peek(level)
    }

    pub fn depth(&self) -> Result<i64> {
        self.store.depth()
    }

    /// Display string for a 1-based stack level.
    pub fn repr_at(&self, level: i64) -> Result<String> {
        Ok(self.store.peek(level)?.repr())
    }

    // --- Local frames ---

    pub fn push_locals(&mut self, frame: LocalFrame) {
        self.locals.push(frame);
    }

    pub fn pop_locals(&mut self) {
        self.locals.pop();
    }

    /// Innermost-first lookup across the local frames.
    pub fn resolve_local(&self, name: &str) -> Option<Value> {
        self.locals
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).cloned())
    }

    // --- Top-level evaluation ---

    /// Parse and execute one input line inside a transaction. On
    /// success two snapshots (pre and post) have been committed. On
    /// failure the whole evaluation is rolled back and an error value
    /// is pushed on top of the pre-state; the error is also returned.
    pub fn exec(&mut self, input: &str) -> Result<()> {
        debug!(input, "exec");
        self.store.begin()?;
        match self.exec_inner(input) {
            Ok(()) => {
                self.store.commit()?;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "exec failed, rolling back");
                // Frames are scoped to the evaluation; a failure must
                // not leak them into the next one.
                self.locals.clear();
                self.store.rollback()?;
                self.store.begin()?;
                self.store.push(&Value::from(e.clone()))?;
                self.store.commit()?;
                Err(e)
            }
        }
    }

    fn exec_inner(&mut self, input: &str) -> Result<()> {
        self.store.snapshot_stack()?;
        let tokens = parser::parse(input);
        self.execute_tokens(&tokens)?;
        self.store.snapshot_stack()?;
        Ok(())
    }

    // --- Token execution ---

    /// Execute a token slice against the current state. Used by the
    /// top-level evaluation and recursively by EVAL, STR→, program
    /// variables, and block bodies.
    pub fn execute_tokens(&mut self, tokens: &[Token]) -> Result<()> {
        let mut i = 0;
        while i < tokens.len() {
            match &tokens[i] {
                Token::Literal(v) => self.store.push(v)?,
                Token::Command(cmd) if is_arrow(cmd) => self.run_arrow(tokens, &mut i)?,
                Token::Command(cmd) => match cmd.as_str() {
                    "IF" => self.run_if(tokens, &mut i)?,
                    "CASE" => self.run_case(tokens, &mut i)?,
                    "FOR" => self.run_counted_loop(tokens, &mut i, true)?,
                    "START" => self.run_counted_loop(tokens, &mut i, false)?,
                    "WHILE" => self.run_while(tokens, &mut i)?,
                    "DO" => self.run_do(tokens, &mut i)?,
                    _ => self.dispatch(cmd)?,
                },
            }
            i += 1;
        }
        Ok(())
    }

    /// Command dispatch priority: built-in, then innermost local frame,
    /// then current-directory variable (programs execute, everything
    /// else pushes).
    fn dispatch(&mut self, cmd: &str) -> Result<()> {
        if let Some(f) = CommandRegistry::global().get(cmd) {
            trace!(cmd, "builtin");
            return f(self);
        }
        if let Some(value) = self.resolve_local(cmd) {
            return self.store.push(&value);
        }
        let dir = self.store.current_dir()?;
        match self.store.recall_variable(dir, cmd)? {
            Some(Value::Program(tokens)) => self.execute_tokens(&tokens),
            Some(value) => self.store.push(&value),
            None => Err(EngineError::UnknownCommand(cmd.to_string())),
        }
    }

    // --- Arrow binding ---

    /// `-> a b body`: collect parameter names from the runstream until
    /// a literal body (Symbol or Program), pop one value per name (first
    /// name binds deepest), run the body in a fresh frame.
    fn run_arrow(&mut self, tokens: &[Token], i: &mut usize) -> Result<()> {
        let mut names = Vec::new();
        *i += 1;
        while *i < tokens.len() {
            match &tokens[*i] {
                Token::Literal(_) => break,
                Token::Command(name) => {
                    names.push(name.clone());
                    *i += 1;
                }
            }
        }
        if *i >= tokens.len() {
            return Err(EngineError::Structural("-> missing body".into()));
        }
        if names.is_empty() {
            return Err(EngineError::Structural(
                "-> requires at least one variable name".into(),
            ));
        }
        if self.store.depth()? < names.len() as i64 {
            return Err(EngineError::TooFewArguments);
        }

        // Pop in reverse: the last name takes level 1.
        let mut values = vec![Value::integer(0); names.len()];
        for slot in values.iter_mut().rev() {
            *slot = self.store.pop()?;
        }
        let frame: LocalFrame = names.into_iter().zip(values).collect();

        let body = &tokens[*i];
        self.push_locals(frame);
        let result = match body {
            Token::Literal(Value::Program(prog)) => self.execute_tokens(prog),
            Token::Literal(Value::Symbol(sym)) => {
                let sym = sym.clone();
                expr::eval_expression(&sym, self).and_then(|v| self.store.push(&v))
            }
            _ => Err(EngineError::Structural(
                "-> body must be a symbol or program".into(),
            )),
        };
        self.pop_locals();
        result
    }

    // --- Structured control flow ---

    /// Pop a block condition result and test it.
    fn pop_condition(&mut self, construct: &str) -> Result<bool> {
        if self.store.depth()? < 1 {
            return Err(EngineError::Structural(format!(
                "{}: missing condition result",
                construct
            )));
        }
        let value = self.store.pop()?;
        if !numeric::is_numeric(&value) {
            return Err(EngineError::BadArgumentType);
        }
        Ok(numeric::is_truthy(&value))
    }

    fn run_if(&mut self, tokens: &[Token], i: &mut usize) -> Result<()> {
        *i += 1;
        let cond = collect_until(tokens, i, &["THEN"])?;
        *i += 1; // skip THEN
        let then_body = collect_until(tokens, i, &["ELSE", "END"])?;
        let else_body = if matches!(&tokens[*i], Token::Command(c) if c == "ELSE") {
            *i += 1;
            collect_until(tokens, i, &["END"])?
        } else {
            Vec::new()
        };
        // *i rests on END; the main loop steps past it.

        self.execute_tokens(&cond)?;
        if self.pop_condition("IF")? {
            self.execute_tokens(&then_body)?;
        } else if !else_body.is_empty() {
            self.execute_tokens(&else_body)?;
        }
        Ok(())
    }

    /// `CASE (test THEN body END)* [default] END`: run tests in order,
    /// execute the body of the first truthy one, fall back to a default
    /// body when no THEN clause matched.
    fn run_case(&mut self, tokens: &[Token], i: &mut usize) -> Result<()> {
        *i += 1;
        let mut matched = false;
        while *i < tokens.len() {
            if matches!(&tokens[*i], Token::Command(c) if c == "END") {
                break; // final END of the CASE
            }
            let test = collect_until(tokens, i, &["THEN", "END"])?;
            if matches!(&tokens[*i], Token::Command(c) if c == "END") {
                // No THEN: this was the default body.
                if !matched {
                    self.execute_tokens(&test)?;
                }
                break;
            }
            *i += 1; // skip THEN
            let body = collect_until(tokens, i, &["END"])?;
            *i += 1; // skip the clause's END

            if !matched {
                self.execute_tokens(&test)?;
                if self.pop_condition("CASE")? {
                    self.execute_tokens(&body)?;
                    matched = true;
                }
            }
        }
        Ok(())
    }

    /// Loop counter bounds are a single Integer or Real.
    fn loop_bound(value: &Value) -> Result<BigDecimal> {
        match value {
            Value::Integer(i) => Ok(BigDecimal::from(i.clone())),
            Value::Real(d) => Ok(d.clone()),
            _ => Err(EngineError::BadArgumentType),
        }
    }

    /// FOR (named) and START (anonymous) share one body: pop `start
    /// end`, run the body with the counter advancing by 1 (NEXT) or by
    /// a value popped after each iteration (STEP), until the counter
    /// crosses the end bound in the direction of the step sign. With
    /// STEP the check is skipped before the first iteration since the
    /// step is not known yet.
    fn run_counted_loop(&mut self, tokens: &[Token], i: &mut usize, named: bool) -> Result<()> {
        *i += 1;
        let var_name = if named {
            match tokens.get(*i) {
                Some(Token::Command(name)) => {
                    let name = name.clone();
                    *i += 1;
                    name
                }
                _ => {
                    return Err(EngineError::Structural("FOR: expected variable name".into()))
                }
            }
        } else {
            String::new()
        };
        let body = collect_until(tokens, i, &["NEXT", "STEP"])?;
        let has_step = matches!(&tokens[*i], Token::Command(c) if c == "STEP");
        // *i rests on NEXT/STEP; the main loop steps past it.

        if self.store.depth()? < 2 {
            return Err(EngineError::TooFewArguments);
        }
        let end_value = self.store.pop()?;
        let start_value = self.store.pop()?;
        let start = Self::loop_bound(&start_value)?;
        let end = Self::loop_bound(&end_value)?;
        let use_int = matches!(start_value, Value::Integer(_));

        let mut counter = start;
        let mut step = BigDecimal::one();
        let mut first = true;
        loop {
            if !first || !has_step {
                if step > BigDecimal::zero() && counter > end {
                    break;
                }
                if step < BigDecimal::zero() && counter < end {
                    break;
                }
            }
            first = false;

            if named {
                let bound = if use_int {
                    Value::Integer(trunc_to_bigint(&counter))
                } else {
                    Value::Real(counter.clone())
                };
                let mut frame = LocalFrame::new();
                frame.insert(var_name.clone(), bound);
                self.push_locals(frame);
                let result = self.execute_tokens(&body);
                self.pop_locals();
                result?;
            } else {
                self.execute_tokens(&body)?;
            }

            if has_step {
                if self.store.depth()? < 1 {
                    return Err(EngineError::Structural("STEP: missing step value".into()));
                }
                let step_value = self.store.pop()?;
                step = Self::loop_bound(&step_value)?;
            }
            counter = &counter + &step;
        }
        Ok(())
    }

    fn run_while(&mut self, tokens: &[Token], i: &mut usize) -> Result<()> {
        *i += 1;
        let cond = collect_until(tokens, i, &["REPEAT"])?;
        *i += 1; // skip REPEAT
        let body = collect_until(tokens, i, &["END"])?;

        loop {
            self.execute_tokens(&cond)?;
            if !self.pop_condition("WHILE")? {
                return Ok(());
            }
            self.execute_tokens(&body)?;
        }
    }

    fn run_do(&mut self, tokens: &[Token], i: &mut usize) -> Result<()> {
        *i += 1;
        let body = collect_until(tokens, i, &["UNTIL"])?;
        *i += 1; // skip UNTIL
        let cond = collect_until(tokens, i, &["END"])?;

        loop {
            self.execute_tokens(&body)?;
            self.execute_tokens(&cond)?;
            if self.pop_condition("UNTIL")? {
                return Ok(());
            }
        }
    }

    // --- Undo / redo ---

    /// Restore the pre-state of the most recent evaluation. The pointer
    /// lands on the post-snapshot of the evaluation before it, so
    /// repeated undo walks further back.
    pub fn undo(&mut self) -> Result<bool> {
        let cur = self.store.current_undo_seq()?;
        if cur <= 1 {
            return Ok(false);
        }
        debug!(cur, "undo");
        self.store.begin()?;
        let result = (|| {
            let ok = self.store.restore_stack(cur - 1)?;
            if ok {
                self.store.set_undo_seq(cur - 2)?;
            }
            Ok(ok)
        })();
        match result {
            Ok(ok) => {
                self.store.commit()?;
                Ok(ok)
            }
            Err(e) => {
                let _ = self.store.rollback();
                Err(e)
            }
        }
    }

    /// Re-apply the next evaluation forward of the pointer.
    pub fn redo(&mut self) -> Result<bool> {
        let cur = self.store.current_undo_seq()?;
        let max = self.store.history_max_seq()?;
        if cur + 2 > max {
            return Ok(false);
        }
        debug!(cur, max, "redo");
        self.store.begin()?;
        match self.store.restore_stack(cur + 2) {
            Ok(ok) => {
                self.store.commit()?;
                Ok(ok)
            }
            Err(e) => {
                let _ = self.store.rollback();
                Err(e)
            }
        }
    }

    /// Number of evaluations reachable by repeated undo.
    pub fn undo_levels(&self) -> Result<i64> {
        Ok(self.store.current_undo_seq()? / 2)
    }

    /// Number of evaluations reachable by repeated redo.
    pub fn redo_levels(&self) -> Result<i64> {
        let cur = self.store.current_undo_seq()?;
        let max = self.store.history_max_seq()?;
        Ok((max - cur) / 2)
    }

    /// Metadata lookup for the embedding surface.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.store.get_meta(key)
    }
}
