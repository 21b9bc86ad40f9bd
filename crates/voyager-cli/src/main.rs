//! Interactive calculator prompt.
//!
//! A readline loop over the engine: each line is evaluated, failures
//! print the on-stack error to stderr, and the stack is displayed
//! top-down after every input. Exits 0 on quit, 1 when the store
//! cannot be opened.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use voyager_core::Context;

#[derive(Parser)]
#[command(name = "voyager", version, about = "Persistent RPL-style calculator")]
struct Args {
    /// Session database path; omit for an in-memory session.
    db_path: Option<PathBuf>,
}

fn display_stack(ctx: &Context) {
    let depth = ctx.depth().unwrap_or(0);
    for level in (1..=depth).rev() {
        match ctx.repr_at(level) {
            Ok(repr) => println!("{}: {}", level, repr),
            Err(_) => println!("{}: ?", level),
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut ctx = Context::open(args.db_path.as_deref())?;
    let mut editor = DefaultEditor::new()?;

    println!("voyager {}", env!("CARGO_PKG_VERSION"));
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "q" || line == "quit" {
                    break;
                }
                let _ = editor.add_history_entry(line);

                if let Err(e) = ctx.exec(line) {
                    debug!(error = %e, "evaluation failed");
                    // The error value is on the stack; show it distinctly.
                    if let Ok(repr) = ctx.repr_at(1) {
                        eprintln!("** {}", repr);
                    }
                }
                display_stack(&ctx);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("voyager: {}", e);
            ExitCode::FAILURE
        }
    }
}
